//! Thin wrapper around the secp256k1 arithmetic of the `k256` crate.
//!
//! All other modules go through this one for point compression, canonical
//! scalar decoding, multiscalar multiplication, and hash-to-curve, so the rest
//! of the crate never touches the SEC1 encoding details directly.

use {
    k256::elliptic_curve::{
        bigint::U256,
        ops::{LinearCombinationExt, Reduce},
        sec1::{FromEncodedPoint, ToEncodedPoint},
        Field, Group, PrimeField,
    },
    k256::{AffinePoint, EncodedPoint},
    rand::rngs::OsRng,
    sha2::{Digest, Sha256},
};

pub use k256::{ProjectivePoint, Scalar};

/// Byte length of a compressed curve point.
pub const POINT_LEN: usize = 33;
/// Byte length of a scalar.
pub const SCALAR_LEN: usize = 32;

/// The secp256k1 base point.
pub const G: ProjectivePoint = ProjectivePoint::GENERATOR;

/// A curve point in 33-byte SEC1 compressed form.
///
/// The identity has no compressed SEC1 encoding; compressing it yields the
/// all-zero byte string, which never decompresses. Proof verifiers therefore
/// reject the identity for free when they parse their inputs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CompressedPoint(pub [u8; POINT_LEN]);

impl CompressedPoint {
    pub fn as_bytes(&self) -> &[u8; POINT_LEN] {
        &self.0
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; POINT_LEN] {
        self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(CompressedPoint)
    }

    pub fn decompress(&self) -> Option<ProjectivePoint> {
        let encoded = EncodedPoint::from_bytes(self.0).ok()?;
        Option::<AffinePoint>::from(AffinePoint::from_encoded_point(&encoded))
            .map(ProjectivePoint::from)
    }
}

impl Default for CompressedPoint {
    fn default() -> Self {
        CompressedPoint([0u8; POINT_LEN])
    }
}

/// Compresses a point to its 33-byte SEC1 form.
pub fn compress(point: &ProjectivePoint) -> CompressedPoint {
    if bool::from(point.is_identity()) {
        return CompressedPoint::default();
    }
    let encoded = point.to_affine().to_encoded_point(true);
    let mut bytes = [0u8; POINT_LEN];
    bytes.copy_from_slice(encoded.as_bytes());
    CompressedPoint(bytes)
}

/// Interprets 32 big-endian bytes as a scalar, rejecting values that are not
/// fully reduced modulo the group order.
pub fn scalar_from_canonical_bytes(bytes: &[u8]) -> Option<Scalar> {
    let bytes: [u8; SCALAR_LEN] = bytes.try_into().ok()?;
    Option::from(Scalar::from_repr(bytes.into()))
}

/// Serializes a scalar to 32 big-endian bytes.
pub fn scalar_to_bytes(scalar: &Scalar) -> [u8; SCALAR_LEN] {
    let mut bytes = [0u8; SCALAR_LEN];
    bytes.copy_from_slice(scalar.to_bytes().as_slice());
    bytes
}

/// Samples a uniformly random non-zero scalar.
pub(crate) fn random_nonzero_scalar() -> Scalar {
    loop {
        let scalar = Scalar::random(&mut OsRng);
        if !bool::from(scalar.is_zero()) {
            return scalar;
        }
    }
}

/// Computes `sum(scalars[i] * points[i])` as a single multi-exponentiation.
pub fn multiscalar_mul(scalars: &[Scalar], points: &[ProjectivePoint]) -> ProjectivePoint {
    debug_assert_eq!(scalars.len(), points.len());
    let terms: Vec<(ProjectivePoint, Scalar)> = points
        .iter()
        .copied()
        .zip(scalars.iter().copied())
        .collect();
    ProjectivePoint::lincomb_ext(terms.as_slice())
}

/// Maps tagged input bytes to a curve point by try-and-increment.
///
/// The SHA-256 digest of the tag, the inputs, and a counter byte is taken as a
/// candidate x-coordinate and decompressed with even-Y parity; the counter is
/// bumped until a coordinate on the curve appears. The discrete log of the
/// result relative to `G` is unknown.
pub fn hash_to_point(tag: &[u8], inputs: &[&[u8]]) -> ProjectivePoint {
    let mut counter = 0u8;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(tag);
        for input in inputs {
            hasher.update(input);
        }
        hasher.update([counter]);
        let digest = hasher.finalize();

        let mut candidate = [0u8; POINT_LEN];
        candidate[0] = 0x02;
        candidate[1..].copy_from_slice(digest.as_slice());
        if let Some(point) = CompressedPoint(candidate).decompress() {
            return point;
        }
        counter = counter.wrapping_add(1);
    }
}

/// Maps tagged input bytes to a uniformly distributed non-zero scalar.
pub fn hash_to_scalar(tag: &[u8], inputs: &[&[u8]]) -> Scalar {
    let mut counter = 0u8;
    loop {
        let mut hasher = Sha256::new();
        hasher.update(tag);
        for input in inputs {
            hasher.update(input);
        }
        hasher.update([counter]);
        let scalar = <Scalar as Reduce<U256>>::reduce_bytes(&hasher.finalize());
        if !bool::from(scalar.is_zero()) {
            return scalar;
        }
        counter = counter.wrapping_add(1);
    }
}
