//! Pedersen commitments over a recipient-bound generator.
//!
//! A commitment to an amount `m` with blinding `rho` is `PC = m*G + rho*H_Pk`,
//! where `H_Pk` is a second generator derived from the recipient's ElGamal
//! public key by hash-to-curve. Binding the generator to the recipient prevents
//! a prover from choosing an `H` whose discrete log relative to `G` it knows,
//! which would let it open a commitment to more than one amount.

use {
    crate::{
        encryption::elgamal::ElGamalPubkey,
        secp256k1::{
            compress, hash_to_point, multiscalar_mul, random_nonzero_scalar,
            scalar_from_canonical_bytes, scalar_to_bytes, CompressedPoint, ProjectivePoint,
            Scalar, G, POINT_LEN, SCALAR_LEN,
        },
    },
    core::ops::{Add, Sub},
    k256::elliptic_curve::Field,
    serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer},
    std::fmt,
    subtle::{Choice, ConstantTimeEq},
    zeroize::Zeroize,
};

/// Byte length of a Pedersen commitment.
pub const PEDERSEN_COMMITMENT_LEN: usize = POINT_LEN;
/// Byte length of a Pedersen opening.
pub const PEDERSEN_OPENING_LEN: usize = SCALAR_LEN;

const H_GENERATOR_DOMAIN: &[u8] = b"MPT/H/v1";

/// Derives the commitment generator `H_Pk` bound to a recipient public key.
///
/// The generator is the hash-to-curve image of the compressed public key under
/// a fixed domain tag (try-and-increment, even-Y parity), so its discrete log
/// relative to `G` is unknown to every party including the key holder.
pub fn derive_generator(pubkey: &ElGamalPubkey) -> ProjectivePoint {
    hash_to_point(H_GENERATOR_DOMAIN, &[&pubkey.to_bytes()])
}

/// Handle for the Pedersen commitment scheme.
pub struct Pedersen;

impl Pedersen {
    /// Commits to an amount under a generator with a fresh random opening,
    /// returning both.
    #[allow(clippy::new_ret_no_self)]
    pub fn new(amount: u64, generator: &ProjectivePoint) -> (PedersenCommitment, PedersenOpening) {
        let opening = PedersenOpening::new_rand();
        let commitment = Pedersen::with(amount, &opening, generator);
        (commitment, opening)
    }

    /// Commits to an amount under a generator with a caller-supplied opening.
    pub fn with(
        amount: u64,
        opening: &PedersenOpening,
        generator: &ProjectivePoint,
    ) -> PedersenCommitment {
        PedersenCommitment(multiscalar_mul(
            &[Scalar::from(amount), opening.get_scalar()],
            &[G, *generator],
        ))
    }
}

/// Opening (blinding factor) for a Pedersen commitment.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct PedersenOpening(pub(crate) Scalar);

impl PedersenOpening {
    pub fn new_rand() -> Self {
        PedersenOpening(random_nonzero_scalar())
    }

    pub fn get_scalar(&self) -> Scalar {
        self.0
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; PEDERSEN_OPENING_LEN] {
        scalar_to_bytes(&self.0)
    }

    /// Parses an opening, rejecting zero and non-canonical scalars.
    pub fn from_bytes(bytes: &[u8]) -> Option<PedersenOpening> {
        let scalar = scalar_from_canonical_bytes(bytes)?;
        if bool::from(scalar.is_zero()) {
            return None;
        }
        Some(PedersenOpening(scalar))
    }
}

impl Eq for PedersenOpening {}
impl PartialEq for PedersenOpening {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for PedersenOpening {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

/// Pedersen commitment to an amount.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PedersenCommitment(pub(crate) ProjectivePoint);

impl PedersenCommitment {
    pub fn get_point(&self) -> ProjectivePoint {
        self.0
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; PEDERSEN_COMMITMENT_LEN] {
        compress(&self.0).to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<PedersenCommitment> {
        CompressedPoint::from_slice(bytes)?
            .decompress()
            .map(PedersenCommitment)
    }
}

impl Serialize for PedersenCommitment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for PedersenCommitment {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CommitmentVisitor;

        impl<'de> Visitor<'de> for CommitmentVisitor {
            type Value = PedersenCommitment;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a compressed secp256k1 point")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                PedersenCommitment::from_bytes(v).ok_or_else(|| E::custom("invalid commitment"))
            }
        }

        deserializer.deserialize_bytes(CommitmentVisitor)
    }
}

impl<'a, 'b> Add<&'b PedersenCommitment> for &'a PedersenCommitment {
    type Output = PedersenCommitment;

    fn add(self, other: &'b PedersenCommitment) -> PedersenCommitment {
        PedersenCommitment(self.0 + other.0)
    }
}

define_add_variants!(
    LHS = PedersenCommitment,
    RHS = PedersenCommitment,
    Output = PedersenCommitment
);

impl<'a, 'b> Sub<&'b PedersenCommitment> for &'a PedersenCommitment {
    type Output = PedersenCommitment;

    fn sub(self, other: &'b PedersenCommitment) -> PedersenCommitment {
        PedersenCommitment(self.0 - other.0)
    }
}

define_sub_variants!(
    LHS = PedersenCommitment,
    RHS = PedersenCommitment,
    Output = PedersenCommitment
);

#[cfg(test)]
mod tests {
    use {super::*, crate::encryption::elgamal::ElGamalKeypair};

    #[test]
    fn test_derive_generator_deterministic() {
        let keypair = ElGamalKeypair::new_rand();

        let h_0 = derive_generator(&keypair.public);
        let h_1 = derive_generator(&keypair.public);
        assert_eq!(h_0, h_1);

        let other = ElGamalKeypair::new_rand();
        assert_ne!(h_0, derive_generator(&other.public));
    }

    #[test]
    fn test_homomorphic_addition() {
        let keypair = ElGamalKeypair::new_rand();
        let h = derive_generator(&keypair.public);

        let (comm_0, open_0) = Pedersen::new(77, &h);
        let (comm_1, open_1) = Pedersen::new(57, &h);

        let opening_sum = PedersenOpening(open_0.get_scalar() + open_1.get_scalar());
        let comm_sum = Pedersen::with(77 + 57, &opening_sum, &h);

        assert_eq!(comm_sum, comm_0 + comm_1);
    }

    #[test]
    fn test_homomorphic_subtraction() {
        let keypair = ElGamalKeypair::new_rand();
        let h = derive_generator(&keypair.public);

        let (comm_0, open_0) = Pedersen::new(77, &h);
        let (comm_1, open_1) = Pedersen::new(57, &h);

        let opening_diff = PedersenOpening(open_0.get_scalar() - open_1.get_scalar());
        let comm_diff = Pedersen::with(77 - 57, &opening_diff, &h);

        assert_eq!(comm_diff, comm_0 - comm_1);
    }

    #[test]
    fn test_commitment_bytes_round_trip() {
        let keypair = ElGamalKeypair::new_rand();
        let h = derive_generator(&keypair.public);
        let (commitment, _) = Pedersen::new(77, &h);

        let decoded = PedersenCommitment::from_bytes(&commitment.to_bytes()).unwrap();
        assert_eq!(commitment, decoded);
    }

    #[test]
    fn test_opening_bytes_round_trip() {
        let opening = PedersenOpening::new_rand();
        let decoded = PedersenOpening::from_bytes(&opening.to_bytes()).unwrap();
        assert_eq!(opening, decoded);
    }

    #[test]
    fn test_serde_commitment() {
        let keypair = ElGamalKeypair::new_rand();
        let h = derive_generator(&keypair.public);
        let (commitment, _) = Pedersen::new(77, &h);

        let encoded = bincode::serialize(&commitment).unwrap();
        let decoded: PedersenCommitment = bincode::deserialize(&encoded).unwrap();

        assert_eq!(commitment, decoded);
    }
}
