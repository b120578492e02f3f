//! The Bulletproof range-proof system.
//!
//! Certifies that a Pedersen commitment `C = v*G + gamma*H_Pk` commits to a
//! value in `[0, 2^64)` without revealing it. The construction is the standard
//! inner-product-argument range proof: the prover commits to the bit
//! decomposition of the value, reduces the three bit constraints to one
//! inner-product relation with the challenges `y` and `z`, commits to the
//! resulting polynomial with `T_1` and `T_2`, and compresses the final vectors
//! with the logarithmic argument in
//! [`inner_product`](crate::range_proof::inner_product).
//!
//! The verifier recomputes every challenge from the transcript and checks two
//! identities: the Pedersen relation
//! `t_x*G + tau_x*H_Pk == z^2*C + delta(y,z)*G + x*T_1 + x^2*T_2` and the
//! single multi-exponentiation of the inner-product argument.

pub mod errors;
pub mod generators;
pub mod inner_product;
pub mod util;

use {
    crate::{
        encryption::pedersen::{PedersenCommitment, PedersenOpening},
        range_proof::{
            errors::RangeProofVerificationError, generators::RANGE_PROOF_GENS,
            inner_product::InnerProductProof,
        },
        secp256k1::{
            compress, multiscalar_mul, scalar_from_canonical_bytes, scalar_to_bytes,
            CompressedPoint, ProjectivePoint, Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        transcript::Transcript,
        CONTEXT_ID_LEN,
    },
    k256::elliptic_curve::{Field, Group},
    rand::rngs::OsRng,
    subtle::{Choice, ConditionallySelectable},
};

/// Bit length of the range certified by the proof.
pub const RANGE_PROOF_BIT_LENGTH: usize = 64;

const LG_BIT_LENGTH: usize = 6;

/// Byte length of a serialized range proof.
pub const RANGE_PROOF_LEN: usize =
    (4 + 2 * LG_BIT_LENGTH) * POINT_LEN + 5 * SCALAR_LEN;

const RANGE_PROOF_DOMAIN: &[u8] = b"MPT/RANGE/v1";

#[allow(non_snake_case)]
#[derive(Clone)]
pub struct RangeProof {
    pub A: CompressedPoint,
    pub S: CompressedPoint,
    pub T_1: CompressedPoint,
    pub T_2: CompressedPoint,
    pub t_x_blinding: Scalar,
    pub e_blinding: Scalar,
    pub t_x: Scalar,
    pub ipp_proof: InnerProductProof,
}

#[allow(non_snake_case)]
impl RangeProof {
    fn transcript_new(
        commitment: &PedersenCommitment,
        generator_h: &ProjectivePoint,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Transcript {
        let mut transcript = Transcript::new(RANGE_PROOF_DOMAIN, context_id);
        transcript.append_point(b"commitment", &CompressedPoint(commitment.to_bytes()));
        transcript.append_point(b"generator", &compress(generator_h));
        transcript
    }

    /// Creates a range proof for a committed 64-bit amount.
    ///
    /// This function is randomized. It uses `OsRng` internally to generate the
    /// blinding vectors and scalars.
    ///
    /// * `amount` - The committed amount
    /// * `opening` - The opening of the commitment
    /// * `commitment` - The commitment `amount*G + opening*H_Pk`
    /// * `generator_h` - The recipient-bound generator the commitment uses
    /// * `context_id` - The transaction context the proof is bound to
    #[allow(clippy::many_single_char_names)]
    pub fn new(
        amount: u64,
        opening: &PedersenOpening,
        commitment: &PedersenCommitment,
        generator_h: &ProjectivePoint,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Self {
        let mut transcript = Self::transcript_new(commitment, generator_h, context_id);

        let bp_gens = &*RANGE_PROOF_GENS;
        let n = RANGE_PROOF_BIT_LENGTH;
        let H = *generator_h;

        // commit to the bit decomposition of the amount
        let a_blinding = Scalar::random(&mut OsRng);
        let mut A = H * &a_blinding;
        for i in 0..n {
            let bit = Choice::from(((amount >> i) & 1) as u8);
            let mut point = -bp_gens.h_vec[i];
            point.conditional_assign(&bp_gens.g_vec[i], bit);
            A += point;
        }
        let A = compress(&A);

        // commit to the blinding vectors
        let s_L: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut OsRng)).collect();
        let s_R: Vec<Scalar> = (0..n).map(|_| Scalar::random(&mut OsRng)).collect();
        let s_blinding = Scalar::random(&mut OsRng);

        let S = {
            let mut scalars = Vec::with_capacity(2 * n + 1);
            scalars.push(s_blinding);
            scalars.extend_from_slice(&s_L);
            scalars.extend_from_slice(&s_R);
            let mut points = Vec::with_capacity(2 * n + 1);
            points.push(H);
            points.extend_from_slice(&bp_gens.g_vec);
            points.extend_from_slice(&bp_gens.h_vec);
            compress(&multiscalar_mul(&scalars, &points))
        };

        transcript.append_point(b"A", &A);
        transcript.append_point(b"S", &S);
        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");

        // l(x) = (a_L - z*1) + s_L*x
        // r(x) = y^n o (a_R + z*1 + s_R*x) + z^2*2^n
        let mut l_poly = util::VecPoly1::zero(n);
        let mut r_poly = util::VecPoly1::zero(n);

        let zz = z * z;
        let mut exp_y = Scalar::ONE;
        let mut exp_2 = Scalar::ONE;
        for i in 0..n {
            let a_L_i = Scalar::from((amount >> i) & 1);
            let a_R_i = a_L_i - Scalar::ONE;

            l_poly.0[i] = a_L_i - z;
            l_poly.1[i] = s_L[i];
            r_poly.0[i] = exp_y * (a_R_i + z) + zz * exp_2;
            r_poly.1[i] = exp_y * s_R[i];

            exp_y *= y;
            exp_2 = exp_2 + exp_2;
        }

        // t(x) = <l(x), r(x)> = t_0 + t_1*x + t_2*x^2
        let t_poly = l_poly.inner_product(&r_poly);

        let t_1_blinding = Scalar::random(&mut OsRng);
        let t_2_blinding = Scalar::random(&mut OsRng);
        let T_1 = compress(&multiscalar_mul(&[t_poly.1, t_1_blinding], &[G, H]));
        let T_2 = compress(&multiscalar_mul(&[t_poly.2, t_2_blinding], &[G, H]));

        transcript.append_point(b"T_1", &T_1);
        transcript.append_point(b"T_2", &T_2);
        let x = transcript.challenge_scalar(b"x");

        let t_blinding_poly =
            util::Poly2(zz * opening.get_scalar(), t_1_blinding, t_2_blinding);

        let t_x = t_poly.eval(x);
        let t_x_blinding = t_blinding_poly.eval(x);
        let e_blinding = a_blinding + s_blinding * x;

        transcript.append_scalar(b"t_x_blinding", &t_x_blinding);
        transcript.append_scalar(b"e_blinding", &e_blinding);
        transcript.append_scalar(b"t_x", &t_x);
        let w = transcript.challenge_scalar(b"w");
        let Q = G * &w;

        let l_vec = l_poly.eval(x);
        let r_vec = r_poly.eval(x);

        // fold the y^-i factors into the H generators for the inner product
        let y_inv = Option::<Scalar>::from(y.invert()).unwrap();
        let h_prime: Vec<ProjectivePoint> = util::exp_iter(y_inv)
            .zip(bp_gens.h_vec.iter())
            .map(|(y_pow, h)| h * &y_pow)
            .collect();

        let ipp_proof = InnerProductProof::new(
            &Q,
            bp_gens.g_vec.clone(),
            h_prime,
            l_vec,
            r_vec,
            &mut transcript,
        );

        RangeProof {
            A,
            S,
            T_1,
            T_2,
            t_x_blinding,
            e_blinding,
            t_x,
            ipp_proof,
        }
    }

    /// Verifies a range proof against a commitment and its generator.
    #[allow(clippy::many_single_char_names)]
    pub fn verify(
        &self,
        commitment: &PedersenCommitment,
        generator_h: &ProjectivePoint,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<(), RangeProofVerificationError> {
        let mut transcript = Self::transcript_new(commitment, generator_h, context_id);

        let bp_gens = &*RANGE_PROOF_GENS;
        let n = RANGE_PROOF_BIT_LENGTH;
        let H = *generator_h;

        let A = transcript.validate_and_append_point(b"A", &self.A)?;
        let S = transcript.validate_and_append_point(b"S", &self.S)?;
        let y = transcript.challenge_scalar(b"y");
        let z = transcript.challenge_scalar(b"z");

        let T_1 = transcript.validate_and_append_point(b"T_1", &self.T_1)?;
        let T_2 = transcript.validate_and_append_point(b"T_2", &self.T_2)?;
        let x = transcript.challenge_scalar(b"x");

        transcript.append_scalar(b"t_x_blinding", &self.t_x_blinding);
        transcript.append_scalar(b"e_blinding", &self.e_blinding);
        transcript.append_scalar(b"t_x", &self.t_x);
        let w = transcript.challenge_scalar(b"w");

        let zz = z * z;

        // t_x*G + tau_x*H == z^2*C + delta(y,z)*G + x*T_1 + x^2*T_2
        let lhs = multiscalar_mul(&[self.t_x, self.t_x_blinding], &[G, H]);
        let rhs = multiscalar_mul(
            &[zz, delta(&y, &z), x, x * x],
            &[commitment.get_point(), G, T_1, T_2],
        );
        if lhs != rhs {
            return Err(RangeProofVerificationError::AlgebraicRelation);
        }

        // the single multi-exponentiation identity of the inner-product argument
        let (u_sq, u_inv_sq, s) = self.ipp_proof.verification_scalars(n, &mut transcript)?;
        let a = self.ipp_proof.a;
        let b = self.ipp_proof.b;

        let y_inv = Option::<Scalar>::from(y.invert()).unwrap();
        let minus_z = -z;

        let mut scalars = Vec::with_capacity(4 + 2 * u_sq.len() + 2 * n);
        let mut points = Vec::with_capacity(4 + 2 * u_sq.len() + 2 * n);

        scalars.push(Scalar::ONE);
        points.push(A);
        scalars.push(x);
        points.push(S);
        scalars.push(-self.e_blinding);
        points.push(H);
        scalars.push(w * (self.t_x - a * b));
        points.push(G);

        for ((u_sq_j, u_inv_sq_j), (L, R)) in u_sq
            .iter()
            .zip(u_inv_sq.iter())
            .zip(self.ipp_proof.L_vec.iter().zip(self.ipp_proof.R_vec.iter()))
        {
            scalars.push(*u_sq_j);
            points.push(
                L.decompress()
                    .ok_or(RangeProofVerificationError::Deserialization)?,
            );
            scalars.push(*u_inv_sq_j);
            points.push(
                R.decompress()
                    .ok_or(RangeProofVerificationError::Deserialization)?,
            );
        }

        // G_i scalar: -z - a*s_i
        for s_i in s.iter() {
            scalars.push(minus_z - a * s_i);
        }
        points.extend_from_slice(&bp_gens.g_vec);

        // H_i scalar: z + y^-i*(z^2*2^i - b*s_i^-1), with s reversed giving the inverses
        for ((s_i_inv, exp_y_inv), exp_2) in s
            .iter()
            .rev()
            .zip(util::exp_iter(y_inv))
            .zip(util::exp_iter(Scalar::from(2u64)))
        {
            scalars.push(z + exp_y_inv * (zz * exp_2 - b * s_i_inv));
        }
        points.extend_from_slice(&bp_gens.h_vec);

        let mega_check = multiscalar_mul(&scalars, &points);

        if bool::from(mega_check.is_identity()) {
            Ok(())
        } else {
            Err(RangeProofVerificationError::AlgebraicRelation)
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RANGE_PROOF_LEN);
        buf.extend_from_slice(self.A.as_bytes());
        buf.extend_from_slice(self.S.as_bytes());
        buf.extend_from_slice(self.T_1.as_bytes());
        buf.extend_from_slice(self.T_2.as_bytes());
        buf.extend_from_slice(&scalar_to_bytes(&self.t_x_blinding));
        buf.extend_from_slice(&scalar_to_bytes(&self.e_blinding));
        buf.extend_from_slice(&scalar_to_bytes(&self.t_x));
        buf.extend_from_slice(&self.ipp_proof.to_bytes());
        buf
    }

    pub fn from_bytes(slice: &[u8]) -> Result<RangeProof, RangeProofVerificationError> {
        if slice.len() != RANGE_PROOF_LEN {
            return Err(RangeProofVerificationError::ProofLength);
        }

        let A = CompressedPoint(util::read33(&slice[0..]));
        let S = CompressedPoint(util::read33(&slice[POINT_LEN..]));
        let T_1 = CompressedPoint(util::read33(&slice[2 * POINT_LEN..]));
        let T_2 = CompressedPoint(util::read33(&slice[3 * POINT_LEN..]));

        let scalars_at = 4 * POINT_LEN;
        let t_x_blinding = scalar_from_canonical_bytes(&util::read32(&slice[scalars_at..]))
            .ok_or(RangeProofVerificationError::Deserialization)?;
        let e_blinding =
            scalar_from_canonical_bytes(&util::read32(&slice[scalars_at + SCALAR_LEN..]))
                .ok_or(RangeProofVerificationError::Deserialization)?;
        let t_x =
            scalar_from_canonical_bytes(&util::read32(&slice[scalars_at + 2 * SCALAR_LEN..]))
                .ok_or(RangeProofVerificationError::Deserialization)?;

        let ipp_proof = InnerProductProof::from_bytes(&slice[scalars_at + 3 * SCALAR_LEN..])?;
        if ipp_proof.L_vec.len() != LG_BIT_LENGTH {
            return Err(RangeProofVerificationError::ProofLength);
        }

        Ok(RangeProof {
            A,
            S,
            T_1,
            T_2,
            t_x_blinding,
            e_blinding,
            t_x,
            ipp_proof,
        })
    }
}

/// Computes `delta(y, z) = (z - z^2)*<1, y^n> - z^3*<1, 2^n>` for the 64-bit
/// range.
fn delta(y: &Scalar, z: &Scalar) -> Scalar {
    let sum_y = util::sum_of_powers(y, RANGE_PROOF_BIT_LENGTH);
    let sum_2 = Scalar::from(u64::MAX); // sum of 2^i for i < 64
    let zz = z * z;

    (z - &zz) * sum_y - zz * z * sum_2
}
