//! The logarithmic inner-product argument of the range proof.
//!
//! Given a commitment `P = <a, G> + <b, H> + <a, b>*Q`, the argument proves
//! knowledge of the vectors `a` and `b` in O(log n) space by halving the
//! vectors each round: the prover sends the cross-term commitments `L` and
//! `R`, receives a challenge `u`, and folds the halves into vectors of half
//! the length until single scalars remain.

use {
    crate::{
        range_proof::{errors::RangeProofVerificationError, util},
        secp256k1::{
            compress, multiscalar_mul, scalar_from_canonical_bytes, CompressedPoint,
            ProjectivePoint, Scalar, POINT_LEN, SCALAR_LEN,
        },
        transcript::Transcript,
    },
    k256::elliptic_curve::Field,
};

#[allow(non_snake_case)]
#[derive(Clone)]
pub struct InnerProductProof {
    pub L_vec: Vec<CompressedPoint>,
    pub R_vec: Vec<CompressedPoint>,
    pub a: Scalar,
    pub b: Scalar,
}

#[allow(non_snake_case)]
impl InnerProductProof {
    /// Creates an inner-product proof.
    ///
    /// The generator vectors must already carry any per-index factors (the
    /// range proof folds `y^-i` into `H` before calling this constructor). All
    /// vector lengths must be the same power of two.
    pub fn new(
        Q: &ProjectivePoint,
        mut G_vec: Vec<ProjectivePoint>,
        mut H_vec: Vec<ProjectivePoint>,
        mut a_vec: Vec<Scalar>,
        mut b_vec: Vec<Scalar>,
        transcript: &mut Transcript,
    ) -> Self {
        let mut n = G_vec.len();
        debug_assert!(n.is_power_of_two());
        debug_assert_eq!(H_vec.len(), n);
        debug_assert_eq!(a_vec.len(), n);
        debug_assert_eq!(b_vec.len(), n);

        let lg_n = n.trailing_zeros() as usize;
        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);

        while n != 1 {
            n /= 2;

            let (a_lo, a_hi) = a_vec.split_at(n);
            let (b_lo, b_hi) = b_vec.split_at(n);
            let (G_lo, G_hi) = G_vec.split_at(n);
            let (H_lo, H_hi) = H_vec.split_at(n);

            let c_lo = util::inner_product(a_lo, b_hi);
            let c_hi = util::inner_product(a_hi, b_lo);

            let L = {
                let mut scalars: Vec<Scalar> = Vec::with_capacity(2 * n + 1);
                scalars.extend_from_slice(a_lo);
                scalars.extend_from_slice(b_hi);
                scalars.push(c_lo);
                let mut points: Vec<ProjectivePoint> = Vec::with_capacity(2 * n + 1);
                points.extend_from_slice(G_hi);
                points.extend_from_slice(H_lo);
                points.push(*Q);
                compress(&multiscalar_mul(&scalars, &points))
            };
            let R = {
                let mut scalars: Vec<Scalar> = Vec::with_capacity(2 * n + 1);
                scalars.extend_from_slice(a_hi);
                scalars.extend_from_slice(b_lo);
                scalars.push(c_hi);
                let mut points: Vec<ProjectivePoint> = Vec::with_capacity(2 * n + 1);
                points.extend_from_slice(G_lo);
                points.extend_from_slice(H_hi);
                points.push(*Q);
                compress(&multiscalar_mul(&scalars, &points))
            };

            transcript.append_point(b"L", &L);
            transcript.append_point(b"R", &R);
            let u = transcript.challenge_scalar(b"u");
            // challenge scalars are never zero, so inversion cannot fail
            let u_inv = Option::<Scalar>::from(u.invert()).unwrap();

            let folded_a: Vec<Scalar> = (0..n)
                .map(|i| a_lo[i] * u + u_inv * a_hi[i])
                .collect();
            let folded_b: Vec<Scalar> = (0..n)
                .map(|i| b_lo[i] * u_inv + u * b_hi[i])
                .collect();
            let folded_G: Vec<ProjectivePoint> = (0..n)
                .map(|i| multiscalar_mul(&[u_inv, u], &[G_lo[i], G_hi[i]]))
                .collect();
            let folded_H: Vec<ProjectivePoint> = (0..n)
                .map(|i| multiscalar_mul(&[u, u_inv], &[H_lo[i], H_hi[i]]))
                .collect();

            a_vec = folded_a;
            b_vec = folded_b;
            G_vec = folded_G;
            H_vec = folded_H;

            L_vec.push(L);
            R_vec.push(R);
        }

        InnerProductProof {
            L_vec,
            R_vec,
            a: a_vec[0],
            b: b_vec[0],
        }
    }

    /// Recomputes the folding challenges and the verification scalar vector.
    ///
    /// Returns the squared challenges, their inverses, and the vector `s` such
    /// that the folded generator `G` equals `<s, G_vec>` (and the folded `H`
    /// equals `<reversed(s), H_vec>`).
    pub fn verification_scalars(
        &self,
        n: usize,
        transcript: &mut Transcript,
    ) -> Result<(Vec<Scalar>, Vec<Scalar>, Vec<Scalar>), RangeProofVerificationError> {
        let lg_n = self.L_vec.len();
        if lg_n >= 32 || n != (1 << lg_n) || self.R_vec.len() != lg_n {
            return Err(RangeProofVerificationError::ProofLength);
        }

        // recompute the challenge of each folding round
        let mut challenges = Vec::with_capacity(lg_n);
        for (L, R) in self.L_vec.iter().zip(self.R_vec.iter()) {
            transcript.validate_and_append_point(b"L", L)?;
            transcript.validate_and_append_point(b"R", R)?;
            challenges.push(transcript.challenge_scalar(b"u"));
        }

        let challenges_inv: Vec<Scalar> = challenges
            .iter()
            .map(|u| Option::<Scalar>::from(u.invert()).unwrap())
            .collect();
        let allinv: Scalar = challenges_inv.iter().product();

        let challenges_sq: Vec<Scalar> = challenges.iter().map(|u| u * u).collect();
        let challenges_inv_sq: Vec<Scalar> =
            challenges_inv.iter().map(|u| u * u).collect();

        // s[i] = prod_j u_j^{+-1}, signs given by the bits of i
        let mut s = Vec::with_capacity(n);
        s.push(allinv);
        for i in 1..n {
            let lg_i = (31 - (i as u32).leading_zeros()) as usize;
            let k = 1 << lg_i;
            let u_lg_i_sq = challenges_sq[(lg_n - 1) - lg_i];
            s.push(s[i - k] * u_lg_i_sq);
        }

        Ok((challenges_sq, challenges_inv_sq, s))
    }

    pub fn serialized_size(&self) -> usize {
        2 * self.L_vec.len() * POINT_LEN + 2 * SCALAR_LEN
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.serialized_size());
        for (L, R) in self.L_vec.iter().zip(self.R_vec.iter()) {
            buf.extend_from_slice(L.as_bytes());
            buf.extend_from_slice(R.as_bytes());
        }
        buf.extend_from_slice(self.a.to_bytes().as_slice());
        buf.extend_from_slice(self.b.to_bytes().as_slice());
        buf
    }

    pub fn from_bytes(slice: &[u8]) -> Result<Self, RangeProofVerificationError> {
        let len = slice.len();
        if len < 2 * SCALAR_LEN || (len - 2 * SCALAR_LEN) % (2 * POINT_LEN) != 0 {
            return Err(RangeProofVerificationError::Deserialization);
        }
        let lg_n = (len - 2 * SCALAR_LEN) / (2 * POINT_LEN);
        if lg_n >= 32 {
            return Err(RangeProofVerificationError::Deserialization);
        }

        let mut L_vec = Vec::with_capacity(lg_n);
        let mut R_vec = Vec::with_capacity(lg_n);
        for i in 0..lg_n {
            let pos = 2 * i * POINT_LEN;
            L_vec.push(CompressedPoint(util::read33(&slice[pos..])));
            R_vec.push(CompressedPoint(util::read33(&slice[pos + POINT_LEN..])));
        }

        let pos = 2 * lg_n * POINT_LEN;
        let a = scalar_from_canonical_bytes(&slice[pos..pos + SCALAR_LEN])
            .ok_or(RangeProofVerificationError::Deserialization)?;
        let b = scalar_from_canonical_bytes(&slice[pos + SCALAR_LEN..pos + 2 * SCALAR_LEN])
            .ok_or(RangeProofVerificationError::Deserialization)?;

        Ok(InnerProductProof { L_vec, R_vec, a, b })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            range_proof::generators::RANGE_PROOF_GENS,
            secp256k1::{random_nonzero_scalar, G},
        },
    };

    #[test]
    #[allow(non_snake_case)]
    fn test_inner_product_proof_correctness() {
        let n = 64;
        let gens = &*RANGE_PROOF_GENS;

        let G_vec = gens.g_vec.clone();
        let H_vec = gens.h_vec.clone();
        let a_vec: Vec<Scalar> = (0..n).map(|_| random_nonzero_scalar()).collect();
        let b_vec: Vec<Scalar> = (0..n).map(|_| random_nonzero_scalar()).collect();
        let c = util::inner_product(&a_vec, &b_vec);

        let Q = G * &Scalar::from(3u64);

        // P = <a, G> + <b, H> + c*Q
        let mut scalars = a_vec.clone();
        scalars.extend_from_slice(&b_vec);
        scalars.push(c);
        let mut points = G_vec.clone();
        points.extend_from_slice(&H_vec);
        points.push(Q);
        let P = multiscalar_mul(&scalars, &points);

        let mut prover_transcript = Transcript::new(b"test", &[0u8; 32]);
        let proof = InnerProductProof::new(
            &Q,
            G_vec.clone(),
            H_vec.clone(),
            a_vec,
            b_vec,
            &mut prover_transcript,
        );

        // replay the transcript and check the folded relation directly
        let mut verifier_transcript = Transcript::new(b"test", &[0u8; 32]);
        let (u_sq, u_inv_sq, s) = proof
            .verification_scalars(n, &mut verifier_transcript)
            .unwrap();

        let a = proof.a;
        let b = proof.b;
        let s_inv: Vec<Scalar> = s.iter().rev().copied().collect();

        // P + sum(u_j^2 L_j) + sum(u_j^-2 R_j)
        //     == <a*s, G> + <b*s_inv, H> + a*b*Q
        let mut lhs_scalars = vec![Scalar::ONE];
        let mut lhs_points = vec![P];
        for ((u_sq_j, u_inv_sq_j), (L, R)) in u_sq
            .iter()
            .zip(u_inv_sq.iter())
            .zip(proof.L_vec.iter().zip(proof.R_vec.iter()))
        {
            lhs_scalars.push(*u_sq_j);
            lhs_points.push(L.decompress().unwrap());
            lhs_scalars.push(*u_inv_sq_j);
            lhs_points.push(R.decompress().unwrap());
        }
        let lhs = multiscalar_mul(&lhs_scalars, &lhs_points);

        let mut rhs_scalars: Vec<Scalar> = s.iter().map(|s_i| a * s_i).collect();
        rhs_scalars.extend(s_inv.iter().map(|s_i| b * s_i));
        rhs_scalars.push(a * b);
        let mut rhs_points = G_vec;
        rhs_points.extend_from_slice(&H_vec);
        rhs_points.push(Q);
        let rhs = multiscalar_mul(&rhs_scalars, &rhs_points);

        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_inner_product_proof_bytes_round_trip() {
        let n = 64;
        let gens = &*RANGE_PROOF_GENS;

        let a_vec: Vec<Scalar> = (0..n).map(|_| random_nonzero_scalar()).collect();
        let b_vec: Vec<Scalar> = (0..n).map(|_| random_nonzero_scalar()).collect();
        let q = G * &Scalar::from(3u64);

        let mut transcript = Transcript::new(b"test", &[0u8; 32]);
        let proof = InnerProductProof::new(
            &q,
            gens.g_vec.clone(),
            gens.h_vec.clone(),
            a_vec,
            b_vec,
            &mut transcript,
        );

        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), proof.serialized_size());

        let decoded = InnerProductProof::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.L_vec.len(), proof.L_vec.len());
        assert_eq!(decoded.a, proof.a);
        assert_eq!(decoded.b, proof.b);
    }
}
