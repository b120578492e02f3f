//! The same-plaintext sigma proof system.
//!
//! The proof certifies that `N >= 2` ElGamal ciphertexts under distinct
//! recipient keys all encrypt one common secret amount. A confidential send
//! publishes the transfer amount encrypted to the sender, the receiver, and
//! optionally the issuer; this proof ties the copies together without
//! revealing the amount.
//!
//! A single masked-amount response is shared by every ciphertext equation,
//! which is what forces the plaintexts to agree: any two accepting transcripts
//! with distinct challenges extract the same amount from each ciphertext.
//!
//! The protocol guarantees computational soundness (by the hardness of discrete
//! log) and perfect zero-knowledge in the random oracle model.

use {
    crate::{
        encryption::elgamal::{ElGamalCiphertext, ElGamalPubkey, ElGamalRandomness},
        secp256k1::{
            compress, multiscalar_mul, random_nonzero_scalar, scalar_to_bytes, CompressedPoint,
            ProjectivePoint, Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        sigma_proofs::{
            canonical_scalar_from_optional_slice, compressed_point_from_optional_slice,
            errors::{
                SamePlaintextProofVerificationError, SigmaProofGenerationError,
                SigmaProofVerificationError,
            },
        },
        transcript::Transcript,
        CONTEXT_ID_LEN,
    },
    zeroize::Zeroize,
};

const SAME_PLAINTEXT_DOMAIN: &[u8] = b"MPT/EQ-MULTI/v1";

/// Byte length of a same-plaintext proof over `n` ciphertexts.
pub const fn same_plaintext_proof_len(n: usize) -> usize {
    (2 * n + 1) * POINT_LEN + (n + 1) * SCALAR_LEN
}

/// Same-plaintext proof.
///
/// Contains, for each ciphertext, the commitment pair for its randomness and
/// the shared amount, followed by the standalone amount commitment and the
/// masked responses.
#[allow(non_snake_case)]
#[derive(Clone, Debug)]
pub struct SamePlaintextProof {
    T: Vec<(CompressedPoint, CompressedPoint)>,
    T_m: CompressedPoint,
    s_r: Vec<Scalar>,
    s_m: Scalar,
}

#[allow(non_snake_case)]
impl SamePlaintextProof {
    fn transcript_new(
        pubkeys: &[ElGamalPubkey],
        ciphertexts: &[ElGamalCiphertext],
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Transcript {
        let mut transcript = Transcript::new(SAME_PLAINTEXT_DOMAIN, context_id);
        for (pubkey, ciphertext) in pubkeys.iter().zip(ciphertexts.iter()) {
            transcript.append_point(b"pubkey", &CompressedPoint(pubkey.to_bytes()));
            transcript.append_point(b"C_1", &compress(&ciphertext.c1));
            transcript.append_point(b"C_2", &compress(&ciphertext.c2));
        }
        transcript
    }

    /// Creates a same-plaintext proof over two or more ciphertexts.
    ///
    /// This function is randomized. It uses `OsRng` internally to generate the
    /// masking scalars.
    ///
    /// The statement arrays are indexed together: `ciphertexts[i]` must be the
    /// encryption of `amount` under `pubkeys[i]` with `randomness[i]`.
    pub fn new(
        amount: u64,
        pubkeys: &[ElGamalPubkey],
        ciphertexts: &[ElGamalCiphertext],
        randomness: &[ElGamalRandomness],
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<Self, SigmaProofGenerationError> {
        let n = pubkeys.len();
        if n < 2 {
            return Err(SigmaProofGenerationError::NotEnoughCiphertexts);
        }
        if ciphertexts.len() != n || randomness.len() != n {
            return Err(SigmaProofGenerationError::MismatchedLengths);
        }

        let mut transcript = Self::transcript_new(pubkeys, ciphertexts, context_id);

        let mut k_m = random_nonzero_scalar();
        let mut k_r: Vec<Scalar> = (0..n).map(|_| random_nonzero_scalar()).collect();

        let T: Vec<(CompressedPoint, CompressedPoint)> = k_r
            .iter()
            .zip(pubkeys.iter())
            .map(|(k_r_i, pubkey)| {
                let T_1 = compress(&(G * k_r_i));
                let T_2 = compress(&multiscalar_mul(
                    &[k_m, *k_r_i],
                    &[G, pubkey.get_point()],
                ));
                (T_1, T_2)
            })
            .collect();
        let T_m = compress(&(G * &k_m));

        for (T_1, T_2) in &T {
            transcript.append_point(b"T_1", T_1);
            transcript.append_point(b"T_2", T_2);
        }
        transcript.append_point(b"T_m", &T_m);
        let e = transcript.challenge_scalar(b"e");

        let s_r: Vec<Scalar> = k_r
            .iter()
            .zip(randomness.iter())
            .map(|(k_r_i, r_i)| k_r_i + &(e * r_i.get_scalar()))
            .collect();
        let s_m = k_m + e * Scalar::from(amount);

        k_m.zeroize();
        for k_r_i in k_r.iter_mut() {
            k_r_i.zeroize();
        }

        Ok(Self { T, T_m, s_r, s_m })
    }

    /// Verifies a same-plaintext proof against the recipient keys and
    /// ciphertexts, in the same order they were proved.
    pub fn verify(
        self,
        pubkeys: &[ElGamalPubkey],
        ciphertexts: &[ElGamalCiphertext],
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<(), SamePlaintextProofVerificationError> {
        let n = pubkeys.len();
        if n < 2
            || ciphertexts.len() != n
            || self.T.len() != n
            || self.s_r.len() != n
        {
            return Err(SigmaProofVerificationError::ProofLength.into());
        }

        let mut transcript = Self::transcript_new(pubkeys, ciphertexts, context_id);

        let mut T_points: Vec<(ProjectivePoint, ProjectivePoint)> = Vec::with_capacity(n);
        for (T_1, T_2) in &self.T {
            let T_1 = transcript.validate_and_append_point(b"T_1", T_1)?;
            let T_2 = transcript.validate_and_append_point(b"T_2", T_2)?;
            T_points.push((T_1, T_2));
        }
        transcript.validate_and_append_point(b"T_m", &self.T_m)?;
        let e = transcript.challenge_scalar(b"e");

        for i in 0..n {
            let (T_1, T_2) = T_points[i];
            let P = pubkeys[i].get_point();
            let ciphertext = &ciphertexts[i];

            // s_r_i*G == T_1_i + e*C_1_i
            let lhs_1 = G * &self.s_r[i];
            let rhs_1 = T_1 + ciphertext.c1 * &e;

            // s_m*G + s_r_i*Pk_i == T_2_i + e*C_2_i
            let lhs_2 = multiscalar_mul(&[self.s_m, self.s_r[i]], &[G, P]);
            let rhs_2 = T_2 + ciphertext.c2 * &e;

            if lhs_1 != rhs_1 || lhs_2 != rhs_2 {
                return Err(SigmaProofVerificationError::AlgebraicRelation.into());
            }
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(same_plaintext_proof_len(self.T.len()));
        for (T_1, T_2) in &self.T {
            buf.extend_from_slice(T_1.as_bytes());
            buf.extend_from_slice(T_2.as_bytes());
        }
        buf.extend_from_slice(self.T_m.as_bytes());
        for s_r_i in &self.s_r {
            buf.extend_from_slice(&scalar_to_bytes(s_r_i));
        }
        buf.extend_from_slice(&scalar_to_bytes(&self.s_m));
        buf
    }

    /// Parses a proof, inferring the ciphertext count from the length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SamePlaintextProofVerificationError> {
        let len = bytes.len();
        let per_party = 2 * POINT_LEN + SCALAR_LEN;
        if len < same_plaintext_proof_len(2)
            || (len - POINT_LEN - SCALAR_LEN) % per_party != 0
        {
            return Err(SigmaProofVerificationError::ProofLength.into());
        }
        let n = (len - POINT_LEN - SCALAR_LEN) / per_party;

        let (point_bytes, scalar_bytes) = bytes.split_at((2 * n + 1) * POINT_LEN);
        let mut points = point_bytes.chunks(POINT_LEN);
        let mut scalars = scalar_bytes.chunks(SCALAR_LEN);

        let mut T = Vec::with_capacity(n);
        for _ in 0..n {
            let T_1 = compressed_point_from_optional_slice(points.next())?;
            let T_2 = compressed_point_from_optional_slice(points.next())?;
            T.push((T_1, T_2));
        }
        let T_m = compressed_point_from_optional_slice(points.next())?;

        let mut s_r = Vec::with_capacity(n);
        for _ in 0..n {
            s_r.push(canonical_scalar_from_optional_slice(scalars.next())?);
        }
        let s_m = canonical_scalar_from_optional_slice(scalars.next())?;

        Ok(Self { T, T_m, s_r, s_m })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::encryption::elgamal::{ElGamal, ElGamalKeypair},
    };

    fn statement(
        n: usize,
        amount: u64,
    ) -> (
        Vec<ElGamalKeypair>,
        Vec<ElGamalPubkey>,
        Vec<ElGamalCiphertext>,
        Vec<ElGamalRandomness>,
    ) {
        let keypairs: Vec<_> = (0..n).map(|_| ElGamalKeypair::new_rand()).collect();
        let pubkeys: Vec<_> = keypairs.iter().map(|k| k.public).collect();
        let mut ciphertexts = Vec::with_capacity(n);
        let mut randomness = Vec::with_capacity(n);
        for pubkey in &pubkeys {
            let (ct, r) = ElGamal::encrypt(pubkey, amount);
            ciphertexts.push(ct);
            randomness.push(r);
        }
        (keypairs, pubkeys, ciphertexts, randomness)
    }

    #[test]
    fn test_same_plaintext_proof_correctness() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, pubkeys, ciphertexts, randomness) = statement(2, 100);

        let proof =
            SamePlaintextProof::new(100, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap();
        assert_eq!(proof.to_bytes().len(), same_plaintext_proof_len(2));
        assert!(proof.verify(&pubkeys, &ciphertexts, &context_id).is_ok());
    }

    #[test]
    fn test_same_plaintext_proof_different_amounts() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, pubkeys, mut ciphertexts, mut randomness) = statement(2, 100);

        // replace the second ciphertext with an encryption of a different amount
        let (ct, r) = ElGamal::encrypt(&pubkeys[1], 101);
        ciphertexts[1] = ct;
        randomness[1] = r;

        let proof =
            SamePlaintextProof::new(100, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap();
        assert!(proof.verify(&pubkeys, &ciphertexts, &context_id).is_err());
    }

    #[test]
    fn test_same_plaintext_proof_three_parties() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, pubkeys, ciphertexts, randomness) = statement(3, 42);

        let proof =
            SamePlaintextProof::new(42, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap();
        assert_eq!(proof.to_bytes().len(), same_plaintext_proof_len(3));
        assert!(proof.verify(&pubkeys, &ciphertexts, &context_id).is_ok());
    }

    #[test]
    fn test_same_plaintext_proof_swapped_pubkeys() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, mut pubkeys, ciphertexts, randomness) = statement(3, 42);

        let proof =
            SamePlaintextProof::new(42, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap();
        pubkeys.swap(0, 1);
        assert!(proof.verify(&pubkeys, &ciphertexts, &context_id).is_err());
    }

    #[test]
    fn test_same_plaintext_proof_bytes_round_trip() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, pubkeys, ciphertexts, randomness) = statement(2, 7);

        let proof =
            SamePlaintextProof::new(7, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap();
        let decoded = SamePlaintextProof::from_bytes(&proof.to_bytes()).unwrap();
        assert!(decoded.verify(&pubkeys, &ciphertexts, &context_id).is_ok());
    }

    #[test]
    fn test_same_plaintext_proof_rejects_short_statement() {
        let context_id = [9u8; CONTEXT_ID_LEN];
        let (_, pubkeys, ciphertexts, randomness) = statement(1, 7);

        assert_eq!(
            SamePlaintextProof::new(7, &pubkeys, &ciphertexts, &randomness, &context_id)
                .unwrap_err(),
            SigmaProofGenerationError::NotEnoughCiphertexts
        );
    }
}
