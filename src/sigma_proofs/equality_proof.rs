//! The plaintext-equality sigma proof system.
//!
//! The proof certifies that a ciphertext `(C1, C2)` under a public key `Pk` is
//! an encryption of a publicly revealed amount `m`, i.e. that the prover knows
//! randomness `r` with `C1 = r*G` and `C2 = m*G + r*Pk`. Publishing the proof
//! reveals `m` but not `r`; an issuer uses it to demonstrate the exact balance
//! reclaimed by a clawback.
//!
//! The protocol guarantees computational soundness (by the hardness of discrete
//! log) and perfect zero-knowledge in the random oracle model.

use {
    crate::{
        encryption::elgamal::{ElGamalCiphertext, ElGamalPubkey, ElGamalRandomness},
        secp256k1::{
            compress, random_nonzero_scalar, scalar_from_canonical_bytes, scalar_to_bytes,
            CompressedPoint, Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        sigma_proofs::errors::{EqualityProofVerificationError, SigmaProofVerificationError},
        transcript::Transcript,
        CONTEXT_ID_LEN,
    },
    arrayref::{array_ref, array_refs},
    zeroize::Zeroize,
};

/// Byte length of a plaintext-equality proof.
pub const PLAINTEXT_EQUALITY_PROOF_LEN: usize = 2 * POINT_LEN + SCALAR_LEN;

const PLAINTEXT_EQUALITY_DOMAIN: &[u8] = b"MPT/EQ-PT/v1";

/// Plaintext-equality proof.
///
/// Contains all the elliptic curve and scalar components that make up the sigma
/// protocol.
#[allow(non_snake_case)]
#[derive(Clone)]
pub struct PlaintextEqualityProof {
    T_1: CompressedPoint,
    T_2: CompressedPoint,
    s: Scalar,
}

#[allow(non_snake_case)]
impl PlaintextEqualityProof {
    fn transcript_new(
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        amount: u64,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Transcript {
        let mut transcript = Transcript::new(PLAINTEXT_EQUALITY_DOMAIN, context_id);
        transcript.append_point(b"pubkey", &CompressedPoint(pubkey.to_bytes()));
        transcript.append_point(b"C_1", &compress(&ciphertext.c1));
        transcript.append_point(b"C_2", &compress(&ciphertext.c2));
        transcript.append_u64(b"amount", amount);
        transcript
    }

    /// Creates a plaintext-equality proof.
    ///
    /// This function is randomized. It uses `OsRng` internally to generate the
    /// masking scalar.
    ///
    /// * `pubkey` - The recipient public key of the ciphertext
    /// * `ciphertext` - The ciphertext whose amount is being revealed
    /// * `amount` - The revealed amount
    /// * `randomness` - The encryption randomness of the ciphertext
    /// * `context_id` - The transaction context the proof is bound to
    pub fn new(
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        amount: u64,
        randomness: &ElGamalRandomness,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Self {
        let mut transcript = Self::transcript_new(pubkey, ciphertext, amount, context_id);

        let P = pubkey.get_point();
        let r = randomness.get_scalar();

        let mut k = random_nonzero_scalar();
        let T_1 = compress(&(G * &k));
        let T_2 = compress(&(P * &k));

        transcript.append_point(b"T_1", &T_1);
        transcript.append_point(b"T_2", &T_2);
        let e = transcript.challenge_scalar(b"e");

        let s = k + e * r;
        k.zeroize();

        Self { T_1, T_2, s }
    }

    /// Verifies a plaintext-equality proof.
    pub fn verify(
        self,
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        amount: u64,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<(), EqualityProofVerificationError> {
        let mut transcript = Self::transcript_new(pubkey, ciphertext, amount, context_id);

        let P = pubkey.get_point();
        let T_1 = transcript.validate_and_append_point(b"T_1", &self.T_1)?;
        let T_2 = transcript.validate_and_append_point(b"T_2", &self.T_2)?;
        let e = transcript.challenge_scalar(b"e");

        // s*G == T_1 + e*C_1
        let lhs_1 = G * &self.s;
        let rhs_1 = T_1 + ciphertext.c1 * &e;

        // s*Pk == T_2 + e*(C_2 - m*G)
        let lhs_2 = P * &self.s;
        let rhs_2 = T_2 + (ciphertext.c2 - G * &Scalar::from(amount)) * &e;

        if lhs_1 == rhs_1 && lhs_2 == rhs_2 {
            Ok(())
        } else {
            Err(SigmaProofVerificationError::AlgebraicRelation.into())
        }
    }

    pub fn to_bytes(&self) -> [u8; PLAINTEXT_EQUALITY_PROOF_LEN] {
        let mut buf = [0u8; PLAINTEXT_EQUALITY_PROOF_LEN];
        buf[..POINT_LEN].copy_from_slice(self.T_1.as_bytes());
        buf[POINT_LEN..2 * POINT_LEN].copy_from_slice(self.T_2.as_bytes());
        buf[2 * POINT_LEN..].copy_from_slice(&scalar_to_bytes(&self.s));
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EqualityProofVerificationError> {
        if bytes.len() != PLAINTEXT_EQUALITY_PROOF_LEN {
            return Err(SigmaProofVerificationError::ProofLength.into());
        }
        let bytes = array_ref![bytes, 0, PLAINTEXT_EQUALITY_PROOF_LEN];
        let (T_1, T_2, s) = array_refs![bytes, POINT_LEN, POINT_LEN, SCALAR_LEN];

        let s = scalar_from_canonical_bytes(s)
            .ok_or(SigmaProofVerificationError::Deserialization)?;

        Ok(Self {
            T_1: CompressedPoint(*T_1),
            T_2: CompressedPoint(*T_2),
            s,
        })
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::encryption::elgamal::{ElGamal, ElGamalKeypair},
    };

    #[test]
    fn test_plaintext_equality_proof_correctness() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [3u8; CONTEXT_ID_LEN];
        let amount: u64 = 55;

        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, amount);

        let proof = PlaintextEqualityProof::new(
            &keypair.public,
            &ciphertext,
            amount,
            &randomness,
            &context_id,
        );
        assert!(proof
            .verify(&keypair.public, &ciphertext, amount, &context_id)
            .is_ok());
    }

    #[test]
    fn test_plaintext_equality_proof_wrong_amount() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [3u8; CONTEXT_ID_LEN];

        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, 55);

        let proof = PlaintextEqualityProof::new(
            &keypair.public,
            &ciphertext,
            55,
            &randomness,
            &context_id,
        );
        assert!(proof
            .verify(&keypair.public, &ciphertext, 56, &context_id)
            .is_err());
    }

    #[test]
    fn test_plaintext_equality_proof_wrong_context() {
        let keypair = ElGamalKeypair::new_rand();

        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, 55);

        let proof = PlaintextEqualityProof::new(
            &keypair.public,
            &ciphertext,
            55,
            &randomness,
            &[3u8; CONTEXT_ID_LEN],
        );
        assert!(proof
            .verify(&keypair.public, &ciphertext, 55, &[4u8; CONTEXT_ID_LEN])
            .is_err());
    }

    #[test]
    fn test_plaintext_equality_proof_bytes_round_trip() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [3u8; CONTEXT_ID_LEN];

        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, 55);

        let proof = PlaintextEqualityProof::new(
            &keypair.public,
            &ciphertext,
            55,
            &randomness,
            &context_id,
        );
        let decoded = PlaintextEqualityProof::from_bytes(&proof.to_bytes()).unwrap();
        assert!(decoded
            .verify(&keypair.public, &ciphertext, 55, &context_id)
            .is_ok());
    }

    #[test]
    fn test_plaintext_equality_proof_tampered_bytes() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [3u8; CONTEXT_ID_LEN];

        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, 55);

        let proof = PlaintextEqualityProof::new(
            &keypair.public,
            &ciphertext,
            55,
            &randomness,
            &context_id,
        );

        let mut bytes = proof.to_bytes();
        bytes[0] ^= 1;
        let outcome = PlaintextEqualityProof::from_bytes(&bytes)
            .and_then(|p| p.verify(&keypair.public, &ciphertext, 55, &context_id));
        assert!(outcome.is_err());
    }
}
