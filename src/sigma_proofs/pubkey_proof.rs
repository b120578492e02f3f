//! The public-key validity sigma proof system.
//!
//! A Schnorr proof of knowledge of the secret key behind a declared ElGamal
//! public key. Registering a confidential balance requires it, so an account
//! cannot declare a key it would later be unable to decrypt under (or a key
//! lifted from another account).
//!
//! The protocol guarantees computational soundness (by the hardness of discrete
//! log) and perfect zero-knowledge in the random oracle model.

use {
    crate::{
        encryption::elgamal::{ElGamalKeypair, ElGamalPubkey},
        secp256k1::{
            compress, random_nonzero_scalar, scalar_from_canonical_bytes, scalar_to_bytes,
            CompressedPoint, Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        sigma_proofs::errors::{PubkeyProofVerificationError, SigmaProofVerificationError},
        transcript::Transcript,
        CONTEXT_ID_LEN,
    },
    arrayref::{array_ref, array_refs},
    zeroize::Zeroize,
};

/// Byte length of a public-key validity proof.
pub const PUBKEY_PROOF_LEN: usize = POINT_LEN + SCALAR_LEN;

const PUBKEY_PROOF_DOMAIN: &[u8] = b"MPT/POK-SK/v1";

/// Public-key validity proof.
///
/// Contains all the elliptic curve and scalar components that make up the sigma
/// protocol.
#[allow(non_snake_case)]
#[derive(Clone)]
pub struct PubkeyValidityProof {
    T: CompressedPoint,
    s: Scalar,
}

#[allow(non_snake_case)]
impl PubkeyValidityProof {
    fn transcript_new(pubkey: &ElGamalPubkey, context_id: &[u8; CONTEXT_ID_LEN]) -> Transcript {
        let mut transcript = Transcript::new(PUBKEY_PROOF_DOMAIN, context_id);
        transcript.append_point(b"pubkey", &CompressedPoint(pubkey.to_bytes()));
        transcript
    }

    /// Creates a public-key validity proof.
    ///
    /// This function is randomized. It uses `OsRng` internally to generate the
    /// masking scalar.
    pub fn new(keypair: &ElGamalKeypair, context_id: &[u8; CONTEXT_ID_LEN]) -> Self {
        let mut transcript = Self::transcript_new(&keypair.public, context_id);

        let mut k = random_nonzero_scalar();
        let T = compress(&(G * &k));

        transcript.append_point(b"T", &T);
        let e = transcript.challenge_scalar(b"e");

        let s = k + e * keypair.secret.get_scalar();
        k.zeroize();

        Self { T, s }
    }

    /// Verifies a public-key validity proof.
    pub fn verify(
        self,
        pubkey: &ElGamalPubkey,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<(), PubkeyProofVerificationError> {
        let mut transcript = Self::transcript_new(pubkey, context_id);

        let T = transcript.validate_and_append_point(b"T", &self.T)?;
        let e = transcript.challenge_scalar(b"e");

        // s*G == T + e*Pk
        let lhs = G * &self.s;
        let rhs = T + pubkey.get_point() * &e;

        if lhs == rhs {
            Ok(())
        } else {
            Err(SigmaProofVerificationError::AlgebraicRelation.into())
        }
    }

    pub fn to_bytes(&self) -> [u8; PUBKEY_PROOF_LEN] {
        let mut buf = [0u8; PUBKEY_PROOF_LEN];
        buf[..POINT_LEN].copy_from_slice(self.T.as_bytes());
        buf[POINT_LEN..].copy_from_slice(&scalar_to_bytes(&self.s));
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PubkeyProofVerificationError> {
        if bytes.len() != PUBKEY_PROOF_LEN {
            return Err(SigmaProofVerificationError::ProofLength.into());
        }
        let bytes = array_ref![bytes, 0, PUBKEY_PROOF_LEN];
        let (T, s) = array_refs![bytes, POINT_LEN, SCALAR_LEN];

        let s = scalar_from_canonical_bytes(s)
            .ok_or(SigmaProofVerificationError::Deserialization)?;

        Ok(Self {
            T: CompressedPoint(*T),
            s,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pubkey_proof_correctness() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [1u8; CONTEXT_ID_LEN];

        let proof = PubkeyValidityProof::new(&keypair, &context_id);
        assert!(proof.verify(&keypair.public, &context_id).is_ok());
    }

    #[test]
    fn test_pubkey_proof_wrong_pubkey() {
        let keypair = ElGamalKeypair::new_rand();
        let other = ElGamalKeypair::new_rand();
        let context_id = [1u8; CONTEXT_ID_LEN];

        let proof = PubkeyValidityProof::new(&keypair, &context_id);
        assert!(proof.verify(&other.public, &context_id).is_err());
    }

    #[test]
    fn test_pubkey_proof_wrong_context() {
        let keypair = ElGamalKeypair::new_rand();

        let proof = PubkeyValidityProof::new(&keypair, &[1u8; CONTEXT_ID_LEN]);
        assert!(proof
            .verify(&keypair.public, &[2u8; CONTEXT_ID_LEN])
            .is_err());
    }

    #[test]
    fn test_pubkey_proof_bytes_round_trip() {
        let keypair = ElGamalKeypair::new_rand();
        let context_id = [1u8; CONTEXT_ID_LEN];

        let proof = PubkeyValidityProof::new(&keypair, &context_id);
        let bytes = proof.to_bytes();
        assert_eq!(bytes.len(), PUBKEY_PROOF_LEN);

        let decoded = PubkeyValidityProof::from_bytes(&bytes).unwrap();
        assert!(decoded.verify(&keypair.public, &context_id).is_ok());
    }
}
