//! The ElGamal-Pedersen link sigma proof system.
//!
//! The proof certifies that an ElGamal ciphertext `(C1, C2)` under a public key
//! `Pk` and a Pedersen commitment `PC` over the recipient-bound generator
//! `H_Pk` hide the same secret amount: the prover knows `m`, `r`, and `rho`
//! with `C1 = r*G`, `C2 = m*G + r*Pk`, and `PC = m*G + rho*H_Pk`. The
//! commitment side is what the range proof is verified against, so the link
//! proof is what carries the range guarantee over to the ciphertext.
//!
//! The protocol guarantees computational soundness (by the hardness of discrete
//! log) and perfect zero-knowledge in the random oracle model.

use {
    crate::{
        encryption::{
            elgamal::{ElGamalCiphertext, ElGamalPubkey, ElGamalRandomness},
            pedersen::{derive_generator, PedersenCommitment, PedersenOpening},
        },
        secp256k1::{
            compress, multiscalar_mul, random_nonzero_scalar, scalar_to_bytes, CompressedPoint,
            Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        sigma_proofs::{
            canonical_scalar_from_optional_slice, compressed_point_from_optional_slice,
            errors::{LinkProofVerificationError, SigmaProofVerificationError},
        },
        transcript::Transcript,
        CONTEXT_ID_LEN,
    },
    zeroize::Zeroize,
};

/// Byte length of an ElGamal-Pedersen link proof.
pub const LINK_PROOF_LEN: usize = 3 * POINT_LEN + 3 * SCALAR_LEN;

const LINK_PROOF_DOMAIN: &[u8] = b"MPT/LINK/v1";

/// ElGamal-Pedersen link proof.
///
/// Contains all the elliptic curve and scalar components that make up the sigma
/// protocol.
#[allow(non_snake_case)]
#[derive(Clone)]
pub struct ElGamalPedersenLinkProof {
    T_1: CompressedPoint,
    T_2: CompressedPoint,
    T_3: CompressedPoint,
    s_m: Scalar,
    s_r: Scalar,
    s_rho: Scalar,
}

#[allow(non_snake_case)]
impl ElGamalPedersenLinkProof {
    fn transcript_new(
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        commitment: &PedersenCommitment,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Transcript {
        let mut transcript = Transcript::new(LINK_PROOF_DOMAIN, context_id);
        transcript.append_point(b"pubkey", &CompressedPoint(pubkey.to_bytes()));
        transcript.append_point(b"C_1", &compress(&ciphertext.c1));
        transcript.append_point(b"C_2", &compress(&ciphertext.c2));
        transcript.append_point(b"commitment", &CompressedPoint(commitment.to_bytes()));
        transcript
    }

    /// Creates an ElGamal-Pedersen link proof.
    ///
    /// This function is randomized. It uses `OsRng` internally to generate the
    /// masking scalars.
    ///
    /// * `pubkey` - The recipient public key; the commitment generator `H_Pk`
    ///   is derived from it
    /// * `ciphertext` - The ciphertext side of the statement
    /// * `commitment` - The commitment side of the statement
    /// * `amount` - The shared secret amount
    /// * `randomness` - The encryption randomness of the ciphertext
    /// * `opening` - The opening of the commitment
    /// * `context_id` - The transaction context the proof is bound to
    pub fn new(
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        commitment: &PedersenCommitment,
        amount: u64,
        randomness: &ElGamalRandomness,
        opening: &PedersenOpening,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Self {
        let mut transcript = Self::transcript_new(pubkey, ciphertext, commitment, context_id);

        let P = pubkey.get_point();
        let H = derive_generator(pubkey);

        let mut k_m = random_nonzero_scalar();
        let mut k_r = random_nonzero_scalar();
        let mut k_rho = random_nonzero_scalar();

        let T_1 = compress(&(G * &k_r));
        let T_2 = compress(&multiscalar_mul(&[k_m, k_r], &[G, P]));
        let T_3 = compress(&multiscalar_mul(&[k_m, k_rho], &[G, H]));

        transcript.append_point(b"T_1", &T_1);
        transcript.append_point(b"T_2", &T_2);
        transcript.append_point(b"T_3", &T_3);
        let e = transcript.challenge_scalar(b"e");

        let s_m = k_m + e * Scalar::from(amount);
        let s_r = k_r + e * randomness.get_scalar();
        let s_rho = k_rho + e * opening.get_scalar();

        k_m.zeroize();
        k_r.zeroize();
        k_rho.zeroize();

        Self {
            T_1,
            T_2,
            T_3,
            s_m,
            s_r,
            s_rho,
        }
    }

    /// Verifies an ElGamal-Pedersen link proof.
    pub fn verify(
        self,
        pubkey: &ElGamalPubkey,
        ciphertext: &ElGamalCiphertext,
        commitment: &PedersenCommitment,
        context_id: &[u8; CONTEXT_ID_LEN],
    ) -> Result<(), LinkProofVerificationError> {
        let mut transcript = Self::transcript_new(pubkey, ciphertext, commitment, context_id);

        let P = pubkey.get_point();
        let H = derive_generator(pubkey);

        let T_1 = transcript.validate_and_append_point(b"T_1", &self.T_1)?;
        let T_2 = transcript.validate_and_append_point(b"T_2", &self.T_2)?;
        let T_3 = transcript.validate_and_append_point(b"T_3", &self.T_3)?;
        let e = transcript.challenge_scalar(b"e");

        // s_r*G == T_1 + e*C_1
        let lhs_1 = G * &self.s_r;
        let rhs_1 = T_1 + ciphertext.c1 * &e;

        // s_m*G + s_r*Pk == T_2 + e*C_2
        let lhs_2 = multiscalar_mul(&[self.s_m, self.s_r], &[G, P]);
        let rhs_2 = T_2 + ciphertext.c2 * &e;

        // s_m*G + s_rho*H_Pk == T_3 + e*PC
        let lhs_3 = multiscalar_mul(&[self.s_m, self.s_rho], &[G, H]);
        let rhs_3 = T_3 + commitment.get_point() * &e;

        if lhs_1 == rhs_1 && lhs_2 == rhs_2 && lhs_3 == rhs_3 {
            Ok(())
        } else {
            Err(SigmaProofVerificationError::AlgebraicRelation.into())
        }
    }

    pub fn to_bytes(&self) -> [u8; LINK_PROOF_LEN] {
        let mut buf = [0u8; LINK_PROOF_LEN];
        buf[..POINT_LEN].copy_from_slice(self.T_1.as_bytes());
        buf[POINT_LEN..2 * POINT_LEN].copy_from_slice(self.T_2.as_bytes());
        buf[2 * POINT_LEN..3 * POINT_LEN].copy_from_slice(self.T_3.as_bytes());
        buf[3 * POINT_LEN..3 * POINT_LEN + SCALAR_LEN]
            .copy_from_slice(&scalar_to_bytes(&self.s_m));
        buf[3 * POINT_LEN + SCALAR_LEN..3 * POINT_LEN + 2 * SCALAR_LEN]
            .copy_from_slice(&scalar_to_bytes(&self.s_r));
        buf[3 * POINT_LEN + 2 * SCALAR_LEN..]
            .copy_from_slice(&scalar_to_bytes(&self.s_rho));
        buf
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LinkProofVerificationError> {
        if bytes.len() != LINK_PROOF_LEN {
            return Err(SigmaProofVerificationError::ProofLength.into());
        }
        let (point_bytes, scalar_bytes) = bytes.split_at(3 * POINT_LEN);
        let mut points = point_bytes.chunks(POINT_LEN);
        let mut scalars = scalar_bytes.chunks(SCALAR_LEN);

        Ok(Self {
            T_1: compressed_point_from_optional_slice(points.next())?,
            T_2: compressed_point_from_optional_slice(points.next())?,
            T_3: compressed_point_from_optional_slice(points.next())?,
            s_m: canonical_scalar_from_optional_slice(scalars.next())?,
            s_r: canonical_scalar_from_optional_slice(scalars.next())?,
            s_rho: canonical_scalar_from_optional_slice(scalars.next())?,
        })
    }
}
