//! Sigma proof systems for confidential token operations.
//!
//! Every proof in this module follows the commit-challenge-response pattern
//! made non-interactive with the transcript discipline in
//! [`transcript`](crate::transcript): the prover commits to blinded points,
//! absorbs them after the public statement, derives the challenge, and answers
//! with masked witnesses. The verifier replays the transcript and checks the
//! algebraic relations, so a proof only verifies against the exact statement
//! and transaction context it was produced for.

pub mod equality_proof;
pub mod errors;
pub mod link_proof;
pub mod pubkey_proof;
pub mod same_plaintext_proof;

use crate::{
    secp256k1::{scalar_from_canonical_bytes, CompressedPoint, Scalar},
    sigma_proofs::errors::SigmaProofVerificationError,
};

/// Deserializes an optional slice of bytes to a compressed point.
fn compressed_point_from_optional_slice(
    optional_slice: Option<&[u8]>,
) -> Result<CompressedPoint, SigmaProofVerificationError> {
    optional_slice
        .and_then(CompressedPoint::from_slice)
        .ok_or(SigmaProofVerificationError::Deserialization)
}

/// Deserializes an optional slice of bytes to a canonical scalar.
fn canonical_scalar_from_optional_slice(
    optional_slice: Option<&[u8]>,
) -> Result<Scalar, SigmaProofVerificationError> {
    optional_slice
        .and_then(scalar_from_canonical_bytes)
        .ok_or(SigmaProofVerificationError::Deserialization)
}
