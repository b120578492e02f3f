//! Errors related to verifying range proofs.
use {crate::errors::TranscriptError, thiserror::Error};

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum RangeProofVerificationError {
    #[error("required algebraic relation does not hold")]
    AlgebraicRelation,
    #[error("malformed proof")]
    Deserialization,
    #[error("proof length does not match the range bit size")]
    ProofLength,
    #[error("transcript rejected a proof component: {0}")]
    Transcript(#[from] TranscriptError),
}
