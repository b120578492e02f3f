//! Errors related to proving and verifying sigma proofs.
use {crate::errors::TranscriptError, thiserror::Error};

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum SigmaProofVerificationError {
    #[error("required algebraic relation does not hold")]
    AlgebraicRelation,
    #[error("malformed proof")]
    Deserialization,
    #[error("proof length does not match the statement")]
    ProofLength,
    #[error("transcript rejected a proof component: {0}")]
    Transcript(#[from] TranscriptError),
}

#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum SigmaProofGenerationError {
    #[error("not enough ciphertexts for a same-plaintext statement")]
    NotEnoughCiphertexts,
    #[error("mismatched statement and witness lengths")]
    MismatchedLengths,
}

#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("plaintext-equality proof verification failed: {0}")]
pub struct EqualityProofVerificationError(#[from] pub SigmaProofVerificationError);

#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("same-plaintext proof verification failed: {0}")]
pub struct SamePlaintextProofVerificationError(#[from] pub SigmaProofVerificationError);

#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("ElGamal-Pedersen link proof verification failed: {0}")]
pub struct LinkProofVerificationError(#[from] pub SigmaProofVerificationError);

#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("public-key proof verification failed: {0}")]
pub struct PubkeyProofVerificationError(#[from] pub SigmaProofVerificationError);

impl From<TranscriptError> for EqualityProofVerificationError {
    fn from(err: TranscriptError) -> Self {
        Self(SigmaProofVerificationError::Transcript(err))
    }
}

impl From<TranscriptError> for SamePlaintextProofVerificationError {
    fn from(err: TranscriptError) -> Self {
        Self(SigmaProofVerificationError::Transcript(err))
    }
}

impl From<TranscriptError> for LinkProofVerificationError {
    fn from(err: TranscriptError) -> Self {
        Self(SigmaProofVerificationError::Transcript(err))
    }
}

impl From<TranscriptError> for PubkeyProofVerificationError {
    fn from(err: TranscriptError) -> Self {
        Self(SigmaProofVerificationError::Transcript(err))
    }
}
