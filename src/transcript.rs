//! Domain-separated Fiat-Shamir transcripts.
//!
//! A transcript is a rolling SHA-256 state seeded with a proof-kind domain tag
//! and the 32-byte transaction context identifier. Prover and verifier absorb
//! the same labeled values in the same order, so the challenges they derive are
//! byte-identical; absorbing anything out of order produces a different
//! challenge and the proof fails closed.

use {
    crate::{
        errors::TranscriptError,
        secp256k1::{CompressedPoint, ProjectivePoint, Scalar},
    },
    k256::elliptic_curve::{bigint::U256, ops::Reduce, Field},
    sha2::{Digest, Sha256},
};

pub struct Transcript {
    state: Sha256,
}

impl Transcript {
    /// Starts a transcript for one proof under one transaction context.
    pub fn new(domain_tag: &'static [u8], context_id: &[u8]) -> Self {
        let mut state = Sha256::new();
        state.update(domain_tag);
        state.update(context_id);
        Self { state }
    }

    pub fn append_message(&mut self, label: &'static [u8], message: &[u8]) {
        self.state.update(label);
        self.state.update(message);
    }

    pub fn append_point(&mut self, label: &'static [u8], point: &CompressedPoint) {
        self.append_message(label, point.as_bytes());
    }

    pub fn append_scalar(&mut self, label: &'static [u8], scalar: &Scalar) {
        self.append_message(label, scalar.to_bytes().as_slice());
    }

    pub fn append_u64(&mut self, label: &'static [u8], amount: u64) {
        self.append_message(label, &amount.to_be_bytes());
    }

    /// Absorbs a prover-supplied point, rejecting encodings that do not
    /// decompress (which includes the identity).
    pub fn validate_and_append_point(
        &mut self,
        label: &'static [u8],
        point: &CompressedPoint,
    ) -> Result<ProjectivePoint, TranscriptError> {
        let decompressed = point
            .decompress()
            .ok_or(TranscriptError::ValidationError)?;
        self.append_point(label, point);
        Ok(decompressed)
    }

    /// Derives a non-zero challenge scalar from the current state.
    ///
    /// The state is hashed together with a counter byte and the digest reduced
    /// modulo the group order; a zero reduction re-hashes with the counter
    /// incremented. The successful digest is folded back into the state so that
    /// successive challenges are independent.
    pub fn challenge_scalar(&mut self, label: &'static [u8]) -> Scalar {
        self.state.update(label);
        let mut counter = 0u8;
        loop {
            let mut forked = self.state.clone();
            forked.update([counter]);
            let digest = forked.finalize();

            let challenge = <Scalar as Reduce<U256>>::reduce_bytes(&digest);
            if !bool::from(challenge.is_zero()) {
                self.state.update(digest);
                return challenge;
            }
            counter = counter.wrapping_add(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::secp256k1::compress};

    #[test]
    fn test_challenges_are_deterministic() {
        let context_id = [7u8; 32];

        let mut a = Transcript::new(b"TEST/v1", &context_id);
        let mut b = Transcript::new(b"TEST/v1", &context_id);

        a.append_u64(b"amount", 42);
        b.append_u64(b"amount", 42);

        let a_first = a.challenge_scalar(b"e");
        assert_eq!(a_first, b.challenge_scalar(b"e"));
        // the state ratchets, so a second challenge with the same label differs
        assert_ne!(a_first, a.challenge_scalar(b"e"));
    }

    #[test]
    fn test_challenges_diverge_on_domain_or_context() {
        let mut a = Transcript::new(b"TEST/v1", &[7u8; 32]);
        let mut b = Transcript::new(b"TEST/v2", &[7u8; 32]);
        let mut c = Transcript::new(b"TEST/v1", &[8u8; 32]);

        assert_ne!(a.challenge_scalar(b"e"), b.challenge_scalar(b"e"));

        let mut a = Transcript::new(b"TEST/v1", &[7u8; 32]);
        assert_ne!(a.challenge_scalar(b"e"), c.challenge_scalar(b"e"));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        let mut transcript = Transcript::new(b"TEST/v1", &[0u8; 32]);
        let garbage = CompressedPoint([0xffu8; 33]);
        assert!(transcript
            .validate_and_append_point(b"T", &garbage)
            .is_err());

        let valid = compress(&(crate::secp256k1::G * &Scalar::from(3u64)));
        assert!(transcript.validate_and_append_point(b"T", &valid).is_ok());
    }
}
