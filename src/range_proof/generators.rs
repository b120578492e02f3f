//! Generator vectors for the range proof.
//!
//! The inner-product argument needs two vectors of 64 generators whose
//! pairwise discrete logs are unknown. They are derived once per process by
//! hash-to-curve under per-index domain tags and shared read-only afterwards;
//! unlike the commitment generator `H_Pk` they do not depend on any key.

use {
    crate::secp256k1::{hash_to_point, ProjectivePoint},
    lazy_static::lazy_static,
};

/// Number of generators in each vector, one per bit of the range.
pub const GENERATOR_COUNT: usize = 64;

pub struct RangeProofGens {
    pub g_vec: Vec<ProjectivePoint>,
    pub h_vec: Vec<ProjectivePoint>,
}

impl RangeProofGens {
    fn new() -> Self {
        let mut g_vec = Vec::with_capacity(GENERATOR_COUNT);
        let mut h_vec = Vec::with_capacity(GENERATOR_COUNT);
        for i in 0..GENERATOR_COUNT {
            g_vec.push(hash_to_point(format!("MPT/BP/G/{i}").as_bytes(), &[]));
            h_vec.push(hash_to_point(format!("MPT/BP/H/{i}").as_bytes(), &[]));
        }
        RangeProofGens { g_vec, h_vec }
    }
}

lazy_static! {
    /// The process-wide generator vectors, built on first use.
    pub static ref RANGE_PROOF_GENS: RangeProofGens = RangeProofGens::new();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_distinct() {
        let gens = &*RANGE_PROOF_GENS;
        assert_eq!(gens.g_vec.len(), GENERATOR_COUNT);
        assert_eq!(gens.h_vec.len(), GENERATOR_COUNT);

        for i in 0..GENERATOR_COUNT {
            for j in 0..GENERATOR_COUNT {
                assert_ne!(gens.g_vec[i], gens.h_vec[j]);
                if i != j {
                    assert_ne!(gens.g_vec[i], gens.g_vec[j]);
                    assert_ne!(gens.h_vec[i], gens.h_vec[j]);
                }
            }
        }
    }
}
