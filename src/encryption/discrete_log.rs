//! Baby-step giant-step recovery of bounded discrete logarithms.
//!
//! Decryption of an exponential ElGamal ciphertext produces a point `m * G`
//! from which the amount `m` must be recovered. The solver uses a 16/16-bit
//! offline/online split: a process-wide table maps the 2^16 giant-step
//! multiples `j * 2^16 * G` to `j`, and the online phase walks at most 2^16
//! baby steps from the target. The resulting search window is `[0, 2^32)`;
//! amounts beyond the window are reported as a decode failure, never as a
//! wrong value.

use {
    crate::secp256k1::{compress, ProjectivePoint, Scalar, G},
    lazy_static::lazy_static,
    std::collections::HashMap,
};

const TWO16: u64 = 65536; // 2^16

/// Type that captures a discrete log challenge.
///
/// The goal of discrete log is to find x such that x * generator = target.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DiscreteLog {
    /// Generator point for discrete log
    pub generator: ProjectivePoint,
    /// Target point for discrete log
    pub target: ProjectivePoint,
}

struct DecodePrecomputation(HashMap<[u8; 33], u16>);

/// Builds a hashmap of 2^16 giant-step multiples of the generator.
fn decode_u32_precomputation(generator: ProjectivePoint) -> DecodePrecomputation {
    let mut hashmap = HashMap::new();

    let giant_step = generator * &Scalar::from(TWO16);
    let mut point = ProjectivePoint::IDENTITY;
    for x_hi in 0..TWO16 {
        hashmap.insert(compress(&point).to_bytes(), x_hi as u16);
        point += giant_step;
    }

    DecodePrecomputation(hashmap)
}

lazy_static! {
    /// Pre-computed table for the giant steps of `G`, built on first use and
    /// read-only afterwards.
    static ref DECODE_PRECOMPUTATION_FOR_G: DecodePrecomputation = decode_u32_precomputation(G);
}

impl DiscreteLog {
    /// Discrete log instance constructor.
    pub fn new(generator: ProjectivePoint, target: ProjectivePoint) -> Self {
        Self { generator, target }
    }

    /// Solves the discrete log problem under the assumption that the solution
    /// is a 32-bit number.
    pub fn decode_u32(self) -> Option<u64> {
        let hashmap = &DECODE_PRECOMPUTATION_FOR_G.0;

        let mut point = self.target;
        for x_lo in 0..TWO16 {
            if let Some(x_hi) = hashmap.get(compress(&point).as_bytes()) {
                return Some(x_lo + TWO16 * u64::from(*x_hi));
            }
            point -= self.generator;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(amount: u64) -> Option<u64> {
        DiscreteLog::new(G, G * &Scalar::from(amount)).decode_u32()
    }

    #[test]
    fn test_decode_correctness() {
        assert_eq!(decode(55), Some(55));
    }

    #[test]
    fn test_decode_edge_values() {
        assert_eq!(decode(0), Some(0));
        assert_eq!(decode(1), Some(1));
        assert_eq!(decode(2), Some(2));
        assert_eq!(decode(TWO16 - 1), Some(TWO16 - 1));
        assert_eq!(decode(TWO16), Some(TWO16));
        assert_eq!(decode(TWO16 + 1), Some(TWO16 + 1));
    }

    #[test]
    fn test_decode_window_boundary() {
        // the largest decodable amount
        let max = (1u64 << 32) - 1;
        assert_eq!(decode(max), Some(max));
    }
}
