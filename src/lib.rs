//! Cryptographic core for confidential Multi-Purpose Token amounts.
//!
//! The crate implements the privacy layer of a token ledger on secp256k1:
//! exponential ElGamal encryption of 64-bit amounts with homomorphic
//! aggregation, Pedersen commitments over a recipient-bound generator, four
//! sigma proof systems (plaintext equality, same plaintext across recipients,
//! ElGamal-Pedersen link, and knowledge of secret key), and a 64-bit
//! Bulletproof range proof. All proofs are made non-interactive with
//! domain-separated SHA-256 Fiat-Shamir transcripts bound to a transaction
//! context identifier, so a proof published for one transaction cannot be
//! replayed in another.
//!
//! Every operation is a pure function of its inputs; the only process-wide
//! state consists of lazily initialized read-only tables (the discrete-log
//! decode table and the range-proof generator vectors).

// `clippy::op_ref` is disabled: scalars and points implement the borrowed
// operator variants, and passing references avoids copying the operands of
// `Copy` types in hot multiplication paths.
#![allow(clippy::op_ref)]

#[macro_use]
pub(crate) mod macros;

pub mod context;
pub mod encryption;
pub mod errors;
pub mod range_proof;
pub mod secp256k1;
pub mod sigma_proofs;
pub mod transcript;

/// Byte length of a transaction context identifier.
pub const CONTEXT_ID_LEN: usize = 32;

/// Byte length of a ledger account identifier.
pub const ACCOUNT_ID_LEN: usize = 20;

/// Byte length of a token issuance identifier.
pub const MPT_ISSUANCE_ID_LEN: usize = 24;
