//! Encryption of confidential token amounts.

pub mod discrete_log;
pub mod elgamal;
pub mod pedersen;
