//! Derivation of transaction context identifiers.
//!
//! Every proof in this crate is bound to a 32-byte context identifier derived
//! from the fields of the transaction that carries it. The identifier is the
//! first half of a SHA-512 digest over a fixed big-endian layout starting with
//! the transaction type code, so two different transactions (or two attempts
//! of the same transaction at different sequence numbers) never share a
//! context and proofs cannot be replayed.

use {
    crate::{ACCOUNT_ID_LEN, CONTEXT_ID_LEN, MPT_ISSUANCE_ID_LEN},
    sha2::{Digest, Sha512},
};

const CONVERT_TX_TYPE: u16 = 85;
const CONVERT_BACK_TX_TYPE: u16 = 87;
const SEND_TX_TYPE: u16 = 88;
const CLAWBACK_TX_TYPE: u16 = 89;

fn sha512_half(hasher: Sha512) -> [u8; CONTEXT_ID_LEN] {
    let digest = hasher.finalize();
    let mut context_id = [0u8; CONTEXT_ID_LEN];
    context_id.copy_from_slice(&digest.as_slice()[..CONTEXT_ID_LEN]);
    context_id
}

/// Context identifier for a conversion of public funds into a confidential
/// balance.
///
/// Layout: `type(2) | account(20) | sequence(4) | issuance(24) | amount(8)`.
pub fn convert_context_id(
    account_id: &[u8; ACCOUNT_ID_LEN],
    sequence: u32,
    mpt_issuance_id: &[u8; MPT_ISSUANCE_ID_LEN],
    amount: u64,
) -> [u8; CONTEXT_ID_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(CONVERT_TX_TYPE.to_be_bytes());
    hasher.update(account_id);
    hasher.update(sequence.to_be_bytes());
    hasher.update(mpt_issuance_id);
    hasher.update(amount.to_be_bytes());
    sha512_half(hasher)
}

/// Context identifier for a conversion of a confidential balance back to
/// public funds.
///
/// Layout: `type(2) | account(20) | sequence(4) | issuance(24) | amount(8) |
/// version(4)`, where `version` is the confidential balance version recorded
/// on the ledger.
pub fn convert_back_context_id(
    account_id: &[u8; ACCOUNT_ID_LEN],
    sequence: u32,
    mpt_issuance_id: &[u8; MPT_ISSUANCE_ID_LEN],
    amount: u64,
    version: u32,
) -> [u8; CONTEXT_ID_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(CONVERT_BACK_TX_TYPE.to_be_bytes());
    hasher.update(account_id);
    hasher.update(sequence.to_be_bytes());
    hasher.update(mpt_issuance_id);
    hasher.update(amount.to_be_bytes());
    hasher.update(version.to_be_bytes());
    sha512_half(hasher)
}

/// Context identifier for a confidential send.
///
/// Layout: `type(2) | account(20) | sequence(4) | issuance(24) |
/// destination(20) | version(4)`. The amount is confidential, so the sender's
/// balance version stands in for it.
pub fn send_context_id(
    account_id: &[u8; ACCOUNT_ID_LEN],
    sequence: u32,
    mpt_issuance_id: &[u8; MPT_ISSUANCE_ID_LEN],
    destination_id: &[u8; ACCOUNT_ID_LEN],
    version: u32,
) -> [u8; CONTEXT_ID_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(SEND_TX_TYPE.to_be_bytes());
    hasher.update(account_id);
    hasher.update(sequence.to_be_bytes());
    hasher.update(mpt_issuance_id);
    hasher.update(destination_id);
    hasher.update(version.to_be_bytes());
    sha512_half(hasher)
}

/// Context identifier for a confidential clawback by the issuer.
///
/// Layout: `type(2) | issuer(20) | sequence(4) | issuance(24) | amount(8) |
/// holder(20)`.
pub fn clawback_context_id(
    issuer_id: &[u8; ACCOUNT_ID_LEN],
    sequence: u32,
    mpt_issuance_id: &[u8; MPT_ISSUANCE_ID_LEN],
    amount: u64,
    holder_id: &[u8; ACCOUNT_ID_LEN],
) -> [u8; CONTEXT_ID_LEN] {
    let mut hasher = Sha512::new();
    hasher.update(CLAWBACK_TX_TYPE.to_be_bytes());
    hasher.update(issuer_id);
    hasher.update(sequence.to_be_bytes());
    hasher.update(mpt_issuance_id);
    hasher.update(amount.to_be_bytes());
    hasher.update(holder_id);
    sha512_half(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_ids_are_deterministic() {
        let account = [1u8; ACCOUNT_ID_LEN];
        let issuance = [2u8; MPT_ISSUANCE_ID_LEN];

        let a = convert_context_id(&account, 7, &issuance, 1000);
        let b = convert_context_id(&account, 7, &issuance, 1000);
        assert_eq!(a, b);
    }

    #[test]
    fn test_context_ids_separate_fields() {
        let account = [1u8; ACCOUNT_ID_LEN];
        let issuance = [2u8; MPT_ISSUANCE_ID_LEN];

        let base = convert_context_id(&account, 7, &issuance, 1000);
        assert_ne!(base, convert_context_id(&account, 8, &issuance, 1000));
        assert_ne!(base, convert_context_id(&account, 7, &issuance, 1001));
    }

    #[test]
    fn test_context_ids_separate_tx_types() {
        let account = [1u8; ACCOUNT_ID_LEN];
        let issuance = [2u8; MPT_ISSUANCE_ID_LEN];

        let convert = convert_context_id(&account, 7, &issuance, 1000);
        let convert_back = convert_back_context_id(&account, 7, &issuance, 1000, 0);
        let clawback = clawback_context_id(&account, 7, &issuance, 1000, &account);

        assert_ne!(convert, convert_back);
        assert_ne!(convert, clawback);
        assert_ne!(convert_back, clawback);
    }
}
