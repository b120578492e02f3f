//! ElGamal encryption over secp256k1 with plaintexts in the exponent.
//!
//! A ciphertext of an amount `m` under a public key `Pk` and randomness `r` is
//! the pair `(C1, C2) = (r*G, m*G + r*Pk)`. Because the amount lives in the
//! exponent, ciphertexts are additively homomorphic: componentwise addition of
//! two ciphertexts encrypts the sum of their amounts. Decryption strips the
//! mask with the secret key and then recovers the amount from `m*G` via the
//! bounded discrete-log solver in
//! [`discrete_log`](crate::encryption::discrete_log).

use {
    crate::{
        encryption::discrete_log::DiscreteLog,
        secp256k1::{
            compress, hash_to_scalar, multiscalar_mul, random_nonzero_scalar,
            scalar_from_canonical_bytes, scalar_to_bytes, CompressedPoint, ProjectivePoint,
            Scalar, G, POINT_LEN, SCALAR_LEN,
        },
        ACCOUNT_ID_LEN, MPT_ISSUANCE_ID_LEN,
    },
    arrayref::{array_ref, array_refs},
    base64::{prelude::BASE64_STANDARD, Engine},
    core::ops::{Add, Sub},
    k256::elliptic_curve::Field,
    serde::{de::Visitor, Deserialize, Deserializer, Serialize, Serializer},
    std::fmt,
    subtle::{Choice, ConstantTimeEq},
    zeroize::Zeroize,
};

/// Byte length of an ElGamal public key.
pub const ELGAMAL_PUBKEY_LEN: usize = POINT_LEN;
/// Byte length of an ElGamal secret key.
pub const ELGAMAL_SECRET_KEY_LEN: usize = SCALAR_LEN;
/// Byte length of an ElGamal keypair.
pub const ELGAMAL_KEYPAIR_LEN: usize = ELGAMAL_PUBKEY_LEN + ELGAMAL_SECRET_KEY_LEN;
/// Byte length of an ElGamal ciphertext.
pub const ELGAMAL_CIPHERTEXT_LEN: usize = 2 * POINT_LEN;

const CANONICAL_ZERO_DOMAIN: &[u8] = b"MPT/CZ/v1";

/// Handle for the ElGamal encryption scheme.
pub struct ElGamal;

impl ElGamal {
    /// Encrypts an amount under a public key with fresh randomness.
    ///
    /// The randomness is returned alongside the ciphertext; the caller needs it
    /// to produce the sigma proofs that accompany a transaction.
    pub fn encrypt(pk: &ElGamalPubkey, amount: u64) -> (ElGamalCiphertext, ElGamalRandomness) {
        let randomness = ElGamalRandomness::new_rand();
        let ciphertext = Self::encrypt_with(pk, amount, &randomness);
        (ciphertext, randomness)
    }

    /// Encrypts an amount under a public key with caller-supplied randomness.
    pub fn encrypt_with(
        pk: &ElGamalPubkey,
        amount: u64,
        randomness: &ElGamalRandomness,
    ) -> ElGamalCiphertext {
        let r = randomness.get_scalar();

        ElGamalCiphertext {
            c1: G * &r,
            c2: multiscalar_mul(&[Scalar::from(amount), r], &[G, pk.get_point()]),
        }
    }

    /// Decrypts a ciphertext down to the exponent point `m*G`.
    ///
    /// The amount itself is recovered with the returned instance's
    /// `decode_u32` method.
    pub fn decrypt(secret: &ElGamalSecretKey, ciphertext: &ElGamalCiphertext) -> DiscreteLog {
        DiscreteLog::new(G, ciphertext.c2 - ciphertext.c1 * &secret.0)
    }

    /// Decrypts a ciphertext, searching the 32-bit decode window for the
    /// amount. Returns `None` when the amount lies outside the window.
    pub fn decrypt_u32(secret: &ElGamalSecretKey, ciphertext: &ElGamalCiphertext) -> Option<u64> {
        Self::decrypt(secret, ciphertext).decode_u32()
    }

    /// Checks that a ciphertext is the encryption of a revealed amount under
    /// the revealed randomness by recomputing it and comparing encodings.
    pub fn verify_encryption(
        pk: &ElGamalPubkey,
        amount: u64,
        randomness: &ElGamalRandomness,
        ciphertext: &ElGamalCiphertext,
    ) -> bool {
        Self::encrypt_with(pk, amount, randomness).to_bytes() == ciphertext.to_bytes()
    }
}

/// An ElGamal keypair.
pub struct ElGamalKeypair {
    /// The public half of this keypair.
    pub public: ElGamalPubkey,
    /// The secret half of this keypair.
    pub secret: ElGamalSecretKey,
}

impl ElGamalKeypair {
    /// Generates a keypair from a fresh random non-zero secret scalar.
    pub fn new_rand() -> Self {
        Self::from_secret(ElGamalSecretKey(random_nonzero_scalar()))
    }

    /// Derives the keypair holding a given secret key.
    pub fn from_secret(secret: ElGamalSecretKey) -> Self {
        Self {
            public: ElGamalPubkey(G * &secret.0),
            secret,
        }
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; ELGAMAL_KEYPAIR_LEN] {
        let mut bytes = [0u8; ELGAMAL_KEYPAIR_LEN];
        bytes[..ELGAMAL_PUBKEY_LEN].copy_from_slice(&self.public.to_bytes());
        bytes[ELGAMAL_PUBKEY_LEN..].copy_from_slice(&self.secret.to_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != ELGAMAL_KEYPAIR_LEN {
            return None;
        }
        let public = ElGamalPubkey::from_bytes(&bytes[..ELGAMAL_PUBKEY_LEN])?;
        let secret = ElGamalSecretKey::from_bytes(&bytes[ELGAMAL_PUBKEY_LEN..])?;
        Some(Self { public, secret })
    }
}

/// Public key for the ElGamal encryption scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ElGamalPubkey(ProjectivePoint);

impl ElGamalPubkey {
    pub fn get_point(&self) -> ProjectivePoint {
        self.0
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; ELGAMAL_PUBKEY_LEN] {
        compress(&self.0).to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<ElGamalPubkey> {
        CompressedPoint::from_slice(bytes)?
            .decompress()
            .map(ElGamalPubkey)
    }

    /// Utility method for code ergonomics.
    pub fn encrypt(&self, amount: u64) -> (ElGamalCiphertext, ElGamalRandomness) {
        ElGamal::encrypt(self, amount)
    }

    /// Utility method for code ergonomics.
    pub fn encrypt_with(&self, amount: u64, randomness: &ElGamalRandomness) -> ElGamalCiphertext {
        ElGamal::encrypt_with(self, amount, randomness)
    }
}

impl fmt::Display for ElGamalPubkey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", BASE64_STANDARD.encode(self.to_bytes()))
    }
}

impl Serialize for ElGamalPubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for ElGamalPubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PubkeyVisitor;

        impl<'de> Visitor<'de> for PubkeyVisitor {
            type Value = ElGamalPubkey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a compressed secp256k1 point")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                ElGamalPubkey::from_bytes(v).ok_or_else(|| E::custom("invalid public key"))
            }
        }

        deserializer.deserialize_bytes(PubkeyVisitor)
    }
}

/// Secret key for the ElGamal encryption scheme.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct ElGamalSecretKey(Scalar);

impl ElGamalSecretKey {
    pub fn get_scalar(&self) -> Scalar {
        self.0
    }

    /// Utility method for code ergonomics.
    pub fn decrypt(&self, ciphertext: &ElGamalCiphertext) -> DiscreteLog {
        ElGamal::decrypt(self, ciphertext)
    }

    /// Utility method for code ergonomics.
    pub fn decrypt_u32(&self, ciphertext: &ElGamalCiphertext) -> Option<u64> {
        ElGamal::decrypt_u32(self, ciphertext)
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; ELGAMAL_SECRET_KEY_LEN] {
        scalar_to_bytes(&self.0)
    }

    /// Parses a secret key, rejecting zero and non-canonical scalars.
    pub fn from_bytes(bytes: &[u8]) -> Option<ElGamalSecretKey> {
        let scalar = scalar_from_canonical_bytes(bytes)?;
        if bool::from(scalar.is_zero()) {
            return None;
        }
        Some(ElGamalSecretKey(scalar))
    }
}

impl Eq for ElGamalSecretKey {}
impl PartialEq for ElGamalSecretKey {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for ElGamalSecretKey {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

/// Encryption randomness for the ElGamal encryption scheme.
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct ElGamalRandomness(pub(crate) Scalar);

impl ElGamalRandomness {
    pub fn new_rand() -> Self {
        ElGamalRandomness(random_nonzero_scalar())
    }

    pub fn get_scalar(&self) -> Scalar {
        self.0
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        scalar_to_bytes(&self.0)
    }

    /// Parses encryption randomness, rejecting zero and non-canonical scalars.
    pub fn from_bytes(bytes: &[u8]) -> Option<ElGamalRandomness> {
        let scalar = scalar_from_canonical_bytes(bytes)?;
        if bool::from(scalar.is_zero()) {
            return None;
        }
        Some(ElGamalRandomness(scalar))
    }
}

impl Eq for ElGamalRandomness {}
impl PartialEq for ElGamalRandomness {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).unwrap_u8() == 1u8
    }
}
impl ConstantTimeEq for ElGamalRandomness {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

/// Ciphertext for the ElGamal encryption scheme.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ElGamalCiphertext {
    pub c1: ProjectivePoint,
    pub c2: ProjectivePoint,
}

impl ElGamalCiphertext {
    /// The deterministic encryption of zero for an account and issuance pair.
    ///
    /// The randomness is derived from the two identifiers under a fixed domain
    /// tag, so the ciphertext and its opening are recomputable by anyone who
    /// knows the pair. It serves as the well-known initial balance ciphertext.
    pub fn encrypted_zero(
        pk: &ElGamalPubkey,
        account_id: &[u8; ACCOUNT_ID_LEN],
        mpt_issuance_id: &[u8; MPT_ISSUANCE_ID_LEN],
    ) -> Self {
        let r = hash_to_scalar(
            CANONICAL_ZERO_DOMAIN,
            &[account_id.as_slice(), mpt_issuance_id.as_slice()],
        );
        ElGamal::encrypt_with(pk, 0, &ElGamalRandomness(r))
    }

    #[allow(clippy::wrong_self_convention)]
    pub fn to_bytes(&self) -> [u8; ELGAMAL_CIPHERTEXT_LEN] {
        let mut bytes = [0u8; ELGAMAL_CIPHERTEXT_LEN];
        bytes[..POINT_LEN].copy_from_slice(compress(&self.c1).as_bytes());
        bytes[POINT_LEN..].copy_from_slice(compress(&self.c2).as_bytes());
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Option<ElGamalCiphertext> {
        if bytes.len() != ELGAMAL_CIPHERTEXT_LEN {
            return None;
        }
        let bytes = array_ref![bytes, 0, ELGAMAL_CIPHERTEXT_LEN];
        let (c1, c2) = array_refs![bytes, POINT_LEN, POINT_LEN];

        Some(ElGamalCiphertext {
            c1: CompressedPoint(*c1).decompress()?,
            c2: CompressedPoint(*c2).decompress()?,
        })
    }

    /// Utility method for code ergonomics.
    pub fn decrypt(&self, secret: &ElGamalSecretKey) -> DiscreteLog {
        ElGamal::decrypt(secret, self)
    }

    /// Utility method for code ergonomics.
    pub fn decrypt_u32(&self, secret: &ElGamalSecretKey) -> Option<u64> {
        ElGamal::decrypt_u32(secret, self)
    }
}

impl fmt::Display for ElGamalCiphertext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", BASE64_STANDARD.encode(self.to_bytes()))
    }
}

impl Serialize for ElGamalCiphertext {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for ElGamalCiphertext {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CiphertextVisitor;

        impl<'de> Visitor<'de> for CiphertextVisitor {
            type Value = ElGamalCiphertext;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "two compressed secp256k1 points")
            }

            fn visit_bytes<E: serde::de::Error>(self, v: &[u8]) -> Result<Self::Value, E> {
                ElGamalCiphertext::from_bytes(v).ok_or_else(|| E::custom("invalid ciphertext"))
            }
        }

        deserializer.deserialize_bytes(CiphertextVisitor)
    }
}

impl<'a, 'b> Add<&'b ElGamalCiphertext> for &'a ElGamalCiphertext {
    type Output = ElGamalCiphertext;

    fn add(self, other: &'b ElGamalCiphertext) -> ElGamalCiphertext {
        ElGamalCiphertext {
            c1: self.c1 + other.c1,
            c2: self.c2 + other.c2,
        }
    }
}

define_add_variants!(
    LHS = ElGamalCiphertext,
    RHS = ElGamalCiphertext,
    Output = ElGamalCiphertext
);

impl<'a, 'b> Sub<&'b ElGamalCiphertext> for &'a ElGamalCiphertext {
    type Output = ElGamalCiphertext;

    fn sub(self, other: &'b ElGamalCiphertext) -> ElGamalCiphertext {
        ElGamalCiphertext {
            c1: self.c1 - other.c1,
            c2: self.c2 - other.c2,
        }
    }
}

define_sub_variants!(
    LHS = ElGamalCiphertext,
    RHS = ElGamalCiphertext,
    Output = ElGamalCiphertext
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_correctness() {
        let ElGamalKeypair { public, secret } = ElGamalKeypair::new_rand();
        let amount: u64 = 57;

        let (ciphertext, _) = ElGamal::encrypt(&public, amount);
        assert_eq!(ElGamal::decrypt_u32(&secret, &ciphertext), Some(amount));
    }

    #[test]
    fn test_encrypt_with_is_deterministic() {
        let keypair = ElGamalKeypair::new_rand();
        let randomness = ElGamalRandomness::from_bytes(&[0x11; 32]).unwrap();

        let a = ElGamal::encrypt_with(&keypair.public, 77, &randomness);
        let b = ElGamal::encrypt_with(&keypair.public, 77, &randomness);
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn test_verify_encryption() {
        let keypair = ElGamalKeypair::new_rand();
        let (ciphertext, randomness) = ElGamal::encrypt(&keypair.public, 77);

        assert!(ElGamal::verify_encryption(
            &keypair.public,
            77,
            &randomness,
            &ciphertext
        ));
        assert!(!ElGamal::verify_encryption(
            &keypair.public,
            78,
            &randomness,
            &ciphertext
        ));
    }

    #[test]
    fn test_homomorphic_addition() {
        let keypair = ElGamalKeypair::new_rand();

        let (ct_0, _) = ElGamal::encrypt(&keypair.public, 57);
        let (ct_1, _) = ElGamal::encrypt(&keypair.public, 77);

        let ct_sum = ct_0 + ct_1;
        assert_eq!(keypair.secret.decrypt_u32(&ct_sum), Some(134));
    }

    #[test]
    fn test_homomorphic_subtraction() {
        let keypair = ElGamalKeypair::new_rand();

        let (ct_0, _) = ElGamal::encrypt(&keypair.public, 77);
        let (ct_1, _) = ElGamal::encrypt(&keypair.public, 55);

        let ct_sub = ct_0 - ct_1;
        assert_eq!(keypair.secret.decrypt_u32(&ct_sub), Some(22));
    }

    #[test]
    fn test_canonical_encrypted_zero() {
        let keypair = ElGamalKeypair::new_rand();
        let account_id = [0xaa; ACCOUNT_ID_LEN];
        let issuance_id = [0xbb; MPT_ISSUANCE_ID_LEN];

        let a = ElGamalCiphertext::encrypted_zero(&keypair.public, &account_id, &issuance_id);
        let b = ElGamalCiphertext::encrypted_zero(&keypair.public, &account_id, &issuance_id);

        assert_eq!(a.to_bytes(), b.to_bytes());
        assert_eq!(keypair.secret.decrypt_u32(&a), Some(0));

        // a different issuance produces a different ciphertext
        let c = ElGamalCiphertext::encrypted_zero(
            &keypair.public,
            &account_id,
            &[0xbc; MPT_ISSUANCE_ID_LEN],
        );
        assert_ne!(a.to_bytes(), c.to_bytes());
    }

    #[test]
    fn test_ciphertext_bytes_round_trip() {
        let keypair = ElGamalKeypair::new_rand();
        let (ciphertext, _) = ElGamal::encrypt(&keypair.public, 42);

        let decoded = ElGamalCiphertext::from_bytes(&ciphertext.to_bytes()).unwrap();
        assert_eq!(ciphertext, decoded);
    }

    #[test]
    fn test_secret_key_rejects_zero_and_noncanonical() {
        assert!(ElGamalSecretKey::from_bytes(&[0u8; 32]).is_none());
        assert!(ElGamalSecretKey::from_bytes(&[0xff; 32]).is_none());
        assert!(ElGamalSecretKey::from_bytes(&[1u8; 32]).is_some());
    }

    #[test]
    fn test_serde_ciphertext() {
        let keypair = ElGamalKeypair::new_rand();
        let (ciphertext, _) = ElGamal::encrypt(&keypair.public, 77);

        let encoded = bincode::serialize(&ciphertext).unwrap();
        let decoded: ElGamalCiphertext = bincode::deserialize(&encoded).unwrap();

        assert_eq!(ciphertext, decoded);
    }

    #[test]
    fn test_serde_pubkey() {
        let keypair = ElGamalKeypair::new_rand();

        let encoded = bincode::serialize(&keypair.public).unwrap();
        let decoded: ElGamalPubkey = bincode::deserialize(&encoded).unwrap();

        assert_eq!(keypair.public, decoded);
    }
}
