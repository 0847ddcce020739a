//! Lisk and Rise (DPoS) addresses.
//!
//! An address is the decimal form of the first eight bytes of
//! `sha256(pubkey)` read little-endian, followed by a chain suffix
//! (`L` for Lisk, `R` for Rise).

use anyhow::{bail, Context, Result};
use ed25519_dalek::SigningKey;
use sha2::{Digest, Sha256};

use crate::{AddressCodec, Algorithm, PubkeyBundle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DposCodec {
    suffix: char,
}

impl DposCodec {
    pub fn lisk() -> Self {
        Self { suffix: 'L' }
    }

    pub fn rise() -> Self {
        Self { suffix: 'R' }
    }

    pub fn suffix(&self) -> char {
        self.suffix
    }
}

impl AddressCodec for DposCodec {
    /// 1 to 20 digits in canonical form (no leading zeros) that fit a u64,
    /// then the suffix.
    fn is_valid_address(&self, candidate: &str) -> bool {
        let Some(digits) = candidate.strip_suffix(self.suffix) else {
            return false;
        };
        if digits.is_empty() || digits.len() > 20 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
        match digits.parse::<u64>() {
            Ok(n) => n.to_string() == digits,
            Err(_) => false,
        }
    }

    fn pubkey_to_address(&self, pubkey: &PubkeyBundle) -> Result<String> {
        if pubkey.algo != Algorithm::Ed25519 || pubkey.data.len() != 32 {
            bail!(
                "{} addresses require a 32 byte ed25519 pubkey",
                if self.suffix == 'L' { "Lisk" } else { "Rise" }
            );
        }
        let hash = Sha256::digest(&pubkey.data);
        let mut first = [0u8; 8];
        first.copy_from_slice(&hash[..8]);
        Ok(format!("{}{}", u64::from_le_bytes(first), self.suffix))
    }
}

/// Ed25519 pubkey for a Lisk-style brain wallet: the private seed is
/// `sha256(passphrase)`.
pub fn passphrase_to_pubkey(passphrase: &str) -> PubkeyBundle {
    let seed: [u8; 32] = Sha256::digest(passphrase.as_bytes()).into();
    let signing = SigningKey::from_bytes(&seed);
    PubkeyBundle::ed25519(signing.verifying_key().to_bytes())
}

/// Async form of [`passphrase_to_pubkey`], run off the async executor.
pub async fn passphrase_to_pubkey_async(passphrase: &str) -> Result<PubkeyBundle> {
    let passphrase = passphrase.to_string();
    tokio::task::spawn_blocking(move || passphrase_to_pubkey(&passphrase))
        .await
        .context("Passphrase key derivation task failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str =
        "wagon stock borrow episode laundry kitten salute link globe zero feed marble";

    #[test]
    fn test_validation() {
        let lisk = DposCodec::lisk();
        assert!(lisk.is_valid_address("16313739661670634666L"));
        assert!(lisk.is_valid_address("0L"));
        assert!(lisk.is_valid_address("18446744073709551615L"));
        assert!(!lisk.is_valid_address("18446744073709551616L"));
        assert!(!lisk.is_valid_address("0123L"));
        assert!(!lisk.is_valid_address("L"));
        assert!(!lisk.is_valid_address("123R"));
        assert!(!lisk.is_valid_address("12 3L"));

        let rise = DposCodec::rise();
        assert!(rise.is_valid_address("123R"));
        assert!(!rise.is_valid_address("123L"));
    }

    #[test]
    fn test_passphrase_vector() {
        let pubkey = passphrase_to_pubkey(PASSPHRASE);
        assert_eq!(
            pubkey.to_hex(),
            "c094ebee7ec0c50ebee32918655e089f6e1a604b83bcaa760293c61e0f18ab6f"
        );
        assert_eq!(
            DposCodec::lisk().pubkey_to_address(&pubkey).unwrap(),
            "16313739661670634666L"
        );
        assert_eq!(
            DposCodec::rise().pubkey_to_address(&pubkey).unwrap(),
            "16313739661670634666R"
        );
    }

    #[tokio::test]
    async fn test_async_passphrase_matches_sync() {
        let pubkey = passphrase_to_pubkey_async(PASSPHRASE).await.unwrap();
        assert_eq!(pubkey, passphrase_to_pubkey(PASSPHRASE));
    }

    #[test]
    fn test_rejects_secp256k1() {
        let pubkey = PubkeyBundle::secp256k1([4u8; 65]);
        assert!(DposCodec::lisk().pubkey_to_address(&pubkey).is_err());
    }
}
