//! Ethereum addresses with EIP-55 mixed-case checksums.

use std::sync::LazyLock;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use sha3::{Digest, Keccak256};

use crate::{AddressCodec, Algorithm, PubkeyBundle};

static ADDRESS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default)]
pub struct EthereumCodec;

impl EthereumCodec {
    /// EIP-55 form of a syntactically valid address (any case).
    pub fn to_checksummed_address(&self, address: &str) -> Result<String> {
        if !ADDRESS_REGEX.is_match(address) {
            bail!("Invalid Ethereum address '{}'", address);
        }
        Ok(to_eip55(&address[2..].to_lowercase()))
    }
}

/// `lower` must be 40 lowercase hex characters without prefix.
fn to_eip55(lower: &str) -> String {
    let hash = hex::encode(Keccak256::digest(lower.as_bytes()));
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (c, h) in lower.chars().zip(hash.chars()) {
        // nibble >= 8 means uppercase
        if c.is_ascii_alphabetic() && h.to_digit(16).unwrap_or(0) >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

impl AddressCodec for EthereumCodec {
    /// All-lowercase addresses carry no checksum and are accepted; any
    /// uppercase letter means the whole address must match EIP-55.
    fn is_valid_address(&self, candidate: &str) -> bool {
        if !ADDRESS_REGEX.is_match(candidate) {
            return false;
        }
        let body = &candidate[2..];
        if !body.chars().any(|c| c.is_ascii_uppercase()) {
            return true;
        }
        to_eip55(&body.to_lowercase()) == candidate
    }

    fn pubkey_to_address(&self, pubkey: &PubkeyBundle) -> Result<String> {
        if pubkey.algo != Algorithm::Secp256k1 {
            bail!("Ethereum addresses require a secp256k1 pubkey, got {}", pubkey.algo);
        }
        let uncompressed = match pubkey.data.len() {
            65 if pubkey.data[0] == 0x04 => pubkey.data.clone(),
            33 => secp256k1::PublicKey::from_slice(&pubkey.data)
                .map_err(|e| anyhow!("Invalid compressed secp256k1 pubkey: {}", e))?
                .serialize_uncompressed()
                .to_vec(),
            n => bail!("Invalid secp256k1 pubkey length {}", n),
        };
        let hash = Keccak256::digest(&uncompressed[1..]);
        Ok(to_eip55(&hex::encode(&hash[12..])))
    }
}
