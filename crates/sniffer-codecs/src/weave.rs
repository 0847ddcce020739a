//! Weave/BNS addresses and conditions.
//!
//! A weave address is the first 20 bytes of `sha256(condition)`, where a
//! condition is the ASCII string `"<extension>/<type>/"` followed by raw
//! data bytes. Public key addresses use the `sigs` extension.

use std::fmt;
use std::sync::LazyLock;

use anyhow::{anyhow, bail, Result};
use regex::Regex;
use sha2::{Digest, Sha256};
use sniffer_types::settings::IOV_MAINNET_CHAIN_ID;

use crate::encoding::{bech32_decode, bech32_encode, decode_hex_strict};
use crate::{Algorithm, AddressCodec, PubkeyBundle};

pub const MAINNET_PREFIX: &str = "iov";
pub const TESTNET_PREFIX: &str = "tiov";

const ADDRESS_LENGTH: usize = 20;

static CONDITION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^cond:([a-zA-Z0-9_]+)/([a-zA-Z0-9_]+)/((?:[0-9a-fA-F]{2})+)$")
        .expect("valid regex")
});

/// Bech32 prefix for addresses on `chain_id`.
pub fn prefix_for_chain(chain_id: &str) -> &'static str {
    if chain_id == IOV_MAINNET_CHAIN_ID {
        MAINNET_PREFIX
    } else {
        TESTNET_PREFIX
    }
}

/// A parsed `cond:<extension>/<type>/<hex>` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub extension: String,
    pub kind: String,
    pub data: Vec<u8>,
}

impl Condition {
    pub fn new(extension: &str, kind: &str, data: impl Into<Vec<u8>>) -> Self {
        Self {
            extension: extension.to_string(),
            kind: kind.to_string(),
            data: data.into(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let caps = CONDITION_REGEX
            .captures(input)
            .ok_or_else(|| anyhow!("Not a weave condition: '{}'", input))?;
        Ok(Self {
            extension: caps[1].to_string(),
            kind: caps[2].to_string(),
            data: decode_hex_strict(&caps[3])?,
        })
    }

    /// Condition for a weave sequence id, e.g. `cond:escrow/seq/000000000000002A`.
    pub fn from_sequence(extension: &str, kind: &str, id: u64) -> Self {
        Self::new(extension, kind, id.to_be_bytes())
    }

    /// `"<extension>/<type>/" ++ data`
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = format!("{}/{}/", self.extension, self.kind).into_bytes();
        out.extend_from_slice(&self.data);
        out
    }

    pub fn address_bytes(&self) -> [u8; ADDRESS_LENGTH] {
        let hash = Sha256::digest(self.to_bytes());
        let mut out = [0u8; ADDRESS_LENGTH];
        out.copy_from_slice(&hash[..ADDRESS_LENGTH]);
        out
    }

    pub fn to_address(&self, chain_id: &str) -> Result<String> {
        bech32_encode(prefix_for_chain(chain_id), &self.address_bytes())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cond:{}/{}/{}",
            self.extension,
            self.kind,
            hex::encode_upper(&self.data)
        )
    }
}

pub fn is_condition(input: &str) -> bool {
    CONDITION_REGEX.is_match(input)
}

/// Encode raw weave address bytes for `chain_id`.
pub fn encode_address(chain_id: &str, data: &[u8]) -> Result<String> {
    bech32_encode(prefix_for_chain(chain_id), data)
}

/// BNS address codec for one prefix.
#[derive(Debug, Clone, Copy)]
pub struct BnsCodec {
    prefix: &'static str,
}

impl BnsCodec {
    pub fn mainnet() -> Self {
        Self {
            prefix: MAINNET_PREFIX,
        }
    }

    pub fn testnet() -> Self {
        Self {
            prefix: TESTNET_PREFIX,
        }
    }

    pub fn for_chain(chain_id: &str) -> Self {
        Self {
            prefix: prefix_for_chain(chain_id),
        }
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }
}

impl AddressCodec for BnsCodec {
    fn is_valid_address(&self, candidate: &str) -> bool {
        match bech32_decode(candidate) {
            Ok(decoded) => decoded.prefix == self.prefix && decoded.data.len() == ADDRESS_LENGTH,
            Err(_) => false,
        }
    }

    fn pubkey_to_address(&self, pubkey: &PubkeyBundle) -> Result<String> {
        let kind = match pubkey.algo {
            Algorithm::Ed25519 => {
                if pubkey.data.len() != 32 {
                    bail!("Invalid ed25519 pubkey length {}", pubkey.data.len());
                }
                "ed25519"
            }
            Algorithm::Secp256k1 => "secp256k1",
        };
        let condition = Condition::new("sigs", kind, pubkey.data.clone());
        bech32_encode(self.prefix, &condition.address_bytes())
    }
}
