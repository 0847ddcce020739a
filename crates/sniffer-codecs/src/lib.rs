//! Per-chain codecs: address validation, address derivation from public
//! keys, checksum formatting and HD key derivation.
//!
//! Everything here is deterministic and free of I/O. The only async entry
//! points (HD identity derivation, Lisk passphrase keys) exist so callers can
//! treat key derivation uniformly with other awaited work.

pub mod dpos;
pub mod encoding;
pub mod ethereum;
pub mod hd;
pub mod mnemonic;
pub mod weave;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use sniffer_types::CodecKind;

pub use dpos::DposCodec;
pub use ethereum::EthereumCodec;
pub use weave::BnsCodec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Ed25519,
    Secp256k1,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::Ed25519 => f.write_str("ed25519"),
            Algorithm::Secp256k1 => f.write_str("secp256k1"),
        }
    }
}

/// A public key tagged with its algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubkeyBundle {
    pub algo: Algorithm,
    pub data: Vec<u8>,
}

impl PubkeyBundle {
    pub fn ed25519(data: impl Into<Vec<u8>>) -> Self {
        Self {
            algo: Algorithm::Ed25519,
            data: data.into(),
        }
    }

    pub fn secp256k1(data: impl Into<Vec<u8>>) -> Self {
        Self {
            algo: Algorithm::Secp256k1,
            data: data.into(),
        }
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.data)
    }
}

/// Address handling for one chain.
pub trait AddressCodec: Send + Sync {
    fn is_valid_address(&self, candidate: &str) -> bool;

    fn pubkey_to_address(&self, pubkey: &PubkeyBundle) -> Result<String>;
}

/// Codec for `kind`. `chain_id` picks the BNS prefix and is ignored otherwise.
pub fn codec_for(kind: CodecKind, chain_id: &str) -> Box<dyn AddressCodec> {
    match kind {
        CodecKind::Bns => Box::new(BnsCodec::for_chain(chain_id)),
        CodecKind::Lisk => Box::new(DposCodec::lisk()),
        CodecKind::Rise => Box::new(DposCodec::rise()),
        CodecKind::Ethereum => Box::new(EthereumCodec),
    }
}
