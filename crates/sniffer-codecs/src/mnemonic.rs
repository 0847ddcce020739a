//! BIP-39 English mnemonics.

use std::sync::LazyLock;

use anyhow::{anyhow, bail, Result};
use bip39::{Language, Mnemonic};
use regex::Regex;

/// Lowercase words separated by single spaces, nothing else.
static WORDS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]+( [a-z]+)*$").expect("valid regex"));

/// A checksum-valid English mnemonic.
#[derive(Debug, Clone)]
pub struct EnglishMnemonic {
    inner: Mnemonic,
}

impl EnglishMnemonic {
    /// Parses strictly: no surrounding or repeated whitespace, no uppercase.
    pub fn parse(input: &str) -> Result<Self> {
        if !WORDS_REGEX.is_match(input) {
            bail!("Mnemonic must be lowercase words separated by single spaces");
        }
        let inner = Mnemonic::parse_in_normalized(Language::English, input)
            .map_err(|e| anyhow!("Invalid english mnemonic: {}", e))?;
        Ok(Self { inner })
    }

    pub fn entropy(&self) -> Vec<u8> {
        self.inner.to_entropy()
    }

    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// BIP-39 seed with an empty password.
    pub fn to_seed(&self) -> [u8; 64] {
        self.inner.to_seed_normalized("")
    }
}

/// Word count implied by an entropy length, as listed in BIP-39.
pub fn word_count_for_entropy_bits(bits: usize) -> Result<usize> {
    match bits {
        128 => Ok(12),
        160 => Ok(15),
        192 => Ok(18),
        224 => Ok(21),
        256 => Ok(24),
        _ => bail!("Unsupported entropy length"),
    }
}
