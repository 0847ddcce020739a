//! Hex and Bech32 helpers.

use anyhow::{anyhow, bail, Result};
use bech32::{FromBase32, ToBase32, Variant};

// =============================================================================
// Hex
// =============================================================================

/// Strict hex decode: even length, hex digits only, no `0x` prefix.
/// Mixed case is accepted.
pub fn decode_hex_strict(input: &str) -> Result<Vec<u8>> {
    if !input.is_ascii() {
        bail!("Invalid hex '{}': non-ASCII characters", input);
    }
    if input.len() % 2 != 0 {
        bail!("Invalid hex '{}': odd length", input);
    }
    hex::decode(input).map_err(|e| anyhow!("Invalid hex '{}': {}", input, e))
}

// =============================================================================
// Bech32
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bech32Data {
    pub prefix: String,
    pub data: Vec<u8>,
}

/// Decode a checksummed Bech32 string (original variant, not Bech32m).
pub fn bech32_decode(input: &str) -> Result<Bech32Data> {
    let (prefix, words, variant) =
        bech32::decode(input).map_err(|e| anyhow!("Invalid bech32 '{}': {}", input, e))?;
    if variant != Variant::Bech32 {
        bail!("Invalid bech32 '{}': bech32m variant", input);
    }
    let data = Vec::<u8>::from_base32(&words)
        .map_err(|e| anyhow!("Invalid bech32 payload in '{}': {}", input, e))?;
    Ok(Bech32Data { prefix, data })
}

pub fn bech32_encode(prefix: &str, data: &[u8]) -> Result<String> {
    bech32::encode(prefix, data.to_base32(), Variant::Bech32)
        .map_err(|e| anyhow!("Failed to bech32 encode with prefix '{}': {}", prefix, e))
}
