//! Input properties observed by the classifier.
//!
//! A [`Property`] is one syntactic or semantic fact about an input string.
//! Properties are not mutually exclusive: a 20-byte hex string is both
//! [`Property::Hex`] and [`Property::ByteLength20`].
//!
//! Adding a variant here is only half of a change. The dispatch table in the
//! root crate has to gain a rule for it in the same commit, otherwise the
//! property is observed and silently ignored.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A fact the classifier can observe about an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    /// Strict hex: even length, hex digits only, no `0x` prefix.
    Hex,
    /// Valid Bech32 string (checksum verified).
    Bech32,
    ByteLength20,
    ByteLength32,
    ByteLength64,
    ByteLength65,
    /// BIP-39 English mnemonic with a valid checksum.
    EnglishMnemonic,
    /// [`Property::EnglishMnemonic`] with 128 bits of entropy.
    EnglishMnemonic12Words,
    EthereumAddress,
    IovAddressMainnet,
    IovAddressTestnet,
    /// Name in the `<name>*iov` grammar.
    BnsUsername,
    LiskAddress,
    RiseAddress,
    /// `cond:<extension>/<type>/<hex>`
    WeaveCondition,
    /// Decimal digits parsing as an unsigned 64-bit integer.
    Uint64,
    NonZeroUint64,
}

impl Property {
    pub fn as_str(&self) -> &'static str {
        match self {
            Property::Hex => "hex",
            Property::Bech32 => "bech32",
            Property::ByteLength20 => "byte_length_20",
            Property::ByteLength32 => "byte_length_32",
            Property::ByteLength64 => "byte_length_64",
            Property::ByteLength65 => "byte_length_65",
            Property::EnglishMnemonic => "english_mnemonic",
            Property::EnglishMnemonic12Words => "english_mnemonic_12_words",
            Property::EthereumAddress => "ethereum_address",
            Property::IovAddressMainnet => "iov_address_mainnet",
            Property::IovAddressTestnet => "iov_address_testnet",
            Property::BnsUsername => "bns_username",
            Property::LiskAddress => "lisk_address",
            Property::RiseAddress => "rise_address",
            Property::WeaveCondition => "weave_condition",
            Property::Uint64 => "uint64",
            Property::NonZeroUint64 => "non_zero_uint64",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The complete semantic summary of one input string.
///
/// Backed by a `BTreeSet` so iteration order (used only for logging) is
/// deterministic. Consumers should only ask about membership.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet(BTreeSet<Property>);

impl PropertySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, property: Property) {
        self.0.insert(property);
    }

    pub fn has(&self, property: Property) -> bool {
        self.0.contains(&property)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Property> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Property> for PropertySet {
    fn from_iter<I: IntoIterator<Item = Property>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for PropertySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Property::as_str).collect();
        write!(f, "{{{}}}", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_membership() {
        let set: PropertySet = [Property::Hex, Property::ByteLength20, Property::Hex]
            .into_iter()
            .collect();
        assert_eq!(set.len(), 2);
        assert!(set.has(Property::Hex));
        assert!(!set.has(Property::Bech32));
    }

    #[test]
    fn test_display_is_ordered() {
        let set: PropertySet = [Property::ByteLength20, Property::Hex].into_iter().collect();
        assert_eq!(set.to_string(), "{hex, byte_length_20}");
        assert_eq!(PropertySet::new().to_string(), "{}");
    }
}
