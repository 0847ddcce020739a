//! Input classification.
//!
//! [`classify`] runs every check independently and collects the properties
//! the input satisfies. A failing check only means its property is absent;
//! classification itself never fails.

use std::sync::LazyLock;

use regex::Regex;
use sniffer_codecs::encoding::{bech32_decode, decode_hex_strict};
use sniffer_codecs::mnemonic::EnglishMnemonic;
use sniffer_codecs::weave::{self, MAINNET_PREFIX, TESTNET_PREFIX};
use sniffer_codecs::{AddressCodec, DposCodec, EthereumCodec};
use sniffer_types::{Property, PropertySet};

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9.\-_]{1,64}\*iov$").expect("valid regex"));

pub fn classify(input: &str) -> PropertySet {
    let mut out = PropertySet::new();
    if input.is_empty() {
        return out;
    }

    if let Ok(data) = decode_hex_strict(input) {
        out.insert(Property::Hex);
        match data.len() {
            20 => out.insert(Property::ByteLength20),
            32 => out.insert(Property::ByteLength32),
            64 => out.insert(Property::ByteLength64),
            65 => out.insert(Property::ByteLength65),
            _ => {}
        }
    }

    if let Ok(decoded) = bech32_decode(input) {
        out.insert(Property::Bech32);
        match decoded.prefix.as_str() {
            MAINNET_PREFIX => out.insert(Property::IovAddressMainnet),
            TESTNET_PREFIX => out.insert(Property::IovAddressTestnet),
            _ => {}
        }
    }

    if let Ok(mnemonic) = EnglishMnemonic::parse(input) {
        out.insert(Property::EnglishMnemonic);
        if mnemonic.word_count() == 12 {
            out.insert(Property::EnglishMnemonic12Words);
        }
    }

    if USERNAME_REGEX.is_match(input) {
        out.insert(Property::BnsUsername);
    }

    if input.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = input.parse::<u64>() {
            out.insert(Property::Uint64);
            if n != 0 {
                out.insert(Property::NonZeroUint64);
            }
        }
    }

    if weave::is_condition(input) {
        out.insert(Property::WeaveCondition);
    }

    if DposCodec::lisk().is_valid_address(input) {
        out.insert(Property::LiskAddress);
    }
    if DposCodec::rise().is_valid_address(input) {
        out.insert(Property::RiseAddress);
    }
    if EthereumCodec.is_valid_address(input) {
        out.insert(Property::EthereumAddress);
    }

    out
}
