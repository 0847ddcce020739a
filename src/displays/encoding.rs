//! Displays for raw encodings: hex data, Bech32 strings and 20-byte weave
//! addresses.

use anyhow::{bail, Result};
use sniffer_codecs::encoding::{bech32_decode, decode_hex_strict};
use sniffer_codecs::weave::encode_address;
use sniffer_types::priorities;
use sniffer_types::settings::{IOV_MAINNET_CHAIN_ID, IOV_TESTNET_CHAIN_ID};
use sniffer_types::{Display, DisplayMeta, Field, StaticDisplay};

use super::display_id;

pub fn hex_summary(input: &str) -> Result<Display> {
    let data = decode_hex_strict(input)?;
    let meta = DisplayMeta::new(display_id(input, "hex-summary"), priorities::HEX, "Hex data");
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::text("Length", format!("{} bytes", data.len())),
            Field::text("Lower", input.to_lowercase()),
            Field::text("Upper", input.to_uppercase()),
        ],
    )
    .into())
}

pub fn bech32_summary(input: &str) -> Result<Display> {
    let decoded = bech32_decode(input)?;
    let meta = DisplayMeta::new(display_id(input, "bech32"), priorities::BECH32, "Bech32 address");
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::text("Prefix", decoded.prefix),
            Field::linked("Data", hex::encode(&decoded.data)),
        ],
    )
    .into())
}

/// The same 20 bytes as an IOV address on both networks.
pub fn weave_address(input: &str) -> Result<Display> {
    let data = decode_hex_strict(input)?;
    if data.len() != 20 {
        bail!("Weave address must be 20 bytes, got {}", data.len());
    }
    let meta = DisplayMeta::new(
        display_id(input, "weave-address"),
        priorities::WEAVE_ADDRESS,
        "Weave address",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::linked("IOV test", encode_address(IOV_TESTNET_CHAIN_ID, &data)?),
            Field::linked("IOV main", encode_address(IOV_MAINNET_CHAIN_ID, &data)?),
        ],
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sniffer_codecs::encoding::bech32_encode;
    use sniffer_types::DisplayData;

    fn fields(display: Display) -> Vec<Field> {
        match display {
            Display::Static(StaticDisplay {
                data: DisplayData::Fields(fields),
                ..
            }) => fields,
            other => panic!("expected static fields, got {:?}", other),
        }
    }

    #[test]
    fn test_hex_summary() {
        let display = hex_summary("AbCd").unwrap();
        assert_eq!(display.id(), "AbCd#hex-summary");
        assert_eq!(display.priority(), priorities::HEX);
        let rows = fields(display);
        assert_eq!(rows[0].value, "2 bytes");
        assert_eq!(rows[1].value, "abcd");
        assert_eq!(rows[2].value, "ABCD");
        assert!(hex_summary("xyz").is_err());
    }

    #[test]
    fn test_bech32_summary_links_payload() {
        let address = bech32_encode("tiov", &[0x11; 20]).unwrap();
        let rows = fields(bech32_summary(&address).unwrap());
        assert_eq!(rows[0].value, "tiov");
        assert_eq!(rows[1].value, "11".repeat(20));
        assert_eq!(rows[1].link.as_deref(), Some("11".repeat(20).as_str()));
    }

    #[test]
    fn test_weave_address_both_networks() {
        let input = "0011223344556677889900112233445566778899";
        let rows = fields(weave_address(input).unwrap());
        assert_eq!(rows[0].label, "IOV test");
        assert!(rows[0].value.starts_with("tiov1"));
        assert_eq!(rows[1].label, "IOV main");
        assert!(rows[1].value.starts_with("iov1"));

        let back = bech32_decode(&rows[1].value).unwrap();
        assert_eq!(hex::encode(back.data), input);

        assert!(weave_address("0011").is_err());
    }
}
