use anyhow::Result;
use sniffer_codecs::EthereumCodec;
use sniffer_types::{priorities, Display, DisplayMeta, Field, StaticDisplay};

use super::display_id;

pub fn ethereum_address(input: &str) -> Result<Display> {
    let checksummed = EthereumCodec.to_checksummed_address(input)?;
    let meta = DisplayMeta::new(
        display_id(input, "ethereum-address"),
        priorities::ETHEREUM_ADDRESS,
        "Ethereum address",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::linked("Lower", input.to_lowercase()),
            Field::linked("Checksummed", &checksummed),
            Field::text("Etherscan", format!("https://etherscan.io/address/{}", checksummed)),
            Field::text(
                "Etherscan (Ropsten)",
                format!("https://ropsten.etherscan.io/address/{}", checksummed),
            ),
        ],
    )
    .into())
}
