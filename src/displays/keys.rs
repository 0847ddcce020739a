//! Public and private key displays, plus the Lisk-style brain wallet
//! passphrase.

use anyhow::{bail, Result};
use sniffer_codecs::dpos::passphrase_to_pubkey_async;
use sniffer_codecs::encoding::decode_hex_strict;
use sniffer_codecs::{AddressCodec, BnsCodec, DposCodec, EthereumCodec, PubkeyBundle};
use sniffer_types::{ellide_middle, priorities, Display, DisplayMeta, Field, StaticDisplay};

use super::display_id;

fn decode_exact(input: &str, len: usize) -> Result<Vec<u8>> {
    let data = decode_hex_strict(input)?;
    if data.len() != len {
        bail!("Expected {} bytes, got {}", len, data.len());
    }
    Ok(data)
}

fn ed25519_address_rows(pubkey: &PubkeyBundle) -> Result<Vec<Field>> {
    Ok(vec![
        Field::linked("IOV main", BnsCodec::mainnet().pubkey_to_address(pubkey)?),
        Field::linked("IOV test", BnsCodec::testnet().pubkey_to_address(pubkey)?),
        Field::linked("Lisk", DposCodec::lisk().pubkey_to_address(pubkey)?),
        Field::linked("Rise", DposCodec::rise().pubkey_to_address(pubkey)?),
    ])
}

pub fn ed25519_pubkey(input: &str) -> Result<Display> {
    let pubkey = PubkeyBundle::ed25519(decode_exact(input, 32)?);
    let meta = DisplayMeta::new(
        display_id(input, "ed25519-pubkey"),
        priorities::ED25519_PUBKEY,
        "Ed25519 public key",
    );
    Ok(StaticDisplay::fields(meta, ed25519_address_rows(&pubkey)?).into())
}

/// 64 bytes in libsodium layout: 32 byte seed followed by the pubkey.
pub fn ed25519_privkey(input: &str) -> Result<Display> {
    let data = decode_exact(input, 64)?;
    let seed = hex::encode(&data[..32]);
    let pubkey = hex::encode(&data[32..]);
    let meta = DisplayMeta::new(
        display_id(input, "ed25519-privkey"),
        priorities::ED25519_PRIVKEY,
        "Ed25519 private key (libsodium format)",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::text("Seed", seed),
            Field::linked_as("Pubkey", ellide_middle(&pubkey, 40), pubkey),
        ],
    )
    .into())
}

/// Uncompressed secp256k1 key (`04 || x || y`).
pub fn secp256k1_pubkey(input: &str) -> Result<Display> {
    let data = decode_exact(input, 65)?;
    if data[0] != 0x04 {
        bail!("Uncompressed secp256k1 pubkey must start with 04");
    }
    let pubkey = PubkeyBundle::secp256k1(data);
    let meta = DisplayMeta::new(
        display_id(input, "secp256k1-pubkey"),
        priorities::SECP256K1_PUBKEY,
        "Secp256k1 public key",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![Field::linked("Ethereum", EthereumCodec.pubkey_to_address(&pubkey)?)],
    )
    .into())
}

/// The input used as a Lisk/Rise passphrase. Key derivation runs on the
/// blocking pool, so construction is async.
pub async fn lisk_like_passphrase(input: &str) -> Result<Display> {
    let pubkey = passphrase_to_pubkey_async(input).await?;
    let meta = DisplayMeta::new(
        display_id(input, "lisk-like-passphrase"),
        priorities::LISK_LIKE_PASSPHRASE,
        "Lisk-like passphrase",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::linked("Pubkey", pubkey.to_hex()),
            Field::linked("Lisk", DposCodec::lisk().pubkey_to_address(&pubkey)?),
            Field::linked("Rise", DposCodec::rise().pubkey_to_address(&pubkey)?),
        ],
    )
    .into())
}
