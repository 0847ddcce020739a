//! BIP-39 mnemonic summary and HD wallet displays.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sniffer_codecs::hd::{identity_to_address, wallet_for, HdPath, Identity};
use sniffer_codecs::mnemonic::{word_count_for_entropy_bits, EnglishMnemonic};
use sniffer_types::{
    ellide_middle, priorities, Curve, Display, DisplayData, DisplayMeta, Field, HdCoin,
    InteractiveDisplay, Lookup, PathRecipe, StaticDisplay,
};
use tracing::debug;

use super::display_id;

pub fn bip39_summary(input: &str) -> Result<Display> {
    let mnemonic = EnglishMnemonic::parse(input)?;
    let entropy = mnemonic.entropy();
    let bits = entropy.len() * 8;
    let words = word_count_for_entropy_bits(bits)?;
    let meta = DisplayMeta::new(
        display_id(input, "bip39-mnemonic"),
        priorities::BIP39_MNEMONIC,
        "Bip39 english mnemonic",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::text("Words", words.to_string()),
            Field::text("ENT", format!("{} bits", bits)),
            Field::linked("Entropy", hex::encode(&entropy)),
        ],
    )
    .into())
}

fn hd_wallet_tag(coin: &HdCoin) -> String {
    match coin.path {
        PathRecipe::SimpleAddress => "hd-wallet-simple-address".to_string(),
        _ => format!("hd-wallet-{}-coin{}", coin.curve.as_str(), coin.number),
    }
}

/// Derives the first `accounts` addresses of `coin` from a mnemonic.
pub struct HdWalletLookup {
    mnemonic: EnglishMnemonic,
    coin: HdCoin,
    accounts: u32,
}

impl HdWalletLookup {
    pub fn new(mnemonic: EnglishMnemonic, coin: HdCoin, accounts: u32) -> Self {
        Self {
            mnemonic,
            coin,
            accounts,
        }
    }
}

#[async_trait]
impl Lookup for HdWalletLookup {
    type Raw = Vec<(Identity, String)>;

    async fn fetch(&self) -> Result<Self::Raw> {
        let coin = self.coin.clone();
        let mnemonic = self.mnemonic.clone();
        // PBKDF2 seed stretching is the expensive part
        let wallet = tokio::task::spawn_blocking(move || wallet_for(&coin, &mnemonic))
            .await
            .context("HD seed derivation task failed")?;

        let mut out = Vec::with_capacity(self.accounts as usize);
        for account in 0..self.accounts {
            let path = HdPath::for_account(self.coin.path, self.coin.number, account);
            let identity = wallet.derive_identity(&path).await?;
            let address = identity_to_address(&self.coin, &identity)?;
            out.push((identity, address));
        }
        debug!(coin = %self.coin.name, count = out.len(), "derived HD identities");
        Ok(out)
    }

    fn render(&self, raw: Self::Raw) -> DisplayData {
        let address_len = match self.coin.curve {
            Curve::Ed25519 => 21,
            Curve::Secp256k1 => 16,
        };
        let rows = raw
            .into_iter()
            .map(|(identity, address)| {
                let shown = format!(
                    "{} ({}/{})",
                    ellide_middle(&address, address_len),
                    identity.pubkey.algo,
                    ellide_middle(&identity.pubkey.to_hex(), 5)
                );
                Field::linked_as(identity.path.to_string(), shown, address)
            })
            .collect();
        DisplayData::Fields(rows)
    }
}

pub fn hd_wallet(input: &str, coin: &HdCoin, accounts: u32) -> Result<Display> {
    let mnemonic = EnglishMnemonic::parse(input)?;
    let meta = DisplayMeta::new(
        display_id(input, &hd_wallet_tag(coin)),
        priorities::HD_ADDRESSES,
        format!("{} HD Wallet", coin.name),
    )
    .deprecated(coin.deprecated);
    Ok(InteractiveDisplay::new(meta, HdWalletLookup::new(mnemonic, coin.clone(), accounts)).into())
}
