//! Hierarchical deterministic wallets.
//!
//! Ed25519 keys follow SLIP-10 (hardened children only), secp256k1 keys
//! follow BIP-32. Both start from the 64 byte BIP-39 seed.

use std::fmt;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use bip32::{DerivationPath, XPrv};
use ed25519_dalek::SigningKey;
use hmac::{Hmac, Mac};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::Sha512;
use sniffer_types::{Curve, HdCoin, PathRecipe};

use crate::mnemonic::EnglishMnemonic;
use crate::{codec_for, PubkeyBundle};

type HmacSha512 = Hmac<Sha512>;

const HARDENED_OFFSET: u32 = 0x8000_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slip10Index(u32);

impl Slip10Index {
    pub fn hardened(n: u32) -> Self {
        Self(n | HARDENED_OFFSET)
    }

    pub fn normal(n: u32) -> Self {
        Self(n & !HARDENED_OFFSET)
    }

    pub fn is_hardened(&self) -> bool {
        self.0 & HARDENED_OFFSET != 0
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Slip10Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.0 & !HARDENED_OFFSET)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct HdPath(Vec<Slip10Index>);

impl HdPath {
    pub fn new(indices: Vec<Slip10Index>) -> Self {
        Self(indices)
    }

    pub fn indices(&self) -> &[Slip10Index] {
        &self.0
    }

    /// Path for account `account` of `coin` under `recipe`.
    pub fn for_account(recipe: PathRecipe, coin: u32, account: u32) -> Self {
        use Slip10Index as I;
        let indices = match recipe {
            PathRecipe::Slip10Account => vec![I::hardened(44), I::hardened(coin), I::hardened(account)],
            PathRecipe::Bip44Address => vec![
                I::hardened(44),
                I::hardened(coin),
                I::hardened(0),
                I::normal(0),
                I::normal(account),
            ],
            PathRecipe::SimpleAddress => vec![I::hardened(coin), I::hardened(account)],
        };
        Self(indices)
    }
}

impl fmt::Display for HdPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub path: HdPath,
    pub pubkey: PubkeyBundle,
}

#[async_trait]
pub trait HdWallet: Send + Sync {
    async fn derive_identity(&self, path: &HdPath) -> Result<Identity>;
}

/// Wallet for `coin`'s curve seeded from `mnemonic`.
pub fn wallet_for(coin: &HdCoin, mnemonic: &EnglishMnemonic) -> Box<dyn HdWallet> {
    match coin.curve {
        Curve::Ed25519 => Box::new(Ed25519HdWallet::from_mnemonic(mnemonic)),
        Curve::Secp256k1 => Box::new(Secp256k1HdWallet::from_mnemonic(mnemonic)),
    }
}

/// Address of `identity` under `coin`'s codec and chain.
pub fn identity_to_address(coin: &HdCoin, identity: &Identity) -> Result<String> {
    codec_for(coin.codec, &coin.chain_id).pubkey_to_address(&identity.pubkey)
}

fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<([u8; 32], [u8; 32])> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|e| anyhow!("Invalid HMAC key: {}", e))?;
    mac.update(data);
    let out = mac.finalize().into_bytes();
    let mut left = [0u8; 32];
    let mut right = [0u8; 32];
    left.copy_from_slice(&out[..32]);
    right.copy_from_slice(&out[32..]);
    Ok((left, right))
}

/// SLIP-10 ed25519 private key for `path`.
fn slip10_ed25519_key(seed: &[u8], path: &HdPath) -> Result<[u8; 32]> {
    let (mut key, mut chain_code) = hmac_sha512(b"ed25519 seed", seed)?;
    for index in path.indices() {
        if !index.is_hardened() {
            bail!("Ed25519 only supports hardened derivation, got {} in {}", index, path);
        }
        let mut data = Vec::with_capacity(37);
        data.push(0u8);
        data.extend_from_slice(&key);
        data.extend_from_slice(&index.raw().to_be_bytes());
        (key, chain_code) = hmac_sha512(&chain_code, &data)?;
    }
    Ok(key)
}

/// BIP-32 secp256k1 private key for `path`.
fn bip32_secp256k1_key(seed: &[u8], path: &HdPath) -> Result<SecretKey> {
    let derivation_path: DerivationPath = path
        .to_string()
        .parse()
        .map_err(|e| anyhow!("Invalid derivation path {}: {}", path, e))?;
    let xprv = XPrv::derive_from_path(seed, &derivation_path)
        .map_err(|e| anyhow!("Failed to derive {}: {}", path, e))?;
    SecretKey::from_slice(&xprv.to_bytes())
        .map_err(|e| anyhow!("Invalid secp256k1 key at {}: {}", path, e))
}

// ==================== Ed25519 (SLIP-10) ====================

pub struct Ed25519HdWallet {
    seed: [u8; 64],
}

impl Ed25519HdWallet {
    pub fn from_mnemonic(mnemonic: &EnglishMnemonic) -> Self {
        Self::from_seed(mnemonic.to_seed())
    }

    pub fn from_seed(seed: [u8; 64]) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl HdWallet for Ed25519HdWallet {
    async fn derive_identity(&self, path: &HdPath) -> Result<Identity> {
        let key = slip10_ed25519_key(&self.seed, path)?;
        let pubkey = SigningKey::from_bytes(&key).verifying_key().to_bytes();
        Ok(Identity {
            path: path.clone(),
            pubkey: PubkeyBundle::ed25519(pubkey),
        })
    }
}

// ==================== Secp256k1 (BIP-32) ====================

pub struct Secp256k1HdWallet {
    seed: [u8; 64],
}

impl Secp256k1HdWallet {
    pub fn from_mnemonic(mnemonic: &EnglishMnemonic) -> Self {
        Self::from_seed(mnemonic.to_seed())
    }

    pub fn from_seed(seed: [u8; 64]) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl HdWallet for Secp256k1HdWallet {
    /// The pubkey is returned uncompressed (65 bytes).
    async fn derive_identity(&self, path: &HdPath) -> Result<Identity> {
        let key = bip32_secp256k1_key(&self.seed, path)?;
        let secp = Secp256k1::signing_only();
        let pubkey = PublicKey::from_secret_key(&secp, &key).serialize_uncompressed();
        Ok(Identity {
            path: path.clone(),
            pubkey: PubkeyBundle::secp256k1(pubkey),
        })
    }
}
