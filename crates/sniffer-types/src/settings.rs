//! Network and HD-coin configuration tables.
//!
//! Settings are built once at startup (built-in defaults, optionally a JSON
//! file, then environment overrides) and are read-only afterwards.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::env_utils::{env_bool, env_var};

/// Chain id used to derive `iov` prefixed addresses.
pub const IOV_MAINNET_CHAIN_ID: &str = "iov-mainnet";
/// Any non-mainnet chain id yields `tiov` addresses.
pub const IOV_TESTNET_CHAIN_ID: &str = "iov-lovenet";

pub const DEVNET_URL: &str = "http://localhost:23456/";

/// Upper bound for `hd_account_count`, from a file or the environment.
pub const MAX_HD_ACCOUNTS: u32 = 100;

/// Which ledger protocol a network speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerKind {
    Bns,
    Lisk,
    Rise,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub name: String,
    pub url: String,
    pub kind: LedgerKind,
    /// Whether the ledger can list usernames owned by an account.
    #[serde(default)]
    pub names_supported: bool,
}

impl NetworkSettings {
    pub fn new(name: &str, url: &str, kind: LedgerKind) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind,
            names_supported: false,
        }
    }

    pub fn with_names(mut self) -> Self {
        self.names_supported = true;
        self
    }

    /// Lowercase name with whitespace runs collapsed to dashes. Display ids
    /// embed it, so it must be unique within a network table.
    pub fn slug(&self) -> String {
        self.name
            .split_whitespace()
            .map(|part| part.to_lowercase())
            .collect::<Vec<_>>()
            .join("-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Curve {
    Ed25519,
    Secp256k1,
}

impl Curve {
    pub fn as_str(&self) -> &'static str {
        match self {
            Curve::Ed25519 => "ed25519",
            Curve::Secp256k1 => "secp256k1",
        }
    }
}

/// How account index `a` maps to a derivation path for coin `c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathRecipe {
    /// `m/44'/c'/a'`
    Slip10Account,
    /// `m/44'/c'/0'/0/a`
    Bip44Address,
    /// `m/c'/a'`
    SimpleAddress,
}

/// Address codec used to turn a derived public key into an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    Bns,
    Lisk,
    Rise,
    Ethereum,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HdCoin {
    pub name: String,
    /// SLIP-44 coin number (or the first path component for simple addresses).
    pub number: u32,
    pub chain_id: String,
    pub curve: Curve,
    pub path: PathRecipe,
    pub codec: CodecKind,
    #[serde(default)]
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub iov_mainnet: NetworkSettings,
    pub iov_testnets: Vec<NetworkSettings>,
    pub lisk_networks: Vec<NetworkSettings>,
    pub rise_networks: Vec<NetworkSettings>,
    pub hd_coins: Vec<HdCoin>,
    /// Accounts derived per HD coin.
    pub hd_account_count: u32,
    /// Delay before an interactive display starts fetching.
    pub resolve_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            iov_mainnet: NetworkSettings::new(
                "Mainnet",
                "https://rpc-private-a-vip-mainnet.iov.one",
                LedgerKind::Bns,
            )
            .with_names(),
            iov_testnets: vec![NetworkSettings::new(
                "Exchangenet",
                "https://rpc-private-a-x-exchangenet.iov.one/",
                LedgerKind::Bns,
            )
            .with_names()],
            lisk_networks: vec![
                NetworkSettings::new("Lisk Testnet", "https://testnet.lisk.io", LedgerKind::Lisk),
                NetworkSettings::new("Lisk Mainnet", "https://hub32.lisk.io", LedgerKind::Lisk),
            ],
            rise_networks: vec![
                NetworkSettings::new("Rise Testnet", "https://twallet.rise.vision", LedgerKind::Rise),
                NetworkSettings::new("Rise Mainnet", "https://wallet.rise.vision", LedgerKind::Rise),
            ],
            hd_coins: vec![
                HdCoin {
                    name: "IOV".to_string(),
                    number: 234,
                    chain_id: "some-testnet".to_string(),
                    curve: Curve::Ed25519,
                    path: PathRecipe::Slip10Account,
                    codec: CodecKind::Bns,
                    deprecated: false,
                },
                HdCoin {
                    name: "Lisk".to_string(),
                    number: 134,
                    chain_id: "ed14889723f24ecc54871d058d98ce91ff2f973192075c0155ba2b7b70ad2511"
                        .to_string(),
                    curve: Curve::Ed25519,
                    path: PathRecipe::Slip10Account,
                    codec: CodecKind::Lisk,
                    deprecated: false,
                },
                HdCoin {
                    name: "Ethereum".to_string(),
                    number: 60,
                    chain_id: "ethereum-eip155-0".to_string(),
                    curve: Curve::Secp256k1,
                    path: PathRecipe::Bip44Address,
                    codec: CodecKind::Ethereum,
                    deprecated: false,
                },
                HdCoin {
                    name: "Simple Address".to_string(),
                    number: 4804438,
                    chain_id: IOV_TESTNET_CHAIN_ID.to_string(),
                    curve: Curve::Ed25519,
                    path: PathRecipe::SimpleAddress,
                    codec: CodecKind::Bns,
                    deprecated: true,
                },
            ],
            hd_account_count: 5,
            resolve_delay_ms: 500,
        }
    }
}

impl Settings {
    /// Built-in tables with environment overrides applied.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env();
        settings
    }

    /// Read a JSON settings file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        let mut settings: Settings = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse settings file {}", path.display()))?;
        settings.hd_account_count = settings.hd_account_count.min(MAX_HD_ACCOUNTS);
        settings
            .validate()
            .with_context(|| format!("Invalid settings file {}", path.display()))?;
        Ok(settings)
    }

    /// Rejects tables that would give two displays of one input the same id:
    /// networks sharing a slug within a table (IOV mainnet and testnets form
    /// one table), or HD coins sharing a wallet tag.
    pub fn validate(&self) -> Result<()> {
        let iov: Vec<_> = std::iter::once(&self.iov_mainnet)
            .chain(self.iov_testnets.iter())
            .collect();
        unique_slugs("IOV", &iov)?;
        unique_slugs("Lisk", &self.lisk_networks.iter().collect::<Vec<_>>())?;
        unique_slugs("Rise", &self.rise_networks.iter().collect::<Vec<_>>())?;

        let mut seen = HashSet::new();
        for coin in &self.hd_coins {
            let key = match coin.path {
                PathRecipe::SimpleAddress => None,
                _ => Some((coin.curve, coin.number)),
            };
            if !seen.insert(key) {
                bail!(
                    "HD coin {} duplicates the curve and coin number of another coin",
                    coin.name
                );
            }
        }
        Ok(())
    }

    /// Apply `SNIFFER_*` environment overrides.
    ///
    /// - `SNIFFER_DEVNET`: add the local devnet to the IOV testnets
    /// - `SNIFFER_RESOLVE_DELAY_MS`: start delay for interactive displays
    /// - `SNIFFER_HD_ACCOUNTS`: accounts derived per HD coin, at most
    ///   [`MAX_HD_ACCOUNTS`]
    pub fn apply_env(&mut self) {
        if env_bool("SNIFFER_DEVNET") && !self.iov_testnets.iter().any(|n| n.url == DEVNET_URL) {
            self.iov_testnets
                .push(NetworkSettings::new("Devnet", DEVNET_URL, LedgerKind::Bns).with_names());
        }
        if let Some(delay) = env_var("SNIFFER_RESOLVE_DELAY_MS") {
            self.resolve_delay_ms = delay;
        }
        if let Some(count) = env_var::<u32>("SNIFFER_HD_ACCOUNTS") {
            self.hd_account_count = count.min(MAX_HD_ACCOUNTS);
        }
    }

    /// Every network the tool may connect to.
    pub fn all_networks(&self) -> impl Iterator<Item = &NetworkSettings> {
        std::iter::once(&self.iov_mainnet)
            .chain(self.iov_testnets.iter())
            .chain(self.lisk_networks.iter())
            .chain(self.rise_networks.iter())
    }
}

fn unique_slugs(table: &str, networks: &[&NetworkSettings]) -> Result<()> {
    let mut seen = HashSet::new();
    for network in networks {
        if !seen.insert(network.slug()) {
            bail!(
                "Duplicate {} network name {:?} ({})",
                table,
                network.name,
                network.url
            );
        }
    }
    Ok(())
}
