use serde::{Deserialize, Serialize};
use sniffer_codecs::PubkeyBundle;
use sniffer_types::Amount;

/// An account as reported by a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
    /// Unknown until the account has signed something.
    pub pubkey: Option<PubkeyBundle>,
    pub balance: Vec<Amount>,
}

/// A registered username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub id: String,
    pub owner: String,
    pub targets: Vec<NameTarget>,
}

/// Address a username resolves to on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameTarget {
    pub chain_id: String,
    pub address: String,
}
