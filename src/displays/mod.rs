//! Display factories, one per interpretation.
//!
//! Static factories are pure and fail only on inputs their property should
//! have excluded. Interactive factories capture what their lookup needs and
//! do no I/O until the orchestrator resolves them.

pub mod accounts;
pub mod encoding;
pub mod ethereum;
pub mod keys;
pub mod mnemonic;
pub mod weave;

pub use accounts::{bns_account, dpos_account, username};
pub use encoding::{bech32_summary, hex_summary, weave_address};
pub use ethereum::ethereum_address;
pub use keys::{ed25519_privkey, ed25519_pubkey, lisk_like_passphrase, secp256k1_pubkey};
pub use mnemonic::{bip39_summary, hd_wallet};
pub use weave::{weave_condition, weave_ids};

/// Id of a display: the input it interprets plus an interpretation tag.
pub(crate) fn display_id(input: &str, tag: &str) -> String {
    format!("{}#{}", input, tag)
}
