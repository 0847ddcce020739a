//! Display ordering scale.
//!
//! Priorities form a dense, loosely ranked scale (observed range 0..=20).
//! Lower values sort first. They are compared only for ordering; never
//! branch on a priority being equal to some value.

pub type Priority = u8;

pub const ED25519_PUBKEY: Priority = 7;
pub const ED25519_PRIVKEY: Priority = 7;
pub const SECP256K1_PUBKEY: Priority = 7;
pub const LISK_LIKE_PASSPHRASE: Priority = 7;
pub const HD_ADDRESSES: Priority = 8;
pub const BNS_ACCOUNT: Priority = 9;
pub const LISK_ACCOUNT: Priority = 10;
pub const RISE_ACCOUNT: Priority = 10;
pub const BECH32: Priority = 10;
pub const WEAVE_ADDRESS: Priority = 10;
pub const WEAVE_CONDITION: Priority = 10;
pub const ETHEREUM_ADDRESS: Priority = 10;
pub const BIP39_MNEMONIC: Priority = 11;
pub const WEAVE_ESCROW_ID: Priority = 12;
pub const WEAVE_GOVERNANCE_RULE_ID: Priority = 12;
pub const WEAVE_MULTISIG_ID: Priority = 12;
pub const BNS_USERNAME: Priority = 15;
pub const HEX: Priority = 20;
