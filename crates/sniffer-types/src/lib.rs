//! Shared types for the iov-sniffer workspace.
//!
//! This crate provides the vocabulary used by the classifier, the codec
//! adapters, the ledger transport and the orchestrator, so none of them has
//! to depend on another just to share a type.
//!
//! - [`property`]: the closed set of facts the classifier can observe
//! - [`display`]: static and interactive displays plus their renderable data
//! - [`priorities`]: the sort scale used to order displays
//! - [`settings`]: network and HD-coin configuration tables
//! - [`amount`]: token amounts and their human-readable form
//! - [`env_utils`]: environment variable parsing helpers

pub mod amount;
pub mod display;
pub mod env_utils;
pub mod priorities;
pub mod property;
pub mod settings;

pub use amount::{print_amount, Amount};
pub use display::{
    ellide_middle, Display, DisplayData, DisplayMeta, DisplayUpdate, Field, InteractiveDisplay,
    Lookup, StaticDisplay,
};
pub use env_utils::{env_bool, env_var, env_var_or};
pub use priorities::Priority;
pub use property::{Property, PropertySet};
pub use settings::{
    CodecKind, Curve, HdCoin, LedgerKind, NetworkSettings, PathRecipe, Settings, MAX_HD_ACCOUNTS,
};
