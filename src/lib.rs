//! IOV sniffer
//!
//! Interprets an arbitrary pasted string (hex data, Bech32 addresses, BIP-39
//! mnemonics, chain addresses, keys, numeric ids, weave conditions) in every
//! way it can be read:
//!
//! - **Classification**: [`classifier::classify`] collects the properties the
//!   input satisfies
//! - **Dispatch**: [`dispatch::dispatch`] maps properties to displays, fanning
//!   out over configured networks and HD coins
//! - **Displays**: [`displays`] holds one factory per interpretation, either
//!   static or backed by a ledger lookup
//! - **Orchestration**: [`orchestrator::Orchestrator`] publishes the sorted
//!   list and streams resolved lookups, discarding results of stale inputs
//!
//! Shared types live in `sniffer-types`, codecs in `sniffer-codecs` and
//! ledger connections in `sniffer-transport`.

#![allow(clippy::type_complexity)]

pub mod classifier;
pub mod dispatch;
pub mod displays;
pub mod orchestrator;

pub use classifier::classify;
pub use dispatch::{dispatch, sort_displays, DispatchContext};
pub use orchestrator::Orchestrator;
