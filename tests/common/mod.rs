#![allow(unused_imports)]
#![allow(dead_code)]
//! Shared test utilities for integration tests.
//!
//! # Modules
//!
//! - `mocks`: an in-memory ledger connector with call counters and a gate
//! - `setup`: settings, orchestrators and update collection helpers

pub mod mocks;
pub mod setup;

pub use mocks::{MockConnector, MockState};
pub use setup::{
    collect_updates, mock_orchestrator, offline_orchestrator, test_settings, testnet_address,
    ABANDON, TWENTY_BYTES_HEX,
};
