//! Setup helpers shared by the orchestration tests.

use std::sync::Arc;
use std::time::Duration;

use iov_sniffer::{DispatchContext, Orchestrator};
use sniffer_codecs::encoding::bech32_encode;
use sniffer_transport::OfflineConnector;
use sniffer_types::{DisplayUpdate, LedgerKind, NetworkSettings, Settings};
use tokio::sync::mpsc::UnboundedReceiver;

use super::mocks::MockConnector;

pub const ABANDON: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

pub const TWENTY_BYTES_HEX: &str = "0011223344556677889900112233445566778899";

/// Built-in tables with two BNS testnets and no start delay.
pub fn test_settings() -> Settings {
    Settings {
        iov_testnets: vec![
            NetworkSettings::new("Exchangenet", "http://exchangenet.test", LedgerKind::Bns)
                .with_names(),
            NetworkSettings::new("Devnet", "http://devnet.test", LedgerKind::Bns).with_names(),
        ],
        hd_account_count: 5,
        resolve_delay_ms: 0,
        ..Settings::default()
    }
}

pub fn testnet_address(byte: u8) -> String {
    bech32_encode("tiov", &[byte; 20]).unwrap()
}

pub fn offline_orchestrator() -> (Orchestrator, UnboundedReceiver<DisplayUpdate>) {
    let context = DispatchContext::new(Arc::new(test_settings()), Arc::new(OfflineConnector));
    Orchestrator::new(context)
}

pub fn mock_orchestrator(
    connector: MockConnector,
    settings: Settings,
) -> (Orchestrator, UnboundedReceiver<DisplayUpdate>) {
    let context = DispatchContext::new(Arc::new(settings), Arc::new(connector));
    Orchestrator::new(context)
}

/// Receives `count` updates, failing the test if they take longer than
/// `timeout` in total.
pub async fn collect_updates(
    updates: &mut UnboundedReceiver<DisplayUpdate>,
    count: usize,
    timeout: Duration,
) -> Vec<DisplayUpdate> {
    let mut out = Vec::with_capacity(count);
    let deadline = tokio::time::Instant::now() + timeout;
    while out.len() < count {
        match tokio::time::timeout_at(deadline, updates.recv()).await {
            Ok(Some(update)) => out.push(update),
            Ok(None) => panic!("update channel closed after {} updates", out.len()),
            Err(_) => panic!("timed out after {} of {} updates", out.len(), count),
        }
    }
    out
}
