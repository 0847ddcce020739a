use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use sniffer_types::{LedgerKind, NetworkSettings};
use tracing::info;

use crate::connection::{Connector, LedgerConnection};
use crate::http::{build_agent, default_timeouts};
use crate::{bns, dpos};

/// Connects to real nodes over HTTP.
#[derive(Clone)]
pub struct HttpConnector {
    agent: ureq::Agent,
}

impl HttpConnector {
    pub fn new(timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout, connect_timeout),
        }
    }

    /// Timeouts from `SNIFFER_HTTP_TIMEOUT_SECS` and
    /// `SNIFFER_HTTP_CONNECT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let (timeout, connect_timeout) = default_timeouts();
        Self::new(timeout, connect_timeout)
    }
}

#[async_trait]
impl Connector for HttpConnector {
    async fn establish(&self, network: &NetworkSettings) -> Result<Arc<dyn LedgerConnection>> {
        info!(name = %network.name, url = %network.url, "connecting");
        match network.kind {
            LedgerKind::Bns => bns::connect(&network.url, self.agent.clone()).await,
            kind @ (LedgerKind::Lisk | LedgerKind::Rise) => {
                dpos::connect(&network.url, kind, self.agent.clone()).await
            }
        }
    }
}

/// Refuses every connection. Lookups render as errors.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineConnector;

#[async_trait]
impl Connector for OfflineConnector {
    async fn establish(&self, network: &NetworkSettings) -> Result<Arc<dyn LedgerConnection>> {
        bail!("Offline mode, not connecting to {}", network.name)
    }
}
