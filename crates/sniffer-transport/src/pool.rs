//! Per-endpoint connection cache.
//!
//! The pending establishment is stored as a shared future the moment it is
//! first requested, so concurrent callers for the same URL all await the
//! same attempt. Entries live as long as the pool and are never replaced,
//! failed attempts included.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use sniffer_types::NetworkSettings;
use tracing::debug;

use crate::connection::{Connector, LedgerConnection};

type PendingConnection =
    Shared<BoxFuture<'static, Result<Arc<dyn LedgerConnection>, Arc<anyhow::Error>>>>;

pub struct ConnectionPool {
    connector: Arc<dyn Connector>,
    connections: Mutex<HashMap<String, PendingConnection>>,
}

impl ConnectionPool {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// Connection for `network`, establishing it on first use.
    pub async fn get(&self, network: &NetworkSettings) -> Result<Arc<dyn LedgerConnection>> {
        // check-and-insert under one lock, no await inside
        let pending = {
            let mut connections = self.connections.lock();
            connections
                .entry(network.url.clone())
                .or_insert_with(|| {
                    debug!(url = %network.url, name = %network.name, "establishing connection");
                    let connector = self.connector.clone();
                    let network = network.clone();
                    async move { connector.establish(&network).await.map_err(Arc::new) }
                        .boxed()
                        .shared()
                })
                .clone()
        };

        pending
            .await
            .map_err(|e| anyhow!("Failed to connect to {}: {:#}", network.url, e))
    }

    /// Number of endpoints requested so far.
    pub fn len(&self) -> usize {
        self.connections.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.lock().is_empty()
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool")
            .field("endpoints", &self.len())
            .finish()
    }
}
