//! In-memory ledger for orchestration tests.
//!
//! Every connection shares one [`MockState`], so a test can count
//! establishments and queries, and wait until a lookup has started. An
//! optional semaphore holds queries open until the test releases them.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use sniffer_transport::{Account, Connector, LedgerConnection, Name};
use sniffer_types::NetworkSettings;
use tokio::sync::{Notify, Semaphore};

#[derive(Default)]
pub struct MockState {
    pub establishes: AtomicUsize,
    pub queries: AtomicUsize,
    /// Signalled whenever a query starts.
    pub started: Notify,
}

impl MockState {
    pub fn establishes(&self) -> usize {
        self.establishes.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Default)]
pub struct MockConnector {
    pub state: Arc<MockState>,
    gate: Option<Arc<Semaphore>>,
    failing: HashSet<String>,
    accounts: HashMap<String, Account>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, account: Account) -> Self {
        self.accounts.insert(account.address.clone(), account);
        self
    }

    /// Establishing a connection to `url` fails.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Queries wait for a permit from `gate`.
    pub fn gated(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn establish(&self, network: &NetworkSettings) -> Result<Arc<dyn LedgerConnection>> {
        self.state.establishes.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&network.url) {
            bail!("simulated network failure");
        }
        Ok(Arc::new(MockConnection {
            chain_id: format!("mock-{}", network.name.to_lowercase()),
            state: Arc::clone(&self.state),
            gate: self.gate.clone(),
            accounts: self.accounts.clone(),
        }))
    }
}

struct MockConnection {
    chain_id: String,
    state: Arc<MockState>,
    gate: Option<Arc<Semaphore>>,
    accounts: HashMap<String, Account>,
}

impl MockConnection {
    async fn enter(&self) -> Result<()> {
        self.state.queries.fetch_add(1, Ordering::SeqCst);
        self.state.started.notify_one();
        if let Some(gate) = &self.gate {
            gate.acquire().await?.forget();
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerConnection for MockConnection {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn get_account(&self, address: &str) -> Result<Option<Account>> {
        self.enter().await?;
        Ok(self.accounts.get(address).cloned())
    }

    async fn get_names_owned_by(&self, _address: &str) -> Result<Vec<Name>> {
        Ok(Vec::new())
    }

    async fn get_name(&self, _name: &str) -> Result<Option<Name>> {
        self.enter().await?;
        Ok(None)
    }
}
