use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use sniffer_types::NetworkSettings;

use crate::types::{Account, Name};

/// An established connection to one ledger node.
///
/// "Not found" is `Ok(None)` or an empty list. `Err` means the query itself
/// failed (transport error, malformed response).
#[async_trait]
pub trait LedgerConnection: Send + Sync {
    fn chain_id(&self) -> &str;

    async fn get_account(&self, address: &str) -> Result<Option<Account>>;

    async fn get_names_owned_by(&self, address: &str) -> Result<Vec<Name>> {
        let _ = address;
        bail!("Chain {} does not support names", self.chain_id())
    }

    async fn get_name(&self, name: &str) -> Result<Option<Name>> {
        let _ = name;
        bail!("Chain {} does not support names", self.chain_id())
    }
}

/// Creates connections. The pool calls this at most once per endpoint URL.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn establish(&self, network: &NetworkSettings) -> Result<Arc<dyn LedgerConnection>>;
}
