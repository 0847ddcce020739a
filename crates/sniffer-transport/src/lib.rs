//! Ledger connections for iov-sniffer.
//!
//! - [`bns`]: BNS (IOV) nodes over Tendermint JSON-RPC `abci_query`
//! - [`dpos`]: Lisk and Rise nodes over their REST APIs
//! - [`pool`]: at most one connection per endpoint URL
//!
//! All HTTP is blocking (`ureq`) and is moved off the async executor with
//! `spawn_blocking`.
//!
//! ## Usage
//!
//! ```ignore
//! let pool = ConnectionPool::new(Arc::new(HttpConnector::from_env()));
//! let connection = pool.get(&settings.iov_mainnet).await?;
//! let account = connection.get_account("iov1...").await?;
//! ```

pub mod bns;
pub mod connection;
pub mod connector;
pub mod dpos;
pub mod http;
pub mod pool;
pub mod types;

pub use connection::{Connector, LedgerConnection};
pub use connector::{HttpConnector, OfflineConnector};
pub use pool::ConnectionPool;
pub use types::{Account, Name, NameTarget};
