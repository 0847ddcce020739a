//! Blocking JSON-over-HTTP client shared by the ledger connections.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use sniffer_types::env_var_or;

/// Default request timeout in seconds (can be overridden by env).
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout in seconds (can be overridden by env).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub fn default_timeouts() -> (Duration, Duration) {
    let timeout_secs = env_var_or("SNIFFER_HTTP_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS);
    let connect_secs = env_var_or(
        "SNIFFER_HTTP_CONNECT_TIMEOUT_SECS",
        DEFAULT_CONNECT_TIMEOUT_SECS,
    );
    (
        Duration::from_secs(timeout_secs),
        Duration::from_secs(connect_secs),
    )
}

pub fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
    ureq::AgentBuilder::new()
        .timeout(timeout)
        .timeout_connect(connect_timeout)
        .build()
}

#[derive(Clone)]
pub struct HttpClient {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpClient {
    pub fn new(base_url: &str, agent: ureq::Agent) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url(path);
        self.agent
            .get(&url)
            .call()
            .map_err(|e| anyhow!("GET {} failed: {}", url, e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse response from {}: {}", url, e))
    }

    pub fn post_json(&self, path: &str, body: &Value) -> Result<Value> {
        let url = self.url(path);
        self.agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| anyhow!("POST {} failed: {}", url, e))?
            .into_json()
            .map_err(|e| anyhow!("Failed to parse response from {}: {}", url, e))
    }
}

/// Run blocking HTTP work without stalling the async executor.
pub async fn run_blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .context("Blocking HTTP task failed")?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let (timeout, connect) = default_timeouts();
        let client = HttpClient::new("https://testnet.lisk.io/", build_agent(timeout, connect));
        assert_eq!(client.base_url(), "https://testnet.lisk.io");
        assert_eq!(
            client.url("/api/node/constants"),
            "https://testnet.lisk.io/api/node/constants"
        );
    }

    #[tokio::test]
    async fn test_run_blocking_propagates_errors() {
        let ok = run_blocking(|| Ok(7)).await.unwrap();
        assert_eq!(ok, 7);
        let err = run_blocking(|| -> Result<()> { Err(anyhow!("boom")) })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
