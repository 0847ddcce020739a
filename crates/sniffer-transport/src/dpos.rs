//! Lisk and Rise connections over their REST APIs.
//!
//! Both chains count balances in 10^-8 units. They differ in response
//! shape: Lisk wraps results in a `data` array, Rise returns a single
//! `account` object with a `success` flag.

use std::sync::Arc;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use sniffer_codecs::PubkeyBundle;
use sniffer_types::{Amount, LedgerKind};
use tracing::debug;

use crate::connection::LedgerConnection;
use crate::http::{run_blocking, HttpClient};
use crate::types::Account;

const FRACTIONAL_DIGITS: u32 = 8;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestAccount {
    address: String,
    balance: String,
    #[serde(default)]
    public_key: Option<String>,
}

impl RestAccount {
    fn into_account(self, ticker: &str) -> Result<Account> {
        let pubkey = match self.public_key.as_deref() {
            None | Some("") => None,
            Some(hex_key) => Some(PubkeyBundle::ed25519(
                hex::decode(hex_key).map_err(|e| anyhow!("Invalid public key '{}': {}", hex_key, e))?,
            )),
        };
        Ok(Account {
            address: self.address,
            pubkey,
            balance: vec![Amount::new(self.balance, FRACTIONAL_DIGITS, ticker)],
        })
    }
}

/// Parse a Lisk `/api/accounts` response. No entries means not found.
pub fn parse_lisk_accounts(response: &Value) -> Result<Option<Account>> {
    let data = response
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| anyhow!("Lisk accounts response has no data array"))?;
    match data.first() {
        Some(entry) => {
            let account: RestAccount = serde_json::from_value(entry.clone())?;
            Ok(Some(account.into_account("LSK")?))
        }
        None => Ok(None),
    }
}

/// Parse a Rise `/api/accounts` response.
pub fn parse_rise_account(response: &Value) -> Result<Option<Account>> {
    let success = response
        .get("success")
        .and_then(|s| s.as_bool())
        .unwrap_or(false);
    if !success {
        let error = response
            .get("error")
            .and_then(|e| e.as_str())
            .unwrap_or("unknown error");
        if error.to_lowercase().contains("not found") {
            return Ok(None);
        }
        bail!("Rise accounts request failed: {}", error);
    }
    let entry = response
        .get("account")
        .ok_or_else(|| anyhow!("Rise accounts response has no account"))?;
    let account: RestAccount = serde_json::from_value(entry.clone())?;
    Ok(Some(account.into_account("RISE")?))
}

pub struct DposConnection {
    client: HttpClient,
    kind: LedgerKind,
    chain_id: String,
}

impl DposConnection {
    /// Connects and reads the network hash, which serves as chain id.
    pub async fn establish(url: &str, kind: LedgerKind, agent: ureq::Agent) -> Result<Self> {
        let client = HttpClient::new(url, agent);
        let nethash_client = client.clone();
        let chain_id = run_blocking(move || match kind {
            LedgerKind::Lisk => {
                let constants = nethash_client.get_json("/api/node/constants")?;
                constants
                    .pointer("/data/nethash")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .ok_or_else(|| anyhow!("Node constants have no nethash"))
            }
            LedgerKind::Rise => {
                let response = nethash_client.get_json("/api/blocks/getNethash")?;
                response
                    .get("nethash")
                    .and_then(|v| v.as_str())
                    .map(String::from)
                    .ok_or_else(|| anyhow!("getNethash response has no nethash"))
            }
            LedgerKind::Bns => bail!("Not a DPoS ledger"),
        })
        .await?;
        debug!(url = url, chain_id = %chain_id, "connected to DPoS node");
        Ok(Self {
            client,
            kind,
            chain_id: format!(
                "{}-{}",
                chain_prefix(kind),
                chain_id.chars().take(10).collect::<String>()
            ),
        })
    }
}

fn chain_prefix(kind: LedgerKind) -> &'static str {
    match kind {
        LedgerKind::Rise => "rise",
        _ => "lisk",
    }
}

#[async_trait]
impl LedgerConnection for DposConnection {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn get_account(&self, address: &str) -> Result<Option<Account>> {
        let client = self.client.clone();
        let path = format!("/api/accounts?address={}", address);
        let response = run_blocking(move || client.get_json(&path)).await?;
        match self.kind {
            LedgerKind::Rise => parse_rise_account(&response),
            _ => parse_lisk_accounts(&response),
        }
    }
}

pub async fn connect(
    url: &str,
    kind: LedgerKind,
    agent: ureq::Agent,
) -> Result<Arc<dyn LedgerConnection>> {
    Ok(Arc::new(DposConnection::establish(url, kind, agent).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_lisk_account() {
        let response = json!({
            "meta": { "offset": 0, "limit": 10 },
            "data": [{
                "address": "16313739661670634666L",
                "publicKey": "c094ebee7ec0c50ebee32918655e089f6e1a604b83bcaa760293c61e0f18ab6f",
                "balance": "150000000",
                "unconfirmedBalance": "150000000"
            }]
        });
        let account = parse_lisk_accounts(&response).unwrap().unwrap();
        assert_eq!(account.address, "16313739661670634666L");
        assert_eq!(account.pubkey.unwrap().data.len(), 32);
        assert_eq!(account.balance, vec![Amount::new("150000000", 8, "LSK")]);
    }

    #[test]
    fn test_parse_lisk_missing_account() {
        let response = json!({ "data": [] });
        assert_eq!(parse_lisk_accounts(&response).unwrap(), None);
        assert!(parse_lisk_accounts(&json!({ "message": "bad" })).is_err());
    }

    #[test]
    fn test_parse_lisk_account_without_pubkey() {
        let response = json!({ "data": [{ "address": "1L", "balance": "0", "publicKey": "" }] });
        let account = parse_lisk_accounts(&response).unwrap().unwrap();
        assert!(account.pubkey.is_none());
    }

    #[test]
    fn test_parse_rise_account() {
        let found = json!({
            "success": true,
            "account": { "address": "123R", "balance": "100000000", "publicKey": null }
        });
        let account = parse_rise_account(&found).unwrap().unwrap();
        assert_eq!(account.balance[0].token_ticker, "RISE");
        assert!(account.pubkey.is_none());

        let missing = json!({ "success": false, "error": "Account not found" });
        assert_eq!(parse_rise_account(&missing).unwrap(), None);

        let broken = json!({ "success": false, "error": "Invalid address" });
        assert!(parse_rise_account(&broken).is_err());
    }
}
