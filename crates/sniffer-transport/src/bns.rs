//! BNS (IOV Name Service) connection over Tendermint JSON-RPC.
//!
//! State is read with `abci_query`. Weave answers with two protobuf
//! `ResultSet`s, one holding the matched keys and one the matching values.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use prost::Message;
use serde_json::{json, Value};
use sniffer_codecs::encoding::bech32_decode;
use sniffer_codecs::weave::encode_address;
use sniffer_codecs::PubkeyBundle;
use sniffer_types::Amount;
use tracing::debug;

use crate::connection::LedgerConnection;
use crate::http::{run_blocking, HttpClient};
use crate::types::{Account, Name, NameTarget};

/// Fractional digits of weave coins.
const COIN_FRACTIONAL_DIGITS: u32 = 9;

// ==================== Protobuf messages ====================

#[derive(Clone, PartialEq, Message)]
pub struct ResultSet {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub results: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, Message)]
pub struct Coin {
    #[prost(int64, tag = "1")]
    pub whole: i64,
    #[prost(int64, tag = "2")]
    pub fractional: i64,
    #[prost(string, tag = "3")]
    pub ticker: String,
}

/// `cash.Set` (metadata at tag 1 is skipped).
#[derive(Clone, PartialEq, Message)]
pub struct CashSet {
    #[prost(message, repeated, tag = "2")]
    pub coins: Vec<Coin>,
}

#[derive(Clone, PartialEq, Message)]
pub struct PublicKey {
    #[prost(bytes = "vec", tag = "1")]
    pub ed25519: Vec<u8>,
}

/// `sigs.UserData` (metadata at tag 1 is skipped).
#[derive(Clone, PartialEq, Message)]
pub struct UserData {
    #[prost(message, optional, tag = "2")]
    pub pubkey: Option<PublicKey>,
    #[prost(int64, tag = "3")]
    pub sequence: i64,
}

#[derive(Clone, PartialEq, Message)]
pub struct BlockchainAddress {
    #[prost(string, tag = "1")]
    pub blockchain_id: String,
    #[prost(string, tag = "2")]
    pub address: String,
}

/// `username.Token` (metadata at tag 1 is skipped).
#[derive(Clone, PartialEq, Message)]
pub struct UsernameToken {
    #[prost(message, repeated, tag = "2")]
    pub targets: Vec<BlockchainAddress>,
    #[prost(bytes = "vec", tag = "3")]
    pub owner: Vec<u8>,
}

// ==================== Decoding ====================

/// Decoded `abci_query` response: parallel key and value lists.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QueryResult {
    pub keys: Vec<Vec<u8>>,
    pub values: Vec<Vec<u8>>,
}

fn decode_result_set(field: Option<&Value>) -> Result<Vec<Vec<u8>>> {
    let encoded = match field.and_then(|v| v.as_str()) {
        Some(s) if !s.is_empty() => s,
        _ => return Ok(Vec::new()),
    };
    let raw = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| anyhow!("Invalid base64 in abci_query response: {}", e))?;
    let set = ResultSet::decode(raw.as_slice()).context("Invalid ResultSet in abci_query response")?;
    Ok(set.results)
}

/// Parse the `result` object of a Tendermint `abci_query` call.
pub fn parse_abci_response(result: &Value) -> Result<QueryResult> {
    let response = result
        .get("response")
        .ok_or_else(|| anyhow!("abci_query result has no response"))?;
    let code = response.get("code").and_then(|c| c.as_u64()).unwrap_or(0);
    if code != 0 {
        let log = response.get("log").and_then(|l| l.as_str()).unwrap_or("");
        bail!("abci_query failed with code {}: {}", code, log);
    }
    let keys = decode_result_set(response.get("key"))?;
    let values = decode_result_set(response.get("value"))?;
    if keys.len() != values.len() {
        bail!(
            "abci_query returned {} keys but {} values",
            keys.len(),
            values.len()
        );
    }
    Ok(QueryResult { keys, values })
}

pub fn coin_to_amount(coin: &Coin) -> Amount {
    let scale = 10i128.pow(COIN_FRACTIONAL_DIGITS);
    let quantity = coin.whole as i128 * scale + coin.fractional as i128;
    Amount::new(quantity.to_string(), COIN_FRACTIONAL_DIGITS, coin.ticker.clone())
}

/// Usernames are stored under their plain name, sometimes bucket prefixed.
fn name_from_key(key: &[u8]) -> String {
    let key = String::from_utf8_lossy(key);
    key.strip_prefix("usernames:").unwrap_or(&key).to_string()
}

pub fn decode_name(chain_id: &str, key: &[u8], value: &[u8]) -> Result<Name> {
    let token = UsernameToken::decode(value).context("Invalid username token")?;
    Ok(Name {
        id: name_from_key(key),
        owner: encode_address(chain_id, &token.owner)?,
        targets: token
            .targets
            .into_iter()
            .map(|t| NameTarget {
                chain_id: t.blockchain_id,
                address: t.address,
            })
            .collect(),
    })
}

// ==================== Connection ====================

pub struct BnsConnection {
    client: HttpClient,
    chain_id: String,
}

impl BnsConnection {
    /// Connects and reads the chain id from the node's status.
    pub async fn establish(url: &str, agent: ureq::Agent) -> Result<Self> {
        let client = HttpClient::new(url, agent);
        let status_client = client.clone();
        let status = run_blocking(move || rpc(&status_client, "status", json!({}))).await?;
        let chain_id = status
            .pointer("/node_info/network")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow!("Status response from {} has no chain id", url))?
            .to_string();
        debug!(url = url, chain_id = %chain_id, "connected to BNS node");
        Ok(Self { client, chain_id })
    }

    async fn query(&self, path: &str, data: Vec<u8>) -> Result<QueryResult> {
        let client = self.client.clone();
        let params = json!({ "path": path, "data": hex::encode(data) });
        let result = run_blocking(move || rpc(&client, "abci_query", params)).await?;
        parse_abci_response(&result).with_context(|| format!("Query {} failed", path))
    }

    fn address_bytes(&self, address: &str) -> Result<Vec<u8>> {
        Ok(bech32_decode(address)?.data)
    }
}

fn rpc(client: &HttpClient, method: &str, params: Value) -> Result<Value> {
    let body = json!({ "jsonrpc": "2.0", "id": 1, "method": method, "params": params });
    let response = client.post_json("", &body)?;
    if let Some(error) = response.get("error") {
        let msg = error
            .get("data")
            .or_else(|| error.get("message"))
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        bail!("RPC {} failed: {}", method, msg);
    }
    response
        .get("result")
        .cloned()
        .ok_or_else(|| anyhow!("RPC {} returned no result", method))
}

#[async_trait]
impl LedgerConnection for BnsConnection {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn get_account(&self, address: &str) -> Result<Option<Account>> {
        let raw = self.address_bytes(address)?;
        let wallets = self.query("/wallets", raw.clone()).await?;
        let Some(value) = wallets.values.first() else {
            return Ok(None);
        };
        let set = CashSet::decode(value.as_slice()).context("Invalid wallet")?;

        let auth = self.query("/auth", raw).await?;
        let pubkey = match auth.values.first() {
            Some(value) => UserData::decode(value.as_slice())
                .context("Invalid user data")?
                .pubkey
                .filter(|p| !p.ed25519.is_empty())
                .map(|p| PubkeyBundle::ed25519(p.ed25519)),
            None => None,
        };

        Ok(Some(Account {
            address: address.to_string(),
            pubkey,
            balance: set.coins.iter().map(coin_to_amount).collect(),
        }))
    }

    async fn get_names_owned_by(&self, address: &str) -> Result<Vec<Name>> {
        let raw = self.address_bytes(address)?;
        let result = self.query("/usernames/owner", raw).await?;
        result
            .keys
            .iter()
            .zip(&result.values)
            .map(|(key, value)| decode_name(&self.chain_id, key, value))
            .collect()
    }

    async fn get_name(&self, name: &str) -> Result<Option<Name>> {
        let result = self.query("/usernames", name.as_bytes().to_vec()).await?;
        match (result.keys.first(), result.values.first()) {
            (Some(key), Some(value)) => Ok(Some(decode_name(&self.chain_id, key, value)?)),
            _ => Ok(None),
        }
    }
}

/// Construct behind the trait object the pool stores.
pub async fn connect(url: &str, agent: ureq::Agent) -> Result<Arc<dyn LedgerConnection>> {
    Ok(Arc::new(BnsConnection::establish(url, agent).await?))
}
