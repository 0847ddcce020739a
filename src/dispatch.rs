//! The dispatch table: which displays each property produces.
//!
//! Rules fire in table order and their displays accumulate. Ordering by
//! priority happens afterwards, so the table order only breaks ties.

use std::sync::Arc;

use anyhow::Result;
use futures::future::{BoxFuture, FutureExt};
use sniffer_transport::{ConnectionPool, Connector};
use sniffer_types::{Display, Property, PropertySet, Settings};
use tracing::debug;

use crate::displays;

/// What handlers need besides the input: configuration and the shared
/// connection pool.
#[derive(Debug)]
pub struct DispatchContext {
    pub settings: Arc<Settings>,
    pub connections: Arc<ConnectionPool>,
}

impl DispatchContext {
    pub fn new(settings: Arc<Settings>, connector: Arc<dyn Connector>) -> Self {
        Self {
            settings,
            connections: Arc::new(ConnectionPool::new(connector)),
        }
    }
}

type SyncHandler = fn(&str, &DispatchContext, &mut Vec<Display>) -> Result<()>;
type AsyncHandler =
    for<'a> fn(&'a str, &'a DispatchContext, &'a mut Vec<Display>) -> BoxFuture<'a, Result<()>>;

#[derive(Clone, Copy)]
pub enum Handler {
    Sync(SyncHandler),
    /// For displays whose construction itself awaits.
    Async(AsyncHandler),
}

#[derive(Clone, Copy)]
pub struct Rule {
    pub property: Property,
    pub handler: Handler,
}

const fn sync(property: Property, handler: SyncHandler) -> Rule {
    Rule {
        property,
        handler: Handler::Sync(handler),
    }
}

const fn deferred(property: Property, handler: AsyncHandler) -> Rule {
    Rule {
        property,
        handler: Handler::Async(handler),
    }
}

pub static RULES: &[Rule] = &[
    sync(Property::IovAddressTestnet, iov_testnet_accounts),
    sync(Property::IovAddressMainnet, iov_mainnet_account),
    sync(Property::BnsUsername, usernames),
    sync(Property::EnglishMnemonic, bip39_mnemonic),
    sync(Property::EnglishMnemonic, hd_wallets),
    deferred(Property::EnglishMnemonic12Words, lisk_like_passphrase),
    sync(Property::Bech32, bech32),
    sync(Property::ByteLength20, weave_address),
    sync(Property::ByteLength32, ed25519_pubkey),
    sync(Property::ByteLength64, ed25519_privkey),
    sync(Property::ByteLength65, secp256k1_pubkey),
    sync(Property::Hex, hex_data),
    sync(Property::LiskAddress, lisk_accounts),
    sync(Property::RiseAddress, rise_accounts),
    sync(Property::EthereumAddress, ethereum_address),
    sync(Property::WeaveCondition, weave_condition),
    sync(Property::NonZeroUint64, weave_ids),
];

/// Runs every rule whose property is in `properties`. Any handler error
/// aborts the whole dispatch.
pub async fn dispatch(
    input: &str,
    properties: &PropertySet,
    context: &DispatchContext,
) -> Result<Vec<Display>> {
    let mut out = Vec::new();
    for rule in RULES.iter().filter(|r| properties.has(r.property)) {
        let before = out.len();
        match rule.handler {
            Handler::Sync(handler) => handler(input, context, &mut out)?,
            Handler::Async(handler) => handler(input, context, &mut out).await?,
        }
        debug!(property = %rule.property, added = out.len() - before, "rule fired");
    }
    Ok(out)
}

/// Stable sort by priority; equal priorities keep dispatch order.
pub fn sort_displays(displays: &mut [Display]) {
    displays.sort_by_key(|d| d.priority());
}

// =============================================================================
// Handlers
// =============================================================================

fn iov_testnet_accounts(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    for network in &ctx.settings.iov_testnets {
        out.push(displays::bns_account(input, network, &ctx.connections));
    }
    Ok(())
}

fn iov_mainnet_account(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::bns_account(input, &ctx.settings.iov_mainnet, &ctx.connections));
    Ok(())
}

fn usernames(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    let networks = std::iter::once(&ctx.settings.iov_mainnet).chain(&ctx.settings.iov_testnets);
    for network in networks {
        out.push(displays::username(input, network, &ctx.connections));
    }
    Ok(())
}

fn bip39_mnemonic(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::bip39_summary(input)?);
    Ok(())
}

fn hd_wallets(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    for coin in &ctx.settings.hd_coins {
        out.push(displays::hd_wallet(input, coin, ctx.settings.hd_account_count)?);
    }
    Ok(())
}

fn lisk_like_passphrase<'a>(
    input: &'a str,
    _: &'a DispatchContext,
    out: &'a mut Vec<Display>,
) -> BoxFuture<'a, Result<()>> {
    async move {
        out.push(displays::lisk_like_passphrase(input).await?);
        Ok(())
    }
    .boxed()
}

fn bech32(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::bech32_summary(input)?);
    Ok(())
}

fn weave_address(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::weave_address(input)?);
    Ok(())
}

fn ed25519_pubkey(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::ed25519_pubkey(input)?);
    Ok(())
}

fn ed25519_privkey(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::ed25519_privkey(input)?);
    Ok(())
}

fn secp256k1_pubkey(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    // only the uncompressed form is 65 bytes
    if input.starts_with("04") {
        out.push(displays::secp256k1_pubkey(input)?);
    }
    Ok(())
}

fn hex_data(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::hex_summary(input)?);
    Ok(())
}

fn lisk_accounts(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    for network in &ctx.settings.lisk_networks {
        out.push(displays::dpos_account(input, network, &ctx.connections));
    }
    Ok(())
}

fn rise_accounts(input: &str, ctx: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    for network in &ctx.settings.rise_networks {
        out.push(displays::dpos_account(input, network, &ctx.connections));
    }
    Ok(())
}

fn ethereum_address(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::ethereum_address(input)?);
    Ok(())
}

fn weave_condition(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.push(displays::weave_condition(input)?);
    Ok(())
}

fn weave_ids(input: &str, _: &DispatchContext, out: &mut Vec<Display>) -> Result<()> {
    out.extend(displays::weave_ids(input)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use sniffer_transport::OfflineConnector;

    fn context() -> DispatchContext {
        DispatchContext::new(Arc::new(Settings::default()), Arc::new(OfflineConnector))
    }

    #[test]
    fn test_every_property_has_a_rule() {
        for property in [
            Property::Hex,
            Property::Bech32,
            Property::ByteLength20,
            Property::ByteLength32,
            Property::ByteLength64,
            Property::ByteLength65,
            Property::EnglishMnemonic,
            Property::EnglishMnemonic12Words,
            Property::EthereumAddress,
            Property::IovAddressMainnet,
            Property::IovAddressTestnet,
            Property::BnsUsername,
            Property::LiskAddress,
            Property::RiseAddress,
            Property::WeaveCondition,
            Property::NonZeroUint64,
        ] {
            assert!(
                RULES.iter().any(|r| r.property == property),
                "no rule for {}",
                property
            );
        }
    }

    #[tokio::test]
    async fn test_compressed_65_bytes_skips_secp_display() {
        let input = format!("02{}", "ab".repeat(64));
        let displays = dispatch(&input, &classify(&input), &context()).await.unwrap();
        let ids: Vec<_> = displays.iter().map(|d| d.id().to_string()).collect();
        assert_eq!(ids, vec![format!("{}#hex-summary", input)]);
    }

    #[tokio::test]
    async fn test_username_fans_out_mainnet_first() {
        let ctx = context();
        let displays = dispatch("alice*iov", &classify("alice*iov"), &ctx).await.unwrap();
        assert_eq!(displays.len(), 1 + ctx.settings.iov_testnets.len());
        assert_eq!(displays[0].meta().interpreted_as, "Username on Mainnet");
        assert!(displays.iter().all(|d| d.is_interactive()));
        // nothing connects during dispatch
        assert!(ctx.connections.is_empty());
    }

    #[tokio::test]
    async fn test_property_without_matching_input_is_an_error() {
        let mut properties = PropertySet::new();
        properties.insert(Property::ByteLength32);
        assert!(dispatch("zz", &properties, &context()).await.is_err());
    }

    #[tokio::test]
    async fn test_number_produces_weave_ids() {
        let displays = dispatch("7", &classify("7"), &context()).await.unwrap();
        assert_eq!(displays.len(), 3);
    }

    #[test]
    fn test_sort_is_stable() {
        let input = "0011223344556677889900112233445566778899";
        let address = sniffer_codecs::encoding::bech32_encode("iov", &[7; 20]).unwrap();
        let mut displays = vec![
            displays::hex_summary(input).unwrap(),
            displays::weave_address(input).unwrap(),
            displays::bech32_summary(&address).unwrap(),
        ];
        sort_displays(&mut displays);
        let ids: Vec<_> = displays.iter().map(|d| d.id().to_string()).collect();
        assert_eq!(
            ids,
            vec![
                format!("{}#weave-address", input),
                format!("{}#bech32", address),
                format!("{}#hex-summary", input),
            ]
        );
    }
}
