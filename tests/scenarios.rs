//! End-to-end interpretation scenarios through the orchestrator.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::*;
use iov_sniffer::{classify, dispatch, sort_displays, DispatchContext};
use sniffer_codecs::encoding::{bech32_decode, bech32_encode};
use sniffer_transport::{Account, OfflineConnector};
use sniffer_types::{priorities, Amount, Display, DisplayData, Priority, Property, PropertySet};

#[tokio::test]
async fn test_twenty_byte_hex_shows_weave_address_then_hex() {
    let properties = classify(TWENTY_BYTES_HEX);
    let expected: PropertySet = [Property::Hex, Property::ByteLength20].into_iter().collect();
    assert_eq!(properties, expected);

    let (mut orchestrator, mut updates) = offline_orchestrator();
    let displays = orchestrator.process_input(TWENTY_BYTES_HEX).await.unwrap();

    let ids: Vec<_> = displays.iter().map(|d| d.id().to_string()).collect();
    assert_eq!(
        ids,
        vec![
            format!("{}#weave-address", TWENTY_BYTES_HEX),
            format!("{}#hex-summary", TWENTY_BYTES_HEX),
        ]
    );
    assert_eq!(displays[0].meta.priority, priorities::WEAVE_ADDRESS);
    assert_eq!(displays[1].meta.priority, priorities::HEX);
    assert!(displays.iter().all(|d| !d.data.is_pending()));

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(updates.try_recv().is_err());
}

#[tokio::test]
async fn test_mnemonic_shows_summary_wallets_and_passphrase() {
    let (mut orchestrator, mut updates) = offline_orchestrator();
    let displays = orchestrator.process_input(ABANDON).await.unwrap();
    let hd_coins = orchestrator.context().settings.hd_coins.len();

    assert_eq!(displays.len(), 2 + hd_coins);
    assert_eq!(displays[0].meta.interpreted_as, "Lisk-like passphrase");
    assert!(matches!(displays[0].data, DisplayData::Fields(_)));
    for wallet in &displays[1..=hd_coins] {
        assert_eq!(wallet.meta.priority, priorities::HD_ADDRESSES);
        assert!(wallet.meta.interpreted_as.ends_with("HD Wallet"));
        assert!(wallet.data.is_pending());
    }
    assert_eq!(displays[hd_coins + 1].meta.interpreted_as, "Bip39 english mnemonic");

    let resolved = collect_updates(&mut updates, hd_coins, Duration::from_secs(10)).await;
    for update in &resolved {
        assert_eq!(update.generation, 1);
        match &update.display.data {
            DisplayData::Fields(rows) => assert_eq!(rows.len(), 5, "{}", update.id),
            other => panic!("{} resolved to {:?}", update.id, other),
        }
    }

    // placeholders were replaced in place, order unchanged
    let current = orchestrator.current();
    assert_eq!(current.len(), displays.len());
    assert!(current.iter().all(|d| !d.data.is_pending()));
    for (before, after) in displays.iter().zip(&current) {
        assert_eq!(before.id(), after.id());
    }
}

#[tokio::test]
async fn test_no_match_is_empty() {
    let (mut orchestrator, _updates) = offline_orchestrator();
    assert!(classify("hello!").is_empty());
    assert!(orchestrator.process_input("hello!").await.unwrap().is_empty());
    assert!(orchestrator.current().is_empty());
    assert_eq!(orchestrator.generation(), 1);
}

#[tokio::test]
async fn test_failed_lookup_does_not_affect_siblings() {
    let address = testnet_address(3);
    let connector = MockConnector::new()
        .failing("http://exchangenet.test")
        .with_account(Account {
            address: address.clone(),
            pubkey: None,
            balance: vec![Amount::new("2000000000", 9, "IOV")],
        });
    let (mut orchestrator, mut updates) = mock_orchestrator(connector, test_settings());

    let displays = orchestrator.process_input(&address).await.unwrap();
    // two testnet accounts, then the bech32 summary
    assert_eq!(displays.len(), 3);
    assert_eq!(displays[2].meta.interpreted_as, "Bech32 address");

    let mut resolved = collect_updates(&mut updates, 2, Duration::from_secs(5)).await;
    resolved.sort_by(|a, b| a.id.cmp(&b.id));

    let devnet = &resolved[0];
    assert_eq!(devnet.id, format!("{}#devnet-bns-account", address));
    match &devnet.display.data {
        DisplayData::Fields(rows) => assert_eq!(rows[2].value, "2.0\u{202F}IOV"),
        other => panic!("expected fields, got {:?}", other),
    }

    let exchangenet = &resolved[1];
    assert_eq!(exchangenet.id, format!("{}#exchangenet-bns-account", address));
    assert_eq!(exchangenet.display.meta.priority, priorities::BNS_ACCOUNT);
    assert_eq!(exchangenet.display.meta.interpreted_as, "Account on Exchangenet");
    match &exchangenet.display.data {
        DisplayData::Error(message) => assert!(message.contains("simulated network failure")),
        other => panic!("expected error, got {:?}", other),
    }

    assert_eq!(orchestrator.current()[2], displays[2]);
}

#[tokio::test]
async fn test_unknown_username_is_not_found() {
    let (mut orchestrator, mut updates) = mock_orchestrator(MockConnector::new(), test_settings());
    let displays = orchestrator.process_input("nobody*iov").await.unwrap();
    assert_eq!(displays.len(), 3);
    assert_eq!(displays[0].meta.interpreted_as, "Username on Mainnet");

    for update in collect_updates(&mut updates, 3, Duration::from_secs(5)).await {
        assert_eq!(
            update.display.data,
            DisplayData::NotFound("Username not found".to_string())
        );
    }
}

fn shape(displays: &[Display]) -> Vec<(String, Priority, String, bool)> {
    displays
        .iter()
        .map(|d| {
            (
                d.id().to_string(),
                d.priority(),
                d.meta().interpreted_as.clone(),
                d.is_interactive(),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_dispatch_is_idempotent() {
    let context = DispatchContext::new(Arc::new(test_settings()), Arc::new(OfflineConnector));
    for input in [ABANDON, TWENTY_BYTES_HEX, "12", "alice*iov", "123R"] {
        let properties = classify(input);
        let mut first = dispatch(input, &properties, &context).await.unwrap();
        let mut second = dispatch(input, &properties, &context).await.unwrap();
        sort_displays(&mut first);
        sort_displays(&mut second);
        assert!(!first.is_empty(), "{}", input);
        assert_eq!(shape(&first), shape(&second), "{}", input);

        let mut ids: Vec<_> = first.iter().map(|d| d.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), first.len(), "duplicate ids for {}", input);
    }
}

#[tokio::test]
async fn test_long_mnemonic_is_not_a_passphrase() {
    let twenty_four = format!("{} art", "abandon ".repeat(23).trim_end());
    let context = DispatchContext::new(Arc::new(test_settings()), Arc::new(OfflineConnector));
    let properties = classify(&twenty_four);
    assert!(properties.has(Property::EnglishMnemonic));
    assert!(!properties.has(Property::EnglishMnemonic12Words));

    let mut displays = dispatch(&twenty_four, &properties, &context).await.unwrap();
    sort_displays(&mut displays);
    let kinds: Vec<_> = displays
        .iter()
        .map(|d| d.meta().interpreted_as.as_str())
        .collect();
    assert!(!kinds.contains(&"Lisk-like passphrase"));
    assert_eq!(displays.len(), 1 + context.settings.hd_coins.len());
    assert_eq!(kinds.last(), Some(&"Bip39 english mnemonic"));
    assert!(displays[..displays.len() - 1].iter().all(|d| d.is_interactive()));
}

#[tokio::test]
async fn test_bech32_link_sniffs_back_to_address() {
    let address = bech32_encode("iov", &[0x5a; 20]).unwrap();
    let properties = classify(&address);
    assert!(properties.has(Property::IovAddressMainnet));

    let (mut orchestrator, _updates) = offline_orchestrator();
    let displays = orchestrator.process_input(&address).await.unwrap();
    let summary = displays
        .iter()
        .find(|d| d.meta.interpreted_as == "Bech32 address")
        .unwrap();
    let DisplayData::Fields(rows) = &summary.data else {
        panic!("expected fields");
    };
    let data = rows[1].link.clone().unwrap();

    // the payload is 20 bytes, so it reads as a weave address again
    let weave = orchestrator.process_input(&data).await.unwrap();
    let DisplayData::Fields(rows) = &weave[0].data else {
        panic!("expected fields");
    };
    assert_eq!(rows[1].value, address);
    assert_eq!(bech32_decode(&address).unwrap().data, vec![0x5a; 20]);
}
