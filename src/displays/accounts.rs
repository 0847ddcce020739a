//! Ledger-backed displays: BNS accounts, Lisk/Rise accounts and BNS
//! usernames. Each lookup borrows a connection from the shared pool when it
//! is resolved.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use sniffer_transport::{Account, ConnectionPool, Name};
use sniffer_types::{
    ellide_middle, print_amount, priorities, Display, DisplayData, DisplayMeta, Field,
    InteractiveDisplay, LedgerKind, Lookup, NetworkSettings, Priority,
};

use super::display_id;

fn pubkey_field(account: &Account) -> Field {
    match &account.pubkey {
        Some(pubkey) => Field::linked("Pubkey", pubkey.to_hex()),
        None => Field::text("Pubkey", "not available"),
    }
}

fn balance_field(account: &Account) -> Field {
    let balance = if account.balance.is_empty() {
        "0".to_string()
    } else {
        account
            .balance
            .iter()
            .map(print_amount)
            .collect::<Vec<_>>()
            .join(", ")
    };
    Field::text("Balance", balance)
}

fn account_fields(account: &Account) -> Vec<Field> {
    vec![
        Field::linked_as("Address", ellide_middle(&account.address, 25), &account.address),
        pubkey_field(account),
        balance_field(account),
    ]
}

// =============================================================================
// BNS accounts
// =============================================================================

pub struct BnsAccountLookup {
    connections: Arc<ConnectionPool>,
    network: NetworkSettings,
    address: String,
}

#[async_trait]
impl Lookup for BnsAccountLookup {
    type Raw = Option<(Account, Vec<Name>)>;

    async fn fetch(&self) -> Result<Self::Raw> {
        let connection = self.connections.get(&self.network).await?;
        let Some(account) = connection.get_account(&self.address).await? else {
            return Ok(None);
        };
        let names = if self.network.names_supported {
            connection.get_names_owned_by(&self.address).await?
        } else {
            Vec::new()
        };
        Ok(Some((account, names)))
    }

    fn render(&self, raw: Self::Raw) -> DisplayData {
        let Some((account, names)) = raw else {
            return DisplayData::NotFound("Account not found".to_string());
        };
        let mut fields = account_fields(&account);
        if self.network.names_supported {
            let names = if names.is_empty() {
                "none".to_string()
            } else {
                names.iter().map(|n| n.id.as_str()).collect::<Vec<_>>().join(", ")
            };
            fields.push(Field::text("Names", names));
        }
        DisplayData::Fields(fields)
    }
}

pub fn bns_account(
    input: &str,
    network: &NetworkSettings,
    connections: &Arc<ConnectionPool>,
) -> Display {
    let meta = DisplayMeta::new(
        display_id(input, &format!("{}-bns-account", network.slug())),
        priorities::BNS_ACCOUNT,
        format!("Account on {}", network.name),
    );
    InteractiveDisplay::new(
        meta,
        BnsAccountLookup {
            connections: Arc::clone(connections),
            network: network.clone(),
            address: input.to_string(),
        },
    )
    .into()
}

// =============================================================================
// Lisk and Rise accounts
// =============================================================================

pub struct DposAccountLookup {
    connections: Arc<ConnectionPool>,
    network: NetworkSettings,
    address: String,
}

#[async_trait]
impl Lookup for DposAccountLookup {
    type Raw = Option<Account>;

    async fn fetch(&self) -> Result<Self::Raw> {
        let connection = self.connections.get(&self.network).await?;
        connection.get_account(&self.address).await
    }

    fn render(&self, raw: Self::Raw) -> DisplayData {
        match raw {
            Some(account) => DisplayData::Fields(account_fields(&account)),
            None => DisplayData::NotFound("Account not found".to_string()),
        }
    }
}

/// Account lookup on a Lisk or Rise network; the tag and priority follow
/// the network's ledger kind.
pub fn dpos_account(
    input: &str,
    network: &NetworkSettings,
    connections: &Arc<ConnectionPool>,
) -> Display {
    let (tag, priority): (&str, Priority) = match network.kind {
        LedgerKind::Rise => ("rise-account", priorities::RISE_ACCOUNT),
        _ => ("lisk-account", priorities::LISK_ACCOUNT),
    };
    let meta = DisplayMeta::new(
        display_id(input, &format!("{}-{}", network.slug(), tag)),
        priority,
        format!("Account on {}", network.name),
    );
    InteractiveDisplay::new(
        meta,
        DposAccountLookup {
            connections: Arc::clone(connections),
            network: network.clone(),
            address: input.to_string(),
        },
    )
    .into()
}

// =============================================================================
// BNS usernames
// =============================================================================

pub struct UsernameLookup {
    connections: Arc<ConnectionPool>,
    network: NetworkSettings,
    username: String,
}

#[async_trait]
impl Lookup for UsernameLookup {
    type Raw = Option<Name>;

    async fn fetch(&self) -> Result<Self::Raw> {
        let connection = self.connections.get(&self.network).await?;
        connection.get_name(&self.username).await
    }

    fn render(&self, raw: Self::Raw) -> DisplayData {
        let Some(name) = raw else {
            return DisplayData::NotFound("Username not found".to_string());
        };
        let mut fields = vec![
            Field::text("Name", &name.id),
            Field::linked("Owner", &name.owner),
        ];
        fields.extend(
            name.targets
                .iter()
                .map(|t| Field::linked(ellide_middle(&t.chain_id, 12), &t.address)),
        );
        DisplayData::Fields(fields)
    }
}

pub fn username(
    input: &str,
    network: &NetworkSettings,
    connections: &Arc<ConnectionPool>,
) -> Display {
    let meta = DisplayMeta::new(
        display_id(input, &format!("{}-username", network.slug())),
        priorities::BNS_USERNAME,
        format!("Username on {}", network.name),
    );
    InteractiveDisplay::new(
        meta,
        UsernameLookup {
            connections: Arc::clone(connections),
            network: network.clone(),
            username: input.to_string(),
        },
    )
    .into()
}
