//! Weave conditions and the conditions behind numeric weave ids.

use anyhow::Result;
use sniffer_codecs::weave::Condition;
use sniffer_types::settings::{IOV_MAINNET_CHAIN_ID, IOV_TESTNET_CHAIN_ID};
use sniffer_types::{priorities, Display, DisplayMeta, Field, Priority, StaticDisplay};

use super::display_id;

pub fn weave_condition(input: &str) -> Result<Display> {
    let condition = Condition::parse(input)?;
    let meta = DisplayMeta::new(
        display_id(input, "weave-condition"),
        priorities::WEAVE_CONDITION,
        "Weave condition",
    );
    Ok(StaticDisplay::fields(
        meta,
        vec![
            Field::text("Extension", &condition.extension),
            Field::text("Type", &condition.kind),
            Field::linked("Data", hex::encode(&condition.data)),
            Field::linked("IOV test", condition.to_address(IOV_TESTNET_CHAIN_ID)?),
            Field::linked("IOV main", condition.to_address(IOV_MAINNET_CHAIN_ID)?),
        ],
    )
    .into())
}

struct WeaveId {
    extension: &'static str,
    kind: &'static str,
    tag: &'static str,
    interpreted_as: &'static str,
    priority: Priority,
}

const WEAVE_IDS: &[WeaveId] = &[
    WeaveId {
        extension: "escrow",
        kind: "seq",
        tag: "weave-escrow-id",
        interpreted_as: "Weave escrow ID",
        priority: priorities::WEAVE_ESCROW_ID,
    },
    WeaveId {
        extension: "gov",
        kind: "rule",
        tag: "weave-governance-rule-id",
        interpreted_as: "Weave governance rule ID",
        priority: priorities::WEAVE_GOVERNANCE_RULE_ID,
    },
    WeaveId {
        extension: "multisig",
        kind: "usage",
        tag: "weave-multisig-id",
        interpreted_as: "Weave multisignature ID",
        priority: priorities::WEAVE_MULTISIG_ID,
    },
];

/// A non-zero number read as an escrow, governance rule and multisig id.
pub fn weave_ids(input: &str) -> Result<Vec<Display>> {
    let id: u64 = input.parse()?;
    Ok(WEAVE_IDS
        .iter()
        .map(|w| {
            let condition = Condition::from_sequence(w.extension, w.kind, id);
            let meta = DisplayMeta::new(display_id(input, w.tag), w.priority, w.interpreted_as);
            StaticDisplay::fields(meta, vec![Field::linked("Condition", condition.to_string())])
                .into()
        })
        .collect())
}
