//! iov-sniffer: show every way a pasted value can be read
//!
//! Classifies each input (hex data, Bech32 addresses, BIP-39 mnemonics,
//! Lisk/Rise/Ethereum addresses, keys, numeric weave ids, weave conditions),
//! prints the interpretations right away and then the ledger lookups as
//! they resolve.
//!
//! ## Example Usage
//!
//! ```bash
//! # Sniff a single value
//! iov-sniffer 0011223344556677889900112233445566778899
//!
//! # Several values, JSON lines, no network
//! iov-sniffer --offline --json 42 alice*iov
//!
//! # One value per line from stdin
//! cat values.txt | iov-sniffer
//! ```

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use iov_sniffer::{DispatchContext, Orchestrator};
use sniffer_transport::{Connector, HttpConnector, OfflineConnector};
use sniffer_types::DisplayUpdate;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;
use tracing::{error, warn};

mod sniffer_cli;

#[derive(Parser)]
#[command(
    name = "iov-sniffer",
    author,
    version,
    about = "Show every interpretation of a pasted blockchain value",
    long_about = "Classifies each input against known encodings (hex, Bech32, BIP-39, \
                  chain addresses, keys, weave ids) and prints every interpretation.\n\n\
                  Without INPUT arguments, reads one input per line from stdin."
)]
struct Cli {
    /// Values to sniff
    inputs: Vec<String>,

    /// JSON settings file (default: $SNIFFER_HOME/settings.json if present)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Output as JSON lines instead of human-readable format
    #[arg(long)]
    json: bool,

    /// Never connect to a ledger; lookups render as errors
    #[arg(long)]
    offline: bool,

    /// Seconds to wait for ledger lookups per input
    #[arg(long, default_value_t = 10)]
    wait_secs: u64,

    /// List configured networks and exit
    #[arg(long)]
    networks: bool,

    /// Verbose output (debug logging to stderr)
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    sniffer_cli::init_logging(cli.verbose);

    let settings = sniffer_cli::load_settings(cli.settings.as_deref())?;
    if cli.networks {
        let networks: Vec<_> = settings.all_networks().collect();
        sniffer_cli::output::print_networks(&networks, cli.json);
        return Ok(());
    }

    let connector: Arc<dyn Connector> = if cli.offline {
        Arc::new(OfflineConnector)
    } else {
        Arc::new(HttpConnector::from_env())
    };
    let context = DispatchContext::new(Arc::new(settings), connector);
    let (mut orchestrator, mut updates) = Orchestrator::new(context);
    let wait = Duration::from_secs(cli.wait_secs);

    if cli.inputs.is_empty() {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read stdin")?;
            if line.trim().is_empty() {
                continue;
            }
            if let Err(e) = sniff(&mut orchestrator, &mut updates, &line, wait, cli.json).await {
                error!(input = %line, error = %format!("{:#}", e), "failed to sniff input");
            }
        }
    } else {
        for input in &cli.inputs {
            if let Err(e) = sniff(&mut orchestrator, &mut updates, input, wait, cli.json).await {
                error!(input = %input, error = %format!("{:#}", e), "failed to sniff input");
            }
        }
    }
    Ok(())
}

/// Processes one input and reports its updates until every lookup has
/// resolved or `wait` elapses.
async fn sniff(
    orchestrator: &mut Orchestrator,
    updates: &mut UnboundedReceiver<DisplayUpdate>,
    input: &str,
    wait: Duration,
    json: bool,
) -> Result<()> {
    let displays = orchestrator.process_input(input).await?;
    let generation = orchestrator.generation();
    sniffer_cli::output::print_published(input.trim(), generation, &displays, json);

    let mut remaining = displays.iter().filter(|d| d.data.is_pending()).count();
    let deadline = Instant::now() + wait;
    while remaining > 0 {
        match tokio::time::timeout_at(deadline, updates.recv()).await {
            Ok(Some(update)) if update.generation == generation => {
                sniffer_cli::output::print_update(&update, json);
                remaining -= 1;
            }
            // late result of an earlier input
            Ok(Some(_)) => {}
            Ok(None) => break,
            Err(_) => {
                warn!(remaining = remaining, "gave up waiting for lookups");
                break;
            }
        }
    }
    Ok(())
}
