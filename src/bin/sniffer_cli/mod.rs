//! Support code for the iov-sniffer CLI.

pub mod output;

use std::path::{Path, PathBuf};

use anyhow::Result;
use sniffer_types::Settings;
use tracing::debug;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// `SNIFFER_HOME`, or `~/.iov-sniffer`.
pub fn sniffer_home() -> PathBuf {
    std::env::var("SNIFFER_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".iov-sniffer")
        })
}

/// Settings from `explicit`, else `<home>/settings.json` if present, else
/// the built-in tables. Environment overrides apply in every case.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings> {
    let default_path = sniffer_home().join("settings.json");
    let mut settings = match explicit {
        Some(path) => Settings::load(path)?,
        None if default_path.exists() => Settings::load(&default_path)?,
        None => Settings::default(),
    };
    settings.apply_env();
    settings.validate()?;
    debug!(
        networks = settings.all_networks().count(),
        hd_coins = settings.hd_coins.len(),
        "settings loaded"
    );
    Ok(settings)
}

/// Logs go to stderr so stdout stays parseable. `RUST_LOG` wins over
/// `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "iov_sniffer=debug,sniffer_transport=debug,warn"
    } else {
        "warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
