//! Environment variable parsing helpers.
//!
//! Every override the tool accepts goes through these, so a malformed value
//! is treated the same as an unset one.
//!
//! ```
//! use sniffer_types::env_utils::{env_bool, env_var_or};
//!
//! let delay_ms: u64 = env_var_or("SNIFFER_RESOLVE_DELAY_MS", 500);
//! let devnet = env_bool("SNIFFER_DEVNET");
//! # let _ = (delay_ms, devnet);
//! ```

use std::str::FromStr;

/// Parse an environment variable, `None` if unset or unparsable.
pub fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Parse an environment variable, falling back to `default`.
///
/// ```
/// use sniffer_types::env_utils::env_var_or;
///
/// let timeout: u64 = env_var_or("SNIFFER_HTTP_TIMEOUT_SECS", 30);
/// # let _ = timeout;
/// ```
pub fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

/// `true` if the variable is "1", "true", "yes" or "on" (case-insensitive).
pub fn env_bool(key: &str) -> bool {
    std::env::var(key)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
