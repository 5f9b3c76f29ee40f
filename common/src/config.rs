//! Environment variable parsing helpers
//!
//! Provides ergonomic helpers for reading configuration from environment variables.

use std::env;
use std::str::FromStr;

/// Extension trait for parsing environment variables.
///
/// Provides convenient methods for reading env vars with defaults and type parsing.
/// Empty values are treated the same as unset ones.
pub trait ConfigExt {
    /// Get an environment variable with a default value.
    ///
    /// # Example
    /// ```ignore
    /// let output = String::env_or("SNMPD_CONFIG_OUTPUT", "/usr/local/etc/snmpd.conf");
    /// ```
    fn env_or(name: &str, default: &str) -> String {
        env_nonempty(name).unwrap_or_else(|| default.to_string())
    }

    /// Get an environment variable, or `None` if unset or empty.
    fn env_opt(name: &str) -> Option<String> {
        env_nonempty(name)
    }

    /// Get an environment variable parsed as a specific type.
    ///
    /// Returns `default` if the variable is not set or fails to parse.
    ///
    /// # Example
    /// ```ignore
    /// let timeout: u64 = u64::env_parse("SNMPD_CONFIG_DB_TIMEOUT", 5);
    /// ```
    fn env_parse<T: FromStr>(name: &str, default: T) -> T {
        env_nonempty(name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

// Blanket implementation for all types
impl<T> ConfigExt for T {}

fn env_nonempty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
