//! Generator configuration from environment variables

use common::ConfigExt;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the appliance configuration database
pub const DEFAULT_DATABASE: &str = "/data/freenas-v1.db";

/// Default location of the generated daemon configuration
pub const DEFAULT_OUTPUT: &str = "/usr/local/etc/snmpd.conf";

/// Configuration for a generation run
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub output: PathBuf,
    pub snapshot_dir: PathBuf,
    /// Upper bound on waiting for a locked configuration store.
    pub snapshot_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            database: String::env_or("SNMPD_CONFIG_DATABASE", DEFAULT_DATABASE).into(),
            output: String::env_or("SNMPD_CONFIG_OUTPUT", DEFAULT_OUTPUT).into(),
            snapshot_dir: String::env_opt("SNMPD_CONFIG_SNAPSHOT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            snapshot_timeout: Duration::from_secs(u64::env_parse("SNMPD_CONFIG_DB_TIMEOUT", 5)),
        }
    }
}
