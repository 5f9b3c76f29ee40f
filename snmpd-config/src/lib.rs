//! snmpd configuration generator
//!
//! Materializes the SNMP daemon configuration from the newest row of the
//! appliance settings database right before the daemon starts:
//! - Private snapshot of the configuration store
//! - Host identity facts for the description line
//! - Rendering and atomic, owner-only write of the config file

pub mod cleanup;
pub mod config;
pub mod emit;
pub mod error;
pub mod host;
pub mod settings;
pub mod snapshot;
pub mod template;

use std::path::PathBuf;
use tracing::info;

pub use cleanup::CleanupRegistry;
pub use config::Config;
pub use error::GenerateError;
pub use host::{collect_host_facts, HostFact, HostFactSource, HostFacts, SysctlSource};
pub use settings::{AccessControl, Privacy, SettingsRecord};
pub use snapshot::Snapshot;
pub use template::render;

/// Run one generation pass: snapshot, host facts, render, write.
///
/// Returns the path of the written configuration file.
pub fn generate(
    config: &Config,
    source: &dyn HostFactSource,
    cleanup: &CleanupRegistry,
) -> Result<PathBuf, GenerateError> {
    let snapshot = Snapshot::acquire(
        &config.database,
        config.snapshot_timeout,
        &config.snapshot_dir,
        cleanup,
    )?;
    let record = snapshot.read_current_settings()?;
    snapshot.release();

    let facts = collect_host_facts(source);
    let content = render(&record, &facts);

    emit::write_config(&config.output, &content, cleanup)?;

    info!(
        path = %config.output.display(),
        mode = record.access_control().mode_name(),
        "snmpd config written"
    );
    Ok(config.output.clone())
}
