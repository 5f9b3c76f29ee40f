//! Error kinds of a generation run

use std::path::PathBuf;
use thiserror::Error;

use crate::host::HostFact;

/// Everything that can go wrong while generating the daemon config.
///
/// All variants except `HostFactUnavailable` abort the run before the
/// previous configuration file is touched.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to snapshot configuration store {}: {reason}", database.display())]
    SnapshotAcquisitionFailed { database: PathBuf, reason: String },

    #[error("no SNMP settings record in configuration store")]
    NoSettingsRecord,

    #[error("failed to query SNMP settings: {0}")]
    SettingsQueryFailed(#[from] rusqlite::Error),

    /// Non-fatal: logged and rendered as an empty field.
    #[error("host fact {} unavailable: {reason}", fact.sysctl_name())]
    HostFactUnavailable { fact: HostFact, reason: String },

    #[error("failed to write {}: {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    pub(crate) fn snapshot(database: &std::path::Path, reason: impl ToString) -> Self {
        Self::SnapshotAcquisitionFailed {
            database: database.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        }
    }
}
