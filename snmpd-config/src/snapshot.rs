//! Private point-in-time copy of the configuration store
//!
//! The live database is copied with SQLite's online backup API into a fresh
//! `0700` temporary directory and all reads go to the copy, so no lock is held
//! on the live store while the config is generated. The copy is removed when
//! the `Snapshot` is released or dropped, and by `CleanupRegistry::purge` if
//! the process is interrupted.

use rusqlite::backup::{Backup, StepResult};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::cleanup::{CleanupRegistry, CleanupToken};
use crate::error::GenerateError;
use crate::settings::{SettingsRecord, SETTINGS_TABLE};

const SNAPSHOT_FILE: &str = "config.db";
const BUSY_RETRY_INTERVAL: Duration = Duration::from_millis(100);

/// Read-only handle on a private copy of the configuration store.
pub struct Snapshot {
    // Field order is drop order: close the connection, remove the directory,
    // then deregister it.
    conn: Connection,
    dir: TempDir,
    _token: CleanupToken,
}

impl Snapshot {
    /// Copy `database` into a private directory under `snapshot_dir`.
    ///
    /// A store that stays busy or locked for longer than `timeout` fails the
    /// acquisition, as does a missing, unreadable or corrupt store.
    pub fn acquire(
        database: &Path,
        timeout: Duration,
        snapshot_dir: &Path,
        cleanup: &CleanupRegistry,
    ) -> Result<Self, GenerateError> {
        let fail = |e: rusqlite::Error| GenerateError::snapshot(database, e);

        let source = Connection::open_with_flags(
            database,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(fail)?;
        source.busy_timeout(timeout).map_err(fail)?;

        let (dir, token) = cleanup
            .track(|| {
                tempfile::Builder::new()
                    .prefix(".snmpd-config-")
                    .tempdir_in(snapshot_dir)
            })
            .map_err(|e| GenerateError::snapshot(database, e))?;

        let copy_path = dir.path().join(SNAPSHOT_FILE);
        copy_store(&source, database, &copy_path, timeout)?;
        drop(source);

        let conn = Connection::open_with_flags(&copy_path, OpenFlags::SQLITE_OPEN_READ_ONLY)
            .map_err(fail)?;

        debug!(snapshot = %dir.path().display(), "Configuration store snapshot taken");
        Ok(Self {
            conn,
            dir,
            _token: token,
        })
    }

    /// Directory holding the private copy.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Fetch the newest settings row. An empty table is an error.
    pub fn read_current_settings(&self) -> Result<SettingsRecord, GenerateError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id DESC LIMIT 1",
            SettingsRecord::COLUMNS.join(", "),
            SETTINGS_TABLE
        );

        self.conn
            .query_row(&sql, [], SettingsRecord::from_row)
            .optional()?
            .ok_or(GenerateError::NoSettingsRecord)
    }

    /// Close the copy and delete it from disk.
    pub fn release(self) {
        let Self { conn, dir, _token } = self;
        drop(conn);

        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => info!(snapshot = %path.display(), "Snapshot released"),
            Err(e) => warn!(snapshot = %path.display(), error = %e, "Failed to remove snapshot"),
        }
    }
}

fn copy_store(
    source: &Connection,
    database: &Path,
    copy_path: &Path,
    timeout: Duration,
) -> Result<(), GenerateError> {
    let fail = |e: rusqlite::Error| GenerateError::snapshot(database, e);

    let mut copy = Connection::open(copy_path).map_err(fail)?;
    let backup = Backup::new(source, &mut copy).map_err(fail)?;
    let deadline = Instant::now() + timeout;

    loop {
        match backup.step(-1).map_err(fail)? {
            StepResult::Done => return Ok(()),
            StepResult::More => {}
            _ if Instant::now() >= deadline => {
                return Err(GenerateError::snapshot(
                    database,
                    format!("store still locked after {:?}", timeout),
                ));
            }
            _ => thread::sleep(BUSY_RETRY_INTERVAL),
        }
    }
}
