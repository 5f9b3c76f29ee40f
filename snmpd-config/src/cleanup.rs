//! Registry of temporary paths that must not outlive the process
//!
//! Scope guards remove their own files on drop. The registry covers the one
//! exit path drops cannot: termination by signal while work is in flight.
//! Paths are created under the registry lock, so a purge either sees a path
//! or prevents it from ever being created.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct State {
    paths: Vec<PathBuf>,
    closed: bool,
}

/// Shared list of live temporary paths.
#[derive(Debug, Clone, Default)]
pub struct CleanupRegistry {
    state: Arc<Mutex<State>>,
}

/// Registration of one path; deregisters on drop.
///
/// Dropping the token does not delete the path. The owning guard does that.
#[derive(Debug)]
pub struct CleanupToken {
    registry: CleanupRegistry,
    path: PathBuf,
}

impl CleanupRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a temporary resource and track its path until the token is dropped.
    ///
    /// `create` runs with the registry locked. After `purge` nothing new is
    /// created and this returns `ErrorKind::Interrupted`.
    pub fn track<T: AsRef<Path>>(
        &self,
        create: impl FnOnce() -> io::Result<T>,
    ) -> io::Result<(T, CleanupToken)> {
        let mut state = self.lock();
        if state.closed {
            return Err(io::Error::new(
                ErrorKind::Interrupted,
                "shutting down; temporary files are no longer created",
            ));
        }

        let resource = create()?;
        let path = resource.as_ref().to_path_buf();
        debug!(path = %path.display(), "Registered temporary path");
        state.paths.push(path.clone());

        let token = CleanupToken {
            registry: self.clone(),
            path,
        };
        Ok((resource, token))
    }

    /// Paths currently registered.
    pub fn pending(&self) -> Vec<PathBuf> {
        self.lock().paths.clone()
    }

    /// Remove every registered path from disk and refuse further registrations.
    /// Returns how many paths were removed.
    pub fn purge(&self) -> usize {
        let mut state = self.lock();
        state.closed = true;
        let paths: Vec<PathBuf> = state.paths.drain(..).collect();
        paths.iter().filter(|path| remove_path(path)).count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A panicking holder cannot leave the list inconsistent.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for CleanupToken {
    fn drop(&mut self) {
        let mut state = self.registry.lock();
        if let Some(pos) = state.paths.iter().position(|p| p == &self.path) {
            state.paths.swap_remove(pos);
        }
    }
}

fn remove_path(path: &Path) -> bool {
    let result = if path.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };

    match result {
        Ok(()) => true,
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove temporary path");
            false
        }
    }
}
