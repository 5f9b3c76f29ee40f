//! Atomic, owner-only write of the generated configuration
//!
//! The content is written to a temporary file in the target directory that is
//! created with mode `0600`, then renamed over the target. Readers see either
//! the previous file or the complete new one, and the secrets are never on
//! disk with broader permissions.

use nix::sys::stat::Mode;
use std::fs::{self, File, Permissions};
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tracing::{debug, warn};

use crate::cleanup::CleanupRegistry;
use crate::error::GenerateError;

/// Owner read/write only.
pub fn output_mode() -> Mode {
    Mode::S_IRUSR | Mode::S_IWUSR
}

/// Replace `path` with `content`.
///
/// On failure the temporary file is removed and any previous file at `path`
/// is left as it was.
pub fn write_config(
    path: &Path,
    content: &str,
    cleanup: &CleanupRegistry,
) -> Result<(), GenerateError> {
    let fail = |e: std::io::Error| GenerateError::write(path, e);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(fail)?;

    let (mut tmp, token) = cleanup
        .track(|| {
            tempfile::Builder::new()
                .prefix(".snmpd.conf.")
                .permissions(Permissions::from_mode(output_mode().bits().into()))
                .tempfile_in(dir)
        })
        .map_err(fail)?;
    debug!(tmp = %tmp.path().display(), "Writing config to temporary file");

    tmp.write_all(content.as_bytes()).map_err(fail)?;
    tmp.as_file().sync_all().map_err(fail)?;

    tmp.persist(path).map_err(|e| fail(e.error))?;
    drop(token);

    sync_dir(dir);
    Ok(())
}

/// Make a completed rename durable. The new file is already in place, so a
/// failure here is reported but does not fail the write.
fn sync_dir(dir: &Path) {
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        warn!(dir = %dir.display(), error = %e, "Config replaced but directory sync failed");
    }
}
