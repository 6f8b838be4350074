//! Crash-safe file replacement.
//!
//! Content is written to a temporary file in the target's directory and then
//! renamed over the target, so a crash mid-write leaves either the old or the
//! new file, never a truncated one.

use crate::error::{Result, WslIpError};
use chrono::Local;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Read a file, treating a missing file as `None`.
pub fn read_optional(path: &Path) -> Result<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(WslIpError::io(path, e)),
    }
}

/// Atomically replace `path` with `content`.
///
/// With `backup`, an existing file is first copied to a timestamped sibling
/// (see [`backup_path`]). Returns the backup location when one was made.
pub fn write_atomic(path: &Path, content: &[u8], backup: bool) -> Result<Option<PathBuf>> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|e| WslIpError::io(&dir, e))?;

    let existing = fs::metadata(path).ok();

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| WslIpError::io(&dir, e))?;
    tmp.write_all(content).map_err(|e| WslIpError::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| WslIpError::io(tmp.path(), e))?;

    // Temp files are created owner-only; keep the replaced file's mode
    if let Some(meta) = &existing {
        fs::set_permissions(tmp.path(), meta.permissions())
            .map_err(|e| WslIpError::io(tmp.path(), e))?;
    }

    let backup_location = match (&existing, backup) {
        (Some(_), true) => {
            let target = backup_path(path);
            fs::copy(path, &target).map_err(|e| WslIpError::io(&target, e))?;
            info!(file = %path.display(), backup = %target.display(), "Created backup");
            Some(target)
        }
        _ => None,
    };

    tmp.persist(path).map_err(|e| WslIpError::io(path, e.error))?;
    debug!(file = %path.display(), bytes = content.len(), "Wrote file");

    Ok(backup_location)
}

/// Sibling backup path: `<file name>.<YYYYMMDD-HHMMSS>.bak`.
///
/// A numeric suffix is added when a backup with the same timestamp exists.
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d-%H%M%S").to_string();
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();

    let mut candidate = path.with_file_name(format!("{}.{}.bak", name, stamp));
    let mut counter = 1;
    while candidate.exists() {
        candidate = path.with_file_name(format!("{}.{}-{}.bak", name, stamp, counter));
        counter += 1;
    }
    candidate
}
