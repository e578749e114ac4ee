//! Path existence checks and directory creation.

use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// Whether `path` exists.
///
/// Only a "not found" status counts as missing. Any other stat failure, such
/// as permission denied on a parent, is reported as existing. Use
/// [`try_exists`] to tell those cases apart.
pub fn exists(path: impl AsRef<Path>) -> bool {
    match fs::metadata(path) {
        Ok(_) => true,
        Err(e) => e.kind() != io::ErrorKind::NotFound,
    }
}

/// Whether `path` exists, surfacing stat failures other than "not found".
///
/// Symlinks are followed, so a dangling link yields `Ok(false)`.
pub fn try_exists(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    path.try_exists()
        .map_err(|e| Error::io("checking the path", path, e))
}

/// Make sure the directory `path` exists.
///
/// Does nothing if [`exists`] reports the path as present. Otherwise creates
/// a single directory with the platform's default permissions; missing
/// parents are not created.
pub fn safe_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if exists(path) {
        return Ok(());
    }

    fs::create_dir(path).map_err(|e| Error::io("creating the directory", path, e))?;
    debug!(path = %path.display(), "created directory");
    Ok(())
}
