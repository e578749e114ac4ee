//! Writers: JSON encoding, overwrite, append and removal.
//!
//! New files are created with mode `0644` on Unix. Writes go straight to the
//! target path, so a failed write can leave a truncated file behind.

use crate::{Error, Result};
use serde::Serialize;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Permission bits for newly created files (rw-r--r--).
pub const FILE_MODE: u32 = 0o644;

fn open_options() -> OpenOptions {
    let mut opts = OpenOptions::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(FILE_MODE);
    }
    opts
}

fn open_truncate(path: &Path) -> io::Result<File> {
    open_options().write(true).create(true).truncate(true).open(path)
}

fn open_append(path: &Path) -> io::Result<File> {
    open_options().append(true).create(true).open(path)
}

/// Serialize `value` as compact JSON and overwrite `path` with it.
///
/// # Errors
///
/// [`Error::Encode`] if `value` can't be represented as JSON (the file is not
/// touched), [`Error::Io`] if the write fails.
pub fn write_json<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let data = serde_json::to_vec(value).map_err(|source| Error::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    write(path, &data)
}

/// Serialize `value` as JSON indented with one tab per level and overwrite
/// `path` with it.
///
/// # Errors
///
/// Same as [`write_json`].
pub fn write_indented_json<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    let mut data = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut data, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|source| Error::Encode {
            path: path.to_path_buf(),
            source,
        })?;
    write(path, &data)
}

/// Overwrite `path` with `contents`, creating the file if needed.
pub fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let contents = contents.as_ref();

    let mut file = open_truncate(path).map_err(|e| Error::io("opening the file", path, e))?;
    file.write_all(contents)
        .map_err(|e| Error::io("writing the file", path, e))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Append `contents` to `path`, creating the file if needed. Existing content
/// is never truncated.
pub fn append(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    let contents = contents.as_ref();

    // The handle is closed when `file` drops, on the error path as well.
    let mut file = open_append(path).map_err(|e| Error::io("opening the file", path, e))?;
    file.write_all(contents)
        .map_err(|e| Error::io("appending to the file", path, e))?;

    debug!(path = %path.display(), bytes = contents.len(), "appended to file");
    Ok(())
}

/// Append text to `path`. See [`append`].
pub fn append_string(path: impl AsRef<Path>, text: &str) -> Result<()> {
    append(path, text.as_bytes())
}

/// Remove a single file or an empty directory.
///
/// # Errors
///
/// [`Error::Io`] if the path doesn't exist or is a non-empty directory.
pub fn rm(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta =
        fs::symlink_metadata(path).map_err(|e| Error::io("removing the path", path, e))?;

    let result = if meta.is_dir() {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    };
    result.map_err(|e| Error::io("removing the path", path, e))?;

    debug!(path = %path.display(), "removed");
    Ok(())
}

/// Remove `path` and everything below it. A missing path is not an error.
pub fn rm_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let meta = match fs::symlink_metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(Error::io("removing the path", path, e)),
    };

    let result = if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    match result {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(Error::io("removing the path", path, e)),
    }

    debug!(path = %path.display(), "removed recursively");
    Ok(())
}
