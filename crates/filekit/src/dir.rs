//! Directory listing with suffix and entry-type filtering.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// Which kinds of directory entries [`read_dir`] keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFilter {
    /// Keep everything.
    #[default]
    None,
    /// Keep directories only.
    Dir,
    /// Keep everything that is not a directory.
    File,
}

impl EntryFilter {
    fn keeps(self, is_dir: bool) -> bool {
        match self {
            EntryFilter::None => true,
            EntryFilter::Dir => is_dir,
            EntryFilter::File => !is_dir,
        }
    }

    /// Name used in string and serialized forms.
    pub fn as_str(self) -> &'static str {
        match self {
            EntryFilter::None => "none",
            EntryFilter::Dir => "dir",
            EntryFilter::File => "file",
        }
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(EntryFilter::None),
            "dir" => Ok(EntryFilter::Dir),
            "file" => Ok(EntryFilter::File),
            other => Err(Error::InvalidFilter(other.to_string())),
        }
    }
}

/// Options for [`read_dir`] and [`read_dir_names`].
///
/// The suffix filter runs first, then the entry-type filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadDirOptions {
    /// Keep only entries whose name ends with this (case-sensitive).
    /// Empty means no suffix filtering (default: "").
    pub suffix: String,

    /// Entry-type filter (default: [`EntryFilter::None`]).
    pub filter: EntryFilter,
}

impl ReadDirOptions {
    /// Options that keep every entry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options that keep only directories.
    pub fn dirs() -> Self {
        Self::new().filter(EntryFilter::Dir)
    }

    /// Options that keep only non-directories.
    pub fn files() -> Self {
        Self::new().filter(EntryFilter::File)
    }

    /// Set the name suffix to match.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the entry-type filter.
    pub fn filter(mut self, filter: EntryFilter) -> Self {
        self.filter = filter;
        self
    }

    fn keeps(&self, entry: &DirEntry) -> bool {
        // `ends_with` never matches a name shorter than the suffix
        (self.suffix.is_empty() || entry.name.ends_with(&self.suffix))
            && self.filter.keeps(entry.is_dir)
    }
}

/// A directory entry returned by [`read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    name: String,
    path: PathBuf,
    is_dir: bool,
}

impl DirEntry {
    /// File name of the entry (lossy if not valid UTF-8).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path: the listed directory joined with [`name`](Self::name).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the entry itself is a directory. Symlinks are not followed.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }
}

/// List the entries of `path`, filtered by `options` and sorted by name.
///
/// # Errors
///
/// [`Error::Io`] if `path` is not a readable directory.
pub fn read_dir(path: impl AsRef<Path>, options: &ReadDirOptions) -> Result<Vec<DirEntry>> {
    let path = path.as_ref();
    let listing = |e: std::io::Error| Error::io("listing the directory", path, e);

    let mut entries = Vec::new();
    for entry in fs::read_dir(path).map_err(listing)? {
        let entry = entry.map_err(listing)?;
        let file_type = entry.file_type().map_err(listing)?;
        let entry = DirEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            path: entry.path(),
            is_dir: file_type.is_dir(),
        };
        if options.keeps(&entry) {
            entries.push(entry);
        }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(
        path = %path.display(),
        suffix = %options.suffix,
        filter = %options.filter,
        entries = entries.len(),
        "listed directory"
    );
    Ok(entries)
}

/// Like [`read_dir`], but returns only the entry names.
pub fn read_dir_names(path: impl AsRef<Path>, options: &ReadDirOptions) -> Result<Vec<String>> {
    Ok(read_dir(path, options)?
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}
