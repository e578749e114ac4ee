//! Error types for filekit

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using filekit Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in filekit
///
/// Every variant that comes from the filesystem or a decoder keeps the
/// original error as its `source`, so callers can walk the chain with
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum Error {
    /// Open/read/write/remove/stat failure
    #[error("error {action} {}: {source}", .path.display())]
    Io {
        /// Stage that failed, e.g. "opening the file"
        action: &'static str,
        /// Path the operation was applied to
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },

    /// Malformed CSV content
    #[cfg(feature = "csv")]
    #[error("error parsing the csv {}: {source}", .path.display())]
    Csv {
        /// Path of the CSV file
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: csv::Error,
    },

    /// Stray or unterminated quote in CSV content
    #[cfg(feature = "csv")]
    #[error("error parsing the csv {}: {reason} on line {line}", .path.display())]
    CsvQuote {
        /// Path of the CSV file
        path: PathBuf,
        /// Line where the offending field starts
        line: u64,
        /// What is wrong with the quoting
        reason: &'static str,
    },

    /// Malformed or schema-mismatched JSON content
    #[error("error decoding the json file {}: {source}", .path.display())]
    Json {
        /// Path of the JSON file
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: serde_json::Error,
    },

    /// Malformed or schema-mismatched TOML content
    #[cfg(feature = "toml")]
    #[error("error decoding the toml file {}: {source}", .path.display())]
    Toml {
        /// Path of the TOML file
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: toml::de::Error,
    },

    /// Serialization failed before anything was written
    #[error("error encoding json for {}: {source}", .path.display())]
    Encode {
        /// Destination path that was left untouched
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: serde_json::Error,
    },

    /// Unknown directory entry filter name
    #[error("invalid entry filter '{0}': expected one of 'none', 'dir', 'file'")]
    InvalidFilter(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Filesystem failure
    Io,
    /// Malformed CSV
    Parse,
    /// Malformed or mismatched JSON/TOML
    Decode,
    /// Serialization failure
    Encode,
    /// Invalid option value
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Io => "io",
            ErrorKind::Parse => "parse",
            ErrorKind::Decode => "decode",
            ErrorKind::Encode => "encode",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

impl Error {
    pub(crate) fn io(action: &'static str, path: &Path, source: io::Error) -> Self {
        Error::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. } => ErrorKind::Io,
            #[cfg(feature = "csv")]
            Error::Csv { .. } | Error::CsvQuote { .. } => ErrorKind::Parse,
            Error::Json { .. } => ErrorKind::Decode,
            #[cfg(feature = "toml")]
            Error::Toml { .. } => ErrorKind::Decode,
            Error::Encode { .. } => ErrorKind::Encode,
            Error::InvalidFilter(_) => ErrorKind::Config,
        }
    }

    /// Path involved in the failed operation, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Io { path, .. } | Error::Json { path, .. } | Error::Encode { path, .. } => {
                Some(path)
            }
            #[cfg(feature = "csv")]
            Error::Csv { path, .. } | Error::CsvQuote { path, .. } => Some(path),
            #[cfg(feature = "toml")]
            Error::Toml { path, .. } => Some(path),
            Error::InvalidFilter(_) => None,
        }
    }

    /// Underlying OS error for [`ErrorKind::Io`] failures
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Error::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
