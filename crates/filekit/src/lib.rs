//! # filekit
//!
//! Small, uniform wrappers over filesystem reads and writes and the common
//! structured-data formats.
//!
//! Every function performs at most one read, one decode/encode pass, or one
//! write, and returns a [`Result`] whose error keeps both the failing stage
//! and the underlying cause. Nothing is cached, retried or shared between
//! calls.
//!
//! - Writers: [`write_json`], [`write_indented_json`], [`write`],
//!   [`append`], [`append_string`], [`rm`], [`rm_all`]
//! - Readers: [`bytes`], [`string`], [`json`], [`json_into`]
//! - Readers behind the `csv` feature: `csv`, `simple_csv`
//! - Readers behind the `toml` feature: `toml`, `toml_into`
//! - Directories: [`read_dir`], [`read_dir_names`], [`safe_dir`], [`exists`]
//!
//! ## Example
//!
//! ```no_run
//! use filekit::{ReadDirOptions, EntryFilter};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Manifest {
//!     name: String,
//! }
//!
//! # fn main() -> filekit::Result<()> {
//! filekit::safe_dir("out")?;
//!
//! let opts = ReadDirOptions::new().suffix(".json").filter(EntryFilter::File);
//! for name in filekit::read_dir_names("manifests", &opts)? {
//!     let manifest: Manifest = filekit::json(format!("manifests/{name}"))?;
//!     filekit::append_string("out/names.txt", &format!("{}\n", manifest.name))?;
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod dir;
pub mod error;
pub mod read;
pub mod util;
pub mod write;

pub use error::{Error, ErrorKind, Result};

pub use dir::{read_dir, read_dir_names, DirEntry, EntryFilter, ReadDirOptions};
pub use util::{exists, safe_dir, try_exists};
pub use write::{append, append_string, rm, rm_all, write, write_indented_json, write_json};

pub use read::{bytes, json, json_into, string};
#[cfg(feature = "csv")]
pub use read::{csv, simple_csv};
#[cfg(feature = "toml")]
pub use read::{toml, toml_into};
