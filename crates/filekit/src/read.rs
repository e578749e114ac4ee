//! Readers: raw bytes and text, CSV rows, and JSON/TOML decoding.
//!
//! Decoders are generic over the destination type, so the shape of `T`
//! drives the schema. The `*_into` variants keep the out-parameter form and
//! only assign to the destination after a complete, successful decode.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read the whole file at `path`.
pub fn bytes(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io("reading the file", path, e))?;
    debug!(path = %path.display(), bytes = data.len(), "read file");
    Ok(data)
}

/// Read the whole file at `path` as UTF-8 text.
///
/// # Errors
///
/// [`Error::Io`] if the file is missing, unreadable, or not valid UTF-8.
pub fn string(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| Error::io("reading the file", path, e))?;
    debug!(path = %path.display(), bytes = text.len(), "read file");
    Ok(text)
}

/// Parse a comma-separated file into rows of fields.
///
/// There is no header row. Every record must have the same number of fields
/// as the first one. Blank lines are skipped. Quotes are strict: a `"` may
/// only open a field, and a quoted field must be closed before a separator,
/// line end or end of file.
#[cfg(feature = "csv")]
pub fn csv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io("opening the file", path, e))?;

    if let Some((line, reason)) = find_quote_error(&data) {
        return Err(Error::CsvQuote {
            path: path.to_path_buf(),
            line,
            reason,
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(false)
        .from_reader(data.as_slice());

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| Error::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(str::to_owned).collect());
    }

    debug!(path = %path.display(), rows = rows.len(), "parsed csv");
    Ok(rows)
}

/// Parse a comma-separated file and keep only the first field of each row.
///
/// Rows without any field are skipped.
#[cfg(feature = "csv")]
pub fn simple_csv(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let rows = csv(path)?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.into_iter().next())
        .collect())
}

#[cfg(feature = "csv")]
#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Bare,
    Quoted,
    QuoteInQuoted,
}

/// Line (1-based) and reason of the first quoting error in `data`.
///
/// The `csv` reader treats stray quotes as literal text and lets an
/// unterminated quoted field run to end of file, so those cases are caught
/// here before parsing.
#[cfg(feature = "csv")]
fn find_quote_error(data: &[u8]) -> Option<(u64, &'static str)> {
    const BARE: &str = "bare \" in non-quoted field";
    const EXTRANEOUS: &str = "extraneous or missing \" in quoted field";

    let mut state = QuoteState::FieldStart;
    let mut line = 1u64;
    let mut field_line = 1u64;

    for (i, &b) in data.iter().enumerate() {
        state = match (state, b) {
            (QuoteState::FieldStart, b'"') => {
                field_line = line;
                QuoteState::Quoted
            }
            (QuoteState::Bare, b'"') => return Some((line, BARE)),
            (QuoteState::FieldStart | QuoteState::Bare, b',') => QuoteState::FieldStart,
            (QuoteState::FieldStart | QuoteState::Bare, _) => QuoteState::Bare,
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, b',' | b'\n') => QuoteState::FieldStart,
            (QuoteState::QuoteInQuoted, b'\r') if data.get(i + 1) == Some(&b'\n') => {
                QuoteState::FieldStart
            }
            (QuoteState::QuoteInQuoted, _) => return Some((line, EXTRANEOUS)),
        };
        if b == b'\n' {
            line += 1;
            if state == QuoteState::Bare {
                state = QuoteState::FieldStart;
            }
        }
    }

    (state == QuoteState::Quoted).then_some((field_line, EXTRANEOUS))
}


/// Read `path` and decode it as JSON into a new `T`.
pub fn json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|e| Error::io("loading the json file", path, e))?;
    let value = serde_json::from_slice(&data).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = data.len(), "decoded json");
    Ok(value)
}

/// Decode the JSON file at `path` into `dest`.
///
/// On failure `dest` is left exactly as it was.
pub fn json_into<T: DeserializeOwned>(path: impl AsRef<Path>, dest: &mut T) -> Result<()> {
    *dest = json(path)?;
    Ok(())
}

/// Read `path` and decode it as TOML into a new `T`.
#[cfg(feature = "toml")]
pub fn toml<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let text =
        fs::read_to_string(path).map_err(|e| Error::io("loading the toml file", path, e))?;
    let value = toml::from_str(&text).map_err(|source| Error::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "decoded toml");
    Ok(value)
}

/// Decode the TOML file at `path` into `dest`.
///
/// On failure `dest` is left exactly as it was.
#[cfg(feature = "toml")]
pub fn toml_into<T: DeserializeOwned>(path: impl AsRef<Path>, dest: &mut T) -> Result<()> {
    *dest = toml(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Settings {
        name: String,
        retries: u32,
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.txt");

        let err = bytes(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::NotFound)
        );
        assert_eq!(string(&path).unwrap_err().kind(), ErrorKind::Io);
    }

    #[test]
    fn test_string_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bin");
        fs::write(&path, [0xffu8, 0xfe, 0x00]).unwrap();

        assert_eq!(bytes(&path).unwrap(), vec![0xffu8, 0xfe, 0x00]);
        assert_eq!(string(&path).unwrap_err().kind(), ErrorKind::Io);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_quoted_fields() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("q.csv");
        fs::write(&path, "\"a,1\",\"say \"\"hi\"\"\"\nb,\n").unwrap();

        let rows = csv(&path).unwrap();
        assert_eq!(
            rows,
            vec![
                vec!["a,1".to_string(), "say \"hi\"".to_string()],
                vec!["b".to_string(), String::new()],
            ]
        );
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_inconsistent_field_count() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.csv");
        fs::write(&path, "a,b\nc\n").unwrap();

        let err = csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().starts_with("error parsing the csv"));
        assert_eq!(simple_csv(&path).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_unterminated_quote() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("open.csv");
        fs::write(&path, "x,y\n\"abc,def\n").unwrap();

        let err = csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("extraneous or missing"));
        assert!(matches!(err, Error::CsvQuote { line: 2, .. }));
        assert_eq!(simple_csv(&path).unwrap_err().kind(), ErrorKind::Parse);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_bare_quote() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bare.csv");
        fs::write(&path, "a\"b,c\n").unwrap();

        let err = csv(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("bare \" in non-quoted field"));
        assert!(matches!(err, Error::CsvQuote { line: 1, .. }));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_text_after_closing_quote() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("trail.csv");
        fs::write(&path, "ok,fine\n\"a\"b,c\n").unwrap();

        assert!(matches!(
            csv(&path).unwrap_err(),
            Error::CsvQuote { line: 2, .. }
        ));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_quoted_newline_and_crlf() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("multi.csv");
        fs::write(&path, "\"one\ntwo\",x\r\n\"y\",\"z\"\r\n").unwrap();

        let rows = csv(&path).unwrap();
        assert_eq!(rows, vec![vec!["one\ntwo", "x"], vec!["y", "z"]]);
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = csv(temp_dir.path().join("none.csv")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("error opening the file"));
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_simple_csv_skips_blank_lines() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("ids.csv");
        fs::write(&path, "one\n\ntwo\n").unwrap();

        assert_eq!(simple_csv(&path).unwrap(), vec!["one", "two"]);
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_decode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "name = \"svc\"\nretries = 3\n").unwrap();

        let settings: Settings = toml(&path).unwrap();
        assert_eq!(
            settings,
            Settings {
                name: "svc".to_string(),
                retries: 3
            }
        );
    }

    #[cfg(feature = "toml")]
    #[test]
    fn test_toml_schema_mismatch_keeps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        fs::write(&path, "name = \"svc\"\nretries = \"many\"\n").unwrap();

        let mut settings = Settings {
            name: "old".to_string(),
            retries: 1,
        };
        let err = toml_into(&path, &mut settings).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.to_string().starts_with("error decoding the toml file"));
        assert_eq!(settings.name, "old");
        assert_eq!(settings.retries, 1);
    }

    #[test]
    fn test_json_into_replaces_destination() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"name":"svc","retries":5}"#).unwrap();

        let mut settings = Settings::default();
        json_into(&path, &mut settings).unwrap();
        assert_eq!(settings.retries, 5);
    }

    #[test]
    fn test_malformed_json_keeps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{"name":"svc","#).unwrap();

        let mut settings = Settings {
            name: "old".to_string(),
            retries: 2,
        };
        let err = json_into(&path, &mut settings).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Decode);
        assert_eq!(settings.name, "old");
    }

    #[test]
    fn test_json_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = json::<Settings>(temp_dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("error loading the json file"));
    }
}
