//! Log input sources.
//!
//! One call reads a whole JSONL file (or piped stdin) into memory and parses
//! it: a single load event producing the ordered record array.

use crate::model::error::InputError;
use crate::model::Record;
use crate::parser::parse_records;
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// A JSONL file on disk.
    File(PathBuf),
    /// Piped standard input.
    Stdin,
}

/// Detect the input source.
///
/// # Errors
///
/// Returns `InputError::NoInput` if no file is provided and stdin is a terminal.
pub fn detect_input_source(file: Option<PathBuf>) -> Result<InputSource, InputError> {
    match file {
        Some(path) => Ok(InputSource::File(path)),
        None if std::io::stdin().is_terminal() => Err(InputError::NoInput),
        None => Ok(InputSource::Stdin),
    }
}

impl InputSource {
    /// Read and parse every record from the source.
    ///
    /// # Errors
    ///
    /// Returns `InputError::FileNotFound` if the file does not exist,
    /// `InputError::Io` for other read failures.
    pub fn load(&self) -> Result<Vec<Record>, InputError> {
        let contents = match self {
            InputSource::File(path) => read_file(path)?,
            InputSource::Stdin => {
                let mut buf = String::new();
                std::io::stdin().lock().read_to_string(&mut buf)?;
                buf
            }
        };
        let records = parse_records(&contents);
        info!(source = ?self, records = records.len(), "Read log input");
        Ok(records)
    }
}

fn read_file(path: &Path) -> Result<String, InputError> {
    if !path.exists() {
        return Err(InputError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_reads_all_records_from_file() {
        let test_file = std::env::temp_dir().join("logsift_source_load.jsonl");
        let content = r#"{"type":"user","message":{"role":"user","content":"First"},"sessionId":"s1","uuid":"u1","timestamp":"2025-12-27T10:00:00Z"}
{"type":"assistant","message":{"role":"assistant","content":"Second"},"sessionId":"s1","uuid":"u2","timestamp":"2025-12-27T10:00:01Z"}
"#;
        fs::write(&test_file, content).unwrap();

        let source = detect_input_source(Some(test_file.clone())).unwrap();
        let result = source.load();
        let _ = fs::remove_file(&test_file);

        let records = result.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].role().unwrap().as_str(), "assistant");
    }

    #[test]
    fn load_reports_missing_file() {
        let source = InputSource::File(PathBuf::from("/nonexistent/logsift/missing.jsonl"));

        match source.load() {
            Err(InputError::FileNotFound { path }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/logsift/missing.jsonl"));
            }
            other => panic!("Expected FileNotFound, got {:?}", other),
        }
    }

    #[test]
    fn explicit_file_is_always_the_source() {
        let source = detect_input_source(Some(PathBuf::from("any.jsonl"))).unwrap();
        assert_eq!(source, InputSource::File(PathBuf::from("any.jsonl")));
    }
}
