//! Error types for logsift.
//!
//! This module defines a hierarchical error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error of the command-line shell
//!   - [`InputError`] - Log file/stdin reading failures
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!   - `std::io::Error` - Writing results to stdout
//! - [`ParseError`] - JSONL parsing failures, kept inside malformed records
//! - [`RecordError`] - Role/tool extraction failure inside the filtering engine
//!
//! # Error Recovery Strategy
//!
//! Parsing errors are **non-fatal**: malformed JSONL lines become malformed records that
//! keep their position in the record array. The filtering engine never returns an error:
//! a [`RecordError`] excludes the offending record and is appended to the engine's error
//! log. Input, config and output errors are fatal and propagate to `main`.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
///
/// # Examples
///
/// ```no_run
/// use logsift::model::error::{AppError, InputError};
///
/// fn run_app() -> Result<(), AppError> {
///     // InputError automatically converts to AppError via From
///     let _input = read_log_file()?;
///     Ok(())
/// }
/// # fn read_log_file() -> Result<(), InputError> { Ok(()) }
/// ```
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read input from file or stdin.
    #[error("Failed to read input: {0}")]
    InputRead(#[from] InputError),

    /// Config file exists but could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Tracing could not be initialized.
    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] LoggingError),

    /// Writing results failed (closed pipe, full disk).
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading log input from files or stdin.
#[derive(Debug, Error)]
pub enum InputError {
    /// The specified log file does not exist at the given path.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use logsift::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.jsonl")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.jsonl"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// Path that could not be found
        path: PathBuf,
    },

    /// No file argument was given and stdin is a terminal.
    #[error("No input source: provide a file path or pipe data to stdin")]
    NoInput,

    /// Reading the file or stdin failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from parsing a single JSONL line.
///
/// Never propagated past the parser: the message is stored in a
/// [`MalformedRecord`](crate::model::MalformedRecord).
#[derive(Debug, Error)]
pub enum ParseError {
    /// Line is not valid JSON or does not match the entry shape.
    #[error("Invalid JSON at line {line}: {message}")]
    InvalidJson {
        /// 1-based input line.
        line: usize,
        /// serde_json error text.
        message: String,
    },

    /// A field every entry needs is absent.
    #[error("Missing required field '{field}' at line {line}")]
    MissingField {
        /// 1-based input line.
        line: usize,
        /// Name of the missing field.
        field: &'static str,
    },

    /// Timestamp is not RFC 3339.
    #[error("Invalid timestamp '{raw}' at line {line}")]
    InvalidTimestamp {
        /// 1-based input line.
        line: usize,
        /// Timestamp text as found.
        raw: String,
    },
}

/// Role or tool extraction failed for one record.
///
/// Recovered locally by the filtering engine (the record is excluded).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// The record came from a line that failed to parse.
    #[error("Malformed record at line {line}: {reason}")]
    Malformed {
        /// 1-based input line.
        line: usize,
        /// Parse failure message.
        reason: String,
    },
}
