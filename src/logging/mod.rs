//! Tracing subscriber initialization.
//!
//! Logs go to a file so they never interleave with the filtered records
//! printed on stdout. Monitor them with `tail -f`.

use crate::config::ResolvedConfig;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log file installed by the first successful [`init`].
static ACTIVE_LOG_FILE: Mutex<Option<PathBuf>> = Mutex::new(None);

/// Error type for logging initialization failures.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Failed to create log directory
    #[error("Failed to create log directory at {path:?}: {source}")]
    DirectoryCreation {
        /// The directory path that failed to be created
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Invalid log file path (no filename component)
    #[error("Invalid log file path: {0:?}")]
    InvalidPath(PathBuf),

    /// Configured `log_level` is not a valid filter directive
    #[error("Invalid log level {level:?}: {reason}")]
    InvalidLevel {
        /// Directive as configured.
        level: String,
        /// Parser error text.
        reason: String,
    },

    /// Another tracing subscriber was installed outside logsift
    #[error("Tracing subscriber already initialized")]
    SubscriberAlreadySet,
}

/// Initialize file-based tracing from the resolved configuration.
///
/// `RUST_LOG` wins when set and valid; otherwise `config.log_level` is the
/// filter. Events are written to `config.log_file_path` without ANSI colors,
/// never to stdout or stderr.
///
/// Calling `init` again after it succeeded is a no-op that returns the log
/// file already in use, even if `config` names another path.
///
/// # Errors
///
/// Fails if the log directory cannot be created, the path has no file name,
/// the configured level does not parse, or a foreign subscriber is installed.
pub fn init(config: &ResolvedConfig) -> Result<PathBuf, LoggingError> {
    let mut active = ACTIVE_LOG_FILE
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(path) = active.as_ref() {
        tracing::debug!(log_file = %path.display(), "Logging already initialized");
        return Ok(path.clone());
    }

    let (directory, file_name) = prepare_log_file(&config.log_file_path)?;
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => default_filter(&config.log_level)?,
    };

    let file_appender = tracing_appender::rolling::never(directory, file_name);
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(file_appender)
        .with_ansi(false)
        .try_init()
        .map_err(|_| LoggingError::SubscriberAlreadySet)?;

    *active = Some(config.log_file_path.clone());
    Ok(config.log_file_path.clone())
}

/// Split `log_path` into directory and file name, creating the directory.
fn prepare_log_file(log_path: &Path) -> Result<(PathBuf, String), LoggingError> {
    let file_name = log_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(log_path.to_path_buf()))?
        .to_string();

    // A bare file name logs into the working directory.
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    std::fs::create_dir_all(&directory).map_err(|source| LoggingError::DirectoryCreation {
        path: directory.clone(),
        source,
    })?;

    Ok((directory, file_name))
}

fn default_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLevel {
        level: level.to_string(),
        reason: e.to_string(),
    })
}
