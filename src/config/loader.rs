//! Configuration file loading with precedence handling.

use crate::filter::cache::{DEFAULT_CACHE_CAPACITY, MAX_CACHE_CAPACITY};
use crate::filter::debounce::DEFAULT_SEARCH_DEBOUNCE_MS;
use crate::filter::engine::DEFAULT_ERROR_LOG_CAPACITY;
use crate::filter::SessionConfig;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Env var naming an explicit config file.
pub const ENV_CONFIG: &str = "LOGSIFT_CONFIG";
/// Env var overriding `cache_capacity`.
pub const ENV_CACHE_CAPACITY: &str = "LOGSIFT_CACHE_CAPACITY";
/// Env var overriding `search_debounce_ms`.
pub const ENV_SEARCH_DEBOUNCE_MS: &str = "LOGSIFT_SEARCH_DEBOUNCE_MS";
/// Env var overriding `log_level`.
pub const ENV_LOG_LEVEL: &str = "LOGSIFT_LOG";

/// Default tracing filter directive when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (file may not exist or have permission issues).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O error text.
        reason: String,
    },

    /// Config file contains invalid TOML syntax.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// File that failed to parse.
        path: PathBuf,
        /// TOML error text.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional - if not specified, hardcoded defaults are used.
/// Corresponds to `~/.config/logsift/config.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Maximum number of cached searchable texts.
    #[serde(default)]
    pub cache_capacity: Option<usize>,

    /// Delay between the last search keystroke and recomputation.
    #[serde(default)]
    pub search_debounce_ms: Option<u64>,

    /// Number of malformed-record errors retained.
    #[serde(default)]
    pub error_log_capacity: Option<usize>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Default tracing filter directive, e.g. `"debug"` or `"logsift=trace"`.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Searchable-text cache capacity (0 selects the default).
    pub cache_capacity: usize,
    /// Search debounce delay in milliseconds.
    pub search_debounce_ms: u64,
    /// Retained malformed-record errors.
    pub error_log_capacity: usize,
    /// Tracing output file.
    pub log_file_path: PathBuf,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            error_log_capacity: DEFAULT_ERROR_LOG_CAPACITY,
            log_file_path: default_log_path(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ResolvedConfig {
    /// Filtering tunables derived from this config.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            cache_capacity: self.cache_capacity,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            error_log_capacity: self.error_log_capacity,
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/logsift/logsift.log` on Unix-like systems,
/// or appropriate platform path on other systems.
///
/// If state directory cannot be determined, falls back to current directory.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("logsift").join("logsift.log")
    } else {
        PathBuf::from("logsift.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if file doesn't exist (not an error - use defaults).
///
/// # Errors
///
/// Returns error if file exists but has read or parse errors.
pub fn load_config_file(path: impl Into<PathBuf>) -> Result<Option<ConfigFile>, ConfigError> {
    let path = path.into();

    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| ConfigError::ReadError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let config: ConfigFile = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    Ok(Some(config))
}

/// Resolve default config file path.
///
/// Returns `~/.config/logsift/config.toml` on Unix, appropriate path on other platforms.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("logsift").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `LOGSIFT_CONFIG` environment variable
/// 3. Default path `~/.config/logsift/config.toml`
///
/// # Errors
///
/// Returns error only if a config file exists but cannot be read or parsed.
pub fn load_config_with_precedence(
    config_path: Option<PathBuf>,
) -> Result<Option<ConfigFile>, ConfigError> {
    if let Some(path) = config_path {
        return load_config_file(path);
    }

    if let Ok(env_path) = std::env::var(ENV_CONFIG) {
        return load_config_file(PathBuf::from(env_path));
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        cache_capacity: config
            .cache_capacity
            .map_or(defaults.cache_capacity, |n| clamp_cache_capacity(n, "config file")),
        search_debounce_ms: config
            .search_debounce_ms
            .unwrap_or(defaults.search_debounce_ms),
        error_log_capacity: config
            .error_log_capacity
            .unwrap_or(defaults.error_log_capacity),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
        log_level: config.log_level.unwrap_or(defaults.log_level),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks `LOGSIFT_CACHE_CAPACITY`, `LOGSIFT_SEARCH_DEBOUNCE_MS` and
/// `LOGSIFT_LOG`. Unparseable values are ignored with a warning.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Some(capacity) = env_number::<usize>(ENV_CACHE_CAPACITY) {
        config.cache_capacity = clamp_cache_capacity(capacity, ENV_CACHE_CAPACITY);
    }
    if let Some(ms) = env_number::<u64>(ENV_SEARCH_DEBOUNCE_MS) {
        config.search_debounce_ms = ms;
    }
    if let Ok(level) = std::env::var(ENV_LOG_LEVEL) {
        let level = level.trim();
        if !level.is_empty() {
            config.log_level = level.to_string();
        }
    }
    config
}

/// Cap a requested cache capacity at [`MAX_CACHE_CAPACITY`].
fn clamp_cache_capacity(requested: usize, origin: &str) -> usize {
    if requested > MAX_CACHE_CAPACITY {
        warn!(
            origin,
            requested,
            max = MAX_CACHE_CAPACITY,
            "Cache capacity too large, clamping"
        );
        MAX_CACHE_CAPACITY
    } else {
        requested
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(var = name, value = %raw, "Ignoring non-numeric environment override");
            None
        }
    }
}

/// Apply CLI argument overrides to resolved config.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    cache_capacity_override: Option<usize>,
) -> ResolvedConfig {
    if let Some(capacity) = cache_capacity_override {
        config.cache_capacity = clamp_cache_capacity(capacity, "--cache-capacity");
    }
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
