//! Configuration file loading with precedence handling.

use crate::layout::{LayoutConfig, Strategy};
use crate::model::Direction;
use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;
use tracing::warn;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "VLAYOUT_CONFIG";
/// Environment variable overriding the scroll direction.
pub const DIRECTION_ENV: &str = "VLAYOUT_DIRECTION";
/// Environment variable overriding the layout strategy.
pub const STRATEGY_ENV: &str = "VLAYOUT_STRATEGY";

/// Errors that can occur during config loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Config file path contains invalid UTF-8 or cannot be resolved.
    #[error("Invalid config path: {0}")]
    InvalidPath(String),

    /// Failed to read config file (permission issues, directory, ...).
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError {
        /// Path that failed to read.
        path: PathBuf,
        /// Reason for failure.
        reason: String,
    },

    /// Config file contains invalid TOML or unknown keys.
    #[error("Invalid TOML in {path}: {reason}")]
    ParseError {
        /// Path with invalid TOML.
        path: PathBuf,
        /// Parse error details.
        reason: String,
    },
}

/// TOML configuration file structure.
///
/// All fields are optional; unset fields fall back to hardcoded defaults.
/// Corresponds to `~/.config/vlayout/config.toml`:
///
/// ```toml
/// strategy = "flex"
/// seed = 7
///
/// [layout]
/// direction = "vertical"
/// spacing = 4.0
/// ideal_size = 180.0
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Layout strategy (`grid`, `natural-size-grid` or `flex`).
    #[serde(default)]
    pub strategy: Option<Strategy>,

    /// Seed for flex aspect-ratio estimation.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Path to log file for tracing output.
    #[serde(default)]
    pub log_file_path: Option<PathBuf>,

    /// Layout overrides.
    #[serde(default)]
    pub layout: Option<LayoutConfig>,
}

/// Resolved configuration after applying precedence rules.
///
/// Created by merging defaults, config file, env vars, and CLI args.
/// `layout` is still a set of overrides; it is validated when a layout is
/// built from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Layout strategy.
    pub strategy: Strategy,
    /// Seed for flex estimation; entropy when absent.
    pub seed: Option<u64>,
    /// Layout overrides on top of the engine defaults.
    pub layout: LayoutConfig,
    /// Path to log file for tracing output.
    pub log_file_path: PathBuf,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            seed: None,
            layout: LayoutConfig::default(),
            log_file_path: default_log_path(),
        }
    }
}

/// Resolve default log file path.
///
/// Returns `~/.local/state/vlayout/vlayout.log` on Linux, or the platform's
/// state directory elsewhere. Falls back to the current directory when no
/// state directory exists.
pub fn default_log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        state_dir.join("vlayout").join("vlayout.log")
    } else {
        PathBuf::from("vlayout.log")
    }
}

/// Load configuration file from a specific path.
///
/// Returns `Ok(None)` if the file doesn't exist (not an error, use defaults).
///
/// # Errors
///
/// Returns error if the file exists but has read or parse errors.
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
/// Returns `~/.config/vlayout/config.toml` on Linux, the platform equivalent
/// elsewhere, or `None` if no config directory can be determined.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vlayout").join("config.toml"))
}

/// Load configuration with precedence handling.
///
/// Precedence (highest to lowest):
/// 1. Explicit `config_path` argument (CLI `--config`)
/// 2. `VLAYOUT_CONFIG` environment variable
/// 3. Default path `~/.config/vlayout/config.toml`
///
/// Missing config files are NOT errors; defaults are used.
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

    match std::env::var(CONFIG_ENV) {
        Ok(env_path) if env_path.is_empty() => {
            return Err(ConfigError::InvalidPath(format!("{CONFIG_ENV} is empty")));
        }
        Ok(env_path) => return load_config_file(PathBuf::from(env_path)),
        Err(std::env::VarError::NotUnicode(raw)) => {
            return Err(ConfigError::InvalidPath(raw.to_string_lossy().into_owned()));
        }
        Err(std::env::VarError::NotPresent) => {}
    }

    if let Some(default_path) = default_config_path() {
        return load_config_file(default_path);
    }

    Ok(None)
}

/// Merge config file into defaults to create resolved config.
///
/// For each field in `ConfigFile`, if `Some(value)`, use it; otherwise use
/// the default.
pub fn merge_config(config_file: Option<ConfigFile>) -> ResolvedConfig {
    let defaults = ResolvedConfig::default();

    let Some(config) = config_file else {
        return defaults;
    };

    ResolvedConfig {
        strategy: config.strategy.unwrap_or(defaults.strategy),
        seed: config.seed.or(defaults.seed),
        layout: config.layout.unwrap_or(defaults.layout),
        log_file_path: config.log_file_path.unwrap_or(defaults.log_file_path),
    }
}

/// Apply environment variable overrides to resolved config.
///
/// Checks for:
/// - `VLAYOUT_DIRECTION`: `vertical` or `horizontal`
/// - `VLAYOUT_STRATEGY`: `grid`, `natural-size-grid` or `flex`
///
/// Unparseable values are logged and ignored.
pub fn apply_env_overrides(mut config: ResolvedConfig) -> ResolvedConfig {
    if let Ok(raw) = std::env::var(DIRECTION_ENV) {
        match raw.parse::<Direction>() {
            Ok(direction) => config.layout.direction = Some(direction),
            Err(reason) => warn!(var = DIRECTION_ENV, %reason, "ignoring override"),
        }
    }

    if let Ok(raw) = std::env::var(STRATEGY_ENV) {
        match raw.parse::<Strategy>() {
            Ok(strategy) => config.strategy = strategy,
            Err(reason) => warn!(var = STRATEGY_ENV, %reason, "ignoring override"),
        }
    }

    config
}

/// Apply CLI argument overrides to resolved config.
///
/// CLI args have the highest precedence and override all other sources.
/// Only fields explicitly set by the user are applied; unset fields in
/// `layout` keep their current value.
///
/// Precedence chain: Defaults → Config File → Env Vars → CLI Args (highest)
pub fn apply_cli_overrides(
    mut config: ResolvedConfig,
    strategy_override: Option<Strategy>,
    seed_override: Option<u64>,
    layout_override: &LayoutConfig,
) -> ResolvedConfig {
    if let Some(strategy) = strategy_override {
        config.strategy = strategy;
    }

    if let Some(seed) = seed_override {
        config.seed = Some(seed);
    }

    config.layout = config.layout.overlay(layout_override);
    config
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
