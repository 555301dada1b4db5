//! Configuration loading and validation for the tutorkit policy engine.
//!
//! Loads engine options from `~/.tutorkit/config.toml`. The strategy
//! *table* is fixed in code (it is part of the versioned policy); config
//! only selects which strategy a deployment defaults to and which option
//! knobs the engine runs with.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tutorkit_policy::{AutoEscalation, EngineOptions, ErrorResetPolicy, StrategyRegistry};

/// The root configuration structure.
///
/// Maps directly to `~/.tutorkit/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyEngineConfig {
    /// Strategy assigned to learners without an explicit profile choice.
    #[serde(default = "default_strategy")]
    pub default_strategy: String,

    /// How the escalation rule's guard is composed.
    #[serde(default)]
    pub auto_escalation: AutoEscalation,

    /// When the per-attempt error counter resets.
    #[serde(default)]
    pub error_reset: ErrorResetPolicy,
}

fn default_strategy() -> String {
    "adaptive-medium".into()
}

impl PolicyEngineConfig {
    /// Load configuration from the default path (`~/.tutorkit/config.toml`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_dir().join("config.toml"))
    }

    /// Load configuration from a specific file path.
    ///
    /// A missing file is not an error: the defaults apply.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".tutorkit")
    }

    /// Validate the configuration.
    ///
    /// The default strategy must resolve against the built-in registry —
    /// a typo here must fail at startup, not silently fall back and skew
    /// recorded decisions.
    pub fn validate(&self) -> Result<(), ConfigError> {
        StrategyRegistry::builtin()
            .resolve(&self.default_strategy)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        Ok(())
    }

    /// The engine option knobs this configuration selects.
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            auto_escalation: self.auto_escalation,
            error_reset: self.error_reset,
        }
    }

    /// Generate a default config TOML string (starter file).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

impl Default for PolicyEngineConfig {
    fn default() -> Self {
        Self {
            default_strategy: default_strategy(),
            auto_escalation: AutoEscalation::default(),
            error_reset: ErrorResetPolicy::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
