//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::calculate::head_to_head::DEFAULT_RECENT_LIMIT;
use crate::calculate::momentum::DEFAULT_SPAN;
use crate::models::BlendWeights;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Tuning for the momentum, head-to-head and prediction calculators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// EMA span; α = 2 / (span + 1)
    #[serde(default = "default_momentum_span")]
    pub momentum_span: u32,

    /// Cap on `recent_matches` in head-to-head responses
    #[serde(default = "default_recent_matches_limit")]
    pub recent_matches_limit: usize,

    #[serde(default)]
    pub weights: BlendWeights,
}

fn default_momentum_span() -> u32 {
    DEFAULT_SPAN
}

fn default_recent_matches_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            momentum_span: default_momentum_span(),
            recent_matches_limit: default_recent_matches_limit(),
            weights: BlendWeights::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.momentum_span == 0 {
            return Err(ConfigError::ValidationError(
                "Momentum span must be greater than 0".to_string(),
            ));
        }

        let w = &self.weights;
        let all = [w.h2h, w.momentum, w.goals, w.streak];
        if all.iter().any(|x| !x.is_finite() || *x < 0.0) {
            return Err(ConfigError::ValidationError(
                "Prediction weights must be non-negative numbers".to_string(),
            ));
        }
        if w.sum() <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Prediction weights must not all be zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origin() -> String {
    "*".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origin: default_cors_origin(),
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Root holding `datasets/<year>/worldcup.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            server: ServerConfig::default(),
            analytics: AnalyticsConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            debug!("No config file at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "Server port must be greater than 0".to_string(),
            ));
        }

        self.analytics.validate()
    }
}
