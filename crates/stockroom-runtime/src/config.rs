//! # Stockroom Configuration
//!
//! Configuration for the SKU policy and logging.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKROOM_SKU_MAX_LENGTH=32                                        │
//! │     STOCKROOM_SKU_ALLOW_LOWERCASE=false                                │
//! │     STOCKROOM_LOG=debug                                                │
//! │     STOCKROOM_LOG_FORMAT=compact                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockroom/stockroom.toml (Linux)                         │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [sku]
//! max_length = 50
//! allow_lowercase = true
//!
//! [logging]
//! filter = "info,stockroom=debug"
//! format = "pretty"   # pretty | compact
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stockroom_core::{SkuPolicy, MAX_SKU_LENGTH};
use tracing::{debug, info, warn};

use crate::error::{RuntimeError, RuntimeResult};

/// Upper bound accepted for `sku.max_length`.
pub const SKU_MAX_LENGTH_LIMIT: usize = 255;

// =============================================================================
// SKU Settings
// =============================================================================

/// SKU syntax settings, turned into a [`SkuPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuSettings {
    #[serde(default = "default_sku_max_length")]
    pub max_length: usize,

    #[serde(default = "default_true")]
    pub allow_lowercase: bool,
}

fn default_sku_max_length() -> usize {
    MAX_SKU_LENGTH
}

fn default_true() -> bool {
    true
}

impl Default for SkuSettings {
    fn default() -> Self {
        SkuSettings {
            max_length: default_sku_max_length(),
            allow_lowercase: true,
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Output layout of the fmt subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Multi-line, human oriented.
    #[default]
    Pretty,

    /// One line per event.
    Compact,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Compact => write!(f, "compact"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = RuntimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" | "line" => Ok(LogFormat::Compact),
            other => Err(RuntimeError::InvalidConfig(format!(
                "Unknown log format: '{}'. Valid options: pretty, compact",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_log_filter")]
    pub filter: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "info,stockroom=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete stockroom configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockroomConfig {
    #[serde(default)]
    pub sku: SkuSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl StockroomConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`stockroom.toml`), if it exists
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> RuntimeResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading stockroom config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load stockroom config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying env overrides or validation.
    pub fn from_file(path: &Path) -> RuntimeResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> RuntimeResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| RuntimeError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Stockroom config saved");
        Ok(())
    }

    pub fn validate(&self) -> RuntimeResult<()> {
        if self.sku.max_length == 0 || self.sku.max_length > SKU_MAX_LENGTH_LIMIT {
            return Err(RuntimeError::InvalidConfig(format!(
                "sku.max_length must be between 1 and {}, got {}",
                SKU_MAX_LENGTH_LIMIT, self.sku.max_length
            )));
        }

        if self.logging.filter.trim().is_empty() {
            return Err(RuntimeError::InvalidConfig(
                "logging.filter must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STOCKROOM_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("STOCKROOM_SKU_MAX_LENGTH") {
            match value.parse::<usize>() {
                Ok(len) => {
                    debug!(max_length = len, "Overriding SKU max length from environment");
                    self.sku.max_length = len;
                }
                Err(_) => warn!(value = %value, "Ignoring non-numeric STOCKROOM_SKU_MAX_LENGTH"),
            }
        }

        if let Some(value) = lookup("STOCKROOM_SKU_ALLOW_LOWERCASE") {
            match value.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.sku.allow_lowercase = true,
                "0" | "false" | "no" => self.sku.allow_lowercase = false,
                _ => warn!(value = %value, "Ignoring STOCKROOM_SKU_ALLOW_LOWERCASE"),
            }
        }

        if let Some(filter) = lookup("STOCKROOM_LOG") {
            debug!(filter = %filter, "Overriding log filter from environment");
            self.logging.filter = filter;
        }

        if let Some(format) = lookup("STOCKROOM_LOG_FORMAT") {
            match format.parse() {
                Ok(parsed) => self.logging.format = parsed,
                Err(_) => warn!(format = %format, "Unknown log format in environment"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockroom", "stockroom")
            .map(|dirs| dirs.config_dir().join("stockroom.toml"))
    }

    /// The SKU policy these settings describe.
    pub fn sku_policy(&self) -> SkuPolicy {
        SkuPolicy {
            max_length: self.sku.max_length,
            allow_lowercase: self.sku.allow_lowercase,
        }
    }
}
