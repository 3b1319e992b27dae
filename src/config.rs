//! Application configuration loaded from TOML.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use strum::Display as StrumDisplay;
use tracing::{debug, info, instrument};

use crate::catalog::{HttpUniverseProvider, MockUniverseProvider, UniverseProvider};
use crate::round::TieBreak;

/// Config file read when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "spyx_missions.toml";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database holding the stored records.
    #[serde(default = "default_db_path")]
    db_path: String,

    /// Log file used while the terminal UI runs.
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Directory with backdrop text art.
    #[serde(default = "default_asset_dir")]
    asset_dir: PathBuf,

    /// Reference data source.
    #[serde(default)]
    provider: ProviderConfig,

    /// Animation timing.
    #[serde(default)]
    timing: TimingConfig,

    /// Game rules.
    #[serde(default)]
    rules: RulesConfig,
}

/// Which reference data provider to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, StrumDisplay, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ProviderKind {
    /// Built-in catalog with simulated latency.
    #[default]
    Mock,
    /// JSON over HTTP.
    Http,
}

/// `[provider]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    kind: ProviderKind,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default = "default_mock_delay_ms")]
    mock_delay_ms: u64,
}

/// `[timing]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_fade_ms")]
    fade_ms: u64,
}

/// `[rules]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    tie_break: TieBreak,
}

fn default_db_path() -> String {
    "spyx_missions.db".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("spyx_missions.log")
}

fn default_asset_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_mock_delay_ms() -> u64 {
    500
}

fn default_fade_ms() -> u64 {
    200
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_file: default_log_file(),
            asset_dir: default_asset_dir(),
            provider: ProviderConfig::default(),
            timing: TimingConfig::default(),
            rules: RulesConfig::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::default(),
            base_url: None,
            mock_delay_ms: default_mock_delay_ms(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            fade_ms: default_fade_ms(),
        }
    }
}

impl TimingConfig {
    /// Returns the length of each half of a screen transition.
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms)
    }
}

impl AppConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(db_path = %config.db_path, provider = %config.provider.kind, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            debug!("No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Replaces the database path.
    pub fn with_db_path(mut self, db_path: impl Into<String>) -> Self {
        self.db_path = db_path.into();
        self
    }

    /// Builds the configured reference data provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the HTTP provider has no usable base URL.
    #[instrument(skip(self), fields(kind = %self.provider.kind))]
    pub fn build_provider(&self) -> Result<Arc<dyn UniverseProvider>, ConfigError> {
        match self.provider.kind {
            ProviderKind::Mock => Ok(Arc::new(MockUniverseProvider::with_delay(
                Duration::from_millis(self.provider.mock_delay_ms),
            ))),
            ProviderKind::Http => {
                let base_url = self.provider.base_url.as_deref().ok_or_else(|| {
                    ConfigError::new("provider.base_url is required for the http provider")
                })?;
                let provider = HttpUniverseProvider::new(base_url)
                    .map_err(|e| ConfigError::new(format!("Invalid provider: {}", e)))?;
                Ok(Arc::new(provider))
            }
        }
    }
}

location_error!(
    /// Configuration error.
    ConfigError,
    "Config error"
);
