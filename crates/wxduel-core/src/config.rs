use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Location the dashboard reports on
    #[serde(default)]
    pub location: LocationConfig,

    /// Forecast fetching settings
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Model battle settings
    #[serde(default)]
    pub battle: BattleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        // Same fallback location the dashboard has always used.
        Self {
            latitude: 45.42,
            longitude: -75.69,
            city: "Ottawa".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of future days a forecast covers
    #[serde(default = "default_horizon_days")]
    pub horizon_days: usize,

    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Open-Meteo historical archive endpoint
    #[serde(default = "default_archive_url")]
    pub archive_url: String,

    /// Timeout for forecast requests, in seconds
    #[serde(default = "default_forecast_timeout")]
    pub forecast_timeout_secs: u64,

    /// Timeout for bulk archive requests, in seconds
    #[serde(default = "default_archive_timeout")]
    pub archive_timeout_secs: u64,
}

fn default_horizon_days() -> usize {
    7
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_archive_url() -> String {
    "https://archive-api.open-meteo.com/v1/archive".to_string()
}

fn default_forecast_timeout() -> u64 {
    10
}

fn default_archive_timeout() -> u64 {
    15
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            forecast_url: default_forecast_url(),
            archive_url: default_archive_url(),
            forecast_timeout_secs: default_forecast_timeout(),
            archive_timeout_secs: default_archive_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleConfig {
    /// Tie threshold for temperature errors, in degrees Celsius
    #[serde(default = "default_temperature_threshold")]
    pub temperature_threshold_c: f64,

    /// Tie threshold for precipitation errors, in percentage points
    #[serde(default = "default_precipitation_threshold")]
    pub precipitation_threshold: f64,

    /// Number of daily forecast records retained for verification
    #[serde(default = "default_retention_days")]
    pub retention_days: usize,
}

fn default_temperature_threshold() -> f64 {
    0.5
}

fn default_precipitation_threshold() -> f64 {
    5.0
}

fn default_retention_days() -> usize {
    31
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            temperature_threshold_c: default_temperature_threshold(),
            precipitation_threshold: default_precipitation_threshold(),
            retention_days: default_retention_days(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("wxduel");

        Self {
            config_dir,
            location: LocationConfig::default(),
            forecast: ForecastConfig::default(),
            battle: BattleConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from disk, creating a default file on first run.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::Read)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration and validate it.
    ///
    /// Returns an error if validation fails with critical errors; warnings
    /// are logged.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if !(-90.0..=90.0).contains(&self.location.latitude) {
            result.add_error("location.latitude", "must be between -90 and 90");
        }
        if !(-180.0..=180.0).contains(&self.location.longitude) {
            result.add_error("location.longitude", "must be between -180 and 180");
        }
        if self.location.city.trim().is_empty() {
            result.add_warning("location.city", "city name is empty");
        }

        if self.forecast.horizon_days == 0 || self.forecast.horizon_days > 16 {
            result.add_error("forecast.horizon_days", "must be between 1 and 16");
        }
        if Url::parse(&self.forecast.forecast_url).is_err() {
            result.add_error("forecast.forecast_url", "not a valid URL");
        }
        if Url::parse(&self.forecast.archive_url).is_err() {
            result.add_error("forecast.archive_url", "not a valid URL");
        }
        if self.forecast.forecast_timeout_secs == 0 {
            result.add_error("forecast.forecast_timeout_secs", "must be non-zero");
        }
        if self.forecast.archive_timeout_secs == 0 {
            result.add_error("forecast.archive_timeout_secs", "must be non-zero");
        }

        if self.battle.temperature_threshold_c < 0.0 {
            result.add_error("battle.temperature_threshold_c", "must not be negative");
        }
        if self.battle.precipitation_threshold < 0.0 {
            result.add_error("battle.precipitation_threshold", "must not be negative");
        }
        if self.battle.temperature_threshold_c == 0.0 {
            result.add_warning(
                "battle.temperature_threshold_c",
                "zero threshold declares a winner on insignificant differences",
            );
        }
        if self.battle.retention_days == 0 {
            result.add_error("battle.retention_days", "must retain at least one record");
        }

        result
    }

    /// Save configuration to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Write)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents).map_err(ConfigError::Write)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("wxduel").join("config.toml"))
    }
}
