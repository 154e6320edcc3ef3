//! Application configuration.
//!
//! Loaded from `config.toml` in the platform data directory. Every section
//! falls back to defaults when missing.

use crate::input::speed::{validate_circumference, DeviceType, DEFAULT_CIRCUMFERENCE_MM};
use crate::power::engine::PowerTable;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Speed input settings
    pub input: InputSettings,
    /// Cadence detection settings
    pub cadence: CadenceSettings,
    /// Power easing settings
    pub power: PowerSettings,
    /// Currency and health settings
    pub reward: RewardSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            input: InputSettings::default(),
            cadence: CadenceSettings::default(),
            power: PowerSettings::default(),
            reward: RewardSettings::default(),
        }
    }
}

impl AppConfig {
    /// Check every value, reporting the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_circumference(self.input.circumference_mm)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;

        if !is_positive(self.input.full_effort_speed) {
            return Err(ConfigError::Invalid(format!(
                "full_effort_speed must be positive, got {}",
                self.input.full_effort_speed
            )));
        }
        if !is_positive(self.cadence.full_power_rpm) {
            return Err(ConfigError::Invalid(format!(
                "full_power_rpm must be positive, got {}",
                self.cadence.full_power_rpm
            )));
        }
        if self.cadence.stall_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "stall_timeout_ms must be positive".to_string(),
            ));
        }
        if let Some(state) = self.power.table.first_invalid() {
            return Err(ConfigError::Invalid(format!(
                "power tuning for {} needs blend_alpha in [0, 1] and level_max > 0",
                state
            )));
        }
        if !is_non_negative(self.power.auto_level) {
            return Err(ConfigError::Invalid(format!(
                "auto_level must not be negative, got {}",
                self.power.auto_level
            )));
        }
        if self.reward.max_health == 0 {
            return Err(ConfigError::Invalid("max_health must be positive".to_string()));
        }
        let r = &self.reward;
        if [r.currency_mult_pos, r.currency_mult_revive, r.currency_mult_dead]
            .iter()
            .any(|m| !is_non_negative(*m))
        {
            return Err(ConfigError::Invalid(
                "currency multipliers must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

/// Speed input settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Device type of the paired sensor
    pub device_type: DeviceType,
    /// Wheel circumference in millimeters
    pub circumference_mm: f32,
    /// Speed that counts as full effort
    pub full_effort_speed: f32,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            device_type: DeviceType::None,
            circumference_mm: DEFAULT_CIRCUMFERENCE_MM,
            full_effort_speed: 30.0,
        }
    }
}

/// Cadence detection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CadenceSettings {
    /// Time without pedal triggers before cadence drops to zero
    pub stall_timeout_ms: u64,
    /// Cadence that counts as full effort
    pub full_power_rpm: f32,
}

impl Default for CadenceSettings {
    fn default() -> Self {
        Self {
            stall_timeout_ms: 2000,
            full_power_rpm: 90.0,
        }
    }
}

impl CadenceSettings {
    pub fn stall_timeout(&self) -> Duration {
        Duration::from_millis(self.stall_timeout_ms)
    }
}

/// Power easing settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerSettings {
    /// Automatic baseline power level
    pub auto_level: f32,
    /// Per movement state blend rate and ceiling
    pub table: PowerTable,
}

/// Currency and health settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardSettings {
    /// Currency per award unit
    pub currency_base: i32,
    /// Multiplier applied to gains
    pub currency_mult_pos: f32,
    /// Multiplier applied to revive costs
    pub currency_mult_revive: f32,
    /// Multiplier applied to losses
    pub currency_mult_dead: f32,
    /// Player health points
    pub max_health: u32,
}

impl Default for RewardSettings {
    fn default() -> Self {
        Self {
            currency_base: 10,
            currency_mult_pos: 1.0,
            currency_mult_revive: 5.0,
            currency_mult_dead: 0.5,
            max_health: 3,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "pedalpower", "PedalPower")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from a file. A missing file yields defaults.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No config at {}, using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config.validate()?;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(&get_config_path(), config)
}

/// Save configuration to a file, creating parent directories.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid config: {0}")]
    Invalid(String),
}
