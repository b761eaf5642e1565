//! TOML-based engine configuration.
//!
//! Stores the tunable constants of the scoring engine:
//! - Energy decay base rate, interval, and local time offset
//! - Sleep window used to gate decay
//! - Saturation and low-state amplifier thresholds
//! - Burnout history retention
//!
//! Configuration is stored at `<data_dir>/config.toml`. The defaults are the
//! production constants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::ConfigError;

/// Sleep window, in local hours. Wraps midnight when `start_hour > end_hour`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sleep_start")]
    pub start_hour: u32,
    #[serde(default = "default_sleep_end")]
    pub end_hour: u32,
}

/// Energy decay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Energy points lost per hour before multipliers
    #[serde(default = "default_base_rate")]
    pub base_rate_per_hour: f64,
    /// Minimum minutes between two decay applications
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// Offset from UTC used to pick the time-of-day band
    #[serde(default)]
    pub timezone_offset_hours: i32,
    #[serde(default)]
    pub sleep: SleepConfig,
}

/// Global point modulation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "default_saturation_threshold")]
    pub saturation_threshold: f64,
    #[serde(default = "default_saturation_factor")]
    pub saturation_factor: f64,
    #[serde(default = "default_amplifier_threshold")]
    pub amplifier_threshold: f64,
    #[serde(default = "default_amplifier_factor")]
    pub amplifier_factor: f64,
}

/// Burnout history configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub decay: DecayConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub history: HistoryConfig,
}

fn default_true() -> bool {
    true
}
fn default_sleep_start() -> u32 {
    23
}
fn default_sleep_end() -> u32 {
    7
}
fn default_base_rate() -> f64 {
    0.5
}
fn default_interval_minutes() -> u32 {
    60
}
fn default_saturation_threshold() -> f64 {
    90.0
}
fn default_saturation_factor() -> f64 {
    0.7
}
fn default_amplifier_threshold() -> f64 {
    70.0
}
fn default_amplifier_factor() -> f64 {
    1.2
}
fn default_retention_days() -> u32 {
    7
}

impl Default for SleepConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            start_hour: default_sleep_start(),
            end_hour: default_sleep_end(),
        }
    }
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            base_rate_per_hour: default_base_rate(),
            interval_minutes: default_interval_minutes(),
            timezone_offset_hours: 0,
            sleep: SleepConfig::default(),
        }
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            saturation_threshold: default_saturation_threshold(),
            saturation_factor: default_saturation_factor(),
            amplifier_threshold: default_amplifier_threshold(),
            amplifier_factor: default_amplifier_factor(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(key, format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<i64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(key, format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(key, format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(key, e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Check every value is inside its meaningful range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.decay;
        if !(d.base_rate_per_hour.is_finite() && d.base_rate_per_hour > 0.0) {
            return Err(invalid("decay.base_rate_per_hour", "must be a positive number"));
        }
        if d.interval_minutes == 0 {
            return Err(invalid("decay.interval_minutes", "must be positive"));
        }
        if !(-12..=14).contains(&d.timezone_offset_hours) {
            return Err(invalid("decay.timezone_offset_hours", "must be within -12..=14"));
        }
        if d.sleep.start_hour > 23 {
            return Err(invalid("decay.sleep.start_hour", "must be 0-23"));
        }
        if d.sleep.end_hour > 23 {
            return Err(invalid("decay.sleep.end_hour", "must be 0-23"));
        }

        let r = &self.rules;
        for (key, threshold) in [
            ("rules.saturation_threshold", r.saturation_threshold),
            ("rules.amplifier_threshold", r.amplifier_threshold),
        ] {
            if !(0.0..=100.0).contains(&threshold) {
                return Err(invalid(key, "must be within 0-100"));
            }
        }
        for (key, factor) in [
            ("rules.saturation_factor", r.saturation_factor),
            ("rules.amplifier_factor", r.amplifier_factor),
        ] {
            if !(factor > 0.0 && factor <= 2.0) {
                return Err(invalid(key, "must be within (0, 2]"));
            }
        }
        Ok(())
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without saving.
    ///
    /// The result must still pass [`Config::validate`]; otherwise `self` is
    /// left untouched.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config =
            serde_json::from_value(json).map_err(|e| invalid(key, e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
