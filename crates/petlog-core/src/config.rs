//! TOML-based engine configuration.
//!
//! Holds the tunable parameters of the aggregation and reminder engine:
//! streak lookback horizon, badge thresholds, reminder rule thresholds,
//! and ranking page size. Stored at `data_dir()/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{ConfigError, Result};
use crate::reminder::ReminderRules;
use crate::store::data_dir;

/// Streak configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Lookback horizon in days. Must exceed every badge threshold or
    /// the longest badge can never unlock.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Streak lengths at which badges unlock.
    #[serde(default = "default_badge_thresholds")]
    pub badge_thresholds: Vec<u32>,
}

/// Reminder rule thresholds shared by every pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderRulesConfig {
    #[serde(default = "default_inactivity_after_hours")]
    pub inactivity_after_hours: i64,
    #[serde(default = "default_frequency_window_hours")]
    pub frequency_window_hours: i64,
    #[serde(default = "default_frequency_min_count")]
    pub frequency_min_count: i64,
}

/// Ranking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `data_dir()/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub reminders: ReminderRulesConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
}

fn default_horizon_days() -> u32 {
    60
}
fn default_badge_thresholds() -> Vec<u32> {
    vec![3, 7, 30]
}
fn default_inactivity_after_hours() -> i64 {
    48
}
fn default_frequency_window_hours() -> i64 {
    24
}
fn default_frequency_min_count() -> i64 {
    2
}
fn default_page_size() -> u32 {
    20
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            badge_thresholds: default_badge_thresholds(),
        }
    }
}

impl Default for ReminderRulesConfig {
    fn default() -> Self {
        Self {
            inactivity_after_hours: default_inactivity_after_hours(),
            frequency_window_hours: default_frequency_window_hours(),
            frequency_min_count: default_frequency_min_count(),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl ReminderRulesConfig {
    pub fn rules(&self) -> ReminderRules {
        ReminderRules {
            inactivity_after_hours: self.inactivity_after_hours,
            frequency_window_hours: self.frequency_window_hours,
            frequency_min_count: self.frequency_min_count,
        }
    }
}

impl EngineConfig {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or write and return the default.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, fails
    /// validation, or the default cannot be written.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let config: EngineConfig =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path,
                        message: e.to_string(),
                    })?;
                config.validate()?;
                Ok(config)
            }
            Err(_) => {
                let config = Self::default();
                config.save()?;
                Ok(config)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Load from disk, falling back to the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Reject configurations whose parts contradict each other.
    ///
    /// # Errors
    /// Returns an error if a badge threshold exceeds the streak horizon
    /// or a threshold/page size is zero.
    pub fn validate(&self) -> Result<()> {
        if self.streak.horizon_days == 0 {
            return Err(ConfigError::InvalidValue {
                key: "streak.horizon_days".into(),
                message: "must be positive".into(),
            }
            .into());
        }
        for threshold in &self.streak.badge_thresholds {
            if *threshold == 0 || *threshold > self.streak.horizon_days {
                return Err(ConfigError::InvalidValue {
                    key: "streak.badge_thresholds".into(),
                    message: format!(
                        "threshold {threshold} outside 1..={}",
                        self.streak.horizon_days
                    ),
                }
                .into());
            }
        }
        if self.reminders.inactivity_after_hours <= 0
            || self.reminders.frequency_window_hours <= 0
            || self.reminders.frequency_min_count <= 0
        {
            return Err(ConfigError::InvalidValue {
                key: "reminders".into(),
                message: "thresholds must be positive".into(),
            }
            .into());
        }
        if self.ranking.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "ranking.page_size".into(),
                message: "must be positive".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        match current {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and re-validate.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value does not parse,
    /// or the resulting config fails validation.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        let mut parts = key.split('.').peekable();
        let mut current = &mut json;
        loop {
            let part = parts
                .next()
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value.parse::<i64>().map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                        .into(),
                    ),
                    serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| ConfigError::InvalidValue {
                            key: key.to_string(),
                            message: e.to_string(),
                        })?
                    }
                    _ => serde_json::Value::String(value.to_string()),
                };
                obj.insert(part.to_string(), new_value);
                break;
            }
            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }
        let updated: EngineConfig = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let config = EngineConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: EngineConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn defaults_match_documented_rules() {
        let config = EngineConfig::default();
        assert_eq!(config.streak.horizon_days, 60);
        assert_eq!(config.streak.badge_thresholds, vec![3, 7, 30]);
        assert_eq!(config.reminders.inactivity_after_hours, 48);
        assert_eq!(config.reminders.frequency_window_hours, 24);
        assert_eq!(config.reminders.frequency_min_count, 2);
        assert_eq!(config.ranking.page_size, 20);
        config.validate().unwrap();
    }

    #[test]
    fn partial_toml_fills_missing_fields() {
        let parsed: EngineConfig = toml::from_str("[streak]\nhorizon_days = 90\n").unwrap();
        assert_eq!(parsed.streak.horizon_days, 90);
        assert_eq!(parsed.streak.badge_thresholds, vec![3, 7, 30]);
        assert_eq!(parsed.ranking.page_size, 20);
    }

    #[test]
    fn badge_threshold_beyond_horizon_is_rejected() {
        let mut config = EngineConfig::default();
        config.streak.horizon_days = 10;
        config.streak.badge_thresholds = vec![3, 30];
        assert!(config.validate().is_err());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let config = EngineConfig::default();
        assert_eq!(config.get("streak.horizon_days").as_deref(), Some("60"));
        assert_eq!(
            config.get("reminders.frequency_min_count").as_deref(),
            Some("2")
        );
        assert!(config.get("streak.missing").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut config = EngineConfig::default();
        config.set("ranking.page_size", "50").unwrap();
        assert_eq!(config.ranking.page_size, 50);
    }

    #[test]
    fn set_rejects_unknown_key_and_invalid_result() {
        let mut config = EngineConfig::default();
        assert!(config.set("ranking.nonexistent", "5").is_err());
        // Horizon below the 30-day badge threshold fails validation.
        assert!(config.set("streak.horizon_days", "10").is_err());
    }
}
