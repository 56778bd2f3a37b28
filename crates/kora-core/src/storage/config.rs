//! TOML-based application configuration.
//!
//! Stores:
//! - Reward policy constants (points per focus interval, per journey node)
//! - Storage keys for each persisted document
//! - Stability gauge defaults
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Reward policy. Point values have varied between releases of the
/// client, so they are configuration rather than literals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default = "default_focus_completion_bonus")]
    pub focus_completion_bonus: u64,
    #[serde(default = "default_node_completion_bonus")]
    pub node_completion_bonus: u64,
}

/// Keys under which documents live in the key-value backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_progress_key")]
    pub progress_key: String,
    #[serde(default = "default_settings_key")]
    pub settings_key: String,
    #[serde(default = "default_quests_key")]
    pub quests_key: String,
    #[serde(default = "default_journal_key")]
    pub journal_key: String,
}

/// Stability gauge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StabilityConfig {
    /// Charge of a freshly created progress record, in [0,100].
    #[serde(default = "default_charge")]
    pub default_charge: u8,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub rewards: RewardsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub stability: StabilityConfig,
}

// Default functions
fn default_focus_completion_bonus() -> u64 {
    10
}
fn default_node_completion_bonus() -> u64 {
    25
}
fn default_progress_key() -> String {
    "orbital_kora_progress".into()
}
fn default_settings_key() -> String {
    "orbital_kora_settings".into()
}
fn default_quests_key() -> String {
    "orbital_kora_quests".into()
}
fn default_journal_key() -> String {
    "orbital_kora_journal".into()
}
fn default_charge() -> u8 {
    100
}

impl Default for RewardsConfig {
    fn default() -> Self {
        Self {
            focus_completion_bonus: default_focus_completion_bonus(),
            node_completion_bonus: default_node_completion_bonus(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            progress_key: default_progress_key(),
            settings_key: default_settings_key(),
            quests_key: default_quests_key(),
            journal_key: default_journal_key(),
        }
    }
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            default_charge: default_charge(),
        }
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

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
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(unknown());
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

    /// Load from the data directory, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if no file exists.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Check value ranges that the TOML types alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stability.default_charge > 100 {
            return Err(ConfigError::InvalidValue {
                key: "stability.default_charge".into(),
                message: format!("{} is outside 0..=100", self.stability.default_charge),
            });
        }
        let keys = [
            ("storage.progress_key", &self.storage.progress_key),
            ("storage.settings_key", &self.storage.settings_key),
            ("storage.quests_key", &self.storage.quests_key),
            ("storage.journal_key", &self.storage.journal_key),
        ];
        for (name, value) in keys {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: name.into(),
                    message: "storage key must not be empty".into(),
                });
            }
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key. The caller persists with [`Config::save`].
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or falls outside its allowed range. `self` is unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.rewards.focus_completion_bonus, 10);
        assert_eq!(cfg.rewards.node_completion_bonus, 25);
        assert_eq!(cfg.storage.progress_key, "orbital_kora_progress");
        assert_eq!(cfg.storage.journal_key, "orbital_kora_journal");
        assert_eq!(cfg.stability.default_charge, 100);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[rewards]\nnode_completion_bonus = 10\n").unwrap();
        assert_eq!(cfg.rewards.node_completion_bonus, 10);
        assert_eq!(cfg.rewards.focus_completion_bonus, 10);
        assert_eq!(cfg.storage, StorageConfig::default());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("rewards.focus_completion_bonus").as_deref(), Some("10"));
        assert_eq!(
            cfg.get("storage.quests_key").as_deref(),
            Some("orbital_kora_quests")
        );
        assert!(cfg.get("rewards").is_none());
        assert!(cfg.get("rewards.missing_key").is_none());
    }

    #[test]
    fn set_updates_nested_number() {
        let mut cfg = Config::default();
        cfg.set("rewards.node_completion_bonus", "40").unwrap();
        assert_eq!(cfg.rewards.node_completion_bonus, 40);
    }

    #[test]
    fn set_updates_nested_string() {
        let mut cfg = Config::default();
        cfg.set("storage.progress_key", "kora_progress_v2").unwrap();
        assert_eq!(cfg.storage.progress_key, "kora_progress_v2");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let result = cfg.set("rewards.nonexistent_key", "1");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        let result = cfg.set("rewards.focus_completion_bonus", "lots");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_rejects_out_of_range_charge() {
        let mut cfg = Config::default();
        assert!(cfg.set("stability.default_charge", "101").is_err());
        assert!(cfg.set("stability.default_charge", "300").is_err());
        cfg.set("stability.default_charge", "80").unwrap();
        assert_eq!(cfg.stability.default_charge, 80);
    }

    #[test]
    fn load_from_missing_file_writes_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg, Config::default());
        assert!(path.exists());
    }

    #[test]
    fn load_from_rejects_garbage() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "rewards = [").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::ParseFailed(_))
        ));
    }

    #[test]
    fn save_to_then_load_from() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("rewards.focus_completion_bonus", "1").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }
}
