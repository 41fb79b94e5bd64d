//! TOML-based application configuration.
//!
//! Stores the audio rendering preferences and the seed values used when
//! creating new presets. Stored at `<data_dir>/config.toml`; fields are
//! additive with serde defaults so older files keep loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

use super::data_dir;

/// Audio rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Master toggle for the cue renderer; per-preset `audio_enabled` still
    /// applies on top.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Output volume, 0-100.
    #[serde(default = "default_volume")]
    pub volume: u32,
    /// Optional sound file played for boundary cues instead of the built-in
    /// double tone.
    #[serde(default)]
    pub boundary_sound: Option<String>,
}

/// Seed values for newly created presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetDefaultsConfig {
    #[serde(default = "default_total_minutes")]
    pub total_minutes: u32,
    #[serde(default = "default_cue_lead_seconds")]
    pub cue_lead_seconds: u32,
    #[serde(default)]
    pub initial_countdown_seconds: u32,
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u32,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    #[serde(default = "default_total_repetitions")]
    pub total_repetitions: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub preset_defaults: PresetDefaultsConfig,
}

fn default_true() -> bool {
    true
}
fn default_volume() -> u32 {
    80
}
fn default_total_minutes() -> u32 {
    10
}
fn default_cue_lead_seconds() -> u32 {
    3
}
fn default_hold_seconds() -> u32 {
    7
}
fn default_rest_seconds() -> u32 {
    3
}
fn default_total_repetitions() -> u32 {
    6
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            boundary_sound: None,
        }
    }
}

impl Default for PresetDefaultsConfig {
    fn default() -> Self {
        Self {
            total_minutes: default_total_minutes(),
            cue_lead_seconds: default_cue_lead_seconds(),
            initial_countdown_seconds: 0,
            hold_seconds: default_hold_seconds(),
            rest_seconds: default_rest_seconds(),
            total_repetitions: default_total_repetitions(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            audio: AudioConfig::default(),
            preset_defaults: PresetDefaultsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing the default file on first run.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or the
    /// default cannot be written.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the default on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Get a config value as a string by dot-separated key.
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

    /// Set a config value by dot-separated key and persist.
    ///
    /// The new value must parse as the same JSON type the field already has.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((p, l)) => (p, l),
            None => ("", key),
        };
        let mut current = &mut json;
        if !parents.is_empty() {
            for part in parents.split('.') {
                current = current
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            }
        }
        let obj = current
            .as_object_mut()
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        let existing = obj
            .get(leaf)
            .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

        let new_value = match existing {
            serde_json::Value::Bool(_) => serde_json::Value::Bool(
                value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
            ),
            serde_json::Value::Number(_) => serde_json::Value::Number(
                value.parse::<u64>().map_err(|e| invalid(e.to_string()))?.into(),
            ),
            serde_json::Value::Null => serde_json::Value::String(value.into()),
            _ => serde_json::Value::String(value.into()),
        };
        obj.insert(leaf.to_string(), new_value);

        *self = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        self.save()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.audio.enabled);
        assert_eq!(parsed.audio.volume, 80);
        assert_eq!(parsed.preset_defaults.total_minutes, 10);
    }

    #[test]
    fn empty_toml_uses_all_defaults() {
        let parsed: Config = toml::from_str("").unwrap();
        assert_eq!(parsed.preset_defaults.hold_seconds, 7);
        assert_eq!(parsed.preset_defaults.rest_seconds, 3);
        assert!(parsed.audio.boundary_sound.is_none());
    }

    #[test]
    fn first_load_writes_defaults_and_set_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        std::env::set_var("WORKOUT_TIMER_DATA_DIR", dir.path());

        let first = Config::load().unwrap();
        assert!(dir.path().join("config.toml").exists());
        assert_eq!(first.audio.volume, 80);

        let mut cfg = Config::load().unwrap();
        cfg.set("audio.volume", "55").unwrap();
        cfg.set("preset_defaults.total_repetitions", "8").unwrap();

        let reloaded = Config::load().unwrap();
        assert_eq!(reloaded.audio.volume, 55);
        assert_eq!(reloaded.preset_defaults.total_repetitions, 8);

        std::env::remove_var("WORKOUT_TIMER_DATA_DIR");
    }

    #[test]
    fn set_unknown_key_is_rejected() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("audio.nope", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("nonsense", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("audio.enabled").as_deref(), Some("true"));
        assert_eq!(cfg.get("audio.volume").as_deref(), Some("80"));
        assert_eq!(cfg.get("preset_defaults.hold_seconds").as_deref(), Some("7"));
        assert!(cfg.get("audio.missing").is_none());
    }
}
