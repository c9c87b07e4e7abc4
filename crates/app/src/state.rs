use std::{fs, path::PathBuf};

use common::prelude::{HashFunction, NamedGroup};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "modp";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Defaults for the exchange, overridable per invocation from the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Group to run exchanges over
    #[serde(default)]
    pub group: NamedGroup,
    /// Hash function the KDF is instantiated with
    #[serde(default)]
    pub hash: HashFunction,
    /// Length of derived keys in bytes
    #[serde(default = "default_key_length")]
    pub key_length: usize,
    /// Context bytes bound into derived keys (UTF-8)
    #[serde(default)]
    pub other_info: String,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_key_length() -> usize {
    32
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            group: NamedGroup::default(),
            hash: HashFunction::default(),
            key_length: default_key_length(),
            other_info: String::new(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path the configuration was (or would have been) read from
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Default config location, ~/.modp/config.toml
    pub fn default_config_path() -> Result<PathBuf, StateError> {
        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)).join(CONFIG_FILE_NAME))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. The default path is optional and falls
    /// back to built-in defaults when absent.
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let (config_path, required) = match custom_path {
            Some(path) => (path, true),
            None => (Self::default_config_path()?, false),
        };

        if !config_path.exists() {
            if required {
                return Err(StateError::ConfigNotFound(config_path));
            }
            return Ok(Self {
                config_path,
                config: AppConfig::default(),
            });
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("no home directory found")]
    NoHomeDirectory,
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.group, NamedGroup::Group14);
        assert_eq!(config.hash, HashFunction::Sha256);
        assert_eq!(config.key_length, 32);
        assert!(config.other_info.is_empty());
        assert_eq!(config.log_level, "info");

        // An empty file means all defaults
        let parsed: AppConfig = toml::from_str("").unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(
            &path,
            "group = \"group1\"\nhash = \"sha512\"\nkey_length = 64\nother_info = \"ctx\"\n",
        )
        .unwrap();

        let state = AppState::load(Some(path.clone())).unwrap();
        assert_eq!(state.config_path, path);
        assert_eq!(state.config.group, NamedGroup::Group1);
        assert_eq!(state.config.hash, HashFunction::Sha512);
        assert_eq!(state.config.key_length, 64);
        assert_eq!(state.config.other_info, "ctx");
        assert_eq!(state.config.log_level, "info");
    }

    #[test]
    fn test_explicit_path_must_exist() {
        let temp_dir = TempDir::new().unwrap();
        let result = AppState::load(Some(temp_dir.path().join("missing.toml")));
        assert!(matches!(result, Err(StateError::ConfigNotFound(_))));
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "group = \"group5\"\n").unwrap();

        let result = AppState::load(Some(path));
        assert!(matches!(result, Err(StateError::TomlDe(_))));
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = AppConfig {
            group: NamedGroup::Group1,
            hash: HashFunction::Sha384,
            key_length: 16,
            other_info: "label".to_string(),
            log_level: "debug".to_string(),
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert!(text.contains("group = \"group1\""));
        assert_eq!(toml::from_str::<AppConfig>(&text).unwrap(), config);
    }
}
