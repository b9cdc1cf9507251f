//! Repository configuration file support.
//!
//! This module reads storage settings for the forecast service from a TOML
//! file:
//!
//! ```toml
//! [repository]
//! type = "file"
//!
//! [file]
//! directory = "./data"
//!
//! [history]
//! key = "cycle_history"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Key under which the cycle history is stored when none is configured.
pub const DEFAULT_HISTORY_KEY: &str = "cycle_history";

/// Repository configuration from file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RepositoryConfig {
    #[serde(default)]
    pub repository: RepositorySettings,
    #[serde(default)]
    pub file: FileSettings,
    #[serde(default)]
    pub history: HistorySettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type", default = "default_repo_type")]
    pub repo_type: String,
}

/// File repository settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
}

/// Where the history lives inside the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistorySettings {
    #[serde(default = "default_history_key")]
    pub key: String,
}

fn default_repo_type() -> String {
    "local".to_string()
}

fn default_directory() -> PathBuf {
    PathBuf::from("./data")
}

fn default_history_key() -> String {
    DEFAULT_HISTORY_KEY.to_string()
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            repo_type: default_repo_type(),
        }
    }
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            directory: default_directory(),
        }
    }
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            key: default_history_key(),
        }
    }
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        let config: RepositoryConfig = toml::from_str(content).map_err(|e| {
            RepositoryError::ConfigurationError(format!("Failed to parse config file: {}", e))
        })?;

        if config.history.key.trim().is_empty() {
            return Err(RepositoryError::ConfigurationError(
                "'history.key' must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `forecast.toml` in:
    /// 1. Current directory
    /// 2. `cycle_engine/` directory
    /// 3. Parent directory
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("forecast.toml"),
            PathBuf::from("cycle_engine/forecast.toml"),
            PathBuf::from("../forecast.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::ConfigurationError(
            "No forecast.toml found in standard locations".to_string(),
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        self.repository.repo_type.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_local_config() {
        let toml = r#"
[repository]
type = "local"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository.repo_type, "local");
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.history.key, DEFAULT_HISTORY_KEY);
    }

    #[test]
    fn test_parse_file_config() {
        let toml = r#"
[repository]
type = "file"

[file]
directory = "/var/lib/cycle"

[history]
key = "history_v2"
"#;

        let config = RepositoryConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::File);
        assert_eq!(config.file.directory, PathBuf::from("/var/lib/cycle"));
        assert_eq!(config.history.key, "history_v2");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = RepositoryConfig::from_toml_str("").unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::Local);
        assert_eq!(config.file.directory, PathBuf::from("./data"));
    }

    #[test]
    fn test_unknown_repository_type() {
        let config = RepositoryConfig::from_toml_str("[repository]\ntype = \"azure\"\n").unwrap();
        assert!(config.repository_type().is_err());
    }

    #[test]
    fn test_empty_history_key_rejected() {
        let result = RepositoryConfig::from_toml_str("[history]\nkey = \"  \"\n");
        assert!(matches!(result, Err(RepositoryError::ConfigurationError(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = RepositoryConfig::from_toml_str("[repository\ntype = ");
        assert!(matches!(result, Err(RepositoryError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[repository]\ntype = \"file\"").unwrap();
        let config = RepositoryConfig::from_file(file.path()).unwrap();
        assert_eq!(config.repository_type().unwrap(), RepositoryType::File);

        assert!(RepositoryConfig::from_file("/nonexistent/forecast.toml").is_err());
    }
}
