//! Repository factory for dependency injection.
//!
//! This module provides utilities for creating and configuring repository instances
//! based on runtime configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::{FileRepository, LocalRepository};
use super::repository::{KeyValueRepository, RepositoryError, RepositoryResult};

/// Environment variable selecting the repository backend.
pub const REPOSITORY_TYPE_ENV: &str = "REPOSITORY_TYPE";

/// Environment variable overriding the file repository directory.
pub const DATA_DIR_ENV: &str = "CYCLE_DATA_DIR";

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// In-memory repository
    Local,
    /// JSON files in a data directory
    File,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string ("local", "memory", "file").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "memory" => Ok(Self::Local),
            "file" => Ok(Self::File),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Local if not set or unrecognized.
    pub fn from_env() -> Self {
        std::env::var(REPOSITORY_TYPE_ENV)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Self::Local)
    }
}

/// Repository factory for creating repository instances.
///
/// # Example
/// ```no_run
/// use cycle_engine::db::{RepositoryConfig, RepositoryFactory};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     // In-memory repository
///     let local = RepositoryFactory::create_local();
///
///     // From forecast.toml
///     let config = RepositoryConfig::from_default_location()?;
///     let repo = RepositoryFactory::create(&config).await?;
///     assert!(repo.health_check().await?);
///
///     Ok(())
/// }
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a repository instance described by a configuration.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn KeyValueRepository>)` - Shared repository instance
    /// * `Err(RepositoryError)` - If the type is unknown or the backend fails to open
    pub async fn create(config: &RepositoryConfig) -> RepositoryResult<Arc<dyn KeyValueRepository>> {
        let repo_type = config
            .repository_type()
            .map_err(RepositoryError::ConfigurationError)?;

        match repo_type {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::File => {
                let file = Self::create_file(config.file.directory.clone()).await?;
                Ok(file as Arc<dyn KeyValueRepository>)
            }
        }
    }

    /// Create an in-memory repository.
    pub fn create_local() -> Arc<dyn KeyValueRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create a file repository rooted at `directory`.
    pub async fn create_file(directory: PathBuf) -> RepositoryResult<Arc<FileRepository>> {
        Ok(Arc::new(FileRepository::open(directory).await?))
    }

    /// Create repository from a TOML configuration file.
    pub async fn from_config_file(
        path: impl AsRef<std::path::Path>,
    ) -> RepositoryResult<Arc<dyn KeyValueRepository>> {
        let config = RepositoryConfig::from_file(path)?;
        Self::create(&config).await
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to pick the backend and `CYCLE_DATA_DIR` for
    /// the file backend's directory (default `./data`).
    pub async fn from_env() -> RepositoryResult<Arc<dyn KeyValueRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Local => Ok(Self::create_local()),
            RepositoryType::File => {
                let directory = std::env::var(DATA_DIR_ENV)
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| RepositoryConfig::default().file.directory);
                let file = Self::create_file(directory).await?;
                Ok(file as Arc<dyn KeyValueRepository>)
            }
        }
    }
}
