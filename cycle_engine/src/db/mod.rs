//! Storage for cycle history.
//!
//! The engine itself never persists anything. This module provides the
//! key-value seam a host application stores history behind, plus a service
//! layer that keeps integrity checksums next to the stored documents.
//!
//! # Layout
//! - `services`: high-level operations (use these in your application)
//! - `repository`: the [`KeyValueRepository`] trait, [`Namespace`] and errors
//! - `repositories::local`: in-memory implementation for tests and local runs
//! - `repositories::file`: JSON files in a data directory
//! - `factory`: builds a repository from [`RepositoryConfig`] or the environment
//! - `checksum`: SHA-256 checksums of stored documents
//!
//! # Recommended Usage
//!
//! ```no_run
//! use cycle_engine::db::{services, RepositoryConfig, RepositoryFactory};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RepositoryConfig::from_default_location()?;
//!     let repo = RepositoryFactory::create(&config).await?;
//!
//!     let history = services::load_history(repo.as_ref(), &config.history.key).await?;
//!     println!("{} records", history.len());
//!     Ok(())
//! }
//! ```

pub mod checksum;
pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;

pub use services::{append_record, forecast, health_check, load_history, store_history};

pub use checksum::{calculate_checksum, checksum_key, verify_checksum};
pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{RepositoryConfig, DEFAULT_HISTORY_KEY};
pub use repositories::{FileRepository, LocalRepository};
pub use repository::{KeyValueRepository, Namespace, RepositoryError, RepositoryResult};
