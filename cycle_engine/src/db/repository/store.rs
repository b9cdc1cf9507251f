//! Key-value storage seam for cycle data.
//!
//! The tracker keeps its data in a local store split into two namespaces:
//! one for sensitive health data and one for everything else. This trait is
//! the only view the crate has of that store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::RepositoryResult;

/// Storage namespace of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// Health data (cycle history, symptoms).
    Encrypted,
    /// Settings, checksums and other non-sensitive values.
    NonSensitive,
}

impl Namespace {
    pub const ALL: [Namespace; 2] = [Namespace::Encrypted, Namespace::NonSensitive];

    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Encrypted => "encrypted",
            Namespace::NonSensitive => "non_sensitive",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "encrypted" => Ok(Namespace::Encrypted),
            "non_sensitive" => Ok(Namespace::NonSensitive),
            _ => Err(format!("Unknown namespace: {}", s)),
        }
    }
}

/// Repository trait for namespaced key-value storage.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait KeyValueRepository: Send + Sync {
    /// Check if the underlying store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Read a value.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists
    /// * `Ok(None)` if it does not
    async fn get(&self, namespace: Namespace, key: &str) -> RepositoryResult<Option<String>>;

    /// Write a value, replacing any previous one.
    async fn set(&self, namespace: Namespace, key: &str, value: &str) -> RepositoryResult<()>;

    /// Delete a key.
    ///
    /// # Returns
    /// `Ok(true)` if the key existed.
    async fn remove(&self, namespace: Namespace, key: &str) -> RepositoryResult<bool>;

    /// All keys of a namespace, sorted.
    async fn keys(&self, namespace: Namespace) -> RepositoryResult<Vec<String>>;
}
