//! In-memory local repository implementation.
//!
//! All data lives in `HashMap`s behind an `RwLock`, giving fast,
//! deterministic and isolated storage for unit tests and local runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::db::repository::{KeyValueRepository, Namespace, RepositoryError, RepositoryResult};

/// In-memory local repository.
///
/// Clones share the same underlying storage.
///
/// # Example
/// ```
/// use cycle_engine::db::repositories::LocalRepository;
/// use cycle_engine::db::{KeyValueRepository, Namespace};
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let repo = LocalRepository::new();
///     repo.set(Namespace::NonSensitive, "theme", "dark").await.unwrap();
///     let value = repo.get(Namespace::NonSensitive, "theme").await.unwrap();
///     assert_eq!(value.as_deref(), Some("dark"));
/// });
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

#[derive(Default)]
struct LocalData {
    encrypted: HashMap<String, String>,
    non_sensitive: HashMap<String, String>,
    // Connection health
    is_unhealthy: bool,
}

impl LocalData {
    fn namespace(&self, namespace: Namespace) -> &HashMap<String, String> {
        match namespace {
            Namespace::Encrypted => &self.encrypted,
            Namespace::NonSensitive => &self.non_sensitive,
        }
    }

    fn namespace_mut(&mut self, namespace: Namespace) -> &mut HashMap<String, String> {
        match namespace {
            Namespace::Encrypted => &mut self.encrypted,
            Namespace::NonSensitive => &mut self.non_sensitive,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the health flag, for exercising failure paths in tests.
    pub fn set_healthy(&self, healthy: bool) {
        if let Ok(mut data) = self.data.write() {
            data.is_unhealthy = !healthy;
        }
    }

    /// Number of keys stored in a namespace.
    pub fn len(&self, namespace: Namespace) -> usize {
        self.data
            .read()
            .map(|data| data.namespace(namespace).len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        Namespace::ALL.iter().all(|ns| self.len(*ns) == 0)
    }

    /// Remove all data.
    pub fn clear(&self) {
        if let Ok(mut data) = self.data.write() {
            data.encrypted.clear();
            data.non_sensitive.clear();
        }
    }

    fn read(&self) -> RepositoryResult<std::sync::RwLockReadGuard<'_, LocalData>> {
        let data = self
            .data
            .read()
            .map_err(|e| RepositoryError::InternalError(format!("Lock poisoned: {}", e)))?;
        if data.is_unhealthy {
            return Err(RepositoryError::ConnectionError(
                "Local repository marked unhealthy".to_string(),
            ));
        }
        Ok(data)
    }

    fn write(&self) -> RepositoryResult<std::sync::RwLockWriteGuard<'_, LocalData>> {
        let data = self
            .data
            .write()
            .map_err(|e| RepositoryError::InternalError(format!("Lock poisoned: {}", e)))?;
        if data.is_unhealthy {
            return Err(RepositoryError::ConnectionError(
                "Local repository marked unhealthy".to_string(),
            ));
        }
        Ok(data)
    }
}

#[async_trait]
impl KeyValueRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        let data = self
            .data
            .read()
            .map_err(|e| RepositoryError::InternalError(format!("Lock poisoned: {}", e)))?;
        Ok(!data.is_unhealthy)
    }

    async fn get(&self, namespace: Namespace, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.read()?.namespace(namespace).get(key).cloned())
    }

    async fn set(&self, namespace: Namespace, key: &str, value: &str) -> RepositoryResult<()> {
        self.write()?
            .namespace_mut(namespace)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, namespace: Namespace, key: &str) -> RepositoryResult<bool> {
        Ok(self.write()?.namespace_mut(namespace).remove(key).is_some())
    }

    async fn keys(&self, namespace: Namespace) -> RepositoryResult<Vec<String>> {
        let mut keys: Vec<String> = self.read()?.namespace(namespace).keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let repo = LocalRepository::new();
        repo.set(Namespace::Encrypted, "history", "[]").await.unwrap();

        assert_eq!(
            repo.get(Namespace::Encrypted, "history").await.unwrap().as_deref(),
            Some("[]")
        );
        assert_eq!(repo.get(Namespace::NonSensitive, "history").await.unwrap(), None);
        assert_eq!(repo.len(Namespace::Encrypted), 1);
        assert_eq!(repo.len(Namespace::NonSensitive), 0);
    }

    #[tokio::test]
    async fn test_set_overwrites_and_remove() {
        let repo = LocalRepository::new();
        repo.set(Namespace::NonSensitive, "k", "1").await.unwrap();
        repo.set(Namespace::NonSensitive, "k", "2").await.unwrap();
        assert_eq!(
            repo.get(Namespace::NonSensitive, "k").await.unwrap().as_deref(),
            Some("2")
        );

        assert!(repo.remove(Namespace::NonSensitive, "k").await.unwrap());
        assert!(!repo.remove(Namespace::NonSensitive, "k").await.unwrap());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_keys_are_sorted() {
        let repo = LocalRepository::new();
        for key in ["b", "c", "a"] {
            repo.set(Namespace::Encrypted, key, "x").await.unwrap();
        }
        assert_eq!(repo.keys(Namespace::Encrypted).await.unwrap(), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let repo = LocalRepository::new();
        let other = repo.clone();
        repo.set(Namespace::Encrypted, "k", "v").await.unwrap();
        assert!(other.get(Namespace::Encrypted, "k").await.unwrap().is_some());

        other.clear();
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn test_unhealthy_repository_rejects_operations() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);

        assert!(!repo.health_check().await.unwrap());
        let err = repo.get(Namespace::Encrypted, "k").await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError(_)));

        repo.set_healthy(true);
        assert!(repo.health_check().await.unwrap());
    }
}
