//! File-backed repository implementation.
//!
//! Each namespace is one JSON object file (`encrypted.json`,
//! `non_sensitive.json`) inside a data directory. Files are rewritten whole
//! on every change through a temporary file and a rename. Writes are
//! serialized through an async mutex; this store is meant for a single
//! process.

use async_trait::async_trait;
use log::debug;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::db::repository::{KeyValueRepository, Namespace, RepositoryError, RepositoryResult};

type NamespaceData = BTreeMap<String, String>;

/// Repository persisting namespaces as JSON files in a directory.
#[derive(Clone)]
pub struct FileRepository {
    directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileRepository {
    /// Create a repository rooted at `directory`, creating it if needed.
    pub async fn open(directory: impl Into<PathBuf>) -> RepositoryResult<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await.map_err(|e| {
            RepositoryError::ConnectionError(format!(
                "Failed to create data directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        debug!("Opened file repository at {}", directory.display());

        Ok(Self {
            directory,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn namespace_path(&self, namespace: Namespace) -> PathBuf {
        self.directory.join(format!("{}.json", namespace.as_str()))
    }

    async fn load(&self, namespace: Namespace) -> RepositoryResult<NamespaceData> {
        let path = self.namespace_path(namespace);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) if content.trim().is_empty() => Ok(NamespaceData::new()),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                RepositoryError::ValidationError(format!(
                    "Corrupt namespace file {}: {}",
                    path.display(),
                    e
                ))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(NamespaceData::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, namespace: Namespace, data: &NamespaceData) -> RepositoryResult<()> {
        let path = self.namespace_path(namespace);
        let tmp_path = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(data)?;

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match tokio::fs::metadata(&self.directory).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn get(&self, namespace: Namespace, key: &str) -> RepositoryResult<Option<String>> {
        Ok(self.load(namespace).await?.remove(key))
    }

    async fn set(&self, namespace: Namespace, key: &str, value: &str) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load(namespace).await?;
        data.insert(key.to_string(), value.to_string());
        self.store(namespace, &data).await
    }

    async fn remove(&self, namespace: Namespace, key: &str) -> RepositoryResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut data = self.load(namespace).await?;
        if data.remove(key).is_none() {
            return Ok(false);
        }
        self.store(namespace, &data).await?;
        Ok(true)
    }

    async fn keys(&self, namespace: Namespace) -> RepositoryResult<Vec<String>> {
        Ok(self.load(namespace).await?.into_keys().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_persist_across_instances() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::open(dir.path()).await.unwrap();
        repo.set(Namespace::Encrypted, "history", "[1]").await.unwrap();

        let reopened = FileRepository::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get(Namespace::Encrypted, "history").await.unwrap().as_deref(),
            Some("[1]")
        );
        assert!(dir.path().join("encrypted.json").exists());
        assert!(!dir.path().join("non_sensitive.json").exists());
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::open(dir.path().join("nested")).await.unwrap();
        assert!(repo.health_check().await.unwrap());
        assert_eq!(repo.get(Namespace::NonSensitive, "x").await.unwrap(), None);
        assert!(repo.keys(Namespace::Encrypted).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_keys() {
        let dir = TempDir::new().unwrap();
        let repo = FileRepository::open(dir.path()).await.unwrap();
        repo.set(Namespace::NonSensitive, "b", "2").await.unwrap();
        repo.set(Namespace::NonSensitive, "a", "1").await.unwrap();
        assert_eq!(repo.keys(Namespace::NonSensitive).await.unwrap(), vec!["a", "b"]);

        assert!(repo.remove(Namespace::NonSensitive, "a").await.unwrap());
        assert!(!repo.remove(Namespace::NonSensitive, "a").await.unwrap());
        assert_eq!(repo.keys(Namespace::NonSensitive).await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("encrypted.json"), "{not json").unwrap();
        let repo = FileRepository::open(dir.path()).await.unwrap();

        let err = repo.get(Namespace::Encrypted, "k").await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
    }
}
