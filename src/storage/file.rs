//! File-backed storage
//!
//! One file per key under a data directory. Writes go to a uniquely named temporary file in the
//! same directory which is then renamed over the target, so a reader never observes a half-written
//! value and concurrent writers never share a staging file.

use std::{
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tempfile::NamedTempFile;
use tokio::{fs, task};
use tracing::debug;

use super::{Storage, StorageError, validate_key};

/// Storage rooted at a directory on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Creates a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;

        Ok(self.root.join(key))
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read(&path).await {
            Ok(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_utf8| StorageError::InvalidValue(key.to_string())),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let root = self.root.clone();
        let contents = value.as_bytes().to_vec();

        fs::create_dir_all(&self.root).await?;
        task::spawn_blocking(move || write_atomically(&root, &path, &contents))
            .await
            .map_err(|error| StorageError::Unavailable(error.to_string()))??;

        debug!(key, bytes = value.len(), "stored value");

        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

fn write_atomically(root: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut staging = NamedTempFile::new_in(root)?;

    staging.write_all(contents)?;
    staging.persist(path)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn round_trips_through_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.set_item("cart", r#"[{"a":1}]"#).await?;

        assert_eq!(
            storage.get_item("cart").await?.as_deref(),
            Some(r#"[{"a":1}]"#)
        );
        assert!(dir.path().join("nested").join("cart").exists());

        Ok(())
    }

    #[tokio::test]
    async fn overwrite_leaves_no_staging_file() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        storage.set_item("token", "first").await?;
        storage.set_item("token", "second").await?;

        assert_eq!(storage.get_item("token").await?.as_deref(), Some("second"));
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_to_one_key_all_succeed() -> TestResult {
        let dir = tempfile::tempdir()?;

        let handles: Vec<_> = (0..16)
            .map(|n| {
                let storage = FileStorage::new(dir.path());
                tokio::spawn(async move { storage.set_item("cart", &format!("[{n}]")).await })
            })
            .collect();

        for handle in handles {
            handle.await??;
        }

        let value = FileStorage::new(dir.path())
            .get_item("cart")
            .await?
            .ok_or("cart not written")?;
        assert!((0..16).any(|n| value == format!("[{n}]")), "{value}");
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_none() -> TestResult {
        let dir = tempfile::tempdir()?;
        let storage = FileStorage::new(dir.path());

        assert_eq!(storage.get_item("cart").await?, None);

        storage.remove_item("cart").await?;

        Ok(())
    }

    #[tokio::test]
    async fn non_utf8_value_errors() -> TestResult {
        let dir = tempfile::tempdir()?;
        std::fs::write(dir.path().join("cart"), [0xff, 0xfe])?;
        let storage = FileStorage::new(dir.path());

        let result = storage.get_item("cart").await;

        assert!(matches!(result, Err(StorageError::InvalidValue(key)) if key == "cart"));

        Ok(())
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let storage = FileStorage::new("unused");

        let result = storage.get_item("../etc").await;

        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
