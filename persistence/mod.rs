/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Durable storage for the environment mode.
//!
//! One redb file (`environment.redb`) holds a single `environment` table of
//! text keys to text values. The store writes one key and reads it back on
//! hydration; nothing else in the shell touches the table.

pub mod memory;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{ReadableDatabase, ReadableTable};

pub use memory::MemoryEnvironmentStorage;

const ENVIRONMENT_TABLE: redb::TableDefinition<&str, &str> =
    redb::TableDefinition::new("environment");
pub const ENVIRONMENT_DB_FILE: &str = "environment.redb";

/// Key-value backend for the environment record.
pub trait EnvironmentStorage: Send + Sync + 'static {
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    fn write(
        &self,
        key: &str,
        value: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// redb-backed storage. Transactions run on the blocking pool.
#[derive(Clone)]
pub struct RedbEnvironmentStorage {
    db: Arc<redb::Database>,
    path: PathBuf,
}

impl RedbEnvironmentStorage {
    /// Open or create `environment.redb` inside `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self, StorageError> {
        std::fs::create_dir_all(data_dir)
            .map_err(|e| StorageError::Io(format!("Failed to create dir: {e}")))?;
        let path = data_dir.join(ENVIRONMENT_DB_FILE);
        let db = redb::Database::create(&path).map_err(|e| StorageError::Redb(format!("{e}")))?;
        Ok(Self {
            db: Arc::new(db),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, StorageError>
    where
        T: Send + 'static,
        F: FnOnce(&redb::Database) -> Result<T, StorageError> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || op(&db))
            .await
            .map_err(|e| StorageError::Task(format!("{e}")))?
    }
}

fn read_value(db: &redb::Database, key: &str) -> Result<Option<String>, StorageError> {
    let read_txn = db
        .begin_read()
        .map_err(|e| StorageError::Redb(format!("{e}")))?;
    let table = match read_txn.open_table(ENVIRONMENT_TABLE) {
        Ok(table) => table,
        Err(redb::TableError::TableDoesNotExist(_)) => return Ok(None),
        Err(e) => return Err(StorageError::Redb(format!("{e}"))),
    };
    let value = table
        .get(key)
        .map_err(|e| StorageError::Redb(format!("{e}")))?;
    Ok(value.map(|guard| guard.value().to_string()))
}

fn write_value(db: &redb::Database, key: &str, value: Option<&str>) -> Result<(), StorageError> {
    let write_txn = db
        .begin_write()
        .map_err(|e| StorageError::Redb(format!("{e}")))?;
    {
        let mut table = write_txn
            .open_table(ENVIRONMENT_TABLE)
            .map_err(|e| StorageError::Redb(format!("{e}")))?;
        match value {
            Some(value) => {
                table
                    .insert(key, value)
                    .map_err(|e| StorageError::Redb(format!("{e}")))?;
            }
            None => {
                table
                    .remove(key)
                    .map_err(|e| StorageError::Redb(format!("{e}")))?;
            }
        }
    }
    write_txn
        .commit()
        .map_err(|e| StorageError::Redb(format!("{e}")))
}

impl EnvironmentStorage for RedbEnvironmentStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let key = key.to_string();
        self.run_blocking(move |db| read_value(db, &key)).await
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        let value = value.to_string();
        self.run_blocking(move |db| write_value(db, &key, Some(&value)))
            .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let key = key.to_string();
        self.run_blocking(move |db| write_value(db, &key, None)).await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Io(String),
    Redb(String),
    Task(String),
    Injected(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {e}"),
            StorageError::Redb(e) => write!(f, "Redb error: {e}"),
            StorageError::Task(e) => write!(f, "Storage task error: {e}"),
            StorageError::Injected(e) => write!(f, "Injected failure: {e}"),
        }
    }
}

impl std::error::Error for StorageError {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_storage() -> (RedbEnvironmentStorage, TempDir) {
        let dir = TempDir::new().unwrap();
        let storage = RedbEnvironmentStorage::open(dir.path()).unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn test_read_before_any_write_is_none() {
        let (storage, _dir) = create_test_storage();
        assert_eq!(storage.read("environment").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_then_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let storage = RedbEnvironmentStorage::open(dir.path()).unwrap();
            storage.write("environment", "nextgen").await.unwrap();
        }

        let reopened = RedbEnvironmentStorage::open(dir.path()).unwrap();
        assert_eq!(
            reopened.read("environment").await.unwrap().as_deref(),
            Some("nextgen")
        );
        assert!(reopened.path().ends_with(ENVIRONMENT_DB_FILE));
    }

    #[tokio::test]
    async fn test_remove_clears_value() {
        let (storage, _dir) = create_test_storage();
        storage.write("environment", "legacy").await.unwrap();
        storage.remove("environment").await.unwrap();

        assert_eq!(storage.read("environment").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_key_is_ok() {
        let (storage, _dir) = create_test_storage();
        storage.remove("environment").await.unwrap();
    }
}
