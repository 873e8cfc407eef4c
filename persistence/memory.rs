use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{EnvironmentStorage, StorageError};

/// In-process storage for ephemeral sessions and tests.
///
/// Clones share one map, so a fresh store built from a clone behaves like a
/// cold restart over the same device storage.
#[derive(Clone, Default)]
pub struct MemoryEnvironmentStorage {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    values: Mutex<HashMap<String, String>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    transient_write_failures: AtomicUsize,
    write_attempts: AtomicUsize,
}

impl MemoryEnvironmentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Every write and remove fails until switched off.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// The next `count` writes or removes fail, later ones succeed.
    pub fn fail_next_writes(&self, count: usize) {
        self.inner
            .transient_write_failures
            .store(count, Ordering::SeqCst);
    }

    /// Writes and removes attempted, failed ones included.
    pub fn write_attempts(&self) -> usize {
        self.inner.write_attempts.load(Ordering::SeqCst)
    }

    /// Synchronous peek at a stored value.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.values.lock().get(key).cloned()
    }

    /// Stores a raw value without going through the failure switches.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.inner
            .values
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    fn check_write(&self) -> Result<(), StorageError> {
        self.inner.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Injected("write refused".to_string()));
        }
        let consumed = self.inner.transient_write_failures.fetch_update(
            Ordering::SeqCst,
            Ordering::SeqCst,
            |remaining| remaining.checked_sub(1),
        );
        if consumed.is_ok() {
            return Err(StorageError::Injected("transient write failure".to_string()));
        }
        Ok(())
    }
}

impl EnvironmentStorage for MemoryEnvironmentStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::Injected("read refused".to_string()));
        }
        Ok(self.peek(key))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_write()?;
        self.insert_raw(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.check_write()?;
        self.inner.values.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_values() {
        let storage = MemoryEnvironmentStorage::new();
        let restarted = storage.clone();

        storage.write("environment", "nextgen").await.unwrap();

        assert_eq!(
            restarted.read("environment").await.unwrap().as_deref(),
            Some("nextgen")
        );
    }

    #[tokio::test]
    async fn failing_writes_leave_values_untouched() {
        let storage = MemoryEnvironmentStorage::new();
        storage.insert_raw("environment", "legacy");
        storage.set_fail_writes(true);

        assert!(storage.write("environment", "nextgen").await.is_err());
        assert!(storage.remove("environment").await.is_err());
        assert_eq!(storage.peek("environment").as_deref(), Some("legacy"));
        assert_eq!(storage.write_attempts(), 2);
    }

    #[tokio::test]
    async fn transient_failures_are_consumed_in_order() {
        let storage = MemoryEnvironmentStorage::new();
        storage.fail_next_writes(2);

        assert!(storage.write("environment", "nextgen").await.is_err());
        assert!(storage.write("environment", "nextgen").await.is_err());
        assert!(storage.write("environment", "nextgen").await.is_ok());
        assert_eq!(storage.peek("environment").as_deref(), Some("nextgen"));
    }

    #[tokio::test]
    async fn failing_reads_surface_errors() {
        let storage = MemoryEnvironmentStorage::new();
        storage.set_fail_reads(true);
        assert!(matches!(
            storage.read("environment").await,
            Err(StorageError::Injected(_))
        ));
    }
}
