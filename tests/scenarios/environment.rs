use tempfile::TempDir;
use thoughtmarks_shell::test_utils::{DiagnosticsCapture, memory_store};
use thoughtmarks_shell::{
    EnvironmentMode, EnvironmentStore, EnvironmentStoreConfig, MemoryEnvironmentStorage,
    RedbEnvironmentStorage,
};

#[tokio::test]
async fn cold_start_without_record_mounts_legacy() {
    let store = memory_store(MemoryEnvironmentStorage::new());
    assert_eq!(store.hydrate().await, EnvironmentMode::Legacy);
}

#[tokio::test]
async fn toggle_twice_is_an_involution_and_storage_tracks_memory() {
    let storage = MemoryEnvironmentStorage::new();
    let store = memory_store(storage.clone());
    let start = store.hydrate().await;

    for _ in 0..2 {
        let result = store.toggle().await;
        assert!(result.success);
        assert_eq!(
            storage.peek("environment").as_deref(),
            Some(result.current_environment.as_str())
        );
    }

    assert_eq!(store.current(), start);
}

#[tokio::test]
async fn set_nextgen_survives_a_cold_restart_on_disk() {
    let dir = TempDir::new().unwrap();
    {
        let store = EnvironmentStore::new(
            RedbEnvironmentStorage::open(dir.path()).unwrap(),
            EnvironmentStoreConfig::default(),
        );
        store.hydrate().await;
        assert!(store.set(EnvironmentMode::Nextgen).await.success);
    }

    let restarted = EnvironmentStore::new(
        RedbEnvironmentStorage::open(dir.path()).unwrap(),
        EnvironmentStoreConfig::default(),
    );
    assert_eq!(restarted.hydrate().await, EnvironmentMode::Nextgen);
}

#[tokio::test]
async fn seed_never_overrides_stored_state() {
    let storage = MemoryEnvironmentStorage::new();
    storage.insert_raw("environment", "legacy");
    let store = EnvironmentStore::new(
        storage,
        EnvironmentStoreConfig {
            seed: EnvironmentMode::Nextgen,
            retry_attempts: 0,
            ..EnvironmentStoreConfig::default()
        },
    );

    assert_eq!(store.current(), EnvironmentMode::Nextgen);
    assert_eq!(store.hydrate().await, EnvironmentMode::Legacy);
}

#[tokio::test]
async fn set_before_hydrate_persists_even_when_seed_already_matches() {
    let storage = MemoryEnvironmentStorage::new();
    storage.insert_raw("environment", "legacy");
    let store = EnvironmentStore::new(
        storage.clone(),
        EnvironmentStoreConfig {
            seed: EnvironmentMode::Nextgen,
            retry_attempts: 0,
            ..EnvironmentStoreConfig::default()
        },
    );

    let result = store.set(EnvironmentMode::Nextgen).await;

    assert!(result.success);
    assert!(result.changed);
    let restarted = memory_store(storage);
    assert_eq!(restarted.hydrate().await, EnvironmentMode::Nextgen);
}

#[tokio::test]
async fn toggle_before_hydrate_starts_from_stored_mode() {
    let storage = MemoryEnvironmentStorage::new();
    storage.insert_raw("environment", "nextgen");
    let store = memory_store(storage.clone());

    let result = store.toggle().await;

    assert!(result.success);
    assert_eq!(result.previous_environment, EnvironmentMode::Nextgen);
    assert_eq!(storage.peek("environment").as_deref(), Some("legacy"));
}

#[tokio::test]
async fn failing_write_keeps_previous_mode_after_restart() {
    let storage = MemoryEnvironmentStorage::new();
    storage.insert_raw("environment", "legacy");
    let store = memory_store(storage.clone());
    store.hydrate().await;
    storage.set_fail_writes(true);

    let result = store.toggle().await;

    assert!(!result.success);
    assert_eq!(result.current_environment, EnvironmentMode::Legacy);
    storage.set_fail_writes(false);
    let restarted = memory_store(storage);
    assert_eq!(restarted.hydrate().await, EnvironmentMode::Legacy);
}

#[tokio::test]
async fn reset_after_set_hydrates_legacy() {
    let storage = MemoryEnvironmentStorage::new();
    let store = memory_store(storage.clone());
    store.hydrate().await;
    store.set(EnvironmentMode::Nextgen).await;

    assert!(store.reset().await.success);

    let restarted = memory_store(storage);
    assert_eq!(restarted.hydrate().await, EnvironmentMode::Legacy);
}

#[tokio::test(start_paused = true)]
async fn transient_write_failure_is_retried() {
    let storage = MemoryEnvironmentStorage::new();
    let store = EnvironmentStore::new(storage.clone(), EnvironmentStoreConfig::default());
    store.hydrate().await;
    storage.fail_next_writes(1);

    let result = store.set(EnvironmentMode::Nextgen).await;

    assert!(result.success);
    assert_eq!(storage.write_attempts(), 2);
}

#[tokio::test]
async fn store_operations_report_diagnostics() {
    let capture = DiagnosticsCapture::install();
    let storage = MemoryEnvironmentStorage::new();
    let store = memory_store(storage.clone());

    store.hydrate().await;
    store.toggle().await;
    storage.set_fail_writes(true);
    store.toggle().await;

    assert_eq!(
        capture.channels(),
        vec![
            "environment.hydrate.fallback_used",
            "environment.toggle.succeeded",
            "environment.toggle.failed",
        ]
    );
}
