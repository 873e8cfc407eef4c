/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Environment store: the single owner of the active mount mode.
//!
//! Durable storage is authoritative. The configured seed is only what the store
//! reports before `hydrate` completes. Every mutation writes through to storage
//! first and touches memory only once the write has committed, so a crash
//! mid-toggle never leaves a mode behind that `hydrate` could not observe.

use std::time::{Duration, Instant};

use backon::{ExponentialBuilder, Retryable};
use log::{debug, info, warn};
use serde::Serialize;
use thoughtmarks_core::EnvironmentMode;
use tokio::sync::{Mutex, watch};

use crate::persistence::{EnvironmentStorage, StorageError};
use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, emit_event};
use crate::shell::desktop::runtime::registries::{
    CHANNEL_ENVIRONMENT_HYDRATE_FALLBACK_USED, CHANNEL_ENVIRONMENT_HYDRATE_SUCCEEDED,
    CHANNEL_ENVIRONMENT_RESET_FAILED, CHANNEL_ENVIRONMENT_RESET_SUCCEEDED,
    CHANNEL_ENVIRONMENT_SET_FAILED, CHANNEL_ENVIRONMENT_SET_SUCCEEDED,
    CHANNEL_ENVIRONMENT_TOGGLE_FAILED, CHANNEL_ENVIRONMENT_TOGGLE_SUCCEEDED,
    CHANNEL_PERSISTENCE_WRITE_RETRY,
};

pub const DEFAULT_STORAGE_KEY: &str = "environment";
pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
const RETRY_DELAY_MAX_FACTOR: u32 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentStoreConfig {
    pub storage_key: String,
    pub seed: EnvironmentMode,
    /// Retries after the first failed write; `0` disables retrying.
    pub retry_attempts: usize,
    pub retry_delay: Duration,
}

impl Default for EnvironmentStoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed: EnvironmentMode::Legacy,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// Outcome of `toggle`, `set` or `reset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentToggleResult {
    pub success: bool,
    pub previous_environment: EnvironmentMode,
    pub current_environment: EnvironmentMode,
    /// False when the store was already in the requested mode.
    pub changed: bool,
    pub error: Option<String>,
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnvironmentStatus {
    pub current: EnvironmentMode,
    pub hydrated: bool,
    pub seed: EnvironmentMode,
}

#[derive(Debug)]
struct StoreState {
    current: EnvironmentMode,
    hydrated: bool,
}

#[derive(Debug, Clone, Copy)]
enum Persist {
    Write(EnvironmentMode),
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct OperationChannels {
    name: &'static str,
    succeeded: &'static str,
    failed: &'static str,
}

const TOGGLE: OperationChannels = OperationChannels {
    name: "toggle",
    succeeded: CHANNEL_ENVIRONMENT_TOGGLE_SUCCEEDED,
    failed: CHANNEL_ENVIRONMENT_TOGGLE_FAILED,
};
const SET: OperationChannels = OperationChannels {
    name: "set",
    succeeded: CHANNEL_ENVIRONMENT_SET_SUCCEEDED,
    failed: CHANNEL_ENVIRONMENT_SET_FAILED,
};
const RESET: OperationChannels = OperationChannels {
    name: "reset",
    succeeded: CHANNEL_ENVIRONMENT_RESET_SUCCEEDED,
    failed: CHANNEL_ENVIRONMENT_RESET_FAILED,
};

fn elapsed_us(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX)
}

pub struct EnvironmentStore<S: EnvironmentStorage> {
    storage: S,
    config: EnvironmentStoreConfig,
    state: Mutex<StoreState>,
    changes: watch::Sender<EnvironmentMode>,
}

impl<S: EnvironmentStorage> EnvironmentStore<S> {
    pub fn new(storage: S, config: EnvironmentStoreConfig) -> Self {
        let (changes, _) = watch::channel(config.seed);
        Self {
            storage,
            state: Mutex::new(StoreState {
                current: config.seed,
                hydrated: false,
            }),
            config,
            changes,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Last committed mode, readable without waiting on in-flight operations.
    pub fn current(&self) -> EnvironmentMode {
        *self.changes.borrow()
    }

    /// Receiver that observes every committed change.
    pub fn subscribe(&self) -> watch::Receiver<EnvironmentMode> {
        self.changes.subscribe()
    }

    pub async fn status(&self) -> EnvironmentStatus {
        let state = self.state.lock().await;
        EnvironmentStatus {
            current: state.current,
            hydrated: state.hydrated,
            seed: self.config.seed,
        }
    }

    /// Loads the stored mode. Missing, malformed or unreadable records yield `legacy`.
    pub async fn hydrate(&self) -> EnvironmentMode {
        let mut state = self.state.lock().await;
        self.load(&mut state).await
    }

    /// Mutations act on the stored mode, never on the seed.
    async fn ensure_hydrated(&self, state: &mut StoreState) {
        if !state.hydrated {
            debug!("Environment mutated before hydrate; loading stored mode first");
            self.load(state).await;
        }
    }

    async fn load(&self, state: &mut StoreState) -> EnvironmentMode {
        let started = Instant::now();

        let stored = match self.storage.read(&self.config.storage_key).await {
            Ok(Some(raw)) => {
                let parsed = EnvironmentMode::from_stored(&raw);
                if parsed.is_none() {
                    warn!("Ignoring malformed stored environment '{raw}'; using legacy");
                }
                parsed
            }
            Ok(None) => {
                debug!("No stored environment; using legacy");
                None
            }
            Err(e) => {
                warn!("Failed to read stored environment: {e}. Using legacy.");
                None
            }
        };

        let mode = match stored {
            Some(mode) => {
                emit_event(DiagnosticEvent::MessageReceived {
                    channel_id: CHANNEL_ENVIRONMENT_HYDRATE_SUCCEEDED,
                    latency_us: elapsed_us(started),
                });
                mode
            }
            None => {
                emit_event(DiagnosticEvent::MessageReceived {
                    channel_id: CHANNEL_ENVIRONMENT_HYDRATE_FALLBACK_USED,
                    latency_us: elapsed_us(started),
                });
                EnvironmentMode::Legacy
            }
        };

        state.current = mode;
        state.hydrated = true;
        self.publish(mode);
        info!("Environment hydrated: {mode}");
        mode
    }

    pub async fn toggle(&self) -> EnvironmentToggleResult {
        let mut state = self.state.lock().await;
        self.ensure_hydrated(&mut state).await;
        let target = state.current.toggled();
        self.commit(&mut state, target, Persist::Write(target), TOGGLE)
            .await
    }

    /// No write happens when the store is already in `mode`.
    pub async fn set(&self, mode: EnvironmentMode) -> EnvironmentToggleResult {
        let mut state = self.state.lock().await;
        self.ensure_hydrated(&mut state).await;
        if state.current == mode {
            debug!("Environment already set to {mode}");
            return EnvironmentToggleResult {
                success: true,
                previous_environment: mode,
                current_environment: mode,
                changed: false,
                error: None,
                duration: Duration::ZERO,
            };
        }
        self.commit(&mut state, mode, Persist::Write(mode), SET)
            .await
    }

    /// Deletes the stored record and returns to `legacy`.
    pub async fn reset(&self) -> EnvironmentToggleResult {
        let mut state = self.state.lock().await;
        self.ensure_hydrated(&mut state).await;
        self.commit(&mut state, EnvironmentMode::Legacy, Persist::Remove, RESET)
            .await
    }

    async fn commit(
        &self,
        state: &mut StoreState,
        target: EnvironmentMode,
        op: Persist,
        channels: OperationChannels,
    ) -> EnvironmentToggleResult {
        let started = Instant::now();
        let previous = state.current;

        match self.persist(op).await {
            Ok(()) => {
                state.current = target;
                self.publish(target);
                let duration = started.elapsed();
                info!(
                    "Environment {} committed: {previous} -> {target} in {duration:?}",
                    channels.name
                );
                emit_event(DiagnosticEvent::MessageReceived {
                    channel_id: channels.succeeded,
                    latency_us: elapsed_us(started),
                });
                EnvironmentToggleResult {
                    success: true,
                    previous_environment: previous,
                    current_environment: target,
                    changed: previous != target,
                    error: None,
                    duration,
                }
            }
            Err(e) => {
                warn!(
                    "Environment {} failed; staying on {previous}: {e}",
                    channels.name
                );
                emit_event(DiagnosticEvent::MessageReceived {
                    channel_id: channels.failed,
                    latency_us: elapsed_us(started),
                });
                EnvironmentToggleResult {
                    success: false,
                    previous_environment: previous,
                    current_environment: previous,
                    changed: false,
                    error: Some(e.to_string()),
                    duration: started.elapsed(),
                }
            }
        }
    }

    fn publish(&self, mode: EnvironmentMode) {
        self.changes.send_if_modified(|current| {
            if *current == mode {
                return false;
            }
            *current = mode;
            true
        });
    }

    fn backoff(&self) -> ExponentialBuilder {
        let delay = self.config.retry_delay;
        ExponentialBuilder::default()
            .with_min_delay(delay)
            .with_max_delay(delay.saturating_mul(RETRY_DELAY_MAX_FACTOR))
            .with_factor(2.0)
            .with_max_times(self.config.retry_attempts)
    }

    async fn persist(&self, op: Persist) -> Result<(), StorageError> {
        let storage = &self.storage;
        let key = self.config.storage_key.as_str();
        let attempt = || async move {
            match op {
                Persist::Write(mode) => storage.write(key, mode.as_str()).await,
                Persist::Remove => storage.remove(key).await,
            }
        };

        if self.config.retry_attempts == 0 {
            return attempt().await;
        }

        attempt
            .retry(self.backoff())
            .sleep(tokio::time::sleep)
            .notify(|err: &StorageError, delay: Duration| {
                warn!("Environment write failed ({err}); retrying in {delay:?}");
                emit_event(DiagnosticEvent::MessageSent {
                    channel_id: CHANNEL_PERSISTENCE_WRITE_RETRY,
                    byte_len: err.to_string().len(),
                });
            })
            .await
    }
}
