/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

use std::collections::{HashMap, VecDeque};
use std::sync::OnceLock;

use crossbeam_channel::{Receiver, Sender, unbounded};
use serde_json::{Value, json};

use crate::registries::atomic::diagnostics as diagnostics_registry;

static GLOBAL_DIAGNOSTICS_TX: OnceLock<Sender<DiagnosticEvent>> = OnceLock::new();

#[cfg(any(test, feature = "test-utils"))]
thread_local! {
    static TEST_DIAGNOSTICS_TX: std::cell::RefCell<Option<Sender<DiagnosticEvent>>> =
        const { std::cell::RefCell::new(None) };
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticEvent {
    MessageSent {
        channel_id: &'static str,
        byte_len: usize,
    },
    MessageReceived {
        channel_id: &'static str,
        latency_us: u64,
    },
}

impl DiagnosticEvent {
    pub fn channel_id(&self) -> &'static str {
        match self {
            DiagnosticEvent::MessageSent { channel_id, .. }
            | DiagnosticEvent::MessageReceived { channel_id, .. } => channel_id,
        }
    }
}

pub fn install_global_sender(sender: Sender<DiagnosticEvent>) {
    let _ = GLOBAL_DIAGNOSTICS_TX.set(sender.clone());

    #[cfg(any(test, feature = "test-utils"))]
    install_thread_sender(sender);
}

/// Routes events emitted on the current thread to `sender` only.
#[cfg(any(test, feature = "test-utils"))]
pub fn install_thread_sender(sender: Sender<DiagnosticEvent>) {
    TEST_DIAGNOSTICS_TX.with(|slot| {
        *slot.borrow_mut() = Some(sender);
    });
}

pub fn emit_event(event: DiagnosticEvent) {
    #[cfg(any(test, feature = "test-utils"))]
    {
        let mut event = Some(event);
        TEST_DIAGNOSTICS_TX.with(|slot| {
            if let Some(tx) = slot.borrow().as_ref()
                && let Some(payload) = event.take()
            {
                emit_event_with_sender(tx, payload);
            }
        });
        if let Some(payload) = event
            && let Some(tx) = GLOBAL_DIAGNOSTICS_TX.get()
        {
            emit_event_with_sender(tx, payload);
        }
    }

    #[cfg(not(any(test, feature = "test-utils")))]
    {
        if let Some(tx) = GLOBAL_DIAGNOSTICS_TX.get() {
            emit_event_with_sender(tx, event);
        }
    }
}

fn emit_event_with_sender(tx: &Sender<DiagnosticEvent>, event: DiagnosticEvent) {
    if cfg!(feature = "diagnostics")
        && !diagnostics_registry::should_emit_channel_global(event.channel_id())
    {
        return;
    }
    let _ = tx.send(event);
}

/// Drains the diagnostics channel and keeps per-channel aggregates plus the most
/// recent events, capped by each channel's `retention_count`.
pub struct DiagnosticsState {
    event_rx: Receiver<DiagnosticEvent>,
    recent: HashMap<&'static str, VecDeque<DiagnosticEvent>>,
    message_counts: HashMap<&'static str, u64>,
    message_bytes_sent: HashMap<&'static str, u64>,
    message_latency_us: HashMap<&'static str, u64>,
}

impl DiagnosticsState {
    pub fn new() -> Self {
        let (event_tx, event_rx) = unbounded();
        install_global_sender(event_tx);
        Self {
            event_rx,
            recent: HashMap::new(),
            message_counts: HashMap::new(),
            message_bytes_sent: HashMap::new(),
            message_latency_us: HashMap::new(),
        }
    }

    /// Pulls every queued event into the aggregates; returns how many were read.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.aggregate_event(&event);
            drained += 1;
        }
        drained
    }

    fn aggregate_event(&mut self, event: &DiagnosticEvent) {
        let channel_id = event.channel_id();
        let retention = diagnostics_registry::channel_config_global(channel_id).retention_count;
        let recent = self.recent.entry(channel_id).or_default();
        recent.push_back(event.clone());
        while recent.len() > retention {
            recent.pop_front();
        }

        match event {
            DiagnosticEvent::MessageSent {
                channel_id,
                byte_len,
            } => {
                *self.message_counts.entry(*channel_id).or_insert(0) += 1;
                *self.message_bytes_sent.entry(*channel_id).or_insert(0) += *byte_len as u64;
            }
            DiagnosticEvent::MessageReceived {
                channel_id,
                latency_us,
            } => {
                *self.message_counts.entry(*channel_id).or_insert(0) += 1;
                *self.message_latency_us.entry(*channel_id).or_insert(0) += *latency_us;
            }
        }
    }

    pub fn channel_count(&self, channel: &str) -> u64 {
        self.message_counts.get(channel).copied().unwrap_or(0)
    }

    /// Retained events for `channel`, oldest first.
    pub fn recent_events(&self, channel: &str) -> Vec<DiagnosticEvent> {
        self.recent
            .get(channel)
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn snapshot_json(&self) -> Value {
        let mut channels: Vec<&&'static str> = self.message_counts.keys().collect();
        channels.sort();
        let entries: Vec<Value> = channels
            .into_iter()
            .map(|channel| {
                json!({
                    "channel_id": channel,
                    "count": self.channel_count(channel),
                    "bytes_sent": self.message_bytes_sent.get(*channel).copied().unwrap_or(0),
                    "latency_us_total": self.message_latency_us.get(*channel).copied().unwrap_or(0),
                    "retained": self.recent.get(*channel).map_or(0, VecDeque::len),
                })
            })
            .collect();
        let registered: Vec<Value> = diagnostics_registry::list_channel_configs_snapshot()
            .into_iter()
            .map(|(channel, config)| {
                json!({
                    "channel_id": channel.channel_id,
                    "severity": channel.severity,
                    "source": channel.source,
                    "enabled": config.enabled,
                    "sample_rate": config.sample_rate,
                    "retention_count": config.retention_count,
                })
            })
            .collect();
        json!({
            "channels": entries,
            "registered": registered,
            "orphans": diagnostics_registry::list_orphan_channels_snapshot(),
        })
    }
}

impl Default for DiagnosticsState {
    fn default() -> Self {
        Self::new()
    }
}
