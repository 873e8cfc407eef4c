use std::collections::HashMap;
use std::sync::OnceLock;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::shell::desktop::runtime::registries::{
    CHANNEL_DUAL_MOUNT_MODE_INVALID, CHANNEL_DUAL_MOUNT_TREE_MOUNTED,
    CHANNEL_DUAL_MOUNT_TREE_UNMOUNTED, CHANNEL_ENVIRONMENT_HYDRATE_FALLBACK_USED,
    CHANNEL_ENVIRONMENT_HYDRATE_SUCCEEDED, CHANNEL_ENVIRONMENT_RESET_FAILED,
    CHANNEL_ENVIRONMENT_RESET_SUCCEEDED, CHANNEL_ENVIRONMENT_SET_FAILED,
    CHANNEL_ENVIRONMENT_SET_SUCCEEDED, CHANNEL_ENVIRONMENT_TOGGLE_FAILED,
    CHANNEL_ENVIRONMENT_TOGGLE_SUCCEEDED, CHANNEL_PERSISTENCE_WRITE_RETRY,
    CHANNEL_ROLE_ASSIGNMENT_MOUNTED, CHANNEL_ROLE_ASSIGNMENT_UNMOUNTED, CHANNEL_ROLE_LOOKUP_FAILED,
    CHANNEL_ROLE_VALIDATION_FAILED, CHANNEL_ROLE_VALIDATION_PASSED, CHANNEL_STARTUP_CONFIG_SNAPSHOT,
};

/// Severity tier used when listing channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSeverity {
    #[default]
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticChannelDescriptor {
    pub channel_id: &'static str,
    pub schema_version: u16,
    pub severity: ChannelSeverity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelSource {
    Core,
    Runtime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredChannel {
    pub channel_id: String,
    pub schema_version: u16,
    pub severity: ChannelSeverity,
    pub source: ChannelSource,
}

impl RegisteredChannel {
    fn from_contract(descriptor: DiagnosticChannelDescriptor) -> Self {
        Self {
            channel_id: normalize_channel_id(descriptor.channel_id),
            schema_version: descriptor.schema_version,
            severity: descriptor.severity,
            source: ChannelSource::Core,
        }
    }
}

const fn descriptor(
    channel_id: &'static str,
    severity: ChannelSeverity,
) -> DiagnosticChannelDescriptor {
    DiagnosticChannelDescriptor {
        channel_id,
        schema_version: 1,
        severity,
    }
}

const CORE_CHANNELS: [DiagnosticChannelDescriptor; 18] = [
    descriptor(CHANNEL_ROLE_LOOKUP_FAILED, ChannelSeverity::Warn),
    descriptor(CHANNEL_ROLE_VALIDATION_FAILED, ChannelSeverity::Warn),
    descriptor(CHANNEL_ROLE_VALIDATION_PASSED, ChannelSeverity::Info),
    descriptor(CHANNEL_ROLE_ASSIGNMENT_MOUNTED, ChannelSeverity::Info),
    descriptor(CHANNEL_ROLE_ASSIGNMENT_UNMOUNTED, ChannelSeverity::Info),
    descriptor(CHANNEL_ENVIRONMENT_HYDRATE_SUCCEEDED, ChannelSeverity::Info),
    descriptor(CHANNEL_ENVIRONMENT_HYDRATE_FALLBACK_USED, ChannelSeverity::Warn),
    descriptor(CHANNEL_ENVIRONMENT_TOGGLE_SUCCEEDED, ChannelSeverity::Info),
    descriptor(CHANNEL_ENVIRONMENT_TOGGLE_FAILED, ChannelSeverity::Error),
    descriptor(CHANNEL_ENVIRONMENT_SET_SUCCEEDED, ChannelSeverity::Info),
    descriptor(CHANNEL_ENVIRONMENT_SET_FAILED, ChannelSeverity::Error),
    descriptor(CHANNEL_ENVIRONMENT_RESET_SUCCEEDED, ChannelSeverity::Info),
    descriptor(CHANNEL_ENVIRONMENT_RESET_FAILED, ChannelSeverity::Error),
    descriptor(CHANNEL_PERSISTENCE_WRITE_RETRY, ChannelSeverity::Warn),
    descriptor(CHANNEL_DUAL_MOUNT_TREE_MOUNTED, ChannelSeverity::Info),
    descriptor(CHANNEL_DUAL_MOUNT_TREE_UNMOUNTED, ChannelSeverity::Info),
    descriptor(CHANNEL_DUAL_MOUNT_MODE_INVALID, ChannelSeverity::Error),
    descriptor(CHANNEL_STARTUP_CONFIG_SNAPSHOT, ChannelSeverity::Info),
];

pub fn core_channels() -> &'static [DiagnosticChannelDescriptor] {
    &CORE_CHANNELS
}

/// Per-channel emission policy, also read from `[diagnostics.channels."<id>"]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub enabled: bool,
    pub sample_rate: f32,
    pub retention_count: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sample_rate: 1.0,
            retention_count: 100,
        }
    }
}

pub struct DiagnosticsRegistry {
    channels: HashMap<String, RegisteredChannel>,
    configs: HashMap<String, ChannelConfig>,
    sample_counters: HashMap<String, u64>,
    orphan_channels: HashMap<String, u64>,
}

impl Default for DiagnosticsRegistry {
    fn default() -> Self {
        let mut registry = Self {
            channels: HashMap::new(),
            configs: HashMap::new(),
            sample_counters: HashMap::new(),
            orphan_channels: HashMap::new(),
        };
        registry.register_batch(core_channels());
        registry
    }
}

impl DiagnosticsRegistry {
    pub fn register(&mut self, descriptor: DiagnosticChannelDescriptor) {
        let channel = RegisteredChannel::from_contract(descriptor);
        self.configs.entry(channel.channel_id.clone()).or_default();
        self.channels.insert(channel.channel_id.clone(), channel);
    }

    pub fn register_batch(&mut self, descriptors: &[DiagnosticChannelDescriptor]) {
        for descriptor in descriptors.iter().copied() {
            self.register(descriptor);
        }
    }

    pub fn get_config(&self, channel_id: &str) -> ChannelConfig {
        self.configs
            .get(&normalize_channel_id(channel_id))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_config(&mut self, channel_id: &str, config: ChannelConfig) {
        self.configs.insert(
            normalize_channel_id(channel_id),
            normalize_channel_config(config),
        );
    }

    pub fn has_channel(&self, channel_id: &str) -> bool {
        self.channels.contains_key(&normalize_channel_id(channel_id))
    }

    pub fn list_channel_configs(&self) -> Vec<(RegisteredChannel, ChannelConfig)> {
        let mut entries: Vec<(RegisteredChannel, ChannelConfig)> = self
            .channels
            .values()
            .cloned()
            .map(|channel| {
                let config = self
                    .configs
                    .get(&channel.channel_id)
                    .cloned()
                    .unwrap_or_default();
                (channel, config)
            })
            .collect();
        entries.sort_by(|a, b| a.0.channel_id.cmp(&b.0.channel_id));
        entries
    }

    pub fn list_orphan_channels(&self) -> Vec<(String, u64)> {
        let mut entries: Vec<(String, u64)> = self
            .orphan_channels
            .iter()
            .map(|(channel_id, count)| (channel_id.clone(), *count))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Unknown channels are registered on first use and counted as orphans.
    pub fn should_emit_channel(&mut self, channel_id: &str) -> bool {
        let normalized = normalize_channel_id(channel_id);
        if !self.channels.contains_key(&normalized) {
            self.channels.insert(
                normalized.clone(),
                RegisteredChannel {
                    channel_id: normalized.clone(),
                    schema_version: 1,
                    severity: ChannelSeverity::Info,
                    source: ChannelSource::Runtime,
                },
            );
            self.configs.entry(normalized.clone()).or_default();
            *self.orphan_channels.entry(normalized.clone()).or_insert(0) += 1;
        }

        let config = self.configs.get(&normalized).cloned().unwrap_or_default();
        if !config.enabled {
            return false;
        }
        if config.sample_rate >= 1.0 {
            return true;
        }
        if config.sample_rate <= 0.0 {
            return false;
        }

        let counter = self.sample_counters.entry(normalized).or_insert(0);
        *counter = counter.saturating_add(1);
        let gate = (1.0f32 / config.sample_rate.max(0.0001)).ceil() as u64;
        gate <= 1 || (*counter % gate == 0)
    }
}

fn normalize_channel_id(channel_id: &str) -> String {
    channel_id.trim().to_ascii_lowercase()
}

fn normalize_channel_config(config: ChannelConfig) -> ChannelConfig {
    ChannelConfig {
        enabled: config.enabled,
        sample_rate: config.sample_rate.clamp(0.0, 1.0),
        retention_count: config.retention_count.max(1),
    }
}

static GLOBAL_DIAGNOSTICS_REGISTRY: OnceLock<Mutex<DiagnosticsRegistry>> = OnceLock::new();

fn global_registry() -> &'static Mutex<DiagnosticsRegistry> {
    GLOBAL_DIAGNOSTICS_REGISTRY.get_or_init(|| Mutex::new(DiagnosticsRegistry::default()))
}

pub fn should_emit_channel_global(channel_id: &str) -> bool {
    global_registry().lock().should_emit_channel(channel_id)
}

pub fn apply_channel_configs<I>(configs: I)
where
    I: IntoIterator<Item = (String, ChannelConfig)>,
{
    let mut registry = global_registry().lock();
    for (channel_id, config) in configs {
        registry.set_config(&channel_id, config);
    }
}

pub fn channel_config_global(channel_id: &str) -> ChannelConfig {
    global_registry().lock().get_config(channel_id)
}

pub fn list_channel_configs_snapshot() -> Vec<(RegisteredChannel, ChannelConfig)> {
    global_registry().lock().list_channel_configs()
}

pub fn list_orphan_channels_snapshot() -> Vec<(String, u64)> {
    global_registry().lock().list_orphan_channels()
}
