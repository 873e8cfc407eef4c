/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Fixtures shared by unit tests and the scenario binary.

use crossbeam_channel::{Receiver, unbounded};

use crate::app::ShellApp;
use crate::prefs::ShellConfig;
use crate::registries::atomic::theme::DesignTokens;
use crate::registries::domain::accessibility::RoleValidator;
use crate::registries::domain::presentation::{PresentationDomainRegistry, StyleLayers};
use crate::persistence::MemoryEnvironmentStorage;
use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, install_thread_sender};
use crate::shell::desktop::runtime::environment::{EnvironmentStore, EnvironmentStoreConfig};
use crate::shell::desktop::runtime::registries::assignment::RoleAssignmentRegistry;
use crate::shell::desktop::ui::role_view::RenderContext;

/// Collects diagnostics emitted on the current thread.
pub struct DiagnosticsCapture {
    rx: Receiver<DiagnosticEvent>,
}

impl DiagnosticsCapture {
    pub fn install() -> Self {
        let (tx, rx) = unbounded();
        install_thread_sender(tx);
        Self { rx }
    }

    /// Channel ids received since the last call.
    pub fn channels(&self) -> Vec<&'static str> {
        self.rx.try_iter().map(|event| event.channel_id()).collect()
    }
}

/// Store over shared in-memory storage with retries off.
pub fn memory_store(
    storage: MemoryEnvironmentStorage,
) -> EnvironmentStore<MemoryEnvironmentStorage> {
    EnvironmentStore::new(
        storage,
        EnvironmentStoreConfig {
            retry_attempts: 0,
            ..EnvironmentStoreConfig::default()
        },
    )
}

/// App over in-memory storage, development checks on.
pub fn memory_app(storage: MemoryEnvironmentStorage) -> ShellApp<MemoryEnvironmentStorage> {
    let config = ShellConfig {
        retry_attempts: 0,
        dev_mode: Some(true),
        ..ShellConfig::default()
    };
    ShellApp::with_storage(config, storage)
}

pub struct RenderFixture {
    pub validator: RoleValidator,
    pub presentation: PresentationDomainRegistry,
    pub tokens: DesignTokens,
    pub assignments: RoleAssignmentRegistry,
}

impl RenderFixture {
    pub fn new() -> Self {
        Self::with_layers(StyleLayers::default())
    }

    pub fn with_layers(layers: StyleLayers) -> Self {
        Self {
            validator: RoleValidator::default(),
            presentation: PresentationDomainRegistry::with_layers(layers),
            tokens: DesignTokens::light(),
            assignments: RoleAssignmentRegistry::new(),
        }
    }

    /// Development checks on, assignments recorded.
    pub fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.validator, &self.presentation, &self.tokens)
            .with_dev_mode(true)
            .with_assignments(&self.assignments)
    }
}

impl Default for RenderFixture {
    fn default() -> Self {
        Self::new()
    }
}
