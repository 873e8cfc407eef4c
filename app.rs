/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shell application state: one environment store plus everything a render pass reads.

use log::{info, warn};
use thoughtmarks_core::EnvironmentMode;

use crate::persistence::{EnvironmentStorage, RedbEnvironmentStorage, StorageError};
use crate::prefs::ShellConfig;
use crate::registries::atomic::theme::DesignTokens;
use crate::registries::domain::accessibility::RoleValidator;
use crate::registries::domain::presentation::PresentationDomainRegistry;
use crate::shell::desktop::runtime::environment::EnvironmentStore;
use crate::shell::desktop::runtime::registries::assignment::RoleAssignmentRegistry;
use crate::shell::desktop::ui::role_view::{RenderContext, RenderedNode};
use crate::shell::desktop::workbench::dual_mount::DualMountNavigator;

pub struct ShellApp<S: EnvironmentStorage> {
    config: ShellConfig,
    store: EnvironmentStore<S>,
    validator: RoleValidator,
    presentation: PresentationDomainRegistry,
    tokens: DesignTokens,
    assignments: RoleAssignmentRegistry,
    navigator: DualMountNavigator,
}

impl ShellApp<RedbEnvironmentStorage> {
    /// Opens the redb store under the configured data directory.
    pub fn open(config: ShellConfig) -> Result<Self, StorageError> {
        let storage = RedbEnvironmentStorage::open(&config.data_dir())?;
        info!("Environment storage at {}", storage.path().display());
        Ok(Self::with_storage(config, storage))
    }
}

impl<S: EnvironmentStorage> ShellApp<S> {
    pub fn with_storage(config: ShellConfig, storage: S) -> Self {
        let presentation = PresentationDomainRegistry::with_layers(config.style_layers());
        let theme = presentation.resolve_theme(&config.theme);
        if theme.fallback_used {
            warn!(
                "Unknown theme '{}'; using {}",
                theme.requested_id, theme.resolved_id
            );
        }
        Self {
            store: EnvironmentStore::new(storage, config.store_config()),
            validator: RoleValidator::default(),
            presentation,
            tokens: theme.tokens,
            assignments: RoleAssignmentRegistry::new(),
            navigator: DualMountNavigator::default(),
            config,
        }
    }

    /// Hydrates the store from durable storage.
    pub async fn boot(&self) -> EnvironmentMode {
        self.store.hydrate().await
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    pub fn store(&self) -> &EnvironmentStore<S> {
        &self.store
    }

    pub fn validator(&self) -> &RoleValidator {
        &self.validator
    }

    pub fn presentation(&self) -> &PresentationDomainRegistry {
        &self.presentation
    }

    pub fn tokens(&self) -> &DesignTokens {
        &self.tokens
    }

    pub fn assignments(&self) -> &RoleAssignmentRegistry {
        &self.assignments
    }

    pub fn navigator(&self) -> &DualMountNavigator {
        &self.navigator
    }

    /// Mounts the tree for the store's committed mode.
    pub fn render_active(&mut self, page: Option<&str>) -> &RenderedNode {
        let mode = self.store.current();
        self.render_mode(mode, page)
    }

    pub fn render_mode(&mut self, mode: EnvironmentMode, page: Option<&str>) -> &RenderedNode {
        let ctx = RenderContext::new(&self.validator, &self.presentation, &self.tokens)
            .with_page(page)
            .with_dev_mode(self.config.dev_mode())
            .with_assignments(&self.assignments);
        self.navigator.render(mode, &ctx)
    }
}
