/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Thoughtmarks shell: dual-mount environment store, role registry and
//! role-aware rendering, independent of any UI toolkit.

pub mod app;
pub mod persistence;
pub mod prefs;
pub mod registries;
pub mod shell;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::ShellApp;
pub use persistence::{
    EnvironmentStorage, MemoryEnvironmentStorage, RedbEnvironmentStorage, StorageError,
};
pub use prefs::{ConfigError, ShellConfig};
pub use registries::atomic::role::{RoleDefinition, RoleLookup, RoleRegistry};
pub use registries::atomic::theme::{DesignTokens, ThemeRegistry};
pub use registries::domain::accessibility::RoleValidator;
pub use registries::domain::presentation::{PresentationDomainRegistry, StyleLayers};
pub use shell::desktop::runtime::environment::{
    EnvironmentStatus, EnvironmentStore, EnvironmentStoreConfig, EnvironmentToggleResult,
};
pub use shell::desktop::runtime::registries::assignment::{RoleAssignment, RoleAssignmentRegistry};
pub use shell::desktop::ui::role_view::{Primitive, RenderContext, RenderedNode, RoleView};
pub use shell::desktop::workbench::dual_mount::{
    DualMountError, DualMountNavigator, MountedTree, Route, RouteTable, StaticTree,
};
pub use thoughtmarks_core::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn main() {
    shell::desktop::runtime::cli::main()
}

/// Installs the global subscriber. `filter` wins over `THOUGHTMARKS_LOG`; the
/// default is `info`. `log` records are forwarded into the subscriber.
#[cfg(feature = "tracing")]
pub fn init_tracing(filter: Option<&str>) {
    use tracing_subscriber::EnvFilter;

    let directives = filter
        .map(str::to_string)
        .or_else(|| std::env::var(prefs::ENV_LOG).ok())
        .unwrap_or_else(|| "info".to_string());
    let env_filter = match EnvFilter::try_new(&directives) {
        Ok(env_filter) => env_filter,
        Err(e) => {
            eprintln!("Ignoring invalid log filter '{directives}': {e}");
            EnvFilter::new("info")
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_filter: Option<&str>) {}
