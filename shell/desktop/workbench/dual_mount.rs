/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Dual-mount navigator.
//!
//! Two independent trees (`legacy`, `nextgen`) implement `MountedTree`. Exactly one
//! is mounted at a time, and only its route table is visible. Switching modes
//! releases the previous tree before the next one renders.

use std::fmt;

use log::{info, warn};
use serde::Serialize;
use thoughtmarks_core::{EnvironmentMode, Role};

use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, emit_event};
use crate::shell::desktop::runtime::registries::{
    CHANNEL_DUAL_MOUNT_MODE_INVALID, CHANNEL_DUAL_MOUNT_TREE_MOUNTED,
    CHANNEL_DUAL_MOUNT_TREE_UNMOUNTED,
};
use crate::shell::desktop::ui::role_view::{RenderContext, RenderedNode, RoleView};

pub const LEGACY_ROOT_MARKER: &str = "legacy-root";
pub const NEXTGEN_ROOT_MARKER: &str = "nextgen-root";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Route {
    HomeMain,
    ThoughtmarkDetail,
    CreateThoughtmark,
    BinDetail,
    VoiceRecord,
    ProfileMain,
    Settings,
}

impl Route {
    pub fn name(self) -> &'static str {
        match self {
            Route::HomeMain => "HomeMain",
            Route::ThoughtmarkDetail => "ThoughtmarkDetail",
            Route::CreateThoughtmark => "CreateThoughtmark",
            Route::BinDetail => "BinDetail",
            Route::VoiceRecord => "VoiceRecord",
            Route::ProfileMain => "ProfileMain",
            Route::Settings => "Settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Route::HomeMain => "Home",
            Route::ThoughtmarkDetail => "Thoughtmark",
            Route::CreateThoughtmark => "New Thoughtmark",
            Route::BinDetail => "Bin",
            Route::VoiceRecord => "Voice Note",
            Route::ProfileMain => "Profile",
            Route::Settings => "Settings",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteStack {
    pub name: &'static str,
    pub routes: Vec<Route>,
}

impl RouteStack {
    pub fn initial(&self) -> Option<Route> {
        self.routes.first().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteTable {
    pub stacks: Vec<RouteStack>,
}

impl RouteTable {
    /// Home and Profile stacks of the notes app.
    pub fn app_default() -> Self {
        Self {
            stacks: vec![
                RouteStack {
                    name: "Home",
                    routes: vec![
                        Route::HomeMain,
                        Route::ThoughtmarkDetail,
                        Route::CreateThoughtmark,
                        Route::BinDetail,
                        Route::VoiceRecord,
                    ],
                },
                RouteStack {
                    name: "Profile",
                    routes: vec![Route::ProfileMain, Route::Settings],
                },
            ],
        }
    }

    pub fn routes(&self) -> Vec<Route> {
        self.stacks
            .iter()
            .flat_map(|stack| stack.routes.iter().copied())
            .collect()
    }

    pub fn contains(&self, route: Route) -> bool {
        self.stacks.iter().any(|stack| stack.routes.contains(&route))
    }

    pub fn initial(&self) -> Option<Route> {
        self.stacks.first().and_then(RouteStack::initial)
    }
}

/// One of the two parallel UI trees.
pub trait MountedTree: Send + Sync {
    fn mode(&self) -> EnvironmentMode;
    fn root_marker(&self) -> &str;
    fn routes(&self) -> &RouteTable;
    fn render_tree(&self, route: Route) -> RoleView;
}

/// Tree built from role views alone; the two defaults differ in root marker and
/// navigation role.
pub struct StaticTree {
    mode: EnvironmentMode,
    root_marker: String,
    routes: RouteTable,
    nav_role: Role,
}

impl StaticTree {
    pub fn new(mode: EnvironmentMode, root_marker: impl Into<String>, routes: RouteTable) -> Self {
        let nav_role = match mode {
            EnvironmentMode::Legacy => Role::ButtonNavPrimary,
            EnvironmentMode::Nextgen => Role::CardAsNav,
        };
        Self {
            mode,
            root_marker: root_marker.into(),
            routes,
            nav_role,
        }
    }

    pub fn legacy() -> Self {
        Self::new(
            EnvironmentMode::Legacy,
            LEGACY_ROOT_MARKER,
            RouteTable::app_default(),
        )
    }

    pub fn nextgen() -> Self {
        Self::new(
            EnvironmentMode::Nextgen,
            NEXTGEN_ROOT_MARKER,
            RouteTable::app_default(),
        )
    }

    fn screen_body(&self, route: Route) -> Vec<RoleView> {
        match route {
            Route::CreateThoughtmark => vec![
                RoleView::new("input").label("Title").tracked(),
                RoleView::new("button-action").label("Save thoughtmark").tracked(),
            ],
            Route::VoiceRecord => vec![
                RoleView::new("button-action")
                    .label("Start recording")
                    .tracked(),
            ],
            Route::Settings => vec![
                RoleView::new("toggle")
                    .label("Use the next-generation interface")
                    .tracked(),
                RoleView::new("slider").label("Text size").tracked(),
            ],
            Route::ThoughtmarkDetail | Route::BinDetail => vec![
                RoleView::new("body").child_text(route.title()),
                RoleView::new("tag").label("Tag").tracked(),
            ],
            Route::HomeMain | Route::ProfileMain => {
                vec![RoleView::new("body").child_text(route.title())]
            }
        }
    }
}

impl MountedTree for StaticTree {
    fn mode(&self) -> EnvironmentMode {
        self.mode
    }

    fn root_marker(&self) -> &str {
        &self.root_marker
    }

    fn routes(&self) -> &RouteTable {
        &self.routes
    }

    fn render_tree(&self, route: Route) -> RoleView {
        let marker = &self.root_marker;
        let navigation = self.routes.stacks.iter().filter_map(|stack| {
            stack.initial().map(|initial| {
                RoleView::new(self.nav_role.name())
                    .label(stack.name)
                    .test_id(format!("{marker}-nav-{}", initial.name()))
                    .tracked()
            })
        });

        RoleView::new("container")
            .test_id(marker.clone())
            .child(
                RoleView::new("header")
                    .test_id(format!("{marker}-header"))
                    .child(RoleView::new("heading").child_text(route.title())),
            )
            .child(
                RoleView::new("section")
                    .test_id(format!("{marker}-{}", route.name()))
                    .children(self.screen_body(route)),
            )
            .child(RoleView::new("navigation").children(navigation))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualMountError {
    /// Both trees report the same mode, leaving the other mode without a tree.
    DuplicateMode(EnvironmentMode),
}

impl fmt::Display for DualMountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateMode(mode) => write!(f, "both trees are registered for {mode}"),
        }
    }
}

impl std::error::Error for DualMountError {}

struct MountedState {
    mode: EnvironmentMode,
    route: Route,
    root: RenderedNode,
}

pub struct DualMountNavigator {
    legacy: Box<dyn MountedTree>,
    nextgen: Box<dyn MountedTree>,
    mounted: Option<MountedState>,
}

impl Default for DualMountNavigator {
    fn default() -> Self {
        Self {
            legacy: Box::new(StaticTree::legacy()),
            nextgen: Box::new(StaticTree::nextgen()),
            mounted: None,
        }
    }
}

impl DualMountNavigator {
    /// Slots each tree by the mode it reports; argument order does not matter.
    pub fn new(
        first: Box<dyn MountedTree>,
        second: Box<dyn MountedTree>,
    ) -> Result<Self, DualMountError> {
        let (legacy, nextgen) = match (first.mode(), second.mode()) {
            (EnvironmentMode::Legacy, EnvironmentMode::Nextgen) => (first, second),
            (EnvironmentMode::Nextgen, EnvironmentMode::Legacy) => (second, first),
            (mode, _) => return Err(DualMountError::DuplicateMode(mode)),
        };
        Ok(Self {
            legacy,
            nextgen,
            mounted: None,
        })
    }

    pub fn tree(&self, mode: EnvironmentMode) -> &dyn MountedTree {
        match mode {
            EnvironmentMode::Legacy => self.legacy.as_ref(),
            EnvironmentMode::Nextgen => self.nextgen.as_ref(),
        }
    }

    /// Mounts the tree for `mode` at its initial route.
    pub fn render(&mut self, mode: EnvironmentMode, ctx: &RenderContext<'_>) -> &RenderedNode {
        let route = self.tree(mode).routes().initial().unwrap_or(Route::HomeMain);
        self.render_route(mode, route, ctx)
    }

    pub fn render_route(
        &mut self,
        mode: EnvironmentMode,
        route: Route,
        ctx: &RenderContext<'_>,
    ) -> &RenderedNode {
        self.unmount(ctx);

        let tree = self.tree(mode);
        let route = if tree.routes().contains(route) {
            route
        } else {
            let fallback = tree.routes().initial().unwrap_or(Route::HomeMain);
            warn!(
                "route {} is not registered in the {mode} tree; showing {}",
                route.name(),
                fallback.name()
            );
            fallback
        };

        let page_ctx = ctx.with_page(ctx.page.or(Some(route.name())));
        let root = tree.render_tree(route).render(&page_ctx);
        info!("mounted {mode} tree at {} ({})", route.name(), tree.root_marker());
        emit_event(DiagnosticEvent::MessageSent {
            channel_id: CHANNEL_DUAL_MOUNT_TREE_MOUNTED,
            byte_len: mode.as_str().len(),
        });

        let state = self.mounted.insert(MountedState { mode, route, root });
        &state.root
    }

    /// Renders from an untyped mode value. Anything but `legacy`/`nextgen` is a
    /// programming error: debug builds panic, release builds fall back to legacy.
    pub fn render_raw(&mut self, raw: &str, ctx: &RenderContext<'_>) -> &RenderedNode {
        let parsed = EnvironmentMode::from_stored(raw);
        debug_assert!(parsed.is_some(), "invalid environment mode '{raw}'");
        let mode = parsed.unwrap_or_else(|| {
            warn!("invalid environment mode '{raw}'; mounting legacy");
            emit_event(DiagnosticEvent::MessageSent {
                channel_id: CHANNEL_DUAL_MOUNT_MODE_INVALID,
                byte_len: raw.len(),
            });
            EnvironmentMode::Legacy
        });
        self.render(mode, ctx)
    }

    /// Releases the mounted tree, if any.
    pub fn unmount(&mut self, ctx: &RenderContext<'_>) {
        let Some(previous) = self.mounted.take() else {
            return;
        };
        if let Some(assignments) = ctx.assignments {
            previous.root.release(assignments);
        }
        info!("unmounted {} tree", previous.mode);
        emit_event(DiagnosticEvent::MessageSent {
            channel_id: CHANNEL_DUAL_MOUNT_TREE_UNMOUNTED,
            byte_len: previous.mode.as_str().len(),
        });
    }

    pub fn mounted_mode(&self) -> Option<EnvironmentMode> {
        self.mounted.as_ref().map(|state| state.mode)
    }

    pub fn mounted_route(&self) -> Option<Route> {
        self.mounted.as_ref().map(|state| state.route)
    }

    pub fn mounted(&self) -> Option<&RenderedNode> {
        self.mounted.as_ref().map(|state| &state.root)
    }

    /// Routes of the mounted tree only.
    pub fn active_routes(&self) -> Option<&RouteTable> {
        self.mounted
            .as_ref()
            .map(|state| self.tree(state.mode).routes())
    }
}
