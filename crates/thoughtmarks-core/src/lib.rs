/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Shared vocabulary for the Thoughtmarks shell.
//!
//! Nothing in this crate performs I/O: it defines the closed role catalogue, the
//! two-state mount mode, style maps, and the validation result shape that the
//! shell's registries and stores pass around.

pub mod environment;
pub mod role;
pub mod style;
pub mod validation;

pub use environment::{EnvironmentMode, ParseEnvironmentModeError};
pub use role::{Role, RoleGroup, ThemeGroup};
pub use style::{StyleMap, StyleValue, merge_layers, overlay, style_map};
pub use validation::{AccessibilityField, AccessibilityProps, ValidationIssue, ValidationResult};
