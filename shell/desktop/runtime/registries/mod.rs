/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

pub mod assignment;

pub const CHANNEL_ROLE_LOOKUP_FAILED: &str = "role.lookup.failed";
pub const CHANNEL_ROLE_VALIDATION_FAILED: &str = "role.validation.failed";
pub const CHANNEL_ROLE_VALIDATION_PASSED: &str = "role.validation.passed";
pub const CHANNEL_ROLE_ASSIGNMENT_MOUNTED: &str = "role.assignment.mounted";
pub const CHANNEL_ROLE_ASSIGNMENT_UNMOUNTED: &str = "role.assignment.unmounted";
pub const CHANNEL_ENVIRONMENT_HYDRATE_SUCCEEDED: &str = "environment.hydrate.succeeded";
pub const CHANNEL_ENVIRONMENT_HYDRATE_FALLBACK_USED: &str = "environment.hydrate.fallback_used";
pub const CHANNEL_ENVIRONMENT_TOGGLE_SUCCEEDED: &str = "environment.toggle.succeeded";
pub const CHANNEL_ENVIRONMENT_TOGGLE_FAILED: &str = "environment.toggle.failed";
pub const CHANNEL_ENVIRONMENT_SET_SUCCEEDED: &str = "environment.set.succeeded";
pub const CHANNEL_ENVIRONMENT_SET_FAILED: &str = "environment.set.failed";
pub const CHANNEL_ENVIRONMENT_RESET_SUCCEEDED: &str = "environment.reset.succeeded";
pub const CHANNEL_ENVIRONMENT_RESET_FAILED: &str = "environment.reset.failed";
pub const CHANNEL_PERSISTENCE_WRITE_RETRY: &str = "persistence.write.retry";
pub const CHANNEL_DUAL_MOUNT_TREE_MOUNTED: &str = "dual_mount.tree.mounted";
pub const CHANNEL_DUAL_MOUNT_TREE_UNMOUNTED: &str = "dual_mount.tree.unmounted";
pub const CHANNEL_DUAL_MOUNT_MODE_INVALID: &str = "dual_mount.mode.invalid";
pub const CHANNEL_STARTUP_CONFIG_SNAPSHOT: &str = "startup.config.snapshot";
