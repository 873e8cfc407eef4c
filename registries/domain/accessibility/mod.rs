//! Accessibility contract checks for role-tagged elements.
//!
//! `validate` and `validate_style` are pure: the same role name and props always
//! produce the same result. Reporting (logs plus diagnostics channels) is a
//! separate step that callers run only in development.

use log::{debug, warn};
use thoughtmarks_core::{
    AccessibilityField, AccessibilityProps, Role, StyleMap, ValidationIssue, ValidationResult,
};

use crate::registries::atomic::role::{RoleLookup, RoleRegistry};
use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, emit_event};
use crate::shell::desktop::runtime::registries::{
    CHANNEL_ROLE_LOOKUP_FAILED, CHANNEL_ROLE_VALIDATION_FAILED, CHANNEL_ROLE_VALIDATION_PASSED,
};

#[derive(Debug, Clone, Default)]
pub struct RoleValidator {
    roles: RoleRegistry,
}

impl RoleValidator {
    pub fn new(roles: RoleRegistry) -> Self {
        Self { roles }
    }

    pub fn roles(&self) -> &RoleRegistry {
        &self.roles
    }

    pub fn validate(&self, role_name: &str, props: &AccessibilityProps) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let RoleLookup::Found(definition) = self.roles.lookup(role_name) else {
            result.push_issue(ValidationIssue::UnknownRole {
                name: role_name.to_string(),
            });
            return result;
        };

        if !definition.group.requires_accessibility() {
            return result;
        }

        for field in AccessibilityField::REQUIRED {
            if !field.is_satisfied_by(props) {
                result.push_issue(ValidationIssue::MissingAccessibilityField {
                    role: role_name.to_string(),
                    field,
                });
            }
        }

        if let Some(declared) = props.role()
            && declared != definition.accessibility_role
        {
            result.push_warning(format!(
                "role '{role_name}' declares accessibilityRole '{declared}', expected '{}'",
                definition.accessibility_role
            ));
        }

        result
    }

    /// Flags styles that hide interactive buttons or make cards invisible.
    pub fn validate_style(&self, role_name: &str, style: &StyleMap) -> ValidationResult {
        let mut result = ValidationResult::valid();
        let RoleLookup::Found(definition) = self.roles.lookup(role_name) else {
            result.push_issue(ValidationIssue::UnknownRole {
                name: role_name.to_string(),
            });
            return result;
        };

        if definition.group.requires_accessibility()
            && definition.accessibility_role == "button"
            && style.get("opacity").and_then(|value| value.as_f64()) == Some(0.0)
        {
            result.push_error(format!(
                "role '{role_name}' is not accessible: opacity is 0"
            ));
        }

        if definition.role == Role::Card
            && style.get("backgroundColor").and_then(|value| value.as_str()) == Some("transparent")
        {
            result.push_warning(format!(
                "role '{role_name}' has a transparent background"
            ));
        }

        result
    }

    /// Logs and emits diagnostics for a validation outcome. Never fails.
    pub fn report(&self, role_name: &str, result: &ValidationResult) {
        if !self.roles.contains(role_name) {
            emit_event(DiagnosticEvent::MessageSent {
                channel_id: CHANNEL_ROLE_LOOKUP_FAILED,
                byte_len: role_name.len(),
            });
        }

        for warning in &result.warnings {
            warn!("{warning}");
        }

        if result.is_valid {
            debug!("role '{role_name}' passed accessibility validation");
            emit_event(DiagnosticEvent::MessageSent {
                channel_id: CHANNEL_ROLE_VALIDATION_PASSED,
                byte_len: role_name.len(),
            });
            return;
        }

        warn!(
            "role '{role_name}' failed accessibility validation: {}",
            result.errors.join("; ")
        );
        emit_event(DiagnosticEvent::MessageSent {
            channel_id: CHANNEL_ROLE_VALIDATION_FAILED,
            byte_len: result.errors.iter().map(String::len).sum(),
        });
    }
}
