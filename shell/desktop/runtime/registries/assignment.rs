use std::collections::HashMap;

use log::debug;
use parking_lot::Mutex;
use serde::Serialize;
use thoughtmarks_core::{AccessibilityProps, Role, ValidationResult};
use uuid::Uuid;

use crate::shell::desktop::runtime::diagnostics::{DiagnosticEvent, emit_event};
use crate::shell::desktop::runtime::registries::{
    CHANNEL_ROLE_ASSIGNMENT_MOUNTED, CHANNEL_ROLE_ASSIGNMENT_UNMOUNTED,
};

/// Role binding of one mounted component. Created on mount, dropped on unmount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoleAssignment {
    pub component_id: Uuid,
    pub role: Role,
    pub props: AccessibilityProps,
    pub validation: Option<ValidationResult>,
}

/// In-memory index of live assignments, keyed by component id. Never persisted.
#[derive(Debug, Default)]
pub struct RoleAssignmentRegistry {
    assignments: Mutex<HashMap<Uuid, RoleAssignment>>,
}

impl RoleAssignmentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remounting a component id replaces its previous assignment.
    pub fn mount(&self, assignment: RoleAssignment) {
        let component_id = assignment.component_id;
        let role = assignment.role;
        let replaced = self
            .assignments
            .lock()
            .insert(component_id, assignment)
            .is_some();
        debug!("mounted {role} as {component_id} (replaced: {replaced})");
        emit_event(DiagnosticEvent::MessageSent {
            channel_id: CHANNEL_ROLE_ASSIGNMENT_MOUNTED,
            byte_len: role.name().len(),
        });
    }

    pub fn unmount(&self, component_id: Uuid) -> Option<RoleAssignment> {
        let removed = self.assignments.lock().remove(&component_id);
        if let Some(assignment) = &removed {
            debug!("unmounted {} ({component_id})", assignment.role);
            emit_event(DiagnosticEvent::MessageSent {
                channel_id: CHANNEL_ROLE_ASSIGNMENT_UNMOUNTED,
                byte_len: assignment.role.name().len(),
            });
        }
        removed
    }

    pub fn get(&self, component_id: Uuid) -> Option<RoleAssignment> {
        self.assignments.lock().get(&component_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.assignments.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.lock().is_empty()
    }

    /// Ordered by role name, then component id.
    pub fn snapshot(&self) -> Vec<RoleAssignment> {
        let mut assignments: Vec<RoleAssignment> =
            self.assignments.lock().values().cloned().collect();
        assignments.sort_by(|a, b| {
            a.role
                .name()
                .cmp(b.role.name())
                .then(a.component_id.cmp(&b.component_id))
        });
        assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(role: Role) -> RoleAssignment {
        RoleAssignment {
            component_id: Uuid::new_v4(),
            role,
            props: AccessibilityProps::complete("Save", role.accessibility_role()),
            validation: None,
        }
    }

    #[test]
    fn mount_then_unmount_round_trips() {
        let registry = RoleAssignmentRegistry::new();
        let toggle = assignment(Role::Toggle);
        let id = toggle.component_id;

        registry.mount(toggle.clone());
        assert_eq!(registry.get(id), Some(toggle.clone()));

        assert_eq!(registry.unmount(id), Some(toggle));
        assert!(registry.is_empty());
        assert_eq!(registry.unmount(id), None);
    }

    #[test]
    fn remount_replaces_previous_assignment() {
        let registry = RoleAssignmentRegistry::new();
        let mut first = assignment(Role::Chip);
        registry.mount(first.clone());
        first.role = Role::Tag;
        registry.mount(first.clone());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(first.component_id).map(|a| a.role), Some(Role::Tag));
    }

    #[test]
    fn snapshot_is_sorted_by_role_name() {
        let registry = RoleAssignmentRegistry::new();
        registry.mount(assignment(Role::Toggle));
        registry.mount(assignment(Role::Badge));
        registry.mount(assignment(Role::Input));

        let roles: Vec<Role> = registry.snapshot().into_iter().map(|a| a.role).collect();
        assert_eq!(roles, vec![Role::Badge, Role::Input, Role::Toggle]);
    }
}
