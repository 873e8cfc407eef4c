use std::collections::HashMap;

use thoughtmarks_core::{Role, RoleGroup, ThemeGroup};

/// Registry entry describing one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDefinition {
    pub role: Role,
    pub group: RoleGroup,
    pub theme_group: ThemeGroup,
    pub accessibility_role: String,
    pub default_style_key: String,
    pub inherits: Option<Role>,
}

impl RoleDefinition {
    pub fn builtin(role: Role) -> Self {
        Self {
            role,
            group: role.group(),
            theme_group: role.theme_group(),
            accessibility_role: role.accessibility_role().to_string(),
            default_style_key: format!("role:{}", role.name()),
            inherits: role.inherits(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.role.name()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleLookup<'a> {
    Found(&'a RoleDefinition),
    NotFound,
}

impl<'a> RoleLookup<'a> {
    pub fn definition(self) -> Option<&'a RoleDefinition> {
        match self {
            RoleLookup::Found(definition) => Some(definition),
            RoleLookup::NotFound => None,
        }
    }
}

/// Role name to definition. Names are case-sensitive; a later registration
/// under an existing name replaces the earlier one.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: HashMap<String, RoleDefinition>,
}

impl RoleRegistry {
    pub fn empty() -> Self {
        Self {
            roles: HashMap::new(),
        }
    }

    pub fn from_definitions<I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = RoleDefinition>,
    {
        let mut registry = Self::empty();
        for definition in definitions {
            registry.register(definition);
        }
        registry
    }

    pub fn register(&mut self, definition: RoleDefinition) {
        self.roles.insert(definition.name().to_string(), definition);
    }

    pub fn register_core_seed_defaults(&mut self) {
        for role in Role::ALL {
            self.register(RoleDefinition::builtin(role));
        }
    }

    pub fn lookup(&self, role_name: &str) -> RoleLookup<'_> {
        match self.roles.get(role_name) {
            Some(definition) => RoleLookup::Found(definition),
            None => RoleLookup::NotFound,
        }
    }

    pub fn contains(&self, role_name: &str) -> bool {
        self.roles.contains_key(role_name)
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Registered definitions in catalogue order.
    pub fn definitions(&self) -> Vec<&RoleDefinition> {
        let mut definitions: Vec<&RoleDefinition> = self.roles.values().collect();
        definitions.sort_by_key(|definition| definition.role);
        definitions
    }

    pub fn role_names(&self) -> Vec<&'static str> {
        self.definitions()
            .into_iter()
            .map(RoleDefinition::name)
            .collect()
    }

    pub fn roles_in_theme_group(&self, group: ThemeGroup) -> Vec<Role> {
        self.definitions()
            .into_iter()
            .filter(|definition| definition.theme_group == group)
            .map(|definition| definition.role)
            .collect()
    }

    /// The role itself, the role it inherits from, then the rest of its theme group.
    pub fn related_roles(&self, role_name: &str) -> Vec<Role> {
        let Some(definition) = self.lookup(role_name).definition() else {
            return Vec::new();
        };

        let mut related = vec![definition.role];
        if let Some(parent) = definition.inherits {
            related.push(parent);
        }
        for role in self.roles_in_theme_group(definition.theme_group) {
            if !related.contains(&role) {
                related.push(role);
            }
        }
        related
    }
}

impl Default for RoleRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register_core_seed_defaults();
        registry
    }
}
