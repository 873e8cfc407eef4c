use std::fmt;

use serde::{Deserialize, Serialize};

/// Capability group. Decides which accessibility fields are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleGroup {
    Content,
    Layout,
    Interactive,
}

impl RoleGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            RoleGroup::Content => "content",
            RoleGroup::Layout => "layout",
            RoleGroup::Interactive => "interactive",
        }
    }

    pub fn requires_accessibility(self) -> bool {
        matches!(self, RoleGroup::Interactive)
    }
}

impl fmt::Display for RoleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Style grouping used for broad theme overrides. Orthogonal to [`RoleGroup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeGroup {
    Nav,
    Functional,
    Decorative,
    Layout,
    Text,
}

impl ThemeGroup {
    pub const ALL: [ThemeGroup; 5] = [
        ThemeGroup::Nav,
        ThemeGroup::Functional,
        ThemeGroup::Decorative,
        ThemeGroup::Layout,
        ThemeGroup::Text,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeGroup::Nav => "nav",
            ThemeGroup::Functional => "functional",
            ThemeGroup::Decorative => "decorative",
            ThemeGroup::Layout => "layout",
            ThemeGroup::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ThemeGroup::ALL.into_iter().find(|group| group.as_str() == name)
    }
}

impl fmt::Display for ThemeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    // layout
    Card,
    Section,
    Header,
    Footer,
    Navigation,
    Modal,
    Container,
    // content
    Heading,
    Body,
    Caption,
    Label,
    ButtonText,
    LinkText,
    // interactive
    ButtonNavPrimary,
    ButtonNavSecondary,
    CardAsNav,
    LinkNav,
    ButtonAction,
    ButtonFunction,
    Input,
    Toggle,
    Slider,
    Chip,
    Badge,
    Tag,
}

impl Role {
    pub const ALL: [Role; 25] = [
        Role::Card,
        Role::Section,
        Role::Header,
        Role::Footer,
        Role::Navigation,
        Role::Modal,
        Role::Container,
        Role::Heading,
        Role::Body,
        Role::Caption,
        Role::Label,
        Role::ButtonText,
        Role::LinkText,
        Role::ButtonNavPrimary,
        Role::ButtonNavSecondary,
        Role::CardAsNav,
        Role::LinkNav,
        Role::ButtonAction,
        Role::ButtonFunction,
        Role::Input,
        Role::Toggle,
        Role::Slider,
        Role::Chip,
        Role::Badge,
        Role::Tag,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Role::Card => "card",
            Role::Section => "section",
            Role::Header => "header",
            Role::Footer => "footer",
            Role::Navigation => "navigation",
            Role::Modal => "modal",
            Role::Container => "container",
            Role::Heading => "heading",
            Role::Body => "body",
            Role::Caption => "caption",
            Role::Label => "label",
            Role::ButtonText => "button-text",
            Role::LinkText => "link-text",
            Role::ButtonNavPrimary => "button-nav-primary",
            Role::ButtonNavSecondary => "button-nav-secondary",
            Role::CardAsNav => "card-as-nav",
            Role::LinkNav => "link-nav",
            Role::ButtonAction => "button-action",
            Role::ButtonFunction => "button-function",
            Role::Input => "input",
            Role::Toggle => "toggle",
            Role::Slider => "slider",
            Role::Chip => "chip",
            Role::Badge => "badge",
            Role::Tag => "tag",
        }
    }

    /// Case-sensitive lookup by canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Role::ALL.into_iter().find(|role| role.name() == name)
    }

    pub fn group(self) -> RoleGroup {
        match self {
            Role::Card
            | Role::Section
            | Role::Header
            | Role::Footer
            | Role::Navigation
            | Role::Modal
            | Role::Container => RoleGroup::Layout,
            Role::Heading
            | Role::Body
            | Role::Caption
            | Role::Label
            | Role::ButtonText
            | Role::LinkText => RoleGroup::Content,
            Role::ButtonNavPrimary
            | Role::ButtonNavSecondary
            | Role::CardAsNav
            | Role::LinkNav
            | Role::ButtonAction
            | Role::ButtonFunction
            | Role::Input
            | Role::Toggle
            | Role::Slider
            | Role::Chip
            | Role::Badge
            | Role::Tag => RoleGroup::Interactive,
        }
    }

    pub fn theme_group(self) -> ThemeGroup {
        match self {
            Role::ButtonNavPrimary | Role::ButtonNavSecondary | Role::CardAsNav | Role::LinkNav => {
                ThemeGroup::Nav
            }
            Role::ButtonAction
            | Role::ButtonFunction
            | Role::Input
            | Role::Toggle
            | Role::Slider => ThemeGroup::Functional,
            Role::Chip | Role::Badge | Role::Tag => ThemeGroup::Decorative,
            Role::Card
            | Role::Section
            | Role::Header
            | Role::Footer
            | Role::Navigation
            | Role::Modal
            | Role::Container => ThemeGroup::Layout,
            Role::Heading
            | Role::Body
            | Role::Caption
            | Role::Label
            | Role::ButtonText
            | Role::LinkText => ThemeGroup::Text,
        }
    }

    /// Semantic role string handed to assistive technology.
    pub fn accessibility_role(self) -> &'static str {
        match self {
            Role::Header | Role::Heading => "header",
            Role::Card
            | Role::Section
            | Role::Footer
            | Role::Navigation
            | Role::Modal
            | Role::Container => "none",
            Role::Body | Role::Caption | Role::Label | Role::ButtonText | Role::Badge => "text",
            Role::LinkText | Role::LinkNav => "link",
            Role::ButtonNavPrimary
            | Role::ButtonNavSecondary
            | Role::CardAsNav
            | Role::ButtonAction
            | Role::ButtonFunction
            | Role::Chip
            | Role::Tag => "button",
            Role::Input => "text",
            Role::Toggle => "switch",
            Role::Slider => "adjustable",
        }
    }

    /// Role whose default style is layered underneath this one.
    pub fn inherits(self) -> Option<Role> {
        match self {
            Role::CardAsNav => Some(Role::ButtonNavPrimary),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_lookup() {
        for role in Role::ALL {
            assert_eq!(Role::from_name(role.name()), Some(role));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(Role::from_name("Card"), None);
        assert_eq!(Role::from_name("BUTTON-ACTION"), None);
        assert_eq!(Role::from_name(""), None);
    }

    #[test]
    fn serde_name_matches_canonical_name() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.name()));
        }
    }

    #[test]
    fn every_theme_group_has_members() {
        for group in ThemeGroup::ALL {
            assert!(Role::ALL.iter().any(|role| role.theme_group() == group));
        }
    }

    #[test]
    fn only_card_as_nav_inherits() {
        let inheriting: Vec<Role> = Role::ALL
            .into_iter()
            .filter(|role| role.inherits().is_some())
            .collect();
        assert_eq!(inheriting, vec![Role::CardAsNav]);
    }
}
