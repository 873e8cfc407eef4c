use std::fmt;

use serde::{Deserialize, Serialize};

/// Accessibility attributes a caller may declare on an element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityProps {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility_hint: Option<String>,
}

impl AccessibilityProps {
    /// Props carrying all three required fields.
    pub fn complete(label: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            accessibility_label: Some(label.into()),
            accessibility_role: Some(role.into()),
            accessible: Some(true),
            accessibility_hint: None,
        }
    }

    pub fn label(&self) -> Option<&str> {
        non_blank(self.accessibility_label.as_deref())
    }

    pub fn role(&self) -> Option<&str> {
        non_blank(self.accessibility_role.as_deref())
    }

    pub fn is_accessible(&self) -> bool {
        self.accessible.unwrap_or(false)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessibilityField {
    Label,
    Role,
    Accessible,
}

impl AccessibilityField {
    pub const REQUIRED: [AccessibilityField; 3] = [
        AccessibilityField::Label,
        AccessibilityField::Role,
        AccessibilityField::Accessible,
    ];

    pub fn prop_name(self) -> &'static str {
        match self {
            AccessibilityField::Label => "accessibilityLabel",
            AccessibilityField::Role => "accessibilityRole",
            AccessibilityField::Accessible => "accessible",
        }
    }

    pub fn is_satisfied_by(self, props: &AccessibilityProps) -> bool {
        match self {
            AccessibilityField::Label => props.label().is_some(),
            AccessibilityField::Role => props.role().is_some(),
            AccessibilityField::Accessible => props.is_accessible(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    UnknownRole { name: String },
    MissingAccessibilityField { role: String, field: AccessibilityField },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::UnknownRole { name } => write!(f, "unknown role: {name}"),
            ValidationIssue::MissingAccessibilityField { role, field } => write!(
                f,
                "interactive role '{role}' requires {}",
                field.prop_name()
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::valid()
    }
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn push_issue(&mut self, issue: ValidationIssue) {
        self.push_error(issue.to_string());
    }

    pub fn push_error(&mut self, error: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(error.into());
    }

    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Combines two results; invalid if either is.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_label_does_not_count() {
        let props = AccessibilityProps {
            accessibility_label: Some("   ".to_string()),
            ..AccessibilityProps::default()
        };
        assert!(!AccessibilityField::Label.is_satisfied_by(&props));
    }

    #[test]
    fn accessible_false_is_missing() {
        let props = AccessibilityProps {
            accessible: Some(false),
            ..AccessibilityProps::complete("Save", "button")
        };
        assert!(!AccessibilityField::Accessible.is_satisfied_by(&props));
        assert!(AccessibilityField::Label.is_satisfied_by(&props));
    }

    #[test]
    fn unknown_role_message_names_the_role() {
        let issue = ValidationIssue::UnknownRole {
            name: "hologram".to_string(),
        };
        assert_eq!(issue.to_string(), "unknown role: hologram");
    }

    #[test]
    fn warnings_do_not_invalidate() {
        let mut result = ValidationResult::valid();
        result.push_warning("card background is transparent");
        assert!(result.is_valid);

        result.push_issue(ValidationIssue::UnknownRole { name: String::new() });
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec!["unknown role: ".to_string()]);
    }

    #[test]
    fn props_use_camel_case_keys() {
        let props: AccessibilityProps =
            serde_json::from_str(r#"{"accessibilityLabel":"Open","accessible":true}"#).unwrap();
        assert_eq!(props.label(), Some("Open"));
        assert!(props.is_accessible());
        assert_eq!(props.role(), None);
    }
}
