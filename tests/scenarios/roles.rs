use thoughtmarks_shell::test_utils::RenderFixture;
use thoughtmarks_shell::{
    AccessibilityProps, Role, RoleDefinition, RoleGroup, RoleLookup, RoleRegistry, RoleValidator,
    RoleView, StyleLayers, StyleValue, ThemeGroup, style_map,
};

#[test]
fn every_interactive_role_requires_all_three_fields() {
    let validator = RoleValidator::default();
    for role in Role::ALL
        .into_iter()
        .filter(|role| role.group() == RoleGroup::Interactive)
    {
        let complete = AccessibilityProps::complete("Label", role.accessibility_role());
        assert!(validator.validate(role.name(), &complete).is_valid);

        let missing_label = AccessibilityProps {
            accessibility_label: Some("   ".to_string()),
            ..complete.clone()
        };
        assert!(!validator.validate(role.name(), &missing_label).is_valid);
    }
}

#[test]
fn content_and_layout_roles_are_always_valid() {
    let validator = RoleValidator::default();
    for role in Role::ALL
        .into_iter()
        .filter(|role| role.group() != RoleGroup::Interactive)
    {
        assert!(
            validator
                .validate(role.name(), &AccessibilityProps::default())
                .is_valid
        );
    }
}

#[test]
fn unknown_and_empty_roles_are_invalid() {
    let validator = RoleValidator::default();
    for name in ["", "Button-Action", "carousel"] {
        let result = validator.validate(name, &AccessibilityProps::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![format!("unknown role: {name}")]);
    }
}

#[test]
fn later_registry_entries_shadow_earlier_ones() {
    let mut shadow = RoleDefinition::builtin(Role::Chip);
    shadow.accessibility_role = "link".to_string();
    let registry =
        RoleRegistry::from_definitions([RoleDefinition::builtin(Role::Chip), shadow.clone()]);

    match registry.lookup("chip") {
        RoleLookup::Found(definition) => assert_eq!(definition, &shadow),
        RoleLookup::NotFound => panic!("chip should be registered"),
    }
}

#[test]
fn layered_styles_resolve_in_order() {
    let mut layers = StyleLayers::default();
    layers.groups.insert(
        ThemeGroup::Functional,
        style_map([("color", StyleValue::from("red"))]),
    );
    layers.pages.entry("Settings".to_string()).or_default().insert(
        "button-action".to_string(),
        style_map([("color", StyleValue::from("blue"))]),
    );
    let fixture = RenderFixture::with_layers(layers);

    let node = RoleView::new("button-action")
        .label("Save")
        .style(style_map([("fontSize", 10.0)]))
        .render(&fixture.ctx().with_page(Some("Settings")));

    assert_eq!(node.style["color"], StyleValue::from("blue"));
    assert_eq!(node.style["fontSize"], StyleValue::from(10.0));
}

#[test]
fn accesskit_export_carries_label_and_role() {
    let fixture = RenderFixture::new();
    let node = RoleView::new("link-nav")
        .label("Open profile")
        .render(&fixture.ctx());

    let update = node.to_tree_update();

    let (_, root) = &update.nodes[0];
    assert_eq!(root.role(), accesskit::Role::Link);
    assert_eq!(root.label(), Some("Open profile"));
}
