/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Role-aware view wrapper.
//!
//! A `RoleView` names a role instead of a concrete primitive. Rendering picks the
//! primitive, layers the role's default style under the caller's overrides, fills
//! in the accessibility attributes the role implies, and (in development) checks
//! the result against the role's accessibility contract.

use accesskit::{Node, NodeId, Tree, TreeId, TreeUpdate};
use log::debug;
use serde::Serialize;
use thoughtmarks_core::{AccessibilityProps, Role, RoleGroup, StyleMap, ValidationResult};
use uuid::Uuid;

use crate::registries::atomic::role::RoleLookup;
use crate::registries::atomic::theme::DesignTokens;
use crate::registries::domain::accessibility::RoleValidator;
use crate::registries::domain::presentation::PresentationDomainRegistry;
use crate::shell::desktop::runtime::registries::assignment::{
    RoleAssignment, RoleAssignmentRegistry,
};

/// Concrete element a role renders as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Primitive {
    View,
    Text,
    Pressable,
    TextInput,
    Slider,
    Switch,
}

impl Primitive {
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::Input => Primitive::TextInput,
            Role::Slider => Primitive::Slider,
            Role::Toggle => Primitive::Switch,
            _ => match role.group() {
                RoleGroup::Interactive => Primitive::Pressable,
                RoleGroup::Content => Primitive::Text,
                RoleGroup::Layout => Primitive::View,
            },
        }
    }
}

type ValidationCallback = Box<dyn FnOnce(&ValidationResult)>;

/// Everything a render pass reads. Cheap to copy.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub validator: &'a RoleValidator,
    pub presentation: &'a PresentationDomainRegistry,
    pub tokens: &'a DesignTokens,
    pub page: Option<&'a str>,
    pub dev_mode: bool,
    pub assignments: Option<&'a RoleAssignmentRegistry>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        validator: &'a RoleValidator,
        presentation: &'a PresentationDomainRegistry,
        tokens: &'a DesignTokens,
    ) -> Self {
        Self {
            validator,
            presentation,
            tokens,
            page: None,
            dev_mode: cfg!(debug_assertions),
            assignments: None,
        }
    }

    pub fn with_page(mut self, page: Option<&'a str>) -> Self {
        self.page = page;
        self
    }

    pub fn with_dev_mode(mut self, dev_mode: bool) -> Self {
        self.dev_mode = dev_mode;
        self
    }

    pub fn with_assignments(mut self, assignments: &'a RoleAssignmentRegistry) -> Self {
        self.assignments = Some(assignments);
        self
    }
}

pub struct RoleView {
    role: String,
    props: AccessibilityProps,
    style: StyleMap,
    test_id: Option<String>,
    text: Option<String>,
    component_id: Option<Uuid>,
    children: Vec<RoleView>,
    on_validation: Option<ValidationCallback>,
}

impl RoleView {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            props: AccessibilityProps::default(),
            style: StyleMap::new(),
            test_id: None,
            text: None,
            component_id: None,
            children: Vec::new(),
            on_validation: None,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.props.accessibility_label = Some(label.into());
        self
    }

    pub fn a11y_role(mut self, role: impl Into<String>) -> Self {
        self.props.accessibility_role = Some(role.into());
        self
    }

    pub fn accessible(mut self, accessible: bool) -> Self {
        self.props.accessible = Some(accessible);
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.props.accessibility_hint = Some(hint.into());
        self
    }

    pub fn props(mut self, props: AccessibilityProps) -> Self {
        self.props = props;
        self
    }

    /// Inline overrides; the last layer of style resolution.
    pub fn style(mut self, style: StyleMap) -> Self {
        self.style = style;
        self
    }

    pub fn test_id(mut self, test_id: impl Into<String>) -> Self {
        self.test_id = Some(test_id.into());
        self
    }

    pub fn child_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn child(mut self, child: RoleView) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = RoleView>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn component_id(mut self, component_id: Uuid) -> Self {
        self.component_id = Some(component_id);
        self
    }

    /// Gives the view a fresh component id so its mount is recorded.
    pub fn tracked(self) -> Self {
        self.component_id(Uuid::new_v4())
    }

    pub fn on_validation(mut self, callback: impl FnOnce(&ValidationResult) + 'static) -> Self {
        self.on_validation = Some(Box::new(callback));
        self
    }

    pub fn render(self, ctx: &RenderContext<'_>) -> RenderedNode {
        let RoleView {
            role: role_name,
            props,
            style,
            test_id,
            text,
            component_id,
            children,
            on_validation,
        } = self;

        let children: Vec<RenderedNode> =
            children.into_iter().map(|child| child.render(ctx)).collect();

        let definition = match ctx.validator.roles().lookup(&role_name) {
            RoleLookup::Found(definition) => Some(definition),
            RoleLookup::NotFound => None,
        };

        let (primitive, role, accessibility, style) = match definition {
            Some(definition) => {
                let role = definition.role;
                let mut accessibility = props;
                if definition.group.requires_accessibility() {
                    if accessibility.accessible.is_none() {
                        accessibility.accessible = Some(true);
                    }
                    if accessibility.role().is_none() {
                        accessibility.accessibility_role =
                            Some(definition.accessibility_role.clone());
                    }
                }
                let resolved = ctx
                    .presentation
                    .resolve_style(role, ctx.tokens, ctx.page, &style);
                (Primitive::for_role(role), Some(role), accessibility, resolved)
            }
            None => {
                debug!("rendering unknown role '{role_name}' as a plain view");
                (Primitive::View, None, props, style)
            }
        };

        let validation = if ctx.dev_mode {
            let mut result = ctx.validator.validate(&role_name, &accessibility);
            if role.is_some() {
                result = result.merge(ctx.validator.validate_style(&role_name, &style));
            }
            ctx.validator.report(&role_name, &result);
            if let Some(callback) = on_validation {
                callback(&result);
            }
            Some(result)
        } else {
            None
        };

        if let (Some(registry), Some(component_id), Some(role)) =
            (ctx.assignments, component_id, role)
        {
            registry.mount(RoleAssignment {
                component_id,
                role,
                props: accessibility.clone(),
                validation: validation.clone(),
            });
        }

        RenderedNode {
            primitive,
            role: role_name,
            known_role: role,
            test_id,
            component_id,
            accessibility,
            style,
            text,
            children,
            validation,
        }
    }
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedNode {
    pub primitive: Primitive,
    pub role: String,
    #[serde(skip)]
    pub known_role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_id: Option<Uuid>,
    pub accessibility: AccessibilityProps,
    pub style: StyleMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderedNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
}

impl RenderedNode {
    /// Depth-first search by test id.
    pub fn find_by_test_id(&self, test_id: &str) -> Option<&RenderedNode> {
        if self.test_id.as_deref() == Some(test_id) {
            return Some(self);
        }
        self.children
            .iter()
            .find_map(|child| child.find_by_test_id(test_id))
    }

    pub fn descendants(&self) -> Vec<&RenderedNode> {
        let mut nodes = vec![self];
        let mut index = 0;
        while index < nodes.len() {
            let node = nodes[index];
            nodes.extend(node.children.iter());
            index += 1;
        }
        nodes
    }

    /// Unmounts every recorded assignment in this subtree.
    pub fn release(&self, assignments: &RoleAssignmentRegistry) {
        for node in self.descendants() {
            if let Some(component_id) = node.component_id {
                assignments.unmount(component_id);
            }
        }
    }

    /// Exports the subtree for assistive-technology bridges. Node ids follow
    /// depth-first order starting at 1; focus rests on the root.
    pub fn to_tree_update(&self) -> TreeUpdate {
        let mut next_id = 1;
        let (root, nodes) = self.accesskit_nodes(&mut next_id);
        TreeUpdate {
            nodes,
            tree: Some(Tree::new(root)),
            tree_id: TreeId::ROOT,
            focus: root,
        }
    }

    fn accesskit_nodes(&self, next_id: &mut u64) -> (NodeId, Vec<(NodeId, Node)>) {
        let id = NodeId(*next_id);
        *next_id += 1;

        let mut node = Node::new(self.accesskit_role());
        if let Some(label) = self.accessibility.label().or(self.text.as_deref()) {
            node.set_label(label.to_string());
        }
        if let Some(hint) = self.accessibility.accessibility_hint.as_deref() {
            node.set_description(hint.to_string());
        }

        let mut descendants = Vec::new();
        let mut children = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let (child_id, child_nodes) = child.accesskit_nodes(next_id);
            children.push(child_id);
            descendants.extend(child_nodes);
        }
        node.set_children(children);

        let mut nodes = Vec::with_capacity(descendants.len() + 1);
        nodes.push((id, node));
        nodes.extend(descendants);
        (id, nodes)
    }

    fn accesskit_role(&self) -> accesskit::Role {
        if self.primitive == Primitive::TextInput {
            return accesskit::Role::TextInput;
        }
        let semantic = self
            .accessibility
            .role()
            .or(self.known_role.map(Role::accessibility_role));
        match semantic {
            Some("button") => accesskit::Role::Button,
            Some("link") => accesskit::Role::Link,
            Some("header") => accesskit::Role::Heading,
            Some("switch") => accesskit::Role::Switch,
            Some("adjustable") => accesskit::Role::Slider,
            Some("text") => accesskit::Role::Label,
            _ => match self.primitive {
                Primitive::Text => accesskit::Role::Label,
                _ => accesskit::Role::GenericContainer,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::registries::domain::presentation::StyleLayers;
    use crate::test_utils::RenderFixture;
    use thoughtmarks_core::{StyleValue, ThemeGroup, style_map};

    #[test]
    fn primitives_follow_role_groups() {
        assert_eq!(Primitive::for_role(Role::ButtonAction), Primitive::Pressable);
        assert_eq!(Primitive::for_role(Role::Input), Primitive::TextInput);
        assert_eq!(Primitive::for_role(Role::Slider), Primitive::Slider);
        assert_eq!(Primitive::for_role(Role::Toggle), Primitive::Switch);
        assert_eq!(Primitive::for_role(Role::Heading), Primitive::Text);
        assert_eq!(Primitive::for_role(Role::Card), Primitive::View);
    }

    #[test]
    fn interactive_render_injects_accessible_and_role_but_not_label() {
        let fixture = RenderFixture::new();
        let node = RoleView::new("button-action").render(&fixture.ctx());

        assert_eq!(node.accessibility.accessible, Some(true));
        assert_eq!(node.accessibility.accessibility_role.as_deref(), Some("button"));
        assert_eq!(node.accessibility.accessibility_label, None);

        let validation = node.validation.unwrap();
        assert!(!validation.is_valid);
        assert_eq!(validation.errors.len(), 1);
        assert!(validation.errors[0].contains("accessibilityLabel"));
    }

    #[test]
    fn caller_props_win_over_injection() {
        let fixture = RenderFixture::new();
        let node = RoleView::new("link-nav")
            .label("Profile")
            .a11y_role("button")
            .accessible(false)
            .render(&fixture.ctx());

        assert_eq!(node.accessibility.accessible, Some(false));
        assert_eq!(node.accessibility.accessibility_role.as_deref(), Some("button"));
        assert!(!node.validation.unwrap().is_valid);
    }

    #[test]
    fn unknown_role_renders_plain_view_with_inline_style_only() {
        let fixture = RenderFixture::new();
        let inline = style_map([("margin", 3.0)]);
        let node = RoleView::new("carousel")
            .style(inline.clone())
            .render(&fixture.ctx());

        assert_eq!(node.primitive, Primitive::View);
        assert_eq!(node.known_role, None);
        assert_eq!(node.style, inline);
        assert_eq!(
            node.validation.unwrap().errors,
            vec!["unknown role: carousel".to_string()]
        );
    }

    #[test]
    fn layered_style_resolution_later_layers_win() {
        let mut layers = StyleLayers::default();
        layers.groups.insert(
            ThemeGroup::Functional,
            style_map([("color", StyleValue::from("red"))]),
        );
        layers
            .pages
            .entry("Settings".to_string())
            .or_default()
            .insert(
                "button-action".to_string(),
                style_map([("color", StyleValue::from("blue"))]),
            );
        let fixture = RenderFixture::with_layers(layers);
        let ctx = fixture.ctx().with_page(Some("Settings"));

        let node = RoleView::new("button-action")
            .label("Save")
            .style(style_map([("fontSize", 10.0)]))
            .render(&ctx);

        assert_eq!(node.style.get("color"), Some(&StyleValue::from("blue")));
        assert_eq!(node.style.get("fontSize"), Some(&StyleValue::from(10.0)));
    }

    #[test]
    fn validation_is_skipped_outside_dev_mode() {
        let fixture = RenderFixture::new();
        let called = Rc::new(RefCell::new(false));
        let seen = Rc::clone(&called);

        let node = RoleView::new("toggle")
            .on_validation(move |_| *seen.borrow_mut() = true)
            .render(&fixture.ctx().with_dev_mode(false));

        assert!(node.validation.is_none());
        assert!(!*called.borrow());
    }

    #[test]
    fn validation_callback_receives_result() {
        let fixture = RenderFixture::new();
        let captured = Rc::new(RefCell::new(None));
        let sink = Rc::clone(&captured);

        RoleView::new("slider")
            .label("Volume")
            .on_validation(move |result| *sink.borrow_mut() = Some(result.clone()))
            .render(&fixture.ctx());

        let result = captured.borrow().clone().unwrap();
        assert!(result.is_valid);
    }

    #[test]
    fn invisible_button_style_fails_validation() {
        let fixture = RenderFixture::new();
        let node = RoleView::new("button-function")
            .label("Delete")
            .style(style_map([("opacity", 0.0)]))
            .render(&fixture.ctx());

        assert!(!node.validation.unwrap().is_valid);
    }

    #[test]
    fn tracked_views_mount_and_release_assignments() {
        let fixture = RenderFixture::new();
        let node = RoleView::new("card")
            .tracked()
            .child(RoleView::new("chip").label("Work").tracked())
            .child(RoleView::new("body").child_text("untracked"))
            .render(&fixture.ctx());

        assert_eq!(fixture.assignments.len(), 2);
        let chip_id = node.children[0].component_id.unwrap();
        let chip = fixture.assignments.get(chip_id).unwrap();
        assert_eq!(chip.role, Role::Chip);
        assert_eq!(chip.props.accessibility_role.as_deref(), Some("button"));

        node.release(&fixture.assignments);
        assert!(fixture.assignments.is_empty());
    }

    #[test]
    fn tree_update_carries_labels_and_roles() {
        let fixture = RenderFixture::new();
        let node = RoleView::new("container")
            .child(RoleView::new("heading").child_text("Notes"))
            .child(RoleView::new("button-nav-primary").label("Open settings"))
            .child(RoleView::new("toggle").label("Dark mode"))
            .render(&fixture.ctx());

        let update = node.to_tree_update();

        assert_eq!(update.nodes.len(), 4);
        assert_eq!(update.focus, NodeId(1));
        let (root_id, root) = &update.nodes[0];
        assert_eq!(*root_id, NodeId(1));
        assert_eq!(root.children(), &[NodeId(2), NodeId(3), NodeId(4)]);
        assert_eq!(update.nodes[1].1.role(), accesskit::Role::Heading);
        assert_eq!(update.nodes[1].1.label(), Some("Notes"));
        assert_eq!(update.nodes[2].1.role(), accesskit::Role::Button);
        assert_eq!(update.nodes[2].1.label(), Some("Open settings"));
        assert_eq!(update.nodes[3].1.role(), accesskit::Role::Switch);
    }
}
