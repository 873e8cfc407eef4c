use std::collections::BTreeMap;

use thoughtmarks_core::{Role, StyleMap, StyleValue, ThemeGroup, merge_layers, overlay};

use crate::registries::atomic::theme::{DesignTokens, ThemeRegistry, ThemeResolution, hex};

/// Override layers applied on top of role defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleLayers {
    pub groups: BTreeMap<ThemeGroup, StyleMap>,
    /// page name -> role name -> overrides
    pub pages: BTreeMap<String, BTreeMap<String, StyleMap>>,
}

impl StyleLayers {
    pub fn group(&self, group: ThemeGroup) -> Option<&StyleMap> {
        self.groups.get(&group)
    }

    pub fn page(&self, page: &str, role_name: &str) -> Option<&StyleMap> {
        self.pages.get(page).and_then(|roles| roles.get(role_name))
    }
}

/// `role default -> group override -> page override -> inline override`, later wins per key.
pub fn resolve_layers(
    role_default: &StyleMap,
    group: Option<&StyleMap>,
    page: Option<&StyleMap>,
    inline: &StyleMap,
) -> StyleMap {
    let empty = StyleMap::new();
    merge_layers([
        role_default,
        group.unwrap_or(&empty),
        page.unwrap_or(&empty),
        inline,
    ])
}

#[derive(Default)]
pub struct PresentationDomainRegistry {
    theme: ThemeRegistry,
    layers: StyleLayers,
}

impl PresentationDomainRegistry {
    pub fn with_layers(layers: StyleLayers) -> Self {
        Self {
            theme: ThemeRegistry::default(),
            layers,
        }
    }

    pub fn layers(&self) -> &StyleLayers {
        &self.layers
    }

    pub fn resolve_theme(&self, theme_id: &str) -> ThemeResolution {
        self.theme.resolve(theme_id)
    }

    /// Role default including the inherited parent's style underneath.
    pub fn role_default(&self, role: Role, tokens: &DesignTokens) -> StyleMap {
        let mut style = match role.inherits() {
            Some(parent) => role_default_style(parent, tokens),
            None => StyleMap::new(),
        };
        overlay(&mut style, &role_default_style(role, tokens));
        style
    }

    pub fn resolve_style(
        &self,
        role: Role,
        tokens: &DesignTokens,
        page: Option<&str>,
        inline: &StyleMap,
    ) -> StyleMap {
        resolve_layers(
            &self.role_default(role, tokens),
            self.layers.group(role.theme_group()),
            page.and_then(|page| self.layers.page(page, role.name())),
            inline,
        )
    }
}

fn insert(style: &mut StyleMap, key: &str, value: impl Into<StyleValue>) {
    style.insert(key.to_string(), value.into());
}

fn number(value: f32) -> StyleValue {
    StyleValue::Number(f64::from(value))
}

fn centered(style: &mut StyleMap) {
    insert(style, "alignItems", "center");
    insert(style, "justifyContent", "center");
}

fn padded(style: &mut StyleMap, horizontal: f32, vertical: f32) {
    insert(style, "paddingHorizontal", number(horizontal));
    insert(style, "paddingVertical", number(vertical));
}

fn elevated(
    style: &mut StyleMap,
    tokens: &DesignTokens,
    opacity: f64,
    radius: f64,
    elevation: f64,
) {
    insert(style, "shadowColor", hex(tokens.colors.shadow));
    insert(style, "shadowOpacity", opacity);
    insert(style, "shadowRadius", radius);
    insert(style, "elevation", elevation);
}

fn text(style: &mut StyleMap, tokens: &DesignTokens, size: f32, weight: &str) {
    insert(style, "color", hex(tokens.colors.text));
    insert(style, "fontSize", number(size));
    insert(style, "fontWeight", weight);
}

/// Default style for one role, without inheritance.
pub fn role_default_style(role: Role, tokens: &DesignTokens) -> StyleMap {
    let colors = &tokens.colors;
    let spacing = &tokens.spacing;
    let radius = &tokens.radius;
    let typography = &tokens.typography;
    let mut style = StyleMap::new();

    match role {
        Role::Card => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "borderRadius", number(radius.md));
            insert(&mut style, "padding", number(spacing.md));
            insert(&mut style, "marginVertical", number(spacing.sm));
            elevated(&mut style, tokens, 0.1, 4.0, 2.0);
        }
        Role::Section => {
            insert(&mut style, "backgroundColor", hex(colors.background));
            insert(&mut style, "padding", number(spacing.lg));
            insert(&mut style, "marginVertical", number(spacing.md));
        }
        Role::Header => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            padded(&mut style, spacing.lg, spacing.md);
            insert(&mut style, "borderBottomWidth", 1u32);
            insert(&mut style, "borderBottomColor", hex(colors.border));
        }
        Role::Footer => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            padded(&mut style, spacing.lg, spacing.md);
            insert(&mut style, "borderTopWidth", 1u32);
            insert(&mut style, "borderTopColor", hex(colors.border));
        }
        Role::Navigation => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            padded(&mut style, spacing.lg, spacing.sm);
        }
        Role::Modal => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "borderRadius", number(radius.lg));
            insert(&mut style, "margin", number(spacing.lg));
            elevated(&mut style, tokens, 0.25, 8.0, 8.0);
        }
        Role::Container => {
            insert(&mut style, "backgroundColor", hex(colors.background));
            insert(&mut style, "padding", number(spacing.md));
        }
        Role::Heading => text(
            &mut style,
            tokens,
            typography.heading_size,
            typography.heading_weight,
        ),
        Role::Body => text(
            &mut style,
            tokens,
            typography.body_size,
            typography.body_weight,
        ),
        Role::Caption => {
            text(
                &mut style,
                tokens,
                typography.caption_size,
                typography.body_weight,
            );
            insert(&mut style, "color", hex(colors.text_secondary));
        }
        Role::Label => text(
            &mut style,
            tokens,
            typography.label_size,
            typography.heading_weight,
        ),
        Role::ButtonText => {
            text(
                &mut style,
                tokens,
                typography.body_size,
                typography.heading_weight,
            );
            insert(&mut style, "color", hex(colors.on_primary));
        }
        Role::LinkText => {
            text(
                &mut style,
                tokens,
                typography.body_size,
                typography.body_weight,
            );
            insert(&mut style, "color", hex(colors.primary));
            insert(&mut style, "textDecorationLine", "underline");
        }
        Role::ButtonNavPrimary | Role::ButtonAction => {
            insert(&mut style, "backgroundColor", hex(colors.primary));
            insert(&mut style, "borderRadius", number(radius.md));
            padded(&mut style, spacing.lg, spacing.md);
            centered(&mut style);
        }
        Role::ButtonNavSecondary => {
            insert(&mut style, "backgroundColor", hex(colors.secondary));
            insert(&mut style, "borderRadius", number(radius.md));
            padded(&mut style, spacing.lg, spacing.md);
            centered(&mut style);
        }
        Role::CardAsNav => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "padding", number(spacing.md));
            insert(&mut style, "marginVertical", number(spacing.sm));
            elevated(&mut style, tokens, 0.1, 4.0, 2.0);
        }
        Role::LinkNav => {
            insert(&mut style, "backgroundColor", "transparent");
            padded(&mut style, spacing.md, spacing.sm);
            centered(&mut style);
        }
        Role::ButtonFunction => {
            insert(&mut style, "backgroundColor", hex(colors.secondary));
            insert(&mut style, "borderRadius", number(radius.md));
            padded(&mut style, spacing.md, spacing.sm);
            centered(&mut style);
        }
        Role::Input => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "borderRadius", number(radius.sm));
            insert(&mut style, "borderWidth", 1u32);
            insert(&mut style, "borderColor", hex(colors.border));
            padded(&mut style, spacing.md, spacing.sm);
        }
        Role::Toggle => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "borderRadius", number(radius.sm));
            insert(&mut style, "borderWidth", 1u32);
            insert(&mut style, "borderColor", hex(colors.border));
            insert(&mut style, "padding", number(spacing.sm));
            centered(&mut style);
        }
        Role::Slider => {
            insert(&mut style, "backgroundColor", hex(colors.surface));
            insert(&mut style, "borderRadius", number(radius.sm));
            insert(&mut style, "padding", number(spacing.sm));
        }
        Role::Chip => {
            insert(&mut style, "backgroundColor", hex(colors.secondary));
            insert(&mut style, "borderRadius", number(radius.full));
            padded(&mut style, spacing.md, spacing.sm);
            centered(&mut style);
        }
        Role::Badge => {
            insert(&mut style, "backgroundColor", hex(colors.accent));
            insert(&mut style, "borderRadius", number(radius.sm));
            padded(&mut style, spacing.sm, spacing.xs);
            centered(&mut style);
        }
        Role::Tag => {
            insert(&mut style, "backgroundColor", hex(colors.muted));
            insert(&mut style, "borderRadius", number(radius.sm));
            padded(&mut style, spacing.sm, spacing.xs);
            centered(&mut style);
        }
    }

    style
}
