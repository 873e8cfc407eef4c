use std::collections::HashMap;

pub const THEME_ID_LIGHT: &str = "theme:light";
pub const THEME_ID_DARK: &str = "theme:dark";

pub type Rgb = (u8, u8, u8);

/// `#rrggbb` form used in rendered style maps.
pub fn hex(rgb: Rgb) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb.0, rgb.1, rgb.2)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorTokens {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub muted: Rgb,
    pub background: Rgb,
    pub surface: Rgb,
    pub border: Rgb,
    pub shadow: Rgb,
    pub text: Rgb,
    pub text_secondary: Rgb,
    pub on_primary: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpacingTokens {
    pub xs: f32,
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub xl: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypographyTokens {
    pub heading_size: f32,
    pub body_size: f32,
    pub caption_size: f32,
    pub label_size: f32,
    pub heading_weight: &'static str,
    pub body_weight: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RadiusTokens {
    pub sm: f32,
    pub md: f32,
    pub lg: f32,
    pub full: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesignTokens {
    pub colors: ColorTokens,
    pub spacing: SpacingTokens,
    pub typography: TypographyTokens,
    pub radius: RadiusTokens,
}

const SPACING: SpacingTokens = SpacingTokens {
    xs: 4.0,
    sm: 8.0,
    md: 16.0,
    lg: 24.0,
    xl: 32.0,
};

const TYPOGRAPHY: TypographyTokens = TypographyTokens {
    heading_size: 24.0,
    body_size: 16.0,
    caption_size: 12.0,
    label_size: 14.0,
    heading_weight: "700",
    body_weight: "400",
};

const RADIUS: RadiusTokens = RadiusTokens {
    sm: 4.0,
    md: 8.0,
    lg: 16.0,
    full: 9999.0,
};

impl DesignTokens {
    pub fn light() -> Self {
        Self {
            colors: ColorTokens {
                primary: (59, 130, 246),
                secondary: (100, 116, 139),
                accent: (245, 158, 11),
                muted: (241, 245, 249),
                background: (255, 255, 255),
                surface: (248, 250, 252),
                border: (226, 232, 240),
                shadow: (0, 0, 0),
                text: (15, 23, 42),
                text_secondary: (71, 85, 105),
                on_primary: (255, 255, 255),
            },
            spacing: SPACING,
            typography: TYPOGRAPHY,
            radius: RADIUS,
        }
    }

    pub fn dark() -> Self {
        Self {
            colors: ColorTokens {
                primary: (96, 165, 250),
                secondary: (148, 163, 184),
                accent: (251, 191, 36),
                muted: (30, 41, 59),
                background: (15, 23, 42),
                surface: (30, 41, 59),
                border: (51, 65, 85),
                shadow: (0, 0, 0),
                text: (241, 245, 249),
                text_secondary: (203, 213, 225),
                on_primary: (15, 23, 42),
            },
            spacing: SPACING,
            typography: TYPOGRAPHY,
            radius: RADIUS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeResolution {
    pub requested_id: String,
    pub resolved_id: String,
    pub matched: bool,
    pub fallback_used: bool,
    pub tokens: DesignTokens,
}

pub struct ThemeRegistry {
    themes: HashMap<String, DesignTokens>,
    fallback_id: String,
}

impl ThemeRegistry {
    pub fn register(&mut self, theme_id: &str, tokens: DesignTokens) {
        self.themes.insert(theme_id.to_ascii_lowercase(), tokens);
    }

    pub fn register_core_seed_defaults(&mut self) {
        self.register(THEME_ID_LIGHT, DesignTokens::light());
        self.register(THEME_ID_DARK, DesignTokens::dark());
    }

    pub fn resolve(&self, theme_id: &str) -> ThemeResolution {
        let requested = theme_id.trim().to_ascii_lowercase();

        if let Some(tokens) = self.themes.get(&requested).cloned() {
            return ThemeResolution {
                requested_id: requested.clone(),
                resolved_id: requested,
                matched: true,
                fallback_used: false,
                tokens,
            };
        }

        let tokens = self
            .themes
            .get(&self.fallback_id)
            .cloned()
            .unwrap_or_else(DesignTokens::light);
        ThemeResolution {
            requested_id: requested,
            resolved_id: self.fallback_id.clone(),
            matched: false,
            fallback_used: true,
            tokens,
        }
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let mut registry = Self {
            themes: HashMap::new(),
            fallback_id: THEME_ID_LIGHT.to_string(),
        };
        registry.register_core_seed_defaults();
        registry
    }
}
