use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One style property value. Untagged so TOML and JSON overrides read naturally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(f64),
    Bool(bool),
    Text(String),
}

impl StyleValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            StyleValue::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StyleValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for StyleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleValue::Number(value) => write!(f, "{value}"),
            StyleValue::Bool(value) => write!(f, "{value}"),
            StyleValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<u32> for StyleValue {
    fn from(value: u32) -> Self {
        StyleValue::Number(f64::from(value))
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<String> for StyleValue {
    fn from(value: String) -> Self {
        StyleValue::Text(value)
    }
}

/// Property name to value. Ordered so rendered output is stable.
pub type StyleMap = BTreeMap<String, StyleValue>;

/// Builds a [`StyleMap`] from `(key, value)` pairs.
pub fn style_map<K, V, I>(entries: I) -> StyleMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<StyleValue>,
{
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value.into()))
        .collect()
}

/// Overlays `layer` onto `base`; keys in `layer` win.
pub fn overlay(base: &mut StyleMap, layer: &StyleMap) {
    for (key, value) in layer {
        base.insert(key.clone(), value.clone());
    }
}

/// Folds layers in order, later layers winning per key.
pub fn merge_layers<'a, I>(layers: I) -> StyleMap
where
    I: IntoIterator<Item = &'a StyleMap>,
{
    let mut merged = StyleMap::new();
    for layer in layers {
        overlay(&mut merged, layer);
    }
    merged
}
