use crate::defaults;
use crate::errors::{ColumnsError, Result};
use crate::theme::{deserialize_scales, Theme, ThemeScale};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host configuration the plugins are registered against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnsConfig {
    /// Prefix prepended to every generated class name
    pub prefix: String,

    /// Separator between variants and the utility class (`md:col-count-2`)
    pub separator: String,

    /// Content paths scanned for class candidates
    pub content: Vec<String>,

    /// Theme overrides
    pub theme: ThemeConfig,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            separator: ":".to_string(),
            content: Vec::new(),
            theme: ThemeConfig::default(),
        }
    }
}

/// Theme section of the configuration
///
/// A category listed at the top level replaces the plugin default for that
/// category; categories under `extend` are merged into it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Breakpoints for responsive variants
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screens: Option<IndexMap<String, String>>,

    /// Entries merged on top of the resolved categories
    #[serde(
        skip_serializing_if = "IndexMap::is_empty",
        deserialize_with = "deserialize_scales"
    )]
    pub extend: IndexMap<String, ThemeScale>,

    /// Category replacements (`colGap`, `colWidth`, ...)
    #[serde(flatten, deserialize_with = "deserialize_scales")]
    pub categories: IndexMap<String, ThemeScale>,
}

impl ThemeConfig {
    /// Resolve the final theme against a plugin's default categories.
    pub fn resolve(&self, defaults: &IndexMap<String, ThemeScale>) -> Theme {
        let mut categories = IndexMap::new();

        for (property, default_scale) in defaults {
            let mut scale = self
                .categories
                .get(property)
                .cloned()
                .unwrap_or_else(|| default_scale.clone());

            if let Some(extension) = self.extend.get(property) {
                scale.extend(extension.iter().map(|(k, v)| (k.clone(), v.clone())));
            }

            categories.insert(property.clone(), scale);
        }

        let screens = self.screens.clone().unwrap_or_else(defaults::screens);
        Theme::new(categories, screens)
    }
}

impl ColumnsConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ColumnsError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_yaml::from_str(&content).map_err(|e| ColumnsError::ConfigError {
            message: format!("Failed to parse YAML config: {}", e),
        })
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ColumnsError::ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        serde_json::from_str(&content).map_err(|e| ColumnsError::ConfigError {
            message: format!("Failed to parse JSON config: {}", e),
        })
    }

    /// Load configuration from a file (auto-detect format)
    pub fn from_file(path: &Path) -> Result<Self> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_file(path),
            Some("json") => Self::from_json_file(path),
            _ => Err(ColumnsError::ConfigError {
                message: format!(
                    "Unsupported config file format: {}. Use .yaml, .yml, or .json",
                    path.display()
                ),
            }),
        }
    }

    /// Deep-merge another configuration on top of this one
    pub fn merge(mut self, other: Self) -> Self {
        let defaults = Self::default();

        if other.prefix != defaults.prefix {
            self.prefix = other.prefix;
        }
        if other.separator != defaults.separator {
            self.separator = other.separator;
        }

        for path in other.content {
            if !self.content.contains(&path) {
                self.content.push(path);
            }
        }

        if other.theme.screens.is_some() {
            self.theme.screens = other.theme.screens;
        }
        merge_scales(&mut self.theme.categories, other.theme.categories);
        merge_scales(&mut self.theme.extend, other.theme.extend);

        self
    }
}

fn merge_scales(target: &mut IndexMap<String, ThemeScale>, source: IndexMap<String, ThemeScale>) {
    for (property, scale) in source {
        target.entry(property).or_default().extend(scale);
    }
}
