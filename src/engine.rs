//! Utility engine: the host side of plugin registration.
//!
//! Plugins receive a [`PluginContext`] (prefix, resolved theme, escaping) and
//! hand their utilities to a [`UtilityRegistry`]. [`UtilityEngine`] is the
//! registry implementation used by the stylesheet compiler; it indexes every
//! utility by selector and resolves variant-prefixed candidates such as
//! `md:hover:col-gap-sm`.

use crate::config::ColumnsConfig;
use crate::errors::{ColumnsError, Result};
use crate::naming::escape_class_name;
use crate::theme::{Theme, ThemeScale};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single CSS declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

impl Declaration {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: value.into(),
        }
    }
}

/// A selector with the one declaration it applies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utility {
    /// Escaped class selector, including the leading `.`
    pub selector: String,
    pub declaration: Declaration,
}

/// Variant families a plugin can ask the host to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariantKind {
    /// One `@media (min-width: ..)` form per configured screen
    Responsive,
    /// `:hover` form
    Hover,
}

impl VariantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantKind::Responsive => "responsive",
            VariantKind::Hover => "hover",
        }
    }
}

/// Receives utilities from plugins
pub trait UtilityRegistry {
    fn add_utilities(&mut self, utilities: Vec<Utility>, variants: &[VariantKind]);
}

/// What a plugin sees of the host while registering
pub struct PluginContext<'a> {
    config: &'a ColumnsConfig,
    theme: &'a Theme,
}

impl<'a> PluginContext<'a> {
    pub fn new(config: &'a ColumnsConfig, theme: &'a Theme) -> Self {
        Self { config, theme }
    }

    /// Configured class prefix, without any leading `.`
    pub fn prefix(&self) -> &str {
        self.config.prefix.trim_start_matches('.')
    }

    /// Resolved values for a theme category
    pub fn theme(&self, property: &str) -> Option<&ThemeScale> {
        self.theme.get(property)
    }

    pub fn escape(&self, class: &str) -> String {
        escape_class_name(class)
    }
}

/// A utility extension to the host
pub trait Plugin {
    fn name(&self) -> &str;

    /// Theme categories the plugin reads, with their default values
    fn default_theme(&self) -> IndexMap<String, ThemeScale>;

    fn register(&self, ctx: &PluginContext<'_>, registry: &mut dyn UtilityRegistry);
}

/// A utility as stored by the engine
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredUtility {
    pub utility: Utility,
    pub variants: Vec<VariantKind>,
    /// Registration order, used to sort output
    pub order: usize,
}

/// Variants requested by a candidate, in canonical form
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariantSet {
    /// Index of the screen in the configured order
    pub screen: Option<usize>,
    pub hover: bool,
}

impl VariantSet {
    pub fn is_empty(&self) -> bool {
        self.screen.is_none() && !self.hover
    }
}

/// A candidate resolved against the registered utilities
#[derive(Debug, Clone)]
pub struct ResolvedCandidate<'a> {
    /// The candidate as written (`md:col-count-3`)
    pub candidate: String,
    pub variants: VariantSet,
    pub utilities: Vec<&'a RegisteredUtility>,
}

/// Collects utilities from plugins and resolves class candidates
#[derive(Debug, Clone)]
pub struct UtilityEngine {
    config: ColumnsConfig,
    theme: Theme,
    utilities: Vec<RegisteredUtility>,
    by_selector: IndexMap<String, Vec<usize>>,
}

impl UtilityEngine {
    pub fn new(config: ColumnsConfig) -> Self {
        let theme = config.theme.resolve(&IndexMap::new());
        Self {
            config,
            theme,
            utilities: Vec::new(),
            by_selector: IndexMap::new(),
        }
    }

    /// Resolve the plugin's theme against the configuration and let it
    /// register its utilities.
    pub fn register_plugin<P: Plugin + ?Sized>(&mut self, plugin: &P) {
        let theme = self.config.theme.resolve(&plugin.default_theme());
        let before = self.utilities.len();

        let mut batch = Batch::default();
        plugin.register(&PluginContext::new(&self.config, &theme), &mut batch);
        for (utilities, variants) in batch.0 {
            self.add_utilities(utilities, &variants);
        }

        tracing::debug!(
            plugin = plugin.name(),
            utilities = self.utilities.len() - before,
            "registered plugin"
        );
        self.theme.absorb(theme);
    }

    pub fn config(&self) -> &ColumnsConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn utilities(&self) -> &[RegisteredUtility] {
        &self.utilities
    }

    pub fn len(&self) -> usize {
        self.utilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utilities.is_empty()
    }

    /// Screen name and min-width for a screen index
    pub fn screen(&self, index: usize) -> Option<(&str, &str)> {
        self.theme
            .screens()
            .get_index(index)
            .map(|(name, width)| (name.as_str(), width.as_str()))
    }

    /// Resolve a candidate such as `md:hover:col-gap-sm`.
    pub fn resolve_candidate(&self, candidate: &str) -> Result<ResolvedCandidate<'_>> {
        let separator = self.config.separator.as_str();
        let mut parts: Vec<&str> = if separator.is_empty() {
            vec![candidate]
        } else {
            candidate.split(separator).collect()
        };
        let class = parts.pop().unwrap_or_default();

        let selector = format!(".{}", escape_class_name(class));
        let indices = self
            .by_selector
            .get(&selector)
            .ok_or_else(|| ColumnsError::UnknownClass(candidate.to_string()))?;

        let mut variants = VariantSet::default();
        for variant in parts {
            let unsupported = || ColumnsError::UnsupportedVariant {
                variant: variant.to_string(),
                candidate: candidate.to_string(),
            };

            let kind = if variant == VariantKind::Hover.as_str() {
                if variants.hover {
                    return Err(unsupported());
                }
                variants.hover = true;
                VariantKind::Hover
            } else if let Some(index) = self.theme.screen_index(variant) {
                if variants.screen.is_some() {
                    return Err(unsupported());
                }
                variants.screen = Some(index);
                VariantKind::Responsive
            } else {
                return Err(unsupported());
            };

            if !indices.iter().all(|&i| self.utilities[i].variants.contains(&kind)) {
                return Err(unsupported());
            }
        }

        Ok(ResolvedCandidate {
            candidate: candidate.to_string(),
            variants,
            utilities: indices.iter().map(|&i| &self.utilities[i]).collect(),
        })
    }
}

impl UtilityRegistry for UtilityEngine {
    fn add_utilities(&mut self, utilities: Vec<Utility>, variants: &[VariantKind]) {
        for utility in utilities {
            let order = self.utilities.len();
            let entry = self.by_selector.entry(utility.selector.clone()).or_default();
            if !entry.is_empty() {
                tracing::debug!(selector = %utility.selector, "selector registered more than once");
            }
            entry.push(order);

            self.utilities.push(RegisteredUtility {
                utility,
                variants: variants.to_vec(),
                order,
            });
        }
    }
}

/// Buffers a plugin's batches while the engine is borrowed by the context.
#[derive(Default)]
struct Batch(Vec<(Vec<Utility>, Vec<VariantKind>)>);

impl UtilityRegistry for Batch {
    fn add_utilities(&mut self, utilities: Vec<Utility>, variants: &[VariantKind]) {
        self.0.push((utilities, variants.to_vec()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{scale, ThemeValue};

    struct GapOnly;

    impl Plugin for GapOnly {
        fn name(&self) -> &str {
            "gap-only"
        }

        fn default_theme(&self) -> IndexMap<String, ThemeScale> {
            let mut theme = IndexMap::new();
            theme.insert("colGap".to_string(), scale(&[("sm", "1rem"), ("0.5", "0.125rem")]));
            theme
        }

        fn register(&self, ctx: &PluginContext<'_>, registry: &mut dyn UtilityRegistry) {
            let utilities = ctx
                .theme("colGap")
                .into_iter()
                .flatten()
                .filter_map(|(key, value)| match value {
                    ThemeValue::Value(raw) => Some(Utility {
                        selector: format!(".{}", ctx.escape(&format!("{}col-gap-{}", ctx.prefix(), key))),
                        declaration: Declaration::new("column-gap", raw.to_string()),
                    }),
                    ThemeValue::Group(_) => None,
                })
                .collect();
            registry.add_utilities(utilities, &[VariantKind::Responsive]);
        }
    }

    fn engine() -> UtilityEngine {
        let mut engine = UtilityEngine::new(ColumnsConfig::default());
        engine.register_plugin(&GapOnly);
        engine
    }

    #[test]
    fn test_register_plugin_indexes_utilities() {
        let engine = engine();
        assert_eq!(engine.len(), 2);
        assert_eq!(engine.utilities()[1].utility.selector, ".col-gap-0\\.5");
        assert_eq!(engine.utilities()[1].order, 1);
    }

    #[test]
    fn test_resolve_plain_candidate() {
        let engine = engine();
        let resolved = engine.resolve_candidate("col-gap-0.5").unwrap();
        assert!(resolved.variants.is_empty());
        assert_eq!(resolved.utilities.len(), 1);
    }

    #[test]
    fn test_resolve_responsive_candidate() {
        let engine = engine();
        let resolved = engine.resolve_candidate("md:col-gap-sm").unwrap();
        assert_eq!(resolved.variants.screen, Some(1));
        assert_eq!(engine.screen(1), Some(("md", "768px")));
    }

    #[test]
    fn test_unregistered_variant_is_rejected() {
        let engine = engine();
        let err = engine.resolve_candidate("hover:col-gap-sm").unwrap_err();
        assert!(matches!(err, ColumnsError::UnsupportedVariant { .. }));

        let err = engine.resolve_candidate("md:lg:col-gap-sm").unwrap_err();
        assert!(matches!(err, ColumnsError::UnsupportedVariant { .. }));
    }

    #[test]
    fn test_unknown_class() {
        let engine = engine();
        let err = engine.resolve_candidate("col-gap-xl").unwrap_err();
        assert_eq!(err.to_string(), "The `col-gap-xl` class does not exist");
    }
}
