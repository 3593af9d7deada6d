//! The multi-column utility plugin.
//!
//! For every theme category (`colGap`, `colRuleWidth`, ...) each flat value
//! becomes one utility (`.col-gap-sm { column-gap: 1rem }`) and each grouped
//! value becomes one utility per sub-key
//! (`.col-rule-gray-500 { column-rule-color: #6b7280 }`).

use crate::defaults;
use crate::engine::{Declaration, Plugin, PluginContext, Utility, UtilityRegistry, VariantKind};
use crate::naming::{generate_class_name, generate_css_property};
use crate::theme::{scale, ThemeScale, ThemeValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Variants the host generates for every column utility
pub const VARIANTS: [VariantKind; 2] = [VariantKind::Responsive, VariantKind::Hover];

const GLOBAL_KEYWORDS: [&str; 5] = ["inherit", "initial", "revert", "revert-layer", "unset"];

const FILL_KEYWORDS: [&str; 3] = ["auto", "balance", "balance-all"];

const RULE_STYLE_KEYWORDS: [&str; 10] = [
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
];

const SPAN_KEYWORDS: [&str; 2] = ["none", "all"];

/// Theme categories handled by the plugin, in generation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnProperty {
    ColCount,
    ColFill,
    ColGap,
    ColRuleColor,
    ColRuleStyle,
    ColRuleWidth,
    ColSpan,
    ColWidth,
}

impl ColumnProperty {
    pub const ALL: [ColumnProperty; 8] = [
        ColumnProperty::ColCount,
        ColumnProperty::ColFill,
        ColumnProperty::ColGap,
        ColumnProperty::ColRuleColor,
        ColumnProperty::ColRuleStyle,
        ColumnProperty::ColRuleWidth,
        ColumnProperty::ColSpan,
        ColumnProperty::ColWidth,
    ];

    /// Name of the theme category
    pub fn theme_key(&self) -> &'static str {
        match self {
            ColumnProperty::ColCount => "colCount",
            ColumnProperty::ColFill => "colFill",
            ColumnProperty::ColGap => "colGap",
            ColumnProperty::ColRuleColor => "colRuleColor",
            ColumnProperty::ColRuleStyle => "colRuleStyle",
            ColumnProperty::ColRuleWidth => "colRuleWidth",
            ColumnProperty::ColSpan => "colSpan",
            ColumnProperty::ColWidth => "colWidth",
        }
    }

    pub fn css_property(&self) -> String {
        generate_css_property(self.theme_key())
    }

    /// Default values, derived from the host's default theme
    pub fn default_scale(&self) -> ThemeScale {
        match self {
            ColumnProperty::ColCount => defaults::columns(),
            ColumnProperty::ColFill => keywords(&FILL_KEYWORDS),
            ColumnProperty::ColGap => defaults::gap(),
            ColumnProperty::ColRuleColor => defaults::border_color(),
            ColumnProperty::ColRuleStyle => keywords(&RULE_STYLE_KEYWORDS),
            ColumnProperty::ColRuleWidth => defaults::border_width(),
            ColumnProperty::ColSpan => keywords(&SPAN_KEYWORDS),
            ColumnProperty::ColWidth => defaults::width(),
        }
    }
}

/// Keyword scale where every key is its own value, followed by the CSS-wide keywords
fn keywords(words: &[&str]) -> ThemeScale {
    let pairs: Vec<(&str, &str)> = words
        .iter()
        .chain(GLOBAL_KEYWORDS.iter())
        .map(|word| (*word, *word))
        .collect();
    scale(&pairs)
}

/// Default theme for every column category
pub fn default_theme() -> IndexMap<String, ThemeScale> {
    ColumnProperty::ALL
        .iter()
        .map(|property| (property.theme_key().to_string(), property.default_scale()))
        .collect()
}

/// Where a generated utility came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtilitySource {
    pub property: ColumnProperty,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<String>,
}

/// Expand the context's theme into the full list of column utilities.
pub fn build_utilities(ctx: &PluginContext<'_>) -> Vec<Utility> {
    build_utilities_with_sources(ctx)
        .into_iter()
        .map(|(utility, _)| utility)
        .collect()
}

/// Same as [`build_utilities`], keeping the theme entry each utility came from.
///
/// Class names carry the context's prefix and go through its escaping.
pub fn build_utilities_with_sources(ctx: &PluginContext<'_>) -> Vec<(Utility, UtilitySource)> {
    let prefix = ctx.prefix();
    let escape = |class: &str| ctx.escape(class);
    let mut utilities = Vec::new();

    for property in ColumnProperty::ALL {
        let name = property.theme_key();
        let Some(values) = ctx.theme(name) else {
            continue;
        };
        let css_property = property.css_property();

        for (key, value) in values {
            match value {
                ThemeValue::Group(group) => {
                    for (variant_key, raw) in group {
                        utilities.push((
                            Utility {
                                selector: generate_class_name(name, key, Some(variant_key.as_str()), prefix, escape),
                                declaration: Declaration::new(css_property.clone(), raw.to_string()),
                            },
                            UtilitySource {
                                property,
                                key: key.clone(),
                                variant_key: Some(variant_key.clone()),
                            },
                        ));
                    }
                }
                ThemeValue::Value(raw) => {
                    utilities.push((
                        Utility {
                            selector: generate_class_name(name, key, None, prefix, escape),
                            declaration: Declaration::new(css_property.clone(), raw.to_string()),
                        },
                        UtilitySource {
                            property,
                            key: key.clone(),
                            variant_key: None,
                        },
                    ));
                }
            }
        }
    }

    utilities
}

/// Multi-column layout utilities
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentColumns;

impl Plugin for ContentColumns {
    fn name(&self) -> &str {
        "content-columns"
    }

    fn default_theme(&self) -> IndexMap<String, ThemeScale> {
        default_theme()
    }

    fn register(&self, ctx: &PluginContext<'_>, registry: &mut dyn UtilityRegistry) {
        let utilities = build_utilities(ctx);
        tracing::debug!(count = utilities.len(), prefix = ctx.prefix(), "generated column utilities");

        registry.add_utilities(utilities, &VARIANTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnsConfig;
    use crate::engine::UtilityEngine;
    use crate::naming::class_stem;
    use crate::theme::Theme;

    fn theme_with(property: &str, values: ThemeScale) -> Theme {
        let mut categories = IndexMap::new();
        categories.insert(property.to_string(), values);
        Theme::new(categories, IndexMap::new())
    }

    fn build(prefix: &str, theme: &Theme) -> Vec<Utility> {
        let config = ColumnsConfig {
            prefix: prefix.to_string(),
            ..ColumnsConfig::default()
        };
        build_utilities(&PluginContext::new(&config, theme))
    }

    #[test]
    fn test_property_names() {
        assert_eq!(class_stem(ColumnProperty::ColRuleColor.theme_key()), "col-rule");
        assert_eq!(class_stem(ColumnProperty::ColRuleStyle.theme_key()), "col-rule");
        assert_eq!(ColumnProperty::ColRuleWidth.css_property(), "column-rule-width");
        assert_eq!(ColumnProperty::ColSpan.css_property(), "column-span");
    }

    #[test]
    fn test_flat_values() {
        let theme = theme_with("colGap", scale(&[("sm", "1rem"), ("md", "1.5rem")]));
        let utilities = build("", &theme);

        assert_eq!(
            utilities,
            vec![
                Utility {
                    selector: ".col-gap-sm".to_string(),
                    declaration: Declaration::new("column-gap", "1rem"),
                },
                Utility {
                    selector: ".col-gap-md".to_string(),
                    declaration: Declaration::new("column-gap", "1.5rem"),
                },
            ]
        );
    }

    #[test]
    fn test_grouped_values() {
        let mut values = scale(&[("default", "1px")]);
        values.insert(
            "thick".to_string(),
            ThemeValue::group(&[("base", "4px"), ("heavy", "8px")]),
        );
        let config = ColumnsConfig::default();
        let theme = theme_with("colRuleWidth", values);
        let utilities = build_utilities_with_sources(&PluginContext::new(&config, &theme));

        let selectors: Vec<&str> = utilities.iter().map(|(u, _)| u.selector.as_str()).collect();
        assert_eq!(
            selectors,
            vec![
                ".col-rule-width-default",
                ".col-rule-width-thick-base",
                ".col-rule-width-thick-heavy"
            ]
        );
        assert_eq!(utilities[2].0.declaration, Declaration::new("column-rule-width", "8px"));
        assert_eq!(utilities[2].1.variant_key.as_deref(), Some("heavy"));
        assert_eq!(utilities[0].1.variant_key, None);
    }

    #[test]
    fn test_prefix_and_escaping() {
        let theme = theme_with("colWidth", scale(&[("1/2", "50%")]));
        let utilities = build("tw-", &theme);
        assert_eq!(utilities[0].selector, ".tw-col-width-1\\/2");

        // Leading dot in the configured prefix is dropped
        let utilities = build(".tw-", &theme);
        assert_eq!(utilities[0].selector, ".tw-col-width-1\\/2");
    }

    #[test]
    fn test_missing_category_is_skipped() {
        let utilities = build("", &Theme::default());
        assert!(utilities.is_empty());
    }

    #[test]
    fn test_default_theme_covers_every_property() {
        let theme = default_theme();
        assert_eq!(theme.len(), ColumnProperty::ALL.len());
        assert_eq!(theme["colFill"].len(), FILL_KEYWORDS.len() + GLOBAL_KEYWORDS.len());
        assert_eq!(theme["colFill"]["balance-all"], ThemeValue::value("balance-all"));
        assert_eq!(theme["colRuleStyle"]["revert-layer"], ThemeValue::value("revert-layer"));
        assert_eq!(theme["colCount"]["3xs"], ThemeValue::value("16rem"));
    }

    #[test]
    fn test_default_rule_colors_expand_shades() {
        let theme = Theme::new(default_theme(), IndexMap::new());
        let utilities = build("", &theme);

        let gray = utilities
            .iter()
            .find(|u| u.selector == ".col-rule-gray-500")
            .expect("gray-500 rule color");
        assert_eq!(gray.declaration, Declaration::new("column-rule-color", "#6b7280"));
    }

    #[test]
    fn test_register_escapes_through_context() {
        let config = ColumnsConfig {
            prefix: "sm:".to_string(),
            ..ColumnsConfig::default()
        };
        let mut engine = UtilityEngine::new(config);
        engine.register_plugin(&ContentColumns);

        assert!(engine
            .utilities()
            .iter()
            .any(|u| u.utility.selector == ".sm\\:col-gap-0\\.5"));
        assert!(engine.utilities().iter().all(|u| u.variants == VARIANTS.to_vec()));
    }
}
