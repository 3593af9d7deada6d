use indexmap::IndexMap;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A raw CSS value as written in a theme.
///
/// Config files may use bare numbers or booleans; they are emitted in their
/// natural textual form without any validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Text(text) => f.write_str(text),
            RawValue::Number(number) => write!(f, "{}", number),
            RawValue::Bool(flag) => write!(f, "{}", flag),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// One entry of a theme scale: either a value or a group of sub-keyed values
/// (`gray: { 100: ..., 200: ... }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeValue {
    Value(RawValue),
    #[serde(deserialize_with = "deserialize_keys")]
    Group(IndexMap<String, RawValue>),
}

impl ThemeValue {
    pub fn value(value: &str) -> Self {
        ThemeValue::Value(RawValue::from(value))
    }

    pub fn group(entries: &[(&str, &str)]) -> Self {
        ThemeValue::Group(
            entries
                .iter()
                .map(|(key, value)| (key.to_string(), RawValue::from(*value)))
                .collect(),
        )
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ThemeValue::Group(_))
    }
}

/// Named values for one theme category, in declaration order.
pub type ThemeScale = IndexMap<String, ThemeValue>;

/// Build a flat scale from `(key, value)` pairs.
pub fn scale(entries: &[(&str, &str)]) -> ThemeScale {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), ThemeValue::value(value)))
        .collect()
}

/// A map key written as a string, number or boolean (`7: "7"` in YAML).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScalarKey(String);

impl<'de> Deserialize<'de> for ScalarKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarKeyVisitor;

        impl Visitor<'_> for ScalarKeyVisitor {
            type Value = ScalarKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string, number or boolean key")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_string<E: de::Error>(self, value: String) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }

            fn visit_bool<E: de::Error>(self, value: bool) -> Result<ScalarKey, E> {
                Ok(ScalarKey(value.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarKeyVisitor)
    }
}

/// Deserialize a map whose keys may be written as numbers.
pub(crate) fn deserialize_keys<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    let map = IndexMap::<ScalarKey, V>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(ScalarKey(key), value)| (key, value)).collect())
}

/// Deserialize named scales (`colCount: { 7: "7" }`), accepting numeric scale keys.
pub(crate) fn deserialize_scales<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, ThemeScale>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Scale(#[serde(deserialize_with = "deserialize_keys")] ThemeScale);

    let map = IndexMap::<String, Scale>::deserialize(deserializer)?;
    Ok(map.into_iter().map(|(name, Scale(scale))| (name, scale)).collect())
}

/// A fully resolved theme: every category a plugin asked for, plus the
/// breakpoints used by responsive variants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Theme {
    categories: IndexMap<String, ThemeScale>,
    screens: IndexMap<String, String>,
}

impl Theme {
    pub fn new(categories: IndexMap<String, ThemeScale>, screens: IndexMap<String, String>) -> Self {
        Self { categories, screens }
    }

    /// Values of a category; `None` when the category is unknown.
    pub fn get(&self, property: &str) -> Option<&ThemeScale> {
        self.categories.get(property)
    }

    pub fn screens(&self) -> &IndexMap<String, String> {
        &self.screens
    }

    /// Take over another theme's categories and screens.
    pub fn absorb(&mut self, other: Theme) {
        self.categories.extend(other.categories);
        self.screens = other.screens;
    }

    /// Position of a breakpoint in the configured order.
    pub fn screen_index(&self, name: &str) -> Option<usize> {
        self.screens.get_index_of(name)
    }
}
