use crate::engine::{Utility, VariantKind};
use crate::plugin::UtilitySource;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata for the generated manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Version of the manifest format
    pub version: String,

    /// Timestamp when the manifest was generated
    pub generated_at: DateTime<Utc>,

    /// Class prefix the utilities were generated with
    pub prefix: String,

    /// Variants the host generates for every utility
    pub variants: Vec<VariantKind>,

    /// Breakpoints available to responsive variants
    pub screens: IndexMap<String, String>,

    /// Number of utilities generated
    pub utilities_generated: usize,

    /// Generator version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator_version: Option<String>,
}

/// One declaration a selector applies, with the theme entry it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestDeclaration {
    /// Theme category (`colGap`)
    pub theme_key: String,

    /// Key inside the category (`sm`)
    pub key: String,

    /// Sub-key of a grouped value (`500` in `gray.500`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_key: Option<String>,

    pub property: String,
    pub value: String,
}

/// Everything a selector applies
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestClassInfo {
    pub declarations: Vec<ManifestDeclaration>,
}

/// Statistics about the generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestStatistics {
    /// Utilities per theme category
    pub per_property: IndexMap<String, usize>,

    /// Utilities generated from grouped values
    pub grouped_utilities: usize,

    /// Selectors shared by more than one utility
    pub shared_selectors: usize,

    /// Processing time in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,
}

/// Complete manifest structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Metadata about the generation
    pub metadata: ManifestMetadata,

    /// Selector -> declarations
    pub classes: IndexMap<String, ManifestClassInfo>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<ManifestStatistics>,
}

impl Manifest {
    /// Create a new manifest with default metadata
    pub fn new() -> Self {
        Self {
            metadata: ManifestMetadata {
                version: "1.0.0".to_string(),
                generated_at: Utc::now(),
                prefix: String::new(),
                variants: Vec::new(),
                screens: IndexMap::new(),
                utilities_generated: 0,
                generator_version: Some(env!("CARGO_PKG_VERSION").to_string()),
            },
            classes: IndexMap::new(),
            statistics: None,
        }
    }

    /// Record a generated utility
    pub fn add_utility(&mut self, utility: &Utility, source: &UtilitySource) {
        let entry = self.classes.entry(utility.selector.clone()).or_default();
        entry.declarations.push(ManifestDeclaration {
            theme_key: source.property.theme_key().to_string(),
            key: source.key.clone(),
            variant_key: source.variant_key.clone(),
            property: utility.declaration.property.clone(),
            value: utility.declaration.value.clone(),
        });
        self.metadata.utilities_generated += 1;
    }

    /// Calculate and set statistics
    pub fn calculate_statistics(&mut self, processing_time_ms: Option<u64>) {
        let mut per_property: IndexMap<String, usize> = IndexMap::new();
        let mut grouped_utilities = 0;

        for declaration in self.classes.values().flat_map(|info| &info.declarations) {
            *per_property.entry(declaration.theme_key.clone()).or_default() += 1;
            if declaration.variant_key.is_some() {
                grouped_utilities += 1;
            }
        }

        let shared_selectors = self
            .classes
            .values()
            .filter(|info| info.declarations.len() > 1)
            .count();

        self.statistics = Some(ManifestStatistics {
            per_property,
            grouped_utilities,
            shared_selectors,
            processing_time_ms,
        });
    }

    /// Convert manifest to pretty JSON string
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Convert manifest to compact JSON string
    pub fn to_compact_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder pattern for creating manifests
pub struct ManifestBuilder {
    manifest: Manifest,
    start_time: Option<std::time::Instant>,
}

impl ManifestBuilder {
    /// Create a new manifest builder
    pub fn new() -> Self {
        Self {
            manifest: Manifest::new(),
            start_time: Some(std::time::Instant::now()),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.manifest.metadata.prefix = prefix.to_string();
        self
    }

    pub fn with_variants(mut self, variants: &[VariantKind]) -> Self {
        self.manifest.metadata.variants = variants.to_vec();
        self
    }

    pub fn with_screens(mut self, screens: IndexMap<String, String>) -> Self {
        self.manifest.metadata.screens = screens;
        self
    }

    /// Add generated utilities with their theme sources
    pub fn with_utilities(mut self, utilities: &[(Utility, UtilitySource)]) -> Self {
        for (utility, source) in utilities {
            self.manifest.add_utility(utility, source);
        }
        self
    }

    /// Build the final manifest with statistics
    pub fn build(mut self) -> Manifest {
        let processing_time = self.start_time.map(|t| t.elapsed().as_millis() as u64);
        self.manifest.calculate_statistics(processing_time);
        self.manifest
    }
}

impl Default for ManifestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
