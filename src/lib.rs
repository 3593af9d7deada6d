pub mod args;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod errors;
pub mod manifest;
pub mod naming;
pub mod plugin;
pub mod scanner;
pub mod stylesheet;
pub mod theme;

pub use args::{Cli, Commands, CompileArgs, ConfigArgs, GenerateArgs, ManifestArgs};
pub use config::{ColumnsConfig, ThemeConfig};
pub use engine::{
    Declaration, Plugin, PluginContext, Utility, UtilityEngine, UtilityRegistry, VariantKind,
};
pub use errors::{ColumnsError, Result};
pub use manifest::{Manifest, ManifestBuilder};
pub use plugin::{build_utilities, ColumnProperty, ContentColumns};
pub use stylesheet::{Compiler, Stylesheet};
pub use theme::{RawValue, Theme, ThemeScale, ThemeValue};

use indexmap::IndexSet;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Result of a CSS-producing command
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub css: String,
    /// Utilities registered by the plugin
    pub total_utilities: usize,
    /// Class candidates found in content
    pub total_candidates: usize,
    /// Content files scanned
    pub total_files: usize,
}

/// Load the configuration named by the arguments, or the default one
pub fn load_config(args: &ConfigArgs) -> Result<ColumnsConfig> {
    let mut config = match &args.config {
        Some(path) => ColumnsConfig::from_file(path)?,
        None => ColumnsConfig::default(),
    };

    if let Some(prefix) = &args.prefix {
        config.prefix = prefix.clone();
    }

    Ok(config)
}

/// Create an engine with the column utilities registered
pub fn build_engine(config: ColumnsConfig) -> UtilityEngine {
    let mut engine = UtilityEngine::new(config);
    engine.register_plugin(&ContentColumns);
    engine
}

/// Generate utility CSS for the candidates found in content
pub fn generate(args: &GenerateArgs) -> Result<GenerationResult> {
    args.validate().map_err(ColumnsError::InvalidInput)?;

    let config = load_config(&args.config)?;
    let patterns = content_patterns(&args.input, &config);
    let engine = build_engine(config);

    let compiler = Compiler::new(&engine);
    let (nodes, total_candidates, total_files) = if args.all {
        (compiler.all_utilities(), engine.len(), 0)
    } else {
        let files = collect_files(&patterns, &args.exclude)?;
        let candidates = scanner::extract_candidates_from_files(&files)?;
        let total = candidates.len();
        let compiler = compiler.with_candidates(candidates);
        let stylesheet = Stylesheet::parse("@tailwind utilities;")?;
        (compiler.compile(&stylesheet)?, total, files.len())
    };

    let mut css = if args.minify {
        stylesheet::to_minified_css(&nodes)
    } else {
        stylesheet::to_css(&nodes)
    };
    if !args.no_header {
        css = format!("{}{}", stylesheet::css_header(args.minify), css);
    }

    let result = GenerationResult {
        css,
        total_utilities: engine.len(),
        total_candidates,
        total_files,
    };

    if let Some(output) = &args.output {
        write_output(output, &result.css)?;
    }

    tracing::info!(
        utilities = result.total_utilities,
        candidates = result.total_candidates,
        files = result.total_files,
        "generated utility CSS"
    );

    Ok(result)
}

/// Compile a stylesheet with `@apply` / `@tailwind utilities`
pub fn compile(args: &CompileArgs) -> Result<GenerationResult> {
    args.validate().map_err(ColumnsError::InvalidInput)?;

    let source = if args.reads_stdin() {
        let mut source = String::new();
        std::io::stdin()
            .read_to_string(&mut source)
            .map_err(|e| ColumnsError::InvalidInput(format!("Failed to read from stdin: {}", e)))?;
        source
    } else {
        fs::read_to_string(&args.stylesheet)?
    };

    let config = load_config(&args.config)?;
    let patterns = content_patterns(&args.input, &config);
    let engine = build_engine(config);

    let files = collect_files(&patterns, &[])?;
    let candidates = scanner::extract_candidates_from_files(&files)?;
    let total_candidates = candidates.len();

    let css = Compiler::new(&engine)
        .with_candidates(candidates)
        .compile_str(&source, args.minify)?;

    let result = GenerationResult {
        css,
        total_utilities: engine.len(),
        total_candidates,
        total_files: files.len(),
    };

    if let Some(output) = &args.output {
        write_output(output, &result.css)?;
    }

    tracing::info!(
        stylesheet = %args.stylesheet.display(),
        candidates = result.total_candidates,
        "compiled stylesheet"
    );

    Ok(result)
}

/// Build the manifest of every generated utility; returns the JSON text
pub fn manifest(args: &ManifestArgs) -> Result<String> {
    let config = load_config(&args.config)?;
    let engine = build_engine(config);

    let theme = engine.theme();
    let utilities = plugin::build_utilities_with_sources(&PluginContext::new(engine.config(), theme));

    let manifest = ManifestBuilder::new()
        .with_prefix(&engine.config().prefix)
        .with_variants(&plugin::VARIANTS)
        .with_screens(theme.screens().clone())
        .with_utilities(&utilities)
        .build();

    let json = if args.minify {
        manifest.to_compact_json()?
    } else {
        manifest.to_pretty_json()?
    };

    if let Some(output) = &args.output {
        write_output(output, &json)?;
    }

    Ok(json)
}

/// Command-line patterns win over the configured content paths
fn content_patterns(input: &[String], config: &ColumnsConfig) -> Vec<String> {
    if input.is_empty() {
        config.content.clone()
    } else {
        input.to_vec()
    }
}

/// Collect files matching the given patterns
pub fn collect_files(patterns: &[String], exclude_patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = IndexSet::new();

    for pattern in patterns {
        for entry in glob::glob(pattern)? {
            let path = entry?;

            if should_exclude(&path, exclude_patterns)? {
                continue;
            }

            if path.is_dir() {
                continue;
            }

            files.insert(path);
        }
    }

    tracing::debug!(files = files.len(), "collected content files");
    Ok(files.into_iter().collect())
}

/// Check if a path should be excluded
fn should_exclude(path: &Path, exclude_patterns: &[String]) -> Result<bool> {
    for pattern in exclude_patterns {
        let pattern = glob::Pattern::new(pattern)?;
        if pattern.matches_path(path) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    write_atomic(path, content).map_err(|e| ColumnsError::OutputError {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Write file atomically by writing to temp file then renaming
fn write_atomic<P: AsRef<Path>>(path: P, content: &str) -> std::io::Result<()> {
    use std::io::Write;

    let path = path.as_ref();
    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;

    fs::rename(&temp_path, path)?;

    Ok(())
}
