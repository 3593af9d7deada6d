use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Multi-column CSS utilities - generate, apply and list column utility classes
#[derive(Parser, Debug)]
#[command(name = "content-columns")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Verbose output
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        default_value_t = false,
        help = "Enable debug logging"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate utility CSS for the classes used in content files
    Generate(GenerateArgs),
    /// Compile a stylesheet containing `@apply` and `@tailwind utilities`
    Compile(CompileArgs),
    /// Write a JSON manifest of every generated utility
    Manifest(ManifestArgs),
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Configuration file path (YAML or JSON)
    #[arg(
        short = 'c',
        long = "config",
        value_name = "PATH",
        env = "CONTENT_COLUMNS_CONFIG",
        help = "Path to configuration file (.yaml, .yml or .json)"
    )]
    pub config: Option<PathBuf>,

    /// Class prefix, overrides the configuration file
    #[arg(long = "prefix", value_name = "PREFIX", help = "Prefix for generated class names")]
    pub prefix: Option<String>,
}

/// Arguments for the generate command
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Content file patterns (glob patterns supported)
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATTERN",
        num_args = 1..,
        help = "Content files to scan for class candidates"
    )]
    pub input: Vec<String>,

    /// Exclude patterns (glob patterns to exclude)
    #[arg(
        short = 'e',
        long = "exclude",
        value_name = "PATTERN",
        num_args = 0..,
        help = "Patterns to exclude from scanning"
    )]
    pub exclude: Vec<String>,

    /// Emit every generated utility instead of only the used ones
    #[arg(long = "all", default_value_t = false, help = "Emit every generated utility")]
    pub all: bool,

    /// Output CSS file path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path where the generated CSS is written (stdout if omitted)"
    )]
    pub output: Option<PathBuf>,

    /// Enable CSS minification
    #[arg(long = "minify", default_value_t = false, help = "Enable minification of the output CSS")]
    pub minify: bool,

    /// Skip the header comment
    #[arg(long = "no-header", default_value_t = false, help = "Do not prepend the generated-file header")]
    pub no_header: bool,
}

/// Arguments for the compile command
#[derive(Args, Debug, Clone)]
pub struct CompileArgs {
    /// Stylesheet to compile, `-` for stdin
    #[arg(value_name = "STYLESHEET")]
    pub stylesheet: PathBuf,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Content file patterns feeding `@tailwind utilities`
    #[arg(
        short = 'i',
        long = "input",
        value_name = "PATTERN",
        num_args = 1..,
        help = "Content files to scan for class candidates"
    )]
    pub input: Vec<String>,

    /// Output CSS file path
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path where the compiled CSS is written (stdout if omitted)"
    )]
    pub output: Option<PathBuf>,

    /// Enable CSS minification
    #[arg(long = "minify", default_value_t = false, help = "Enable minification of the output CSS")]
    pub minify: bool,
}

/// Arguments for the manifest command
#[derive(Args, Debug, Clone)]
pub struct ManifestArgs {
    #[command(flatten)]
    pub config: ConfigArgs,

    /// Output manifest file path (JSON)
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        help = "Path where the JSON manifest is written (stdout if omitted)"
    )]
    pub output: Option<PathBuf>,

    /// Compact JSON
    #[arg(long = "minify", default_value_t = false, help = "Write compact JSON")]
    pub minify: bool,
}

impl GenerateArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if self.all && !self.input.is_empty() {
            return Err("--all cannot be combined with --input".to_string());
        }
        if !self.exclude.is_empty() && self.input.is_empty() {
            return Err("--exclude requires at least one --input pattern".to_string());
        }
        Ok(())
    }
}

impl CompileArgs {
    /// Validate that the arguments are consistent
    pub fn validate(&self) -> Result<(), String> {
        if let Some(output) = &self.output {
            if output == &self.stylesheet {
                return Err("Output path must differ from the input stylesheet".to_string());
            }
        }
        Ok(())
    }

    /// Whether the stylesheet is read from stdin
    pub fn reads_stdin(&self) -> bool {
        self.stylesheet.as_os_str() == "-"
    }
}
