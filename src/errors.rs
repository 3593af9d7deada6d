use thiserror::Error;

/// Main error type for the content-columns crate
#[derive(Debug, Error)]
pub enum ColumnsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Glob error: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Failed to parse stylesheet at line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("The `{0}` class does not exist")]
    UnknownClass(String),

    #[error("Unsupported variant `{variant}` in `{candidate}`")]
    UnsupportedVariant { variant: String, candidate: String },

    #[error("Failed to write output to {path}: {message}")]
    OutputError { path: String, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ColumnsError>;
