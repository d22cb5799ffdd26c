//! Error types for template instantiation

use thiserror::Error;

/// Result type for instantiation operations
pub type Result<T> = std::result::Result<T, GenericsError>;

/// Errors that can occur while instantiating a template
#[derive(Debug, Error)]
pub enum GenericsError {
    /// The template (or a fragment) could not be parsed
    #[error("Source error in {filename}:{line}:{column}: {message}")]
    Source {
        filename: String,
        line: usize,
        column: usize,
        message: String,
    },

    /// A placeholder declared in the template has no entry in the active binding set
    #[error("missing specific type for generic type {placeholder}")]
    MissingBinding { placeholder: String },

    /// The assembled output could not be normalized
    #[error("Formatting error: {message}")]
    Format { message: String },

    /// Malformed binding expression, duplicate placeholder key or empty binding list
    #[error("Invalid binding: {0}")]
    InvalidBinding(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template bytes were not valid UTF-8
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenericsError {
    /// Build a source error for `filename` at a zero-based tree-sitter point
    pub fn source_at(filename: &str, point: tree_sitter::Point, message: impl Into<String>) -> Self {
        GenericsError::Source {
            filename: filename.to_string(),
            line: point.row + 1,
            column: point.column + 1,
            message: message.into(),
        }
    }
}
