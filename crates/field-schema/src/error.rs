//! Error types for the field schema parser

use thiserror::Error;

/// Result type alias for schema operations
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Schema error types
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Schema too deep at '{path}': nesting exceeds {max_depth} levels")]
    TooDeep { path: String, max_depth: usize },

    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}
