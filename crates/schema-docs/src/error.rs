//! Error types for schema-docs

use thiserror::Error;

/// Result type alias for documentation operations
pub type DocsResult<T> = std::result::Result<T, DocsError>;

/// Documentation error types
#[derive(Error, Debug)]
pub enum DocsError {
    #[error("Schema error: {0}")]
    Schema(#[from] field_schema::SchemaError),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Publish failed: HTTP {status} - {body}")]
    Publish { status: u16, body: String },

    #[error("Unexpected publish response: {0}")]
    InvalidResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
