//! Error types for saxroute.
//!
//! Parsing itself reports problems through the error sink as
//! [`XmlError`](crate::types::XmlError) values. `SaxrouteError` covers the
//! surrounding operations: configuration, file access and report output.

use thiserror::Error;

use crate::types::XmlError;

/// Main error type for the saxroute library.
#[derive(Debug, Error)]
pub enum SaxrouteError {
    /// Chunk size outside the accepted range.
    #[error("Invalid chunk size: {size}. Expected a value between {min} and {max} bytes")]
    InvalidChunkSize { size: usize, min: usize, max: usize },

    /// Parsing failed; carries the diagnostics collected during the run.
    #[error("Failed to parse {filename}{}", .errors.first().map(|e| format!(": {}", e.message)).unwrap_or_default())]
    Parse {
        filename: String,
        errors: Vec<XmlError>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// JSON serialization error.
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),
}

/// Result type alias for saxroute operations.
pub type Result<T> = std::result::Result<T, SaxrouteError>;
