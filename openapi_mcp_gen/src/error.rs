use std::path::PathBuf;

/// Reasons a description document cannot be normalized.
///
/// Every variant aborts the whole run; no partial [`crate::ParsedApi`] is
/// ever produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    /// Required top-level metadata is missing or not a string.
    #[error("malformed document: missing required field `{field}`")]
    MalformedDocument { field: &'static str },

    /// The document is not an OpenAPI 3.x or Swagger 2.0 description we can interpret.
    #[error("unsupported document: {reason}")]
    UnsupportedDocument { reason: String },

    /// A component `$ref` could not be followed while resolution was enabled.
    #[error("unresolved reference `{reference}`")]
    UnresolvedReference { reference: String },
}

/// Error type for the end-to-end generation entry points.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// I/O error (e.g., reading the document, writing `types.ts`).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The document was rejected by the normalizer.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// The settings file could not be read or parsed.
    #[error("invalid config {}: {message}", .path.display())]
    Config { path: PathBuf, message: String },
}
