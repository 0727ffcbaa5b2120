use thiserror::Error;

/// Reasons a query document could not be scoped. Every variant means the
/// request must be rejected rather than forwarded unscoped.
#[derive(Error, Debug)]
pub enum ScopeError {
    #[error("Expected an object at '{path}', found {found}")]
    NotAnObject { path: String, found: &'static str },

    #[error("Expected an object or array at '{path}', found {found}")]
    MalformedClause { path: String, found: &'static str },

    #[error("Multi-search body has an unpaired header line ({lines} non-empty lines)")]
    UnpairedMultiSearch { lines: usize },

    #[error("Unknown query shape: {0}")]
    UnknownShape(String),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
