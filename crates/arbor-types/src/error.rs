use thiserror::Error;

/// Errors produced while building or parsing Arbor types.
#[derive(Debug, Error)]
pub enum TypeError {
    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid path {input:?}: {reason}")]
    InvalidPath { input: String, reason: String },
}

/// Convenience alias for results carrying a [`TypeError`].
pub type TypeResult<T> = Result<T, TypeError>;
