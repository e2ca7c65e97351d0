//! Error types for the reconcile crate.
//!
//! Reconciliation itself is total; these errors come from the layers around
//! it: root path parsing and loading input documents.

use arbor_types::TypeError;

/// Errors that can occur while preparing a reconciliation.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    /// The configured root path could not be parsed.
    #[error("invalid root path: {0}")]
    InvalidRoot(#[source] TypeError),

    /// An input document could not be read.
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    /// An input document was not valid JSON.
    #[error("failed to parse {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: TypeError,
    },
}

/// Convenience alias for reconcile results.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
