use std::fmt;

use arbor_types::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, ReconcileResult};

/// How the reconciler walks the two trees.
///
/// Both strategies emit identical event lists for every input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Traversal {
    /// Native recursion, one call frame per tree level.
    #[default]
    Recursive,
    /// An explicit heap-allocated stack of pending frames. Suited to very
    /// deep trees.
    WorkStack,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recursive => write!(f, "recursive"),
            Self::WorkStack => write!(f, "work-stack"),
        }
    }
}

/// Configuration for a [`Reconciler`](crate::Reconciler).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Path the two snapshots are rooted at. Every emitted location is
    /// prefixed with it.
    pub root: Path,
    /// Traversal strategy.
    pub traversal: Traversal,
}

impl ReconcileConfig {
    pub fn with_root(mut self, root: Path) -> Self {
        self.root = root;
        self
    }

    /// Set the root from a pointer string such as `/nested/tree`.
    pub fn with_root_str(self, root: &str) -> ReconcileResult<Self> {
        let root = Path::parse(root).map_err(ReconcileError::InvalidRoot)?;
        Ok(self.with_root(root))
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }
}
