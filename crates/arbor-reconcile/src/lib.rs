//! Reconciliation engine for Arbor.
//!
//! Compares an old and a new snapshot of a keyed tree and produces the ordered
//! list of structural change events between them: one `child_changed` per
//! differing node present on both sides, and one `child_added` /
//! `child_removed` per node of every subtree that appeared or disappeared.
//! Events are emitted depth-first, parents before children, old keys before
//! new-only keys.
//!
//! # Key Types
//!
//! - [`Reconciler`] -- Configured entry point producing a [`ChangeSet`]
//! - [`reconcile`] -- Free function over the tree root returning the raw event list
//! - [`TreeNode`] -- The three capabilities the engine needs from a tree
//! - [`ReconcileConfig`] / [`Traversal`] -- Root path and traversal strategy

pub mod changeset;
pub mod config;
pub mod document;
pub mod equality;
pub mod error;
pub mod reconciler;
pub mod tree;

pub use changeset::ChangeSet;
pub use config::{ReconcileConfig, Traversal};
pub use document::DocumentSource;
pub use equality::tree_eq;
pub use error::{ReconcileError, ReconcileResult};
pub use reconciler::{reconcile, Reconciler};
pub use tree::{NodeKind, TreeNode};
