//! Foundation types for Arbor.
//!
//! This crate provides the tree and event vocabulary shared by every Arbor
//! crate: the [`Node`] snapshot representation, the [`Path`] locating a node
//! relative to a root, and the [`ChangeEvent`] records produced when two
//! snapshots are reconciled.
//!
//! # Key Types
//!
//! - [`Node`] -- `Absent`, `Leaf(Scalar)` or `Container`
//! - [`Container`] -- Insertion-ordered key to child mapping (arrays keyed by index)
//! - [`Scalar`] -- Boolean, number, or string leaf value
//! - [`Path`] -- Ordered key sequence from the root to a node
//! - [`ChangeEvent`] / [`ChangeKind`] -- One addition, removal, or change at a path

pub mod error;
pub mod event;
pub mod node;
pub mod path;

pub use error::{TypeError, TypeResult};
pub use event::{ChangeEvent, ChangeKind};
pub use node::{numbers_eq, Container, Node, Scalar};
pub use path::Path;
