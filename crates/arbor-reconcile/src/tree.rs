//! The tree abstraction the reconciler traverses.
//!
//! The engine only needs to know what kind of node it is looking at, how to
//! enumerate a container's children in stored order, and how to compare two
//! leaves. [`TreeNode`] captures exactly that, and is implemented for
//! [`arbor_types::Node`] and for `serde_json::Value` so parsed JSON can be
//! reconciled without materializing it first.

use std::borrow::Cow;

use arbor_types::{numbers_eq, Node};
use serde_json::Value;

/// Discriminant of a tree position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Absent,
    Leaf,
    Container,
}

/// Ordered children of a container: `(key, child)` pairs.
pub type Children<'a, T> = Box<dyn Iterator<Item = (Cow<'a, str>, &'a T)> + 'a>;

/// A read-only view of a keyed tree.
///
/// Implementations must never yield an absent child from [`children`] or
/// [`child`]: a key mapped to nothing is treated as a key that is not there.
///
/// [`children`]: TreeNode::children
/// [`child`]: TreeNode::child
pub trait TreeNode: Sized {
    fn kind(&self) -> NodeKind;

    /// Present children in stored order. Empty for leaves and absent nodes.
    fn children(&self) -> Children<'_, Self>;

    /// The present child under `key`, if any.
    fn child(&self, key: &str) -> Option<&Self>;

    /// Number of present children.
    fn child_count(&self) -> usize {
        self.children().count()
    }

    /// Scalar equality. Only called when both sides are leaves.
    fn leaf_eq(&self, other: &Self) -> bool;
}

impl TreeNode for Node {
    fn kind(&self) -> NodeKind {
        match self {
            Node::Absent => NodeKind::Absent,
            Node::Leaf(_) => NodeKind::Leaf,
            Node::Container(_) => NodeKind::Container,
        }
    }

    fn children(&self) -> Children<'_, Self> {
        match self.as_container() {
            Some(container) => Box::new(
                container
                    .iter()
                    .filter(|(_, child)| !child.is_absent())
                    .map(|(key, child)| (Cow::Borrowed(key), child)),
            ),
            None => Box::new(std::iter::empty()),
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        self.as_container()?.get(key).filter(|c| !c.is_absent())
    }

    fn child_count(&self) -> usize {
        self.as_container().map_or(0, |c| c.len())
    }

    fn leaf_eq(&self, other: &Self) -> bool {
        self.as_scalar() == other.as_scalar()
    }
}

impl TreeNode for Value {
    fn kind(&self) -> NodeKind {
        match self {
            Value::Null => NodeKind::Absent,
            Value::Array(_) | Value::Object(_) => NodeKind::Container,
            _ => NodeKind::Leaf,
        }
    }

    fn children(&self) -> Children<'_, Self> {
        match self {
            Value::Array(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| !item.is_null())
                    .map(|(i, item)| (Cow::Owned(i.to_string()), item)),
            ),
            Value::Object(map) => Box::new(
                map.iter()
                    .filter(|(_, v)| !v.is_null())
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v)),
            ),
            _ => Box::new(std::iter::empty()),
        }
    }

    fn child(&self, key: &str) -> Option<&Self> {
        let found = match self {
            Value::Array(items) => parse_index(key).and_then(|i| items.get(i)),
            Value::Object(map) => map.get(key),
            _ => None,
        };
        found.filter(|v| !v.is_null())
    }

    fn leaf_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => numbers_eq(a, b),
            _ => false,
        }
    }
}

/// Array keys are canonical decimal indexes: `"01"` does not address element 1.
fn parse_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    if index.to_string() == key {
        Some(index)
    } else {
        None
    }
}
