//! Tree snapshot representation.
//!
//! A [`Node`] is either absent, a scalar leaf, or a container mapping string
//! keys to child nodes in insertion order. JSON documents are materialized with
//! [`Node::from_json`]: objects keep document order, arrays become containers
//! keyed by stringified index, and `null` means "no node here".
//!
//! # Invariants
//!
//! - A [`Container`] never stores an `Absent` child; inserting one removes the key.
//! - Equality ignores key order: two containers are equal when they hold the
//!   same keys with equal children.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use crate::error::TypeResult;

/// A scalar leaf value.
///
/// Numbers keep their JSON representation. Integers compare exactly; a
/// float on either side compares by `f64` value, so `1` equals `1.0`.
#[derive(Clone, Debug)]
pub enum Scalar {
    Bool(bool),
    Number(Number),
    String(String),
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => numbers_eq(a, b),
            (Self::String(a), Self::String(b)) => a == b,
            _ => false,
        }
    }
}

impl Scalar {
    fn to_json(&self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::String(s) => Value::String(s.clone()),
        }
    }
}

/// Numeric equality for JSON numbers.
///
/// Two integers compare exactly, including values past 2^53 that `f64`
/// cannot tell apart. If either side is a float both are compared as `f64`.
pub fn numbers_eq(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return a.as_f64() == b.as_f64();
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.as_u64() == b.as_u64(),
        // Only one side exceeds i64::MAX.
        _ => false,
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s:?}"),
        }
    }
}

/// An insertion-ordered mapping from key to child node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Container {
    entries: IndexMap<String, Node>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the container has no children.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `node`, returning the previous child.
    ///
    /// An existing key keeps its position. Inserting [`Node::Absent`] removes
    /// the key instead.
    pub fn insert(&mut self, key: impl Into<String>, node: Node) -> Option<Node> {
        let key = key.into();
        if node.is_absent() {
            return self.entries.shift_remove(&key);
        }
        self.entries.insert(key, node)
    }

    /// Remove `key`, preserving the order of the remaining children.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    /// Keys in stored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(key, child)` pairs in stored order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Container {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        let mut container = Container::new();
        for (key, node) in iter {
            container.insert(key, node);
        }
        container
    }
}

/// A position in a tree snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Node {
    /// No node exists here.
    #[default]
    Absent,
    /// A scalar value.
    Leaf(Scalar),
    /// An ordered set of keyed children.
    Container(Container),
}

impl Node {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_container(&self) -> bool {
        matches!(self, Self::Container(_))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Leaf(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_container(&self) -> Option<&Container> {
        match self {
            Self::Container(container) => Some(container),
            _ => None,
        }
    }

    /// Look up a descendant by following `path` from this node.
    pub fn get_path(&self, path: &crate::Path) -> Option<&Node> {
        let mut current = self;
        for key in path {
            current = current.as_container()?.get(key)?;
        }
        if current.is_absent() {
            None
        } else {
            Some(current)
        }
    }

    /// Total number of present nodes in this subtree, containers included.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Absent => 0,
            Self::Leaf(_) => 1,
            Self::Container(c) => 1 + c.iter().map(|(_, child)| child.node_count()).sum::<usize>(),
        }
    }

    /// Materialize a JSON value.
    ///
    /// `null` becomes [`Node::Absent`] (and is therefore dropped when nested in
    /// a container), arrays are keyed `"0"`, `"1"`, ... and objects keep their
    /// document order.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Absent,
            Value::Bool(b) => Self::Leaf(Scalar::Bool(*b)),
            Value::Number(n) => Self::Leaf(Scalar::Number(n.clone())),
            Value::String(s) => Self::Leaf(Scalar::String(s.clone())),
            Value::Array(items) => Self::Container(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (i.to_string(), Self::from_json(item)))
                    .collect(),
            ),
            Value::Object(map) => Self::Container(
                map.iter()
                    .map(|(k, v)| (k.as_str(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Parse JSON text and materialize it.
    pub fn from_json_str(text: &str) -> TypeResult<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&value))
    }

    /// Render back to JSON. Containers always become objects.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Absent => Value::Null,
            Self::Leaf(scalar) => scalar.to_json(),
            Self::Container(c) => Value::Object(
                c.iter()
                    .map(|(k, child)| (k.to_string(), child.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Self::Leaf(scalar)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Self::Container(container)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Leaf(Scalar::Bool(b))
    }
}

/// Non-finite values have no JSON form and become [`Node::Absent`], as in
/// `serde_json::Value::from(f64)`.
impl From<f64> for Node {
    fn from(n: f64) -> Self {
        match Number::from_f64(n) {
            Some(n) => Self::Leaf(Scalar::Number(n)),
            None => Self::Absent,
        }
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::Leaf(Scalar::Number(n.into()))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::Leaf(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::Leaf(Scalar::String(s))
    }
}

impl From<&Value> for Node {
    fn from(value: &Value) -> Self {
        Self::from_json(value)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}
