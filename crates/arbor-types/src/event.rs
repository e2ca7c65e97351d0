use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// The kind of difference recorded at a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// The node did not exist before and exists now.
    ChildAdded,
    /// The node existed before and no longer exists.
    ChildRemoved,
    /// The node exists on both sides but differs.
    ChildChanged,
}

impl ChangeKind {
    /// The wire name (`child_added`, `child_removed`, `child_changed`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildAdded => "child_added",
            Self::ChildRemoved => "child_removed",
            Self::ChildChanged => "child_changed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single structural change between two snapshots.
///
/// Events never carry the old or new value: only what happened and where.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEvent {
    #[serde(rename = "type")]
    pub kind: ChangeKind,
    pub location: Path,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, location: Path) -> Self {
        Self { kind, location }
    }

    pub fn added(location: Path) -> Self {
        Self::new(ChangeKind::ChildAdded, location)
    }

    pub fn removed(location: Path) -> Self {
        Self::new(ChangeKind::ChildRemoved, location)
    }

    pub fn changed(location: Path) -> Self {
        Self::new(ChangeKind::ChildChanged, location)
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.location)
    }
}
