//! Ordered change events produced by one reconciliation.

use arbor_types::{ChangeEvent, ChangeKind, Path};
use serde::{Deserialize, Serialize};

/// The ordered result of reconciling two snapshots.
///
/// Serializes as a plain array of events.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    /// Events in emission order: depth-first, parents before children.
    pub events: Vec<ChangeEvent>,
}

impl ChangeSet {
    /// Create an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the snapshots were equal.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Number of `child_added` events.
    pub fn additions(&self) -> usize {
        self.count(ChangeKind::ChildAdded)
    }

    /// Number of `child_removed` events.
    pub fn removals(&self) -> usize {
        self.count(ChangeKind::ChildRemoved)
    }

    /// Number of `child_changed` events.
    pub fn modifications(&self) -> usize {
        self.count(ChangeKind::ChildChanged)
    }

    fn count(&self, kind: ChangeKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChangeEvent> {
        self.events.iter()
    }

    /// Event locations in emission order.
    pub fn locations(&self) -> impl Iterator<Item = &Path> {
        self.events.iter().map(|e| &e.location)
    }

    pub fn into_events(self) -> Vec<ChangeEvent> {
        self.events
    }
}

impl From<Vec<ChangeEvent>> for ChangeSet {
    fn from(events: Vec<ChangeEvent>) -> Self {
        Self { events }
    }
}

impl IntoIterator for ChangeSet {
    type Item = ChangeEvent;
    type IntoIter = std::vec::IntoIter<ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a ChangeEvent;
    type IntoIter = std::slice::Iter<'a, ChangeEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
