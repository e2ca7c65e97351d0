//! The reconciliation algorithm.
//!
//! Given an old and a new snapshot at the same position, the reconciler
//! classifies every difference as an addition, a removal, or a change:
//!
//! 1. Equal subtrees produce nothing, at any depth.
//! 2. If only the new side exists, the whole new subtree is enumerated as
//!    `child_added`, parent first.
//! 3. If only the old side exists, the whole old subtree is enumerated as
//!    `child_removed`, parent first.
//! 4. Otherwise a single `child_changed` is emitted at the path. When both
//!    sides are containers the walk continues over the old keys in stored
//!    order, then over the keys that only exist in the new container. A leaf
//!    on either side (including a leaf replaced by a container or the other
//!    way round) stops the walk there.
//!
//! # Invariants
//!
//! - Every differing path appears exactly once.
//! - An event at `p` precedes every event at a path below `p`.
//! - [`Traversal::Recursive`] and [`Traversal::WorkStack`] emit identical lists.

use arbor_types::{ChangeEvent, ChangeKind, Path};
use tracing::{debug, trace};

use crate::changeset::ChangeSet;
use crate::config::{ReconcileConfig, Traversal};
use crate::equality::tree_eq;
use crate::tree::{NodeKind, TreeNode};

/// Reconcile two snapshots from the tree root with the default strategy.
pub fn reconcile<T: TreeNode>(old: &T, new: &T) -> Vec<ChangeEvent> {
    Reconciler::default().reconcile(old, new).into_events()
}

/// Produces ordered change events between two tree snapshots.
///
/// Holds only configuration: every call is independent and never mutates
/// either input, so one reconciler can be shared across threads.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    config: ReconcileConfig,
}

impl Reconciler {
    pub fn new(config: ReconcileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Reconcile `old` against `new`, with locations prefixed by the
    /// configured root.
    pub fn reconcile<T: TreeNode>(&self, old: &T, new: &T) -> ChangeSet {
        self.reconcile_at(old, new, &self.config.root)
    }

    /// Reconcile `old` against `new`, with locations prefixed by `root`.
    pub fn reconcile_at<T: TreeNode>(&self, old: &T, new: &T, root: &Path) -> ChangeSet {
        let mut events = Vec::new();
        match self.config.traversal {
            Traversal::Recursive => {
                let mut path = root.clone();
                diff(old, new, &mut path, &mut events);
            }
            Traversal::WorkStack => walk(old, new, root.clone(), &mut events),
        }

        debug!(
            traversal = %self.config.traversal,
            root = %root,
            events = events.len(),
            "reconciled snapshots"
        );
        ChangeSet::from(events)
    }
}

// ---------------------------------------------------------------
// Recursive traversal
// ---------------------------------------------------------------

// Each visited pair runs a full `tree_eq`, so a chain differing only at the
// bottom costs O(depth^2). Accepted to keep emission order exact.
fn diff<T: TreeNode>(old: &T, new: &T, path: &mut Path, out: &mut Vec<ChangeEvent>) {
    if tree_eq(old, new) {
        return;
    }

    match (old.kind(), new.kind()) {
        (NodeKind::Absent, _) => enumerate(new, ChangeKind::ChildAdded, path, out),
        (_, NodeKind::Absent) => enumerate(old, ChangeKind::ChildRemoved, path, out),
        (NodeKind::Container, NodeKind::Container) => {
            out.push(ChangeEvent::changed(path.clone()));

            for (key, old_child) in old.children() {
                path.push(key.as_ref());
                match new.child(&key) {
                    Some(new_child) => diff(old_child, new_child, path, out),
                    None => enumerate(old_child, ChangeKind::ChildRemoved, path, out),
                }
                path.pop();
            }

            for (key, new_child) in new.children() {
                if old.child(&key).is_none() {
                    path.push(key.as_ref());
                    enumerate(new_child, ChangeKind::ChildAdded, path, out);
                    path.pop();
                }
            }
        }
        // A leaf on either side: one event, no descent.
        _ => out.push(ChangeEvent::changed(path.clone())),
    }
}

fn enumerate<T: TreeNode>(node: &T, kind: ChangeKind, path: &mut Path, out: &mut Vec<ChangeEvent>) {
    if node.kind() == NodeKind::Absent {
        return;
    }

    out.push(ChangeEvent::new(kind, path.clone()));
    for (key, child) in node.children() {
        path.push(key.as_ref());
        enumerate(child, kind, path, out);
        path.pop();
    }
}

// ---------------------------------------------------------------
// Work-stack traversal
// ---------------------------------------------------------------

/// A pending unit of work. Frames are popped in emission order.
enum Frame<'t, T> {
    Diff { old: &'t T, new: &'t T, path: Path },
    Enumerate { node: &'t T, kind: ChangeKind, path: Path },
}

fn walk<'t, T: TreeNode>(old: &'t T, new: &'t T, root: Path, out: &mut Vec<ChangeEvent>) {
    let mut stack = vec![Frame::Diff { old, new, path: root }];
    let mut children: Vec<Frame<'t, T>> = Vec::new();

    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Diff { old, new, path } => {
                trace!(path = %path, "diff frame");
                if tree_eq(old, new) {
                    continue;
                }
                match (old.kind(), new.kind()) {
                    (NodeKind::Absent, _) => stack.push(Frame::Enumerate {
                        node: new,
                        kind: ChangeKind::ChildAdded,
                        path,
                    }),
                    (_, NodeKind::Absent) => stack.push(Frame::Enumerate {
                        node: old,
                        kind: ChangeKind::ChildRemoved,
                        path,
                    }),
                    (NodeKind::Container, NodeKind::Container) => {
                        for (key, old_child) in old.children() {
                            let child_path = path.child(key.as_ref());
                            children.push(match new.child(&key) {
                                Some(new_child) => Frame::Diff {
                                    old: old_child,
                                    new: new_child,
                                    path: child_path,
                                },
                                None => Frame::Enumerate {
                                    node: old_child,
                                    kind: ChangeKind::ChildRemoved,
                                    path: child_path,
                                },
                            });
                        }
                        for (key, new_child) in new.children() {
                            if old.child(&key).is_none() {
                                children.push(Frame::Enumerate {
                                    node: new_child,
                                    kind: ChangeKind::ChildAdded,
                                    path: path.child(key.as_ref()),
                                });
                            }
                        }
                        out.push(ChangeEvent::changed(path));
                        stack.extend(children.drain(..).rev());
                    }
                    _ => out.push(ChangeEvent::changed(path)),
                }
            }
            Frame::Enumerate { node, kind, path } => {
                trace!(path = %path, %kind, "enumerate frame");
                if node.kind() == NodeKind::Absent {
                    continue;
                }
                children.extend(node.children().map(|(key, child)| Frame::Enumerate {
                    node: child,
                    kind,
                    path: path.child(key.as_ref()),
                }));
                out.push(ChangeEvent::new(kind, path));
                stack.extend(children.drain(..).rev());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::Node;
    use serde_json::{json, Value};

    const STRATEGIES: [Traversal; 2] = [Traversal::Recursive, Traversal::WorkStack];

    fn node(value: Value) -> Node {
        Node::from_json(&value)
    }

    fn event(kind: &str, location: &[&str]) -> ChangeEvent {
        let kind = match kind {
            "child_added" => ChangeKind::ChildAdded,
            "child_removed" => ChangeKind::ChildRemoved,
            "child_changed" => ChangeKind::ChildChanged,
            other => panic!("unknown kind {other}"),
        };
        ChangeEvent::new(kind, Path::from(location))
    }

    /// Runs every strategy on both input representations and checks they agree.
    fn run(old: Value, new: Value) -> Vec<ChangeEvent> {
        let expected = reconcile(&node(old.clone()), &node(new.clone()));
        for traversal in STRATEGIES {
            let reconciler = Reconciler::new(ReconcileConfig::default().with_traversal(traversal));
            assert_eq!(
                reconciler.reconcile(&node(old.clone()), &node(new.clone())).events,
                expected,
                "{traversal} over Node"
            );
            assert_eq!(
                reconciler.reconcile(&old, &new).events,
                expected,
                "{traversal} over Value"
            );
        }
        expected
    }

    fn tree(depth: u8) -> Value {
        match depth {
            1 => json!(null),
            2 => json!({ "value": "fake" }),
            3 => json!({ "value": "fake", "foo": "bar" }),
            4 => json!({ "value": "fake", "foo": "bar", "nested": { "tree": { "graph": "value" } } }),
            5 => json!({
                "value": "fake",
                "foo": "bar",
                "nested": { "tree": { "graph": "value" }, "node": "bird" }
            }),
            _ => unreachable!(),
        }
    }

    #[test]
    fn absent_inputs_do_not_fail() {
        assert!(run(json!(null), json!(null)).is_empty());
        assert!(!run(json!({ "foo": "bar" }), json!(null)).is_empty());
        assert!(!run(json!(null), json!({ "foo": "bar" })).is_empty());
        assert!(run(json!({ "foo": "bar" }), json!({ "foo": "bar" })).is_empty());
    }

    #[test]
    fn equal_trees_of_any_depth_produce_nothing() {
        for t in [
            json!({ "value": "fake" }),
            json!({ "value": "fake", "nested": { "graph": "node" } }),
            json!({ "value": "fake", "nested": { "foo": { "bar": "node" } } }),
        ] {
            assert!(run(t.clone(), t).is_empty());
        }
    }

    #[test]
    fn add_root_tree() {
        assert_eq!(
            run(tree(1), tree(2)),
            vec![event("child_added", &[]), event("child_added", &["value"])]
        );
    }

    #[test]
    fn add_sibling_leaf() {
        assert_eq!(
            run(tree(2), tree(3)),
            vec![event("child_changed", &[]), event("child_added", &["foo"])]
        );
    }

    #[test]
    fn add_nested_subtree() {
        assert_eq!(
            run(tree(3), tree(4)),
            vec![
                event("child_changed", &[]),
                event("child_added", &["nested"]),
                event("child_added", &["nested", "tree"]),
                event("child_added", &["nested", "tree", "graph"]),
            ]
        );
    }

    #[test]
    fn add_leaf_in_nested_container() {
        assert_eq!(
            run(tree(4), tree(5)),
            vec![
                event("child_changed", &[]),
                event("child_changed", &["nested"]),
                event("child_added", &["nested", "node"]),
            ]
        );
    }

    #[test]
    fn remove_leaf_in_nested_container() {
        assert_eq!(
            run(tree(5), tree(4)),
            vec![
                event("child_changed", &[]),
                event("child_changed", &["nested"]),
                event("child_removed", &["nested", "node"]),
            ]
        );
    }

    #[test]
    fn remove_nested_subtree() {
        assert_eq!(
            run(tree(4), tree(3)),
            vec![
                event("child_changed", &[]),
                event("child_removed", &["nested"]),
                event("child_removed", &["nested", "tree"]),
                event("child_removed", &["nested", "tree", "graph"]),
            ]
        );
    }

    #[test]
    fn remove_sibling_leaf() {
        assert_eq!(
            run(tree(3), tree(2)),
            vec![event("child_changed", &[]), event("child_removed", &["foo"])]
        );
    }

    #[test]
    fn remove_root_tree() {
        assert_eq!(
            run(tree(2), tree(1)),
            vec![event("child_removed", &[]), event("child_removed", &["value"])]
        );
    }

    #[test]
    fn arrays_are_containers() {
        assert!(run(json!([0, 1, 2]), json!({ "0": 0, "1": 1, "2": 2 })).is_empty());
    }

    #[test]
    fn array_element_changes_use_index_keys() {
        assert_eq!(
            run(json!({ "list": [1, 2] }), json!({ "list": [1, 3, 4] })),
            vec![
                event("child_changed", &[]),
                event("child_changed", &["list"]),
                event("child_changed", &["list", "1"]),
                event("child_added", &["list", "2"]),
            ]
        );
    }

    #[test]
    fn changed_leaf_emits_single_event() {
        assert_eq!(
            run(json!({ "a": 1 }), json!({ "a": 2 })),
            vec![event("child_changed", &[]), event("child_changed", &["a"])]
        );
        assert_eq!(run(json!("x"), json!("y")), vec![event("child_changed", &[])]);
    }

    #[test]
    fn integers_beyond_f64_precision_are_distinct() {
        assert_eq!(
            run(
                json!({ "id": 9007199254740993u64 }),
                json!({ "id": 9007199254740992u64 })
            ),
            vec![event("child_changed", &[]), event("child_changed", &["id"])]
        );
        assert!(run(json!({ "n": 1 }), json!({ "n": 1.0 })).is_empty());
    }

    #[test]
    fn shape_change_collapses_to_single_change() {
        assert_eq!(
            run(json!({ "a": "leaf" }), json!({ "a": { "b": 1 } })),
            vec![event("child_changed", &[]), event("child_changed", &["a"])]
        );
        assert_eq!(
            run(json!({ "a": { "b": 1 } }), json!({ "a": "leaf" })),
            vec![event("child_changed", &[]), event("child_changed", &["a"])]
        );
        assert_eq!(run(json!(7), json!([7])), vec![event("child_changed", &[])]);
    }

    #[test]
    fn old_keys_before_new_only_keys() {
        assert_eq!(
            run(
                json!({ "b": 1, "gone": 1, "a": 1 }),
                json!({ "new": 1, "a": 2, "b": 2 })
            ),
            vec![
                event("child_changed", &[]),
                event("child_changed", &["b"]),
                event("child_removed", &["gone"]),
                event("child_changed", &["a"]),
                event("child_added", &["new"]),
            ]
        );
    }

    #[test]
    fn new_only_keys_follow_new_order() {
        assert_eq!(
            run(json!({}), json!({ "z": 1, "y": { "x": 1 } })),
            vec![
                event("child_changed", &[]),
                event("child_added", &["z"]),
                event("child_added", &["y"]),
                event("child_added", &["y", "x"]),
            ]
        );
    }

    #[test]
    fn key_order_alone_is_not_a_change() {
        assert!(run(json!({ "a": 1, "b": 2 }), json!({ "b": 2, "a": 1 })).is_empty());
    }

    #[test]
    fn null_member_counts_as_missing() {
        assert_eq!(
            run(json!({ "a": null }), json!({ "a": 1 })),
            vec![event("child_changed", &[]), event("child_added", &["a"])]
        );
        assert!(run(json!({ "a": null }), json!({})).is_empty());
    }

    #[test]
    fn root_prefixes_locations() {
        for traversal in STRATEGIES {
            let config = ReconcileConfig::default()
                .with_traversal(traversal)
                .with_root(Path::from(["doc"]));
            let events = Reconciler::new(config).reconcile(&tree(2), &tree(3));
            assert_eq!(
                events.events,
                vec![
                    event("child_changed", &["doc"]),
                    event("child_added", &["doc", "foo"]),
                ]
            );
        }
    }

    #[test]
    fn reconcile_at_overrides_configured_root() {
        let reconciler = Reconciler::default();
        let events = reconciler.reconcile_at(&tree(1), &tree(2), &Path::from(["a", "b"]));
        assert_eq!(
            events.events,
            vec![
                event("child_added", &["a", "b"]),
                event("child_added", &["a", "b", "value"]),
            ]
        );
    }

    #[test]
    fn work_stack_handles_deep_chains() {
        let depth = 2_000;
        let mut deep = Node::from("bottom");
        for _ in 0..depth {
            deep = Node::Container([("n", deep)].into_iter().collect());
        }

        let reconciler =
            Reconciler::new(ReconcileConfig::default().with_traversal(Traversal::WorkStack));
        let added = reconciler.reconcile(&Node::Absent, &deep);
        assert_eq!(added.len(), depth + 1);
        assert_eq!(added.additions(), depth + 1);
        assert_eq!(added.events[depth].location.len(), depth);
    }

    #[test]
    fn reconciler_is_shareable_across_threads() {
        let reconciler = std::sync::Arc::new(Reconciler::default());
        let old = std::sync::Arc::new(node(tree(4)));
        let new = std::sync::Arc::new(node(tree(5)));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let (reconciler, old, new) = (reconciler.clone(), old.clone(), new.clone());
                std::thread::spawn(move || reconciler.reconcile(&*old, &*new))
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().len(), 3);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use std::collections::HashSet;

        fn arb_node() -> impl Strategy<Value = Node> {
            let leaf = prop_oneof![
                any::<bool>().prop_map(Node::from),
                (-3i64..3).prop_map(Node::from),
                "[a-c]{0,2}".prop_map(Node::from),
            ];
            leaf.prop_recursive(4, 48, 4, |inner| {
                prop::collection::vec(("[a-e]", inner), 0..5)
                    .prop_map(|entries| Node::Container(entries.into_iter().collect()))
            })
        }

        proptest! {
            #[test]
            fn reflexive(t in arb_node()) {
                prop_assert!(reconcile(&t, &t).is_empty());
            }

            #[test]
            fn add_remove_symmetry(t in arb_node()) {
                let added = reconcile(&Node::Absent, &t);
                let removed = reconcile(&t, &Node::Absent);
                prop_assert_eq!(added.len(), t.node_count());
                prop_assert_eq!(added.len(), removed.len());
                for (a, r) in added.iter().zip(&removed) {
                    prop_assert_eq!(&a.location, &r.location);
                    prop_assert_eq!(a.kind, ChangeKind::ChildAdded);
                    prop_assert_eq!(r.kind, ChangeKind::ChildRemoved);
                }
            }

            #[test]
            fn parents_precede_descendants(old in arb_node(), new in arb_node()) {
                let events = reconcile(&old, &new);
                for (i, earlier) in events.iter().enumerate() {
                    for later in &events[i + 1..] {
                        prop_assert!(!later.location.is_ancestor_of(&earlier.location));
                    }
                }
            }

            #[test]
            fn one_event_per_path(old in arb_node(), new in arb_node()) {
                let events = reconcile(&old, &new);
                let unique: HashSet<_> = events.iter().map(|e| &e.location).collect();
                prop_assert_eq!(unique.len(), events.len());
            }

            #[test]
            fn empty_iff_equal(old in arb_node(), new in arb_node()) {
                prop_assert_eq!(reconcile(&old, &new).is_empty(), old == new);
            }

            #[test]
            fn strategies_agree(old in arb_node(), new in arb_node()) {
                let stack = Reconciler::new(
                    ReconcileConfig::default().with_traversal(Traversal::WorkStack),
                );
                prop_assert_eq!(stack.reconcile(&old, &new).events, reconcile(&old, &new));
            }

            #[test]
            fn json_values_agree_with_nodes(old in arb_node(), new in arb_node()) {
                prop_assert_eq!(
                    reconcile(&old.to_json(), &new.to_json()),
                    reconcile(&old, &new)
                );
            }
        }
    }
}
