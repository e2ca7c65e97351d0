//! Deep structural equality over any [`TreeNode`].
//!
//! Uses an explicit stack of pending pairs, so comparison depth is bounded by
//! heap rather than by the native call stack.

use crate::tree::{NodeKind, TreeNode};

/// Returns `true` if `a` and `b` describe the same tree.
///
/// Both absent, both leaves with equal scalars, or both containers with the
/// same key set and pairwise equal children. Key order is ignored.
pub fn tree_eq<T: TreeNode>(a: &T, b: &T) -> bool {
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        match (a.kind(), b.kind()) {
            (NodeKind::Absent, NodeKind::Absent) => {}
            (NodeKind::Leaf, NodeKind::Leaf) => {
                if !a.leaf_eq(b) {
                    return false;
                }
            }
            (NodeKind::Container, NodeKind::Container) => {
                if a.child_count() != b.child_count() {
                    return false;
                }
                for (key, a_child) in a.children() {
                    match b.child(&key) {
                        Some(b_child) => pending.push((a_child, b_child)),
                        None => return false,
                    }
                }
            }
            _ => return false,
        }
    }

    true
}
