//! Progressive tree node types
//!
//! A node is either a [`LeafNode`] carrying one key/payload pair or an
//! [`InternalNode`] with exactly two children. Dispatch is a plain `match`
//! over the closed [`Node`] enum.

mod internal;
mod leaf;

pub use internal::InternalNode;
pub use leaf::LeafNode;

use crate::{bits, CoreError, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// An element of a Progressive Hashing tree
pub enum Node<V> {
    /// Terminal element: one key, one payload
    Leaf(LeafNode<V>),
    /// Branch element: two children split on one bit
    Internal(InternalNode<V>),
}

impl<V> Node<V> {
    /// Create a leaf node
    pub fn leaf(key: u64, payload: Arc<V>) -> Self {
        Node::Leaf(LeafNode::new(key, payload))
    }

    /// The key associated with this node.
    ///
    /// For a leaf this is its stored key; for an internal node it is the
    /// prefix shared by its subtree, which is not meaningful for lookups.
    pub fn key(&self) -> u64 {
        match self {
            Node::Leaf(leaf) => leaf.key(),
            Node::Internal(internal) => internal.key(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Node::Internal(_))
    }

    /// Check if this is a leaf carrying `key`
    pub fn is_leaf_with_key(&self, key: u64) -> bool {
        matches!(self, Node::Leaf(leaf) if leaf.key() == key)
    }

    pub fn as_leaf(&self) -> Option<&LeafNode<V>> {
        match self {
            Node::Leaf(leaf) => Some(leaf),
            Node::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalNode<V>> {
        match self {
            Node::Internal(internal) => Some(internal),
            Node::Leaf(_) => None,
        }
    }

    /// Look up the payload stored under `key` in this subtree
    pub fn find(&self, key: u64) -> Option<&Arc<V>> {
        match self {
            Node::Leaf(leaf) if leaf.key() == key => Some(leaf.payload()),
            Node::Leaf(_) => None,
            Node::Internal(internal) => internal.find(key),
        }
    }

    pub(crate) fn find_leaf_mut(&mut self, key: u64) -> Option<&mut LeafNode<V>> {
        match self {
            Node::Leaf(leaf) if leaf.key() == key => Some(leaf),
            Node::Leaf(_) => None,
            Node::Internal(internal) => internal.find_leaf_mut(key),
        }
    }

    /// Insert or replace `key`, returning the rebuilt subtree and the
    /// payload that was replaced.
    ///
    /// When `key` cannot live in this subtree (a leaf with another key, or
    /// an internal node whose prefix `key` does not share), the subtree and a
    /// new leaf are joined under a fresh internal node at the first bit where
    /// they diverge.
    pub(crate) fn insert(self, key: u64, payload: Arc<V>) -> (Self, Option<Arc<V>>) {
        match self {
            Node::Leaf(mut leaf) => match bits::divergence_depth(leaf.key(), key) {
                None => {
                    trace!(key, "replacing payload in place");
                    let replaced = leaf.replace_payload(payload);
                    (Node::Leaf(leaf), Some(replaced))
                }
                Some(depth) => {
                    debug!(key, depth, "splitting leaf");
                    let split =
                        InternalNode::join(depth, Node::Leaf(leaf), Node::leaf(key, payload));
                    (Node::Internal(split), None)
                }
            },
            Node::Internal(internal) => match internal.divergence(key) {
                None => internal.insert(key, payload),
                Some(depth) => {
                    debug!(
                        key,
                        depth,
                        below = internal.depth(),
                        "splicing above internal node"
                    );
                    let splice = InternalNode::join(
                        depth,
                        Node::Internal(internal),
                        Node::leaf(key, payload),
                    );
                    (Node::Internal(splice), None)
                }
            },
        }
    }

    /// Remove `key`, returning what is left of this subtree (nothing if this
    /// was the matching leaf) and the removed payload.
    pub(crate) fn remove(self, key: u64) -> (Option<Self>, Option<Arc<V>>) {
        match self {
            Node::Leaf(leaf) if leaf.key() == key => (None, Some(leaf.into_payload())),
            Node::Internal(internal) if internal.covers(key) => {
                let (node, removed) = internal.remove(key);
                (Some(node), removed)
            }
            other => (Some(other), None),
        }
    }

    /// Number of internal levels on the longest path below this node
    pub fn height(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(internal) => {
                1 + internal.child_zero().height().max(internal.child_one().height())
            }
        }
    }

    /// Count `(leaves, internal_nodes)` in this subtree
    pub(crate) fn tally(&self) -> (usize, usize) {
        match self {
            Node::Leaf(_) => (1, 0),
            Node::Internal(internal) => {
                let (zero_leaves, zero_internal) = internal.child_zero().tally();
                let (one_leaves, one_internal) = internal.child_one().tally();
                (zero_leaves + one_leaves, zero_internal + one_internal + 1)
            }
        }
    }

    /// Walk the subtree checking routing and depth ordering, returning the
    /// number of leaves reached.
    pub(crate) fn validate(&self, parent_depth: Option<u16>, path: &str) -> Result<usize> {
        let internal = match self {
            Node::Leaf(_) => return Ok(1),
            Node::Internal(internal) => internal,
        };

        let depth = internal.depth();
        if depth >= bits::KEY_BITS {
            return Err(CoreError::TreeCorruption(format!(
                "{path}: depth {depth} exceeds key width"
            )));
        }
        if parent_depth.is_some_and(|parent| depth <= parent) {
            return Err(CoreError::TreeCorruption(format!(
                "{path}: depth {depth} does not increase below its parent"
            )));
        }
        if internal.key() & !bits::prefix_mask(depth) != 0 {
            return Err(CoreError::TreeCorruption(format!(
                "{path}: prefix {:#018x} has bits at or below the tested bit",
                internal.key()
            )));
        }

        let sides = [
            (internal.child_zero(), false, "childZero"),
            (internal.child_one(), true, "childOne"),
        ];
        let mut leaves = 0;
        for (child, one, side) in sides {
            let child_path = format!("{path}.{side}");
            if bits::is_one(child.key(), depth) != one || !internal.covers(child.key()) {
                return Err(CoreError::TreeCorruption(format!(
                    "{child_path}: key {:#018x} is routed to the wrong bucket",
                    child.key()
                )));
            }
            leaves += child.validate(Some(depth), &child_path)?;
        }
        Ok(leaves)
    }
}

impl<V> Clone for Node<V> {
    fn clone(&self) -> Self {
        match self {
            Node::Leaf(leaf) => Node::Leaf(leaf.clone()),
            Node::Internal(internal) => Node::Internal(internal.clone()),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Node<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf(leaf) => leaf.fmt(f),
            Node::Internal(internal) => internal.fmt(f),
        }
    }
}
