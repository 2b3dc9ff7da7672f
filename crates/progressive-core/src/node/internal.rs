//! Branch element of a Progressive Hashing tree
//!
//! An internal node is a container for two buckets, `child_zero` and
//! `child_one`. A key is routed into one of them by testing a single bit:
//! the bit selected by the node's depth. Any bucket that would hold more
//! than one key is itself an internal node testing a lower bit, so routing
//! is fully deterministic and stops once every bucket holds one leaf.
//!
//! ## Layout
//!
//! ```text
//!            Internal { depth: 0, tests bit 63 }
//!             /                          \
//!     bit 63 == 0                    bit 63 == 1
//!   Internal { depth: 1 }           Leaf(0x8000…)
//!    /              \
//! Leaf(0x0000…)  Leaf(0x4000…)
//! ```
//!
//! Levels where every key below agrees are never materialized: a node is
//! created at the first bit where its two sides actually diverge. The bits
//! above that position are shared by the whole subtree and kept as the
//! node's `prefix`, which is also the value reported by [`InternalNode::key`].

use super::{LeafNode, Node};
use crate::bits;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A branch with exactly two children, splitting on one bit of the key.
pub struct InternalNode<V> {
    /// Distance from the top of the key: depth `d` tests bit `63 - d`
    depth: u16,
    /// Bits above the tested one shared by every key in this subtree
    prefix: u64,
    child_zero: Box<Node<V>>,
    child_one: Box<Node<V>>,
}

impl<V> InternalNode<V> {
    /// Build a node at `depth` from children already placed on their sides.
    pub(crate) fn from_children(depth: u16, child_zero: Node<V>, child_one: Node<V>) -> Self {
        debug_assert!(!bits::is_one(child_zero.key(), depth));
        debug_assert!(bits::is_one(child_one.key(), depth));
        Self {
            depth,
            prefix: child_zero.key() & bits::prefix_mask(depth),
            child_zero: Box::new(child_zero),
            child_one: Box::new(child_one),
        }
    }

    /// Build a node at `depth` over two subtrees that diverge there,
    /// placing each on the side its key selects.
    pub(crate) fn join(depth: u16, first: Node<V>, second: Node<V>) -> Self {
        if bits::is_one(first.key(), depth) {
            Self::from_children(depth, second, first)
        } else {
            Self::from_children(depth, first, second)
        }
    }

    /// Node depth (0 tests the most significant bit)
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// The single bit this node tests
    pub fn bit_mask(&self) -> u64 {
        bits::bit_mask(self.depth)
    }

    /// Shared high bits of the subtree; carried for structural symmetry
    pub fn key(&self) -> u64 {
        self.prefix
    }

    pub fn child_zero(&self) -> &Node<V> {
        &self.child_zero
    }

    pub fn child_one(&self) -> &Node<V> {
        &self.child_one
    }

    /// The child bucket `key` is routed into
    pub fn child_for(&self, key: u64) -> &Node<V> {
        if bits::is_one(key, self.depth) {
            &self.child_one
        } else {
            &self.child_zero
        }
    }

    fn child_for_mut(&mut self, key: u64) -> &mut Node<V> {
        if bits::is_one(key, self.depth) {
            &mut self.child_one
        } else {
            &mut self.child_zero
        }
    }

    pub fn child_zero_is_internal(&self) -> bool {
        self.child_zero.is_internal()
    }

    pub fn child_one_is_internal(&self) -> bool {
        self.child_one.is_internal()
    }

    pub fn both_children_are_internal(&self) -> bool {
        self.child_zero_is_internal() && self.child_one_is_internal()
    }

    pub fn child_zero_is_leaf_with_key(&self, key: u64) -> bool {
        self.child_zero.is_leaf_with_key(key)
    }

    pub fn child_one_is_leaf_with_key(&self, key: u64) -> bool {
        self.child_one.is_leaf_with_key(key)
    }

    /// Whether `key` shares this subtree's prefix and could live below it
    pub fn covers(&self, key: u64) -> bool {
        self.divergence(key).is_none()
    }

    /// Depth above this node at which `key` leaves the subtree's prefix.
    pub(crate) fn divergence(&self, key: u64) -> Option<u16> {
        bits::divergence_depth(self.prefix, key & bits::prefix_mask(self.depth))
    }

    /// Look up the payload stored under `key`
    pub fn find(&self, key: u64) -> Option<&Arc<V>> {
        if !self.covers(key) {
            return None;
        }
        self.child_for(key).find(key)
    }

    pub(crate) fn find_leaf_mut(&mut self, key: u64) -> Option<&mut LeafNode<V>> {
        if !self.covers(key) {
            return None;
        }
        self.child_for_mut(key).find_leaf_mut(key)
    }

    /// Insert below this node. The caller guarantees `covers(key)`.
    pub(crate) fn insert(self, key: u64, payload: Arc<V>) -> (Node<V>, Option<Arc<V>>) {
        self.descend(key, |child| {
            let (child, replaced) = child.insert(key, payload);
            (Some(child), replaced)
        })
    }

    /// Remove `key` from below this node.
    ///
    /// If the selected child was the leaf being removed, this node has lost a
    /// side and the returned node is its surviving child instead of itself.
    pub(crate) fn remove(self, key: u64) -> (Node<V>, Option<Arc<V>>) {
        self.descend(key, |child| child.remove(key))
    }

    /// Hand the selected child to `f` and rebuild around what it returns.
    ///
    /// A child that comes back as `None` is elided: the sibling replaces
    /// this node, which keeps every internal node at exactly two children.
    fn descend<R>(
        self,
        key: u64,
        f: impl FnOnce(Node<V>) -> (Option<Node<V>>, R),
    ) -> (Node<V>, R) {
        let Self {
            depth,
            prefix,
            child_zero,
            child_one,
        } = self;
        let takes_one = bits::is_one(key, depth);
        let (mut selected, sibling) = if takes_one {
            (child_one, child_zero)
        } else {
            (child_zero, child_one)
        };

        // The child moves out and its replacement moves back into the same box
        let (replacement, result) = f(*selected);
        let node = match replacement {
            Some(replacement) => {
                *selected = replacement;
                let (child_zero, child_one) = if takes_one {
                    (sibling, selected)
                } else {
                    (selected, sibling)
                };
                Node::Internal(Self {
                    depth,
                    prefix,
                    child_zero,
                    child_one,
                })
            }
            None => {
                debug!(depth, "collapsing internal node onto surviving child");
                *sibling
            }
        };
        (node, result)
    }
}

impl<V> Clone for InternalNode<V> {
    fn clone(&self) -> Self {
        Self {
            depth: self.depth,
            prefix: self.prefix,
            child_zero: self.child_zero.clone(),
            child_one: self.child_one.clone(),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for InternalNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternalNode")
            .field("depth", &self.depth)
            .field("prefix", &format_args!("{:#018x}", self.prefix))
            .field("child_zero", &self.child_zero)
            .field("child_one", &self.child_one)
            .finish()
    }
}
