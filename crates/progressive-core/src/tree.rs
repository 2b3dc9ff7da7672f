//! Progressive Hashing tree

use crate::node::{LeafNode, Node};
use crate::repr::{self, ROOT_PATH};
use crate::{bits, CoreError, DecodeError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A deterministic map from 64-bit keys to shared payloads.
///
/// The tree handles the two shapes a lone internal node cannot express:
/// the empty tree and the single-leaf tree. Everything else is delegated
/// to the root node.
pub struct ProgressiveTree<V> {
    root: Option<Node<V>>,
    len: usize,
}

impl<V> ProgressiveTree<V> {
    /// Create a new empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Check if the tree is empty
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.len
    }

    /// The root node, if any
    pub fn top_node(&self) -> Option<&Node<V>> {
        self.root.as_ref()
    }

    /// Depth of the root: 0 when empty or a single leaf, otherwise the
    /// root's depth (which is greater than 0 once the top level collapsed).
    pub fn depth(&self) -> u16 {
        match &self.root {
            Some(Node::Internal(internal)) => internal.depth(),
            _ => 0,
        }
    }

    /// Internal levels on the longest root-to-leaf path
    pub fn height(&self) -> usize {
        self.root.as_ref().map_or(0, Node::height)
    }

    /// Get the payload stored under `key`
    pub fn find(&self, key: u64) -> Option<&Arc<V>> {
        self.root.as_ref()?.find(key)
    }

    /// Check if `key` is stored
    pub fn contains(&self, key: u64) -> bool {
        self.find(key).is_some()
    }

    /// Insert or replace the payload for `key`.
    ///
    /// Returns the replaced payload handle when `key` was already present.
    #[instrument(level = "debug", skip(self, payload))]
    pub fn insert(&mut self, key: u64, payload: impl Into<Arc<V>>) -> Option<Arc<V>> {
        let payload = payload.into();

        if let Some(leaf) = self.root.as_mut().and_then(|root| root.find_leaf_mut(key)) {
            return Some(leaf.replace_payload(payload));
        }

        let root = match self.root.take() {
            None => Node::Leaf(LeafNode::new(key, payload)),
            Some(root) => {
                let before = root.as_internal().map(|internal| internal.depth());
                let (root, _) = root.insert(key, payload);
                if let Some(internal) = root.as_internal() {
                    if before != Some(internal.depth()) {
                        debug!(depth = internal.depth(), "new root");
                    }
                }
                root
            }
        };
        self.root = Some(root);
        self.len += 1;
        None
    }

    /// Remove `key`, returning its payload handle.
    ///
    /// Removing an absent key leaves the tree untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, key: u64) -> Option<Arc<V>> {
        if !self.contains(key) {
            return None;
        }

        let root = self.root.take()?;
        let (root, removed) = root.remove(key);
        self.root = root;
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Get statistics about the tree
    pub fn stats(&self) -> TreeStats {
        let (leaves, internal_nodes) = self.root.as_ref().map_or((0, 0), Node::tally);
        TreeStats {
            len: self.len,
            leaves,
            internal_nodes,
            depth: self.depth(),
            height: self.height(),
        }
    }

    /// Walk the whole tree checking its structural invariants.
    pub fn validate(&self) -> Result<()> {
        let leaves = match &self.root {
            None => 0,
            Some(root) => root.validate(None, ROOT_PATH)?,
        };
        if leaves != self.len {
            return Err(CoreError::TreeCorruption(format!(
                "{leaves} reachable leaves but length is {}",
                self.len
            )));
        }
        let height = self.height();
        if height > usize::from(bits::KEY_BITS) {
            return Err(CoreError::TreeCorruption(format!(
                "height {height} exceeds key width"
            )));
        }
        Ok(())
    }
}

impl<V: Serialize> ProgressiveTree<V> {
    /// Produce the tagged representation of the whole tree
    pub fn to_representation(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<V: DeserializeOwned> ProgressiveTree<V> {
    /// Rebuild a tree from its tagged representation
    #[instrument(level = "debug", skip(value))]
    pub fn from_representation(value: &Value) -> std::result::Result<Self, DecodeError> {
        let root = repr::decode_root(value)?;
        let len = root.as_ref().map_or(0, |root| root.tally().0);
        debug!(len, "decoded tree");
        Ok(Self { root, len })
    }
}

impl<V> Default for ProgressiveTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ProgressiveTree<V> {
    fn clone(&self) -> Self {
        Self {
            root: self.root.clone(),
            len: self.len,
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for ProgressiveTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressiveTree")
            .field("len", &self.len)
            .field("root", &self.root)
            .finish()
    }
}

impl<V: Serialize> Serialize for ProgressiveTree<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match &self.root {
            Some(root) => root.serialize(serializer),
            None => repr::serialize_empty(serializer),
        }
    }
}

impl<'de, V: DeserializeOwned> Deserialize<'de> for ProgressiveTree<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_representation(&value).map_err(serde::de::Error::custom)
    }
}

/// Tree statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub len: usize,
    pub leaves: usize,
    pub internal_nodes: usize,
    pub depth: u16,
    pub height: usize,
}
