//! Terminal tree element

use std::fmt;
use std::sync::Arc;

/// A leaf holding exactly one key and its payload handle.
///
/// Find/insert/remove decisions about a leaf are made by its parent, or by
/// the tree itself when the leaf is the root.
pub struct LeafNode<V> {
    key: u64,
    payload: Arc<V>,
}

impl<V> LeafNode<V> {
    /// Create a new leaf
    pub fn new(key: u64, payload: Arc<V>) -> Self {
        Self { key, payload }
    }

    /// The key this leaf was inserted under
    pub fn key(&self) -> u64 {
        self.key
    }

    /// The shared payload handle
    pub fn payload(&self) -> &Arc<V> {
        &self.payload
    }

    /// Swap in a new payload, returning the previous handle
    pub fn replace_payload(&mut self, payload: Arc<V>) -> Arc<V> {
        std::mem::replace(&mut self.payload, payload)
    }

    /// Consume the leaf, handing back its payload
    pub fn into_payload(self) -> Arc<V> {
        self.payload
    }
}

impl<V> Clone for LeafNode<V> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            payload: Arc::clone(&self.payload),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for LeafNode<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LeafNode")
            .field("key", &format_args!("{:#018x}", self.key))
            .field("payload", &self.payload)
            .finish()
    }
}
