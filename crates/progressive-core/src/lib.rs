//! # Progressive Core
//!
//! A Progressive Hashing tree: a deterministic map from 64-bit keys to
//! shared payload handles.
//!
//! Keys are placed by testing their bits from the most significant down.
//! Any bucket that would hold two keys is split on the first bit where they
//! differ, so the structure needs no hash function and its height is bounded
//! by the 64 bits of the key.
//!
//! This crate provides:
//! - **Nodes**: a closed `Leaf` / `Internal` node enum with recursive
//!   find, insert, remove and collapse
//! - **Tree**: the composition root handling empty and single-leaf trees
//! - **Representation**: a tagged serde form with a validating decoder
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            ProgressiveTree              │
//! ├─────────────────────────────────────────┤
//! │   Node::Internal      │   Node::Leaf    │
//! ├─────────────────────────────────────────┤
//! │   bits (mask / prefix / divergence)     │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use progressive_core::ProgressiveTree;
//!
//! let mut tree: ProgressiveTree<String> = ProgressiveTree::new();
//! tree.insert(0x8000_0000_0000_0000, "high".to_string());
//! tree.insert(0, "low".to_string());
//!
//! assert_eq!(tree.find(0).map(|p| p.as_str()), Some("low"));
//! assert!(tree.find(1).is_none());
//!
//! let value = tree.to_representation().unwrap();
//! let copy: ProgressiveTree<String> = ProgressiveTree::from_representation(&value).unwrap();
//! assert_eq!(copy.len(), 2);
//! ```

pub mod bits;
pub mod error;
pub mod node;
pub mod repr;
pub mod tree;

pub use error::{CoreError, DecodeError, Result};
pub use node::{InternalNode, LeafNode, Node};
pub use tree::{ProgressiveTree, TreeStats};
