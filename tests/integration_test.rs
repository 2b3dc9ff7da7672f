//! Integration tests for the Progressive tree
//!
//! These tests drive the public API through the reference scenarios and
//! check the tree shape after each step.

use progressive_tree::{DecodeError, Node, ProgressiveTree};
use serde_json::json;
use std::sync::Arc;

const ZERO: u64 = 0x0000_0000_0000_0000;
const HIGH: u64 = 0x8000_0000_0000_0000;
const SECOND: u64 = 0x4000_0000_0000_0000;

fn scenario_two() -> ProgressiveTree<String> {
    let mut tree: ProgressiveTree<String> = ProgressiveTree::new();
    tree.insert(ZERO, "zero".to_string());
    tree.insert(HIGH, "high".to_string());
    tree.insert(SECOND, "second".to_string());
    tree
}

fn internal(node: &Node<String>) -> &progressive_tree::InternalNode<String> {
    node.as_internal().expect("internal node")
}

/// Two keys differing in bit 63 split at the root
#[test]
fn test_split_at_root() {
    let mut tree: ProgressiveTree<String> = ProgressiveTree::new();
    tree.insert(ZERO, "zero".to_string());
    assert!(tree.top_node().unwrap().is_leaf_with_key(ZERO));

    tree.insert(HIGH, "high".to_string());
    let root = internal(tree.top_node().unwrap());
    assert_eq!(root.depth(), 0);
    assert_eq!(root.bit_mask(), HIGH);
    assert!(root.child_zero_is_leaf_with_key(ZERO));
    assert!(root.child_one_is_leaf_with_key(HIGH));
}

/// A third key sharing bit 63 with an existing leaf splits that slot at depth 1
#[test]
fn test_split_below_root() {
    let tree = scenario_two();
    let root = internal(tree.top_node().unwrap());

    assert_eq!(root.depth(), 0);
    assert!(root.child_zero_is_internal());
    assert!(root.child_one_is_leaf_with_key(HIGH));

    let lower = internal(root.child_zero());
    assert_eq!(lower.depth(), 1);
    assert_eq!(lower.bit_mask(), SECOND);
    assert!(lower.child_zero_is_leaf_with_key(ZERO));
    assert!(lower.child_one_is_leaf_with_key(SECOND));
    assert_eq!(tree.height(), 2);
}

/// Removing the only key under bit 63 collapses the root onto its sibling
#[test]
fn test_root_collapse() {
    let mut tree = scenario_two();
    let removed = tree.remove(HIGH);
    assert_eq!(removed.as_deref().map(String::as_str), Some("high"));

    let root = internal(tree.top_node().unwrap());
    assert_eq!(root.depth(), 1);
    assert_eq!(root.bit_mask(), SECOND);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.len(), 2);
    tree.validate().unwrap();
}

#[test]
fn test_find_after_splits() {
    let tree = scenario_two();
    assert_eq!(tree.find(SECOND).map(|p| p.as_str()), Some("second"));
    assert!(tree.find(0x1234_5678_90AB_CDEF).is_none());
}

/// After the root collapsed, a key differing above the new root splices a
/// node back on top
#[test]
fn test_reinsert_after_collapse() {
    let mut tree = scenario_two();
    tree.remove(HIGH);
    assert!(tree.insert(HIGH, "again".to_string()).is_none());

    let root = internal(tree.top_node().unwrap());
    assert_eq!(root.depth(), 0);
    assert!(root.child_one_is_leaf_with_key(HIGH));
    assert_eq!(tree.find(HIGH).map(|p| p.as_str()), Some("again"));
    assert_eq!(tree.find(ZERO).map(|p| p.as_str()), Some("zero"));
    tree.validate().unwrap();
}

#[test]
fn test_remove_down_to_empty() {
    let mut tree = scenario_two();
    for key in [SECOND, ZERO, HIGH] {
        assert!(tree.remove(key).is_some());
        tree.validate().unwrap();
    }
    assert!(tree.is_empty());
    assert!(tree.top_node().is_none());
    assert!(tree.remove(ZERO).is_none());
}

#[test]
fn test_payload_outlives_tree() {
    let mut tree: ProgressiveTree<String> = ProgressiveTree::new();
    tree.insert(7, "kept".to_string());
    let handle = Arc::clone(tree.find(7).unwrap());
    drop(tree);
    assert_eq!(handle.as_str(), "kept");
}

#[test]
fn test_representation_shape() {
    let mut tree: ProgressiveTree<String> = ProgressiveTree::new();
    tree.insert(ZERO, "zero".to_string());
    tree.insert(HIGH, "high".to_string());

    assert_eq!(
        tree.to_representation().unwrap(),
        json!({
            "kind": "internal",
            "key": 0,
            "childZero": { "kind": "leaf", "key": 0, "payload": "zero" },
            "childOne": { "kind": "leaf", "key": HIGH, "payload": "high" },
        })
    );
    assert_eq!(
        ProgressiveTree::<String>::new().to_representation().unwrap(),
        json!({ "kind": "empty" })
    );
}

#[test]
fn test_json_string_round_trip() {
    let tree = scenario_two();
    let text = serde_json::to_string(&tree).unwrap();
    let decoded: ProgressiveTree<String> = serde_json::from_str(&text).unwrap();

    assert_eq!(decoded.stats(), tree.stats());
    for key in [ZERO, HIGH, SECOND] {
        assert_eq!(decoded.find(key), tree.find(key));
    }
}

#[test]
fn test_decode_rejects_misrouted_child() {
    let value = json!({
        "kind": "internal",
        "key": 0,
        "childZero": { "kind": "leaf", "key": HIGH, "payload": "a" },
        "childOne": { "kind": "leaf", "key": 0, "payload": "b" },
    });
    let err = ProgressiveTree::<String>::from_representation(&value).unwrap_err();
    assert!(matches!(err, DecodeError::MalformedChild { .. }));
}
