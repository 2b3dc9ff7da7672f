//! Tagged representation of nodes and trees
//!
//! ```text
//! { "kind": "empty" }
//! { "kind": "leaf",     "key": u64, "payload": <V> }
//! { "kind": "internal", "key": u64, "childZero": {..}, "childOne": {..} }
//! ```
//!
//! Writing goes through `serde::Serialize`, so any serde format can carry a
//! tree. Reading goes through a [`serde_json::Value`] and rebuilds the tree
//! node by node, rejecting anything that would produce a corrupt structure.
//! An internal node's `key` is not trusted: depth and prefix are recomputed
//! from the two children.

use crate::node::{InternalNode, Node};
use crate::{bits, DecodeError};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

pub const KIND_EMPTY: &str = "empty";
pub const KIND_LEAF: &str = "leaf";
pub const KIND_INTERNAL: &str = "internal";

pub(crate) const FIELD_KIND: &str = "kind";
pub(crate) const FIELD_KEY: &str = "key";
pub(crate) const FIELD_PAYLOAD: &str = "payload";
pub(crate) const FIELD_CHILD_ZERO: &str = "childZero";
pub(crate) const FIELD_CHILD_ONE: &str = "childOne";

/// Path of the top-level value in decode errors
pub(crate) const ROOT_PATH: &str = "$";

impl<V: Serialize> Serialize for Node<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Leaf(leaf) => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(FIELD_KIND, KIND_LEAF)?;
                map.serialize_entry(FIELD_KEY, &leaf.key())?;
                map.serialize_entry(FIELD_PAYLOAD, leaf.payload().as_ref())?;
                map.end()
            }
            Node::Internal(internal) => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry(FIELD_KIND, KIND_INTERNAL)?;
                map.serialize_entry(FIELD_KEY, &internal.key())?;
                map.serialize_entry(FIELD_CHILD_ZERO, internal.child_zero())?;
                map.serialize_entry(FIELD_CHILD_ONE, internal.child_one())?;
                map.end()
            }
        }
    }
}

impl<V: Serialize> Node<V> {
    /// Produce the tagged representation of this subtree
    pub fn to_representation(&self) -> crate::Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<V: DeserializeOwned> Node<V> {
    /// Rebuild a subtree from its tagged representation
    pub fn from_representation(value: &Value) -> Result<Self, DecodeError> {
        decode_node(value, ROOT_PATH)
    }
}

/// Write the empty-tree sentinel
pub(crate) fn serialize_empty<S: Serializer>(serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(1))?;
    map.serialize_entry(FIELD_KIND, KIND_EMPTY)?;
    map.end()
}

/// Decode a top-level value, where `empty` is allowed and yields `None`
pub(crate) fn decode_root<V: DeserializeOwned>(
    value: &Value,
) -> Result<Option<Node<V>>, DecodeError> {
    let object = as_object(value, ROOT_PATH)?;
    if kind_of(object, ROOT_PATH)? == KIND_EMPTY {
        return Ok(None);
    }
    decode_node(value, ROOT_PATH).map(Some)
}

/// Decode one node and everything below it
pub(crate) fn decode_node<V: DeserializeOwned>(
    value: &Value,
    path: &str,
) -> Result<Node<V>, DecodeError> {
    let object = as_object(value, path)?;
    match kind_of(object, path)? {
        KIND_LEAF => {
            let key = required_key(object, path)?;
            let payload = object
                .get(FIELD_PAYLOAD)
                .ok_or_else(|| DecodeError::MissingField {
                    path: path.to_string(),
                    field: FIELD_PAYLOAD,
                })?;
            let payload = V::deserialize(payload).map_err(|source| DecodeError::Payload {
                path: path.to_string(),
                source,
            })?;
            Ok(Node::leaf(key, payload.into()))
        }
        KIND_INTERNAL => {
            if let Some(key) = object.get(FIELD_KEY) {
                if !key.is_u64() {
                    return Err(invalid_key(path));
                }
            }
            let child_zero = decode_child(object, FIELD_CHILD_ZERO, path)?;
            let child_one = decode_child(object, FIELD_CHILD_ONE, path)?;
            rebuild_internal(child_zero, child_one, path).map(Node::Internal)
        }
        KIND_EMPTY => Err(DecodeError::MalformedChild {
            path: path.to_string(),
            reason: "`empty` is only valid as a whole tree".to_string(),
        }),
        other => Err(DecodeError::UnknownKind {
            path: path.to_string(),
            kind: other.to_string(),
        }),
    }
}

fn decode_child<V: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &'static str,
    path: &str,
) -> Result<Node<V>, DecodeError> {
    let child_path = format!("{path}.{field}");
    let child = object
        .get(field)
        .ok_or_else(|| DecodeError::MalformedChild {
            path: child_path.clone(),
            reason: "internal node is missing a child".to_string(),
        })?;
    decode_node(child, &child_path)
}

/// Recompute depth and prefix from decoded children and check that they
/// sit on the sides their keys select.
fn rebuild_internal<V>(
    child_zero: Node<V>,
    child_one: Node<V>,
    path: &str,
) -> Result<InternalNode<V>, DecodeError> {
    let depth = match bits::divergence_depth(child_zero.key(), child_one.key()) {
        Some(depth) => depth,
        None if child_zero.is_leaf() && child_one.is_leaf() => {
            return Err(DecodeError::DuplicateKey {
                path: path.to_string(),
                key: child_zero.key(),
            })
        }
        None => {
            return Err(DecodeError::MalformedChild {
                path: path.to_string(),
                reason: format!("children overlap at prefix {:#018x}", child_zero.key()),
            })
        }
    };

    if bits::is_one(child_zero.key(), depth) {
        return Err(DecodeError::MalformedChild {
            path: format!("{path}.{FIELD_CHILD_ZERO}"),
            reason: format!(
                "key {:#018x} has bit {} set",
                child_zero.key(),
                bits::KEY_BITS - 1 - depth
            ),
        });
    }

    let sides = [
        (&child_zero, FIELD_CHILD_ZERO),
        (&child_one, FIELD_CHILD_ONE),
    ];
    for (child, field) in sides {
        if let Some(below) = child.as_internal() {
            if below.depth() <= depth {
                return Err(DecodeError::MalformedChild {
                    path: format!("{path}.{field}"),
                    reason: format!(
                        "subtree splits at depth {} but its parent splits at depth {depth}",
                        below.depth()
                    ),
                });
            }
        }
    }

    Ok(InternalNode::from_children(depth, child_zero, child_one))
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, DecodeError> {
    value.as_object().ok_or_else(|| DecodeError::NotAnObject {
        path: path.to_string(),
    })
}

fn kind_of<'a>(object: &'a Map<String, Value>, path: &str) -> Result<&'a str, DecodeError> {
    let kind = object
        .get(FIELD_KIND)
        .ok_or_else(|| DecodeError::MissingField {
            path: path.to_string(),
            field: FIELD_KIND,
        })?;
    kind.as_str().ok_or_else(|| DecodeError::InvalidField {
        path: path.to_string(),
        field: FIELD_KIND,
        expected: "a string",
    })
}

fn required_key(object: &Map<String, Value>, path: &str) -> Result<u64, DecodeError> {
    let key = object
        .get(FIELD_KEY)
        .ok_or_else(|| DecodeError::MissingField {
            path: path.to_string(),
            field: FIELD_KEY,
        })?;
    key.as_u64().ok_or_else(|| invalid_key(path))
}

fn invalid_key(path: &str) -> DecodeError {
    DecodeError::InvalidField {
        path: path.to_string(),
        field: FIELD_KEY,
        expected: "an unsigned 64-bit integer",
    }
}
