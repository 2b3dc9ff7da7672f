//! Error types for the progressive-core crate

use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in tree operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// A representation could not be decoded into a tree
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Tree corruption detected
    #[error("tree corruption: {0}")]
    TreeCorruption(String),
}

/// Errors produced while rebuilding a tree from its tagged representation.
///
/// Every variant carries the JSON path of the offending node, starting at `$`
/// for the top-level value and descending through `childZero` / `childOne`.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The value at `path` is not an object
    #[error("expected a node object at {path}")]
    NotAnObject { path: String },

    /// The `kind` tag is not one of `empty`, `leaf`, `internal`
    #[error("unknown node kind `{kind}` at {path}")]
    UnknownKind { path: String, kind: String },

    /// A required field is absent
    #[error("missing field `{field}` at {path}")]
    MissingField { path: String, field: &'static str },

    /// A field is present but has the wrong type
    #[error("field `{field}` at {path} is not {expected}")]
    InvalidField {
        path: String,
        field: &'static str,
        expected: &'static str,
    },

    /// An internal node's child is absent, empty, or placed on the wrong side
    #[error("malformed child at {path}: {reason}")]
    MalformedChild { path: String, reason: String },

    /// Two leaves carry the same key
    #[error("duplicate key {key:#018x} at {path}")]
    DuplicateKey { path: String, key: u64 },

    /// The payload could not be decoded into the caller's type
    #[error("payload at {path} could not be decoded: {source}")]
    Payload {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DecodeError {
    /// JSON path of the node that failed to decode
    pub fn path(&self) -> &str {
        match self {
            DecodeError::NotAnObject { path }
            | DecodeError::UnknownKind { path, .. }
            | DecodeError::MissingField { path, .. }
            | DecodeError::InvalidField { path, .. }
            | DecodeError::MalformedChild { path, .. }
            | DecodeError::DuplicateKey { path, .. }
            | DecodeError::Payload { path, .. } => path,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
