//! Error types for the ptree command-line front end

use progressive_core::{CoreError, DecodeError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `CliError`
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur while running a command
#[derive(Error, Debug)]
pub enum CliError {
    /// Snapshot file could not be read or written
    #[error("snapshot I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot file is not valid JSON
    #[error("snapshot {path} is not valid JSON: {source}")]
    SnapshotSyntax {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot JSON does not describe a tree
    #[error("snapshot {path} is not a valid tree: {source}")]
    SnapshotDecode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// Key argument is neither decimal nor `0x` hexadecimal
    #[error("invalid key `{0}`: expected a decimal or 0x-prefixed hexadecimal u64")]
    InvalidKey(String),

    /// Payload argument is not valid JSON
    #[error("invalid payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),

    /// Core tree error
    #[error("tree error: {0}")]
    Core(#[from] CoreError),
}
