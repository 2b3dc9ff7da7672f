//! CLI configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default snapshot file, relative to the working directory
pub const DEFAULT_SNAPSHOT: &str = "ptree.json";

/// Settings shared by every `ptree` command
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CliConfig {
    /// Snapshot file holding the tree representation
    pub snapshot_path: PathBuf,
    /// Pretty-print JSON written to the snapshot and stdout
    pub pretty: bool,
    /// Re-run `ProgressiveTree::validate` after loading a snapshot.
    ///
    /// Decoding already rejects misrouted children, depth inversions and
    /// duplicate keys, so this is a second walk over an accepted tree.
    pub validate_on_load: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT),
            pretty: false,
            validate_on_load: true,
        }
    }
}

impl CliConfig {
    /// Render a JSON value according to the `pretty` setting
    pub fn render(&self, value: &serde_json::Value) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}
