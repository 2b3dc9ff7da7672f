//! Snapshot file holding one tree representation

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use progressive_core::{CoreError, ProgressiveTree};
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use tracing::{debug, info, instrument};

/// Tree stored by the CLI: payloads are arbitrary JSON values
pub type Snapshot = ProgressiveTree<Value>;

/// Load the snapshot named by `config`.
///
/// A missing file is an empty tree. The decoder rejects malformed trees on
/// its own; `validate_on_load` adds a second invariant walk on top.
#[instrument(skip(config), fields(path = %config.snapshot_path.display()))]
pub fn load(config: &CliConfig) -> Result<Snapshot> {
    let path = &config.snapshot_path;
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no snapshot yet, starting empty");
            return Ok(Snapshot::new());
        }
        Err(source) => {
            return Err(CliError::Io {
                path: path.clone(),
                source,
            })
        }
    };

    let value: Value = serde_json::from_str(&text).map_err(|source| CliError::SnapshotSyntax {
        path: path.clone(),
        source,
    })?;
    let tree = Snapshot::from_representation(&value).map_err(|source| CliError::SnapshotDecode {
        path: path.clone(),
        source,
    })?;

    if config.validate_on_load {
        tree.validate()?;
    }
    info!(len = tree.len(), "loaded snapshot");
    Ok(tree)
}

/// Write `tree` to the snapshot named by `config`
#[instrument(skip(config, tree), fields(path = %config.snapshot_path.display(), len = tree.len()))]
pub fn save(config: &CliConfig, tree: &Snapshot) -> Result<()> {
    let value = tree.to_representation()?;
    let mut text = config.render(&value).map_err(CoreError::from)?;
    text.push('\n');

    fs::write(&config.snapshot_path, text).map_err(|source| CliError::Io {
        path: config.snapshot_path.clone(),
        source,
    })?;
    info!("saved snapshot");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> CliConfig {
        CliConfig {
            snapshot_path: dir.path().join("tree.json"),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_snapshot_is_empty() {
        let dir = TempDir::new().unwrap();
        let tree = load(&config_in(&dir)).unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let mut tree = Snapshot::new();
        tree.insert(1, json!({ "name": "one" }));
        tree.insert(u64::MAX, json!([1, 2, 3]));
        save(&config, &tree).unwrap();

        let loaded = load(&config).unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.find(u64::MAX).map(|p| (**p).clone()), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_validation_pass_is_optional() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        let mut tree = Snapshot::new();
        for key in [0, 1, u64::MAX] {
            tree.insert(key, json!(key));
        }
        save(&config, &tree).unwrap();

        let checked = load(&config).unwrap();
        let unchecked = load(&CliConfig {
            validate_on_load: false,
            ..config.clone()
        })
        .unwrap();
        assert_eq!(checked.stats(), tree.stats());
        assert_eq!(unchecked.stats(), tree.stats());
    }

    #[test]
    fn test_syntax_error_reported() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(&config.snapshot_path, "{ not json").unwrap();

        let err = load(&config).unwrap_err();
        assert!(matches!(err, CliError::SnapshotSyntax { .. }));
    }

    #[test]
    fn test_decode_error_reported() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        fs::write(&config.snapshot_path, r#"{"kind":"forest"}"#).unwrap();

        let err = load(&config).unwrap_err();
        assert!(matches!(err, CliError::SnapshotDecode { .. }));
        assert!(err.to_string().contains("forest"));
    }
}
