//! `ptree` subcommands

use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::snapshot;
use clap::Subcommand;
use progressive_core::TreeStats;
use serde_json::Value;
use tracing::{info, instrument};

/// Operations on the snapshot tree
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Insert or replace the payload stored under a key
    Insert {
        /// Decimal or 0x-prefixed hexadecimal key
        key: String,
        /// Payload as a JSON value
        payload: String,
    },
    /// Print the payload stored under a key
    Find {
        /// Decimal or 0x-prefixed hexadecimal key
        key: String,
    },
    /// Remove a key
    Remove {
        /// Decimal or 0x-prefixed hexadecimal key
        key: String,
    },
    /// Print tree statistics
    Stats,
    /// Print the tree representation
    Show,
}

/// Result of running a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Inserted { key: u64, replaced: Option<Value> },
    Found { key: u64, payload: Option<Value> },
    Removed { key: u64, payload: Option<Value> },
    Stats(TreeStats),
    Representation(Value),
}

impl Outcome {
    /// Text printed to stdout for this outcome
    pub fn render(&self, config: &CliConfig) -> Result<String> {
        let render = |value: &Value| config.render(value).map_err(|e| CliError::Core(e.into()));
        Ok(match self {
            Outcome::Inserted { key, replaced: None } => format!("inserted {key:#018x}"),
            Outcome::Inserted {
                key,
                replaced: Some(old),
            } => format!("replaced {key:#018x} (was {})", render(old)?),
            Outcome::Found {
                payload: Some(payload),
                ..
            } => render(payload)?,
            Outcome::Found { key, payload: None } => format!("not found: {key:#018x}"),
            Outcome::Removed {
                key,
                payload: Some(_),
            } => format!("removed {key:#018x}"),
            Outcome::Removed { key, payload: None } => format!("not found: {key:#018x}"),
            Outcome::Stats(stats) => {
                let value = serde_json::to_value(stats).map_err(|e| CliError::Core(e.into()))?;
                render(&value)?
            }
            Outcome::Representation(value) => render(value)?,
        })
    }
}

/// Parse a key given as decimal or `0x`-prefixed hexadecimal
pub fn parse_key(text: &str) -> Result<u64> {
    let text = text.trim();
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(&hex.replace('_', ""), 16),
        None => text.replace('_', "").parse(),
    };
    parsed.map_err(|_| CliError::InvalidKey(text.to_string()))
}

/// Run `command` against the snapshot named by `config`
#[instrument(skip(config))]
pub fn execute(config: &CliConfig, command: &Command) -> Result<Outcome> {
    match command {
        Command::Insert { key, payload } => {
            let key = parse_key(key)?;
            let payload: Value = serde_json::from_str(payload).map_err(CliError::InvalidPayload)?;

            let mut tree = snapshot::load(config)?;
            let replaced = tree.insert(key, payload).map(|old| Value::clone(&old));
            snapshot::save(config, &tree)?;
            info!(key, replaced = replaced.is_some(), "insert");
            Ok(Outcome::Inserted { key, replaced })
        }
        Command::Find { key } => {
            let key = parse_key(key)?;
            let tree = snapshot::load(config)?;
            let payload = tree.find(key).map(|p| Value::clone(p));
            Ok(Outcome::Found { key, payload })
        }
        Command::Remove { key } => {
            let key = parse_key(key)?;
            let mut tree = snapshot::load(config)?;
            let payload = tree.remove(key).map(|old| Value::clone(&old));
            if payload.is_some() {
                snapshot::save(config, &tree)?;
            }
            info!(key, removed = payload.is_some(), "remove");
            Ok(Outcome::Removed { key, payload })
        }
        Command::Stats => Ok(Outcome::Stats(snapshot::load(config)?.stats())),
        Command::Show => Ok(Outcome::Representation(
            snapshot::load(config)?.to_representation()?,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    #[rstest]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("0x8000000000000000", 0x8000_0000_0000_0000)]
    #[case("0XfF", 0xFF)]
    #[case("0x4000_0000_0000_0000", 0x4000_0000_0000_0000)]
    #[case(" 18446744073709551615 ", u64::MAX)]
    fn test_parse_key(#[case] text: &str, #[case] expected: u64) {
        assert_eq!(parse_key(text).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("-1")]
    #[case("0x")]
    #[case("0x1_0000_0000_0000_0000")]
    #[case("twelve")]
    fn test_parse_key_rejects(#[case] text: &str) {
        assert!(matches!(parse_key(text), Err(CliError::InvalidKey(_))));
    }

    #[test_log::test]
    fn test_insert_find_remove() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            snapshot_path: dir.path().join("tree.json"),
            ..Default::default()
        };
        let insert = |key: &str, payload: &str| Command::Insert {
            key: key.to_string(),
            payload: payload.to_string(),
        };

        let outcome = execute(&config, &insert("0x10", r#""a""#)).unwrap();
        assert_eq!(outcome, Outcome::Inserted { key: 0x10, replaced: None });

        let outcome = execute(&config, &insert("16", r#""b""#)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Inserted {
                key: 0x10,
                replaced: Some(json!("a"))
            }
        );

        let found = execute(&config, &Command::Find { key: "0x10".to_string() }).unwrap();
        assert_eq!(found.render(&config).unwrap(), r#""b""#);

        let removed = execute(&config, &Command::Remove { key: "16".to_string() }).unwrap();
        assert_eq!(removed.render(&config).unwrap(), "removed 0x0000000000000010");

        let missing = execute(&config, &Command::Find { key: "16".to_string() }).unwrap();
        assert_eq!(missing.render(&config).unwrap(), "not found: 0x0000000000000010");
    }

    #[test]
    fn test_invalid_payload() {
        let dir = TempDir::new().unwrap();
        let config = CliConfig {
            snapshot_path: dir.path().join("tree.json"),
            ..Default::default()
        };
        let command = Command::Insert {
            key: "1".to_string(),
            payload: "{oops".to_string(),
        };

        assert!(matches!(execute(&config, &command), Err(CliError::InvalidPayload(_))));
        assert!(!config.snapshot_path.exists());
    }
}
