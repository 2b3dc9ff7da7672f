//! # Progressive CLI
//!
//! `ptree`, a command-line front end that keeps a Progressive Hashing tree
//! in a JSON snapshot file.
//!
//! Each invocation loads the snapshot, applies one command and writes the
//! snapshot back when the tree changed. A missing snapshot is an empty tree.
//!
//! ```text
//! ┌────────────────┐   load   ┌────────────────────────┐
//! │  ptree.json    │ ───────► │ ProgressiveTree<Value> │
//! │ (tagged repr)  │ ◄─────── │ insert / find / remove │
//! └────────────────┘   save   └────────────────────────┘
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod snapshot;

pub use commands::{execute, parse_key, Command, Outcome};
pub use config::CliConfig;
pub use error::{CliError, Result};
pub use snapshot::Snapshot;
