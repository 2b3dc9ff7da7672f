//! # Progressive Tree
//!
//! Facade over the workspace crates:
//! - [`progressive_core`]: the tree, its nodes and the tagged representation
//! - [`cli`]: the `ptree` snapshot front end

pub use progressive_cli as cli;
pub use progressive_core::*;
