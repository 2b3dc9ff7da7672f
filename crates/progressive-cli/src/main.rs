//! ptree - Progressive Hashing tree snapshot tool

use clap::builder::BoolishValueParser;
use clap::Parser;
use progressive_cli::{execute, CliConfig, Command};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "ptree")]
#[command(about = "Inspect and edit a Progressive Hashing tree snapshot")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Snapshot file holding the tree
    #[arg(
        short,
        long,
        default_value = progressive_cli::config::DEFAULT_SNAPSHOT,
        env = "PTREE_SNAPSHOT"
    )]
    snapshot: PathBuf,

    /// Pretty-print JSON output and snapshots
    #[arg(long, env = "PTREE_PRETTY", value_parser = BoolishValueParser::new())]
    pretty: bool,

    /// Skip the second invariant walk after decoding the snapshot
    #[arg(long)]
    no_validate: bool,

    /// Enable debug logging
    #[arg(short, long, env = "PTREE_DEBUG", value_parser = BoolishValueParser::new())]
    debug: bool,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Logs go to stderr so stdout stays machine-readable
    let log_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            format!("progressive_cli={log_level},progressive_core={log_level}").into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = CliConfig {
        snapshot_path: args.snapshot,
        pretty: args.pretty,
        validate_on_load: !args.no_validate,
    };
    tracing::debug!(snapshot = %config.snapshot_path.display(), "using snapshot");

    let outcome = execute(&config, &args.command)?;
    println!("{}", outcome.render(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_accept_boolish_env_values() {
        std::env::set_var("PTREE_DEBUG", "1");
        std::env::set_var("PTREE_PRETTY", "yes");
        let args = Args::try_parse_from(["ptree", "stats"]).unwrap();
        assert!(args.debug);
        assert!(args.pretty);

        std::env::set_var("PTREE_DEBUG", "off");
        std::env::remove_var("PTREE_PRETTY");
        let args = Args::try_parse_from(["ptree", "--pretty", "stats"]).unwrap();
        assert!(!args.debug);
        assert!(args.pretty);
        std::env::remove_var("PTREE_DEBUG");
    }
}
