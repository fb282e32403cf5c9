//! `dpr`: expected damage per round for node-graph attack builds.
//!
//! Run with: `dpr <command>`

mod commands;
mod config;
mod dirs;
mod logging;

use anyhow::Result;
use clap::Parser;
use commands::{Eval, Migrate, Monsters, Weapons};
use config::CliConfig;

/// Expected damage per round calculator
#[derive(Parser)]
#[command(name = "dpr")]
#[command(about = "Evaluate 5e attack graphs for expected damage per round", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Evaluate every Output node of a graph document
    Eval(Eval),

    /// List the weapon catalog
    Weapons(Weapons),

    /// List the monster catalog
    Monsters(Monsters),

    /// Rewrite a document in the current format
    Migrate(Migrate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = CliConfig::from_env();
    let _guard = logging::setup_logging(&config)?;

    match cli.command {
        Command::Eval(cmd) => cmd.execute(&config),
        Command::Weapons(cmd) => cmd.execute(&config),
        Command::Monsters(cmd) => cmd.execute(&config),
        Command::Migrate(cmd) => cmd.execute(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_eval_flags() {
        let cli = Cli::try_parse_from([
            "dpr",
            "eval",
            "graph.json",
            "--monster",
            "goblin",
            "--manual-target",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Eval(_)));
    }

    #[test]
    fn migrate_needs_both_paths() {
        assert!(Cli::try_parse_from(["dpr", "migrate", "in.json"]).is_err());
        assert!(Cli::try_parse_from(["dpr", "migrate", "in.json", "out.json"]).is_ok());
    }
}
