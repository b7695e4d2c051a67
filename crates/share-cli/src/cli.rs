//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Share simulator - replay master/slave scenarios against an in-memory world
#[derive(Parser, Debug)]
#[command(name = "share-sim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Run a scenario and print the resulting actors
    ///
    /// Examples:
    ///   share-sim run party.toml
    ///   share-sim run party.toml --settings share.toml --json
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Settings file overriding the scenario's [share] table
        #[arg(short, long, env = "SHARE_SETTINGS")]
        settings: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show the share configuration form of an actor
    Masters {
        /// Scenario file
        scenario: PathBuf,

        /// Actor id, or `scene/token` for an unlinked token
        actor: String,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the interception points and lifecycle events
    Phases,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["share-sim", "-v", "run", "party.toml", "--json"]);
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Run {
                scenario: PathBuf::from("party.toml"),
                settings: None,
                json: true,
            })
        );
    }
}
