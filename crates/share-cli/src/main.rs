//! Share simulator CLI
//!
//! Replays master/slave share scenarios against an in-memory world.

mod cli;
mod commands;
mod error;
mod scenario;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    } else if std::env::var_os("RUST_LOG").is_some() {
        let _ = share_core::logging::init();
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            println!("{} Share simulator", "share-sim".green().bold());
            println!();
            println!("Run {} for available commands.", "share-sim --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Run {
            scenario,
            settings,
            json,
        } => commands::run_scenario(&scenario, settings.as_deref(), json),
        Commands::Masters {
            scenario,
            actor,
            json,
        } => commands::run_masters(&scenario, &actor, json),
        Commands::Phases => commands::run_phases(),
    }
}
