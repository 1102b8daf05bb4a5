//! Cull CLI - cull command

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cull_cli::cmd;
use cull_cli::config::Config;

/// Cull - tiered retention for directories of timestamped files
#[derive(Parser)]
#[command(name = "cull")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prune all configured directories
    Run {
        /// Report deletions without removing anything
        #[arg(long)]
        dry_run: bool,
        /// Ask before each deletion
        #[arg(long)]
        confirm: bool,
    },
    /// Show what a run would keep and remove
    Plan,
    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show where configuration is loaded from
    Path,
    /// Print a starter configuration file
    Example,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Run { dry_run, confirm } => {
            let config = Config::load(cli.config.as_deref())?;
            cmd::run::run(&config, cmd::run::RunOptions { dry_run, confirm })
        }
        Commands::Plan => {
            let config = Config::load(cli.config.as_deref())?;
            cmd::plan::run(&config)
        }
        Commands::Config(ConfigCommands::Path) => cmd::config::run_path(cli.config.as_deref()),
        Commands::Config(ConfigCommands::Example) => cmd::config::run_example(),
    }
}
