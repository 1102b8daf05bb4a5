//! Inspect configuration locations

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;

use crate::config::{self, CONFIG_FILE_NAME};

/// Show the configuration search order and which entries exist.
pub fn run_path(explicit: Option<&Path>) -> Result<()> {
    if let Some(path) = explicit {
        println!("{}", path.display());
        if !path.exists() {
            println!("{}", "File does not exist.".yellow());
        }
        return Ok(());
    }

    println!("{}", "Configuration search order".bold());
    print_candidate(Path::new(CONFIG_FILE_NAME));
    match config::config_file_path() {
        Some(path) => print_candidate(&path),
        None => println!("  {} {}", "-".dimmed(), "no per-user config directory".dimmed()),
    }

    if config::find_config().is_none() {
        println!();
        println!(
            "{}",
            "No configuration found. Use `cull config example` for a starter file.".yellow()
        );
    }

    Ok(())
}

/// Print a starter configuration file.
pub fn run_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

fn print_candidate(path: &Path) {
    if path.is_file() {
        println!("  {} {}", "✓".green(), path.display());
    } else {
        println!("  {} {}", "-".dimmed(), path.display().to_string().dimmed());
    }
}
