//! Show what a prune run would keep and remove

use anyhow::{Context, Result};
use cull_sweep::list_files;
use owo_colors::OwoColorize;
use regex::Regex;

use crate::config::Config;
use crate::util;

/// Run the retention selection for every configured directory and print
/// the outcome without deleting anything.
pub fn run(config: &Config) -> Result<()> {
    let week_start = config.week_start()?;
    let policies = config.resolved_policies();

    if policies.is_empty() {
        println!("{}", "No directories configured".yellow());
        return Ok(());
    }

    let mut total_keep = 0usize;
    let mut total_remove = 0usize;
    let mut total_bytes = 0u64;

    for policy in &policies {
        let pattern = policy
            .pattern
            .as_deref()
            .map(Regex::new)
            .transpose()
            .context("invalid filename pattern")?;

        let files = list_files(&policy.path, &config.ignore, pattern.as_ref())?;
        let plan = cull_core::plan(files, &policy.keep, week_start);

        println!("{}", policy.path.display().to_string().bold());
        if plan.keep.is_empty() && plan.remove.is_empty() {
            println!("  {}", "no candidate files".dimmed());
            println!();
            continue;
        }

        for file in &plan.keep {
            println!(
                "  {} {} {}",
                "keep".green(),
                util::format_timestamp(file.accessed_ms).dimmed(),
                file.name
            );
        }
        for file in &plan.remove {
            println!(
                "  {} {} {}",
                "drop".red(),
                util::format_timestamp(file.accessed_ms).dimmed(),
                file.name
            );
        }

        let bytes: u64 = plan.remove.iter().map(|file| file.len).sum();
        println!(
            "  {} kept, {} to remove ({})",
            plan.keep.len().to_string().green(),
            plan.remove.len().to_string().yellow(),
            util::format_size(bytes)
        );
        println!();

        total_keep += plan.keep.len();
        total_remove += plan.remove.len();
        total_bytes += bytes;
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "{} {} kept, {} to remove, {} reclaimable",
        "Total:".bold(),
        total_keep.to_string().green(),
        total_remove.to_string().yellow(),
        util::format_size(total_bytes).green()
    );

    Ok(())
}
