//! Prune all configured directories

use anyhow::{Context, Result};
use cull_core::ResolvedPolicy;
use cull_sweep::{list_files, remove_files, ConfirmPrompt, DeleteOptions, DeleteReport, StdinPrompt};
use owo_colors::OwoColorize;
use regex::Regex;
use tracing::{error, info};

use crate::config::Config;
use crate::util;

/// Flag overrides from the command line; either flag set wins over the
/// configuration file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
    pub confirm: bool,
}

pub fn run(config: &Config, options: RunOptions) -> Result<()> {
    let delete_options = DeleteOptions {
        dry_run: options.dry_run || config.dry_run,
        confirm: options.confirm || config.force_confirm,
    };

    let mut prompt = StdinPrompt;
    execute(config, delete_options, &mut prompt)
}

/// Prune every configured directory in sequence. One directory failing is
/// logged and does not stop the others. Split from [`run`] so integration
/// tests can script the confirmation prompt.
pub fn execute(
    config: &Config,
    delete_options: DeleteOptions,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<()> {
    let week_start = config.week_start()?;
    let policies = config.resolved_policies();

    if policies.is_empty() {
        println!("{}", "No directories configured - nothing to prune".yellow());
        return Ok(());
    }

    let mut totals = DeleteReport::default();

    for policy in &policies {
        info!(path = %policy.path.display(), "pruning directory");
        match prune_directory(config, policy, week_start, delete_options, prompt) {
            Ok(report) => {
                totals.merge(&report);
                print_directory_summary(policy, &report, delete_options.dry_run);
            }
            Err(err) => {
                error!(path = %policy.path.display(), error = %err, "failed to prune directory");
            }
        }
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    let verb = if delete_options.dry_run { "Would remove" } else { "Removed" };
    println!(
        "{} {} file(s), {} freed",
        verb.bold(),
        totals.removed.to_string().yellow(),
        util::format_size(totals.bytes_freed).green()
    );
    if totals.failed > 0 {
        println!("{} {} deletion(s) failed", "Warning:".red().bold(), totals.failed);
    }

    Ok(())
}

fn prune_directory(
    config: &Config,
    policy: &ResolvedPolicy,
    week_start: chrono::Weekday,
    delete_options: DeleteOptions,
    prompt: &mut dyn ConfirmPrompt,
) -> Result<DeleteReport> {
    // Patterns were compiled once at validation; a failure here means the
    // policy bypassed `Config::load`.
    let pattern = policy
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid filename pattern")?;

    let files = list_files(&policy.path, &config.ignore, pattern.as_ref())?;
    let plan = cull_core::plan(files, &policy.keep, week_start);
    info!(
        path = %policy.path.display(),
        keep = plan.keep.len(),
        remove = plan.remove.len(),
        "retention pass complete"
    );

    Ok(remove_files(&plan.remove, delete_options, prompt))
}

fn print_directory_summary(policy: &ResolvedPolicy, report: &DeleteReport, dry_run: bool) {
    println!("{}", policy.path.display().to_string().bold());

    let verb = if dry_run { "Would remove" } else { "Removed" };
    println!("  {}: {}", verb, report.removed.to_string().yellow());
    if report.skipped > 0 {
        println!("  Skipped: {}", report.skipped.to_string().dimmed());
    }
    if report.failed > 0 {
        println!("  Failed:  {}", report.failed.to_string().red());
    }
    println!("  Space freed: {}", util::format_size(report.bytes_freed).green());
}
