//! File deletion with dry-run and confirmation support

use std::io::{self, BufRead, Write};
use std::path::Path;

use cull_core::CandidateFile;
use tracing::{debug, error, info};

/// Deletion behavior switches, combined from configuration and CLI flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Report intended deletions without touching the filesystem
    pub dry_run: bool,
    /// Ask before each deletion
    pub confirm: bool,
}

/// Outcome of one removal pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes_freed: u64,
}

impl DeleteReport {
    /// Fold another report into this one.
    pub fn merge(&mut self, other: &DeleteReport) {
        self.removed += other.removed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.bytes_freed += other.bytes_freed;
    }
}

/// Answers the per-file confirmation question.
///
/// A trait seam so tests can script answers instead of reading stdin.
pub trait ConfirmPrompt {
    fn confirm(&mut self, path: &Path) -> bool;
}

/// Interactive y/n prompt on stdin. Anything other than `y` declines.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl ConfirmPrompt for StdinPrompt {
    fn confirm(&mut self, path: &Path) -> bool {
        print!("Remove '{}'? [y/n]: ", path.display());
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }
}

/// Delete `files`, honoring dry-run and confirmation options.
///
/// A failed deletion is logged and counted; it never aborts the loop, and
/// a declined confirmation skips only that file.
pub fn remove_files(
    files: &[CandidateFile],
    options: DeleteOptions,
    prompt: &mut dyn ConfirmPrompt,
) -> DeleteReport {
    let mut report = DeleteReport::default();

    for file in files {
        if options.dry_run {
            info!(path = %file.path.display(), "dry run: would delete");
            report.removed += 1;
            report.bytes_freed += file.len;
            continue;
        }

        if options.confirm && !prompt.confirm(&file.path) {
            info!(path = %file.path.display(), "skipped by user");
            report.skipped += 1;
            continue;
        }

        match std::fs::remove_file(&file.path) {
            Ok(()) => {
                debug!(path = %file.path.display(), "deleted");
                report.removed += 1;
                report.bytes_freed += file.len;
            }
            Err(err) => {
                error!(path = %file.path.display(), error = %err, "failed to delete");
                report.failed += 1;
            }
        }
    }

    report
}
