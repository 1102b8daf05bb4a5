//! Candidate file enumeration and filtering

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use cull_core::CandidateFile;
use regex::Regex;
use tracing::{debug, error};

/// List candidate files in `dir`, newest first.
///
/// Only top-level regular files are considered. A file is dropped when any
/// entry of `ignore` matches its name case-insensitively, or when `pattern`
/// is present and does not match. A missing directory is logged and yields
/// an empty list so the caller can move on to its next directory.
pub fn list_files(
    dir: &Path,
    ignore: &[String],
    pattern: Option<&Regex>,
) -> Result<Vec<CandidateFile>> {
    if !dir.is_dir() {
        error!(path = %dir.display(), "directory does not exist");
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        if !metadata.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if is_ignored(&name, ignore) {
            debug!(name = %name, "skipping ignored file");
            continue;
        }
        if let Some(pattern) = pattern {
            if !pattern.is_match(&name) {
                debug!(name = %name, pattern = %pattern, "skipping file not matching pattern");
                continue;
            }
        }

        let accessed = metadata
            .accessed()
            .with_context(|| format!("Failed to read access time of {}", entry.path().display()))?;

        files.push(CandidateFile {
            path: entry.path(),
            name,
            accessed_ms: system_time_ms(accessed),
            len: metadata.len(),
        });
    }

    // Newest first; equal timestamps keep enumeration order.
    files.sort_by(|a, b| b.accessed_ms.cmp(&a.accessed_ms));

    debug!(path = %dir.display(), count = files.len(), "listed candidate files");
    Ok(files)
}

fn is_ignored(name: &str, ignore: &[String]) -> bool {
    let name = name.to_lowercase();
    ignore
        .iter()
        .filter(|needle| !needle.is_empty())
        .any(|needle| name.contains(&needle.to_lowercase()))
}

fn system_time_ms(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(since) => since.as_millis() as i64,
        Err(before) => -(before.duration().as_millis() as i64),
    }
}
