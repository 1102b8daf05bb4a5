//! Retention policy structures and default inheritance
//!
//! Policies arrive configuration-shaped: unset keep-counts are negative and
//! unset strings are blank, meaning "inherit from the default entry". The
//! merge is an explicit per-field operation, so the inheritance rule is
//! visible and testable.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::interval::Interval;

/// Effective keep-counts for one directory, after defaults are applied.
/// A count of zero disables its tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeepPolicy {
    pub last: u32,
    pub hourly: u32,
    pub daily: u32,
    pub weekly: u32,
    pub monthly: u32,
    pub yearly: u32,
}

impl KeepPolicy {
    /// Tier rules in scan priority order, `Last` first.
    pub fn rules(&self) -> [(Interval, u32); 6] {
        [
            (Interval::Last, self.last),
            (Interval::Hourly, self.hourly),
            (Interval::Daily, self.daily),
            (Interval::Weekly, self.weekly),
            (Interval::Monthly, self.monthly),
            (Interval::Yearly, self.yearly),
        ]
    }

    /// True when every tier is disabled.
    pub fn is_empty(&self) -> bool {
        self.rules().iter().all(|&(_, count)| count == 0)
    }
}

/// One retention rule as written in configuration.
///
/// Negative counts and blank strings inherit from the default entry; see
/// [`DirectoryPolicy::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryPolicy {
    /// Directory to prune
    pub path: String,
    /// Regular expression a file name must match to be a candidate
    pub pattern: String,
    pub keep_last: i32,
    pub keep_hourly: i32,
    pub keep_daily: i32,
    pub keep_weekly: i32,
    pub keep_monthly: i32,
    pub keep_yearly: i32,
}

impl Default for DirectoryPolicy {
    fn default() -> Self {
        Self {
            path: String::new(),
            pattern: String::new(),
            keep_last: -1,
            keep_hourly: -1,
            keep_daily: -1,
            keep_weekly: -1,
            keep_monthly: -1,
            keep_yearly: -1,
        }
    }
}

impl DirectoryPolicy {
    /// The hard fallback applied when the configured default leaves fields
    /// unset: keep nothing, prune the current directory.
    pub fn fallback() -> Self {
        Self {
            path: ".".to_string(),
            pattern: String::new(),
            keep_last: 0,
            keep_hourly: 0,
            keep_daily: 0,
            keep_weekly: 0,
            keep_monthly: 0,
            keep_yearly: 0,
        }
    }

    /// Fill unset fields from `default`, keeping the result raw so it can
    /// serve as the default for further merges.
    pub fn inherit(&self, default: &DirectoryPolicy) -> DirectoryPolicy {
        DirectoryPolicy {
            path: merge_text(&self.path, &default.path).to_string(),
            pattern: merge_text(&self.pattern, &default.pattern).to_string(),
            keep_last: merge_count(self.keep_last, default.keep_last),
            keep_hourly: merge_count(self.keep_hourly, default.keep_hourly),
            keep_daily: merge_count(self.keep_daily, default.keep_daily),
            keep_weekly: merge_count(self.keep_weekly, default.keep_weekly),
            keep_monthly: merge_count(self.keep_monthly, default.keep_monthly),
            keep_yearly: merge_count(self.keep_yearly, default.keep_yearly),
        }
    }

    /// Merge against `default` and normalize into a fully-populated policy.
    ///
    /// Always total: counts that are still unset after the merge become
    /// zero, a blank path becomes `"."`, a blank pattern becomes `None`.
    pub fn resolve(&self, default: &DirectoryPolicy) -> ResolvedPolicy {
        let merged = self.inherit(default);
        let path = merge_text(&merged.path, ".");
        let pattern = merged.pattern.trim();

        ResolvedPolicy {
            path: PathBuf::from(path),
            pattern: (!pattern.is_empty()).then(|| merged.pattern.clone()),
            keep: KeepPolicy {
                last: count_or_zero(merged.keep_last),
                hourly: count_or_zero(merged.keep_hourly),
                daily: count_or_zero(merged.keep_daily),
                weekly: count_or_zero(merged.keep_weekly),
                monthly: count_or_zero(merged.keep_monthly),
                yearly: count_or_zero(merged.keep_yearly),
            },
        }
    }
}

/// Fully-populated policy consumed by the retention selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPolicy {
    pub path: PathBuf,
    pub pattern: Option<String>,
    pub keep: KeepPolicy,
}

fn merge_text<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

fn merge_count(value: i32, default: i32) -> i32 {
    if value < 0 {
        default
    } else {
        value
    }
}

fn count_or_zero(value: i32) -> u32 {
    value.max(0) as u32
}
