//! Configuration file loading and validation
//!
//! `cull` reads a TOML file (JSON is accepted for `.json` paths). Search
//! order when `--config` is not given: `./cull.toml`, then the per-user
//! location `<config dir>/cull/config.toml`.

use std::path::{Path, PathBuf};

use chrono::Weekday;
use cull_core::{DirectoryPolicy, ResolvedPolicy};
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "cull.toml";

/// Errors surfaced while locating, reading, or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no configuration file found; create ./cull.toml or pass --config (try `cull config example`)")]
    NotFound,
    #[error("failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}")]
    ParseToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse {path}")]
    ParseJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("start_of_week must be 0 (Sunday) through 6 (Saturday), got {0}")]
    InvalidWeekStart(u8),
    #[error("invalid filename pattern {pattern:?} for directory {path:?}")]
    InvalidPattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Top-level configuration file model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Day the week starts on, 0 = Sunday .. 6 = Saturday
    pub start_of_week: u8,
    /// Report deletions without removing anything
    pub dry_run: bool,
    /// Ask before each deletion
    pub force_confirm: bool,
    /// Case-insensitive substrings; matching files are never candidates
    pub ignore: Vec<String>,
    /// Defaults inherited by every directory entry
    pub default: DirectoryPolicy,
    /// Directories to prune
    #[serde(rename = "directory")]
    pub directories: Vec<DirectoryPolicy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_of_week: 0,
            dry_run: false,
            force_confirm: false,
            ignore: Vec::new(),
            default: DirectoryPolicy::default(),
            directories: Vec::new(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `path`, or from the search
    /// order when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => find_config().ok_or(ConfigError::NotFound)?,
        };

        let text = std::fs::read_to_string(&path)
            .map_err(|source| ConfigError::Io { path: path.clone(), source })?;

        let config: Config = if is_json(&path) {
            serde_json::from_str(&text)
                .map_err(|source| ConfigError::ParseJson { path: path.clone(), source })?
        } else {
            toml::from_str(&text)
                .map_err(|source| ConfigError::ParseToml { path: path.clone(), source })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check field ranges and compile every filename pattern once, so a
    /// broken pattern fails the run before anything is deleted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.week_start()?;

        for policy in self.resolved_policies() {
            if let Some(pattern) = &policy.pattern {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    path: policy.path.display().to_string(),
                    pattern: pattern.clone(),
                    source,
                })?;
            }
        }

        Ok(())
    }

    /// Week-start day as chrono's type.
    pub fn week_start(&self) -> Result<Weekday, ConfigError> {
        weekday_from_sunday_index(self.start_of_week)
            .ok_or(ConfigError::InvalidWeekStart(self.start_of_week))
    }

    /// Policies with defaults applied, one per configured directory.
    pub fn resolved_policies(&self) -> Vec<ResolvedPolicy> {
        let base = self.default.inherit(&DirectoryPolicy::fallback());
        self.directories.iter().map(|entry| entry.resolve(&base)).collect()
    }
}

/// Map 0 = Sunday .. 6 = Saturday to a weekday.
pub fn weekday_from_sunday_index(day: u8) -> Option<Weekday> {
    match day {
        0 => Some(Weekday::Sun),
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        _ => None,
    }
}

/// Per-user configuration location, whether or not the file exists.
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cull").join("config.toml"))
}

/// First existing file in the search order.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }
    config_file_path().filter(|path| path.is_file())
}

/// Starter configuration, printed by `cull config example`.
pub fn example_config() -> &'static str {
    r#"# cull configuration
#
# Keep-counts below mean: retain that many of the most recent files
# (keep_last), then one file per distinct hour/day/week/month/year for the
# next keep_hourly/keep_daily/... buckets. A count of -1 inherits from
# [default]; a count of 0 disables the tier.

start_of_week = 0      # 0 = Sunday .. 6 = Saturday
dry_run = false
force_confirm = false
ignore = [".gitkeep"]

[default]
keep_last = 3
keep_daily = 7
keep_weekly = 4
keep_monthly = 6

[[directory]]
path = "/srv/backups/db"
pattern = '^db-.*\.sql\.gz$'

[[directory]]
path = "/srv/backups/files"
keep_daily = 14
keep_yearly = 2
"#
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
