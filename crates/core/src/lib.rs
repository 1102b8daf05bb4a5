//! Retention engine for timestamped file sets
//!
//! This crate provides:
//! - Interval bucket calculator (hourly through yearly, week-start aware)
//! - Tiered retention selector (single shared scan over a sorted file list)
//! - Policy structures and default inheritance
//!
//! Everything here is pure and synchronous; enumeration and deletion live
//! in `cull-sweep`.

pub mod interval;
pub mod policy;
pub mod retention;

// Re-exports
pub use interval::{interval_end, interval_start, Interval};
pub use policy::{DirectoryPolicy, KeepPolicy, ResolvedPolicy};
pub use retention::{plan, select_retained, CandidateFile, PrunePlan};
