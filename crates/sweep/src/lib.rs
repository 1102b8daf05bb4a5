//! Filesystem collaborators for the retention engine
//!
//! This crate provides:
//! - Candidate enumeration with ignore and pattern filtering
//! - Deletion with dry-run and per-file confirmation

pub mod delete;
pub mod source;

// Re-exports
pub use delete::{remove_files, ConfirmPrompt, DeleteOptions, DeleteReport, StdinPrompt};
pub use source::list_files;
