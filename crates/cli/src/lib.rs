//! cull command internals
//!
//! The binary in `main.rs` is a thin argument parser; configuration and
//! the command implementations live here so integration tests can drive
//! them directly.

pub mod cmd;
pub mod config;
pub mod util;
