// src/cli/mod.rs
//! Argument parsing and command handlers for the binaries.

pub mod args;
pub mod handlers;

pub use args::{AggregateArgs, ImportArgs, NormalizeArgs};
pub use handlers::{run_aggregate, run_import, run_normalize};
