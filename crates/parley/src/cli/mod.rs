//! Command-line interface module.
//!
//! This module provides the CLI structure and the startup wiring for the parley binary.

mod commands;
mod run;

pub use commands::Cli;
pub use run::run_interactive;
