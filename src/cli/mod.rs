//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for a specific CLI subcommand and
//! returns the exit code the process should end with.

mod import;
mod prepare;

pub use import::{ImportAs, ImportCommand, run_import};
pub use prepare::run_prepare;

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Import (or preparation) succeeded
    pub const SUCCESS: i32 = 0;
    /// The importer reported a failure summary
    pub const IMPORT_FAILED: i32 = 1;
    /// An error occurred before the importer could run
    pub const ERROR: i32 = 3;
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable lines
    #[default]
    Text,
    /// Pretty printed JSON
    Json,
}
