//! CLI module for fnctl
//!
//! Provides command-line interface for:
//! - validate: Load and check function.json
//! - delete: Remove the function
//! - rollback: Move the alias to another version
//! - list: Show versions and the deployed one
//! - publish: Seed the file platform with a new version

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, Target};
pub use commands::{
    delete, execute, list, publish, rollback, rollback_function, run_command, validate,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
