//! CLI argument definitions using clap
//!
//! Commands:
//! - fnctl validate
//! - fnctl delete
//! - fnctl rollback [--version <v>]
//! - fnctl list
//! - fnctl publish <code>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// fnctl - validate, delete and roll back a serverless function
#[derive(Parser, Debug)]
#[command(name = "fnctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub target: Target,

    /// Suppress structured logs on stderr
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Where the function definition and platform state live
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Function directory containing function.json
    #[arg(long, global = true, default_value = ".")]
    pub function: PathBuf,

    /// Platform state file
    #[arg(long, global = true, default_value = "./fnctl-state.json")]
    pub state: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load and validate function.json
    Validate,

    /// Delete the function
    Delete,

    /// Roll the alias back (or forward) one version, or to --version
    Rollback {
        /// Explicit version to deploy
        #[arg(long)]
        version: Option<String>,
    },

    /// List published versions and the deployed one
    List,

    /// Publish code as a new version and point the alias at it
    Publish {
        /// File holding the function code
        code: PathBuf,

        /// Version description
        #[arg(long, default_value = "")]
        description: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
