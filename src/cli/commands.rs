//! CLI command implementations
//!
//! Commands are thin: they open the function against the file-backed
//! platform, call one lifecycle operation and shape its result as JSON.

use std::fs;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::functions::Function;
use crate::observability::Logger;
use crate::service::{FileService, FunctionService};

use super::args::{Cli, Command, Target};
use super::errors::CliResult;
use super::io::{write_error, write_response};

/// Run a parsed command line, writing one JSON response to stdout
pub fn run_command(cli: Cli) -> CliResult<()> {
    Logger::set_enabled(!cli.quiet);

    match execute(&cli.command, &cli.target) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

/// Execute a command and return its response data
pub fn execute(command: &Command, target: &Target) -> CliResult<Value> {
    let service = Arc::new(FileService::new(&target.state));

    match command {
        Command::Validate => validate(target, service),
        Command::Delete => delete(target, service),
        Command::Rollback { version } => rollback(target, service, version.as_deref()),
        Command::List => list(target, service),
        Command::Publish { code, description } => {
            publish(target, service, &fs::read(code)?, description)
        }
    }
}

fn open(target: &Target, service: Arc<FileService>) -> CliResult<Function> {
    let service: Arc<dyn FunctionService> = service;
    Ok(Function::open(&target.function, service)?)
}

/// Load and validate function.json
pub fn validate(target: &Target, service: Arc<FileService>) -> CliResult<Value> {
    let function = open(target, service)?;
    Ok(serde_json::to_value(function.config())?)
}

/// Delete the function
pub fn delete(target: &Target, service: Arc<FileService>) -> CliResult<Value> {
    let function = open(target, service)?;
    function.delete()?;
    Ok(json!({ "function": function.name(), "deleted": true }))
}

/// Roll back one step, or to an explicit version
pub fn rollback(
    target: &Target,
    service: Arc<FileService>,
    version: Option<&str>,
) -> CliResult<Value> {
    let function = open(target, service)?;
    rollback_function(&function, version)
}

/// Roll back an opened function, reporting the version the update set.
///
/// The alias is not read again afterwards: once the update succeeded the
/// command has succeeded.
pub fn rollback_function(function: &Function, version: Option<&str>) -> CliResult<Value> {
    let deployed = match version {
        Some(version) => function.rollback_version(version)?,
        None => function.rollback()?,
    };

    Ok(json!({
        "function": function.name(),
        "alias": function.alias(),
        "version": deployed,
    }))
}

/// List eligible versions and the deployed one
pub fn list(target: &Target, service: Arc<FileService>) -> CliResult<Value> {
    let function = open(target, service)?;
    Ok(serde_json::to_value(function.versions()?)?)
}

/// Publish `code` as a new version and point the alias at it.
///
/// Creates the function and the alias on first use.
pub fn publish(
    target: &Target,
    service: Arc<FileService>,
    code: &[u8],
    description: &str,
) -> CliResult<Value> {
    let function = open(target, service.clone())?;

    if !service.has_function(function.name())? {
        service.create_function(function.config())?;
    }

    let record = service.publish_version(function.name(), code, description)?;

    let alias = if service.has_alias(function.name(), function.alias())? {
        service.update_alias(function.name(), function.alias(), &record.version)?
    } else {
        service.create_alias(function.name(), function.alias(), &record.version)?
    };

    Ok(json!({
        "function": function.name(),
        "alias": alias.name,
        "version": record.version,
        "code_sha256": record.code_sha256,
    }))
}
