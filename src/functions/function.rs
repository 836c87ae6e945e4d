//! # Function
//!
//! One named function on the remote platform and the alias that
//! selects its deployed version. Every operation re-reads remote state;
//! nothing is cached between calls and concurrent rollbacks against the
//! same alias are not serialised.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::config::FunctionConfig;
use super::errors::{FunctionError, FunctionResult, RollbackError};
use super::resolver::{check_explicit_target, eligible_versions, resolve_rollback_target};
use super::version::{VersionReport, CURRENT_ALIAS};
use crate::observability::{log_event_with_fields, Event};
use crate::service::{FunctionService, ServiceError};

/// A deployable function bound to a service
#[derive(Clone)]
pub struct Function {
    config: FunctionConfig,
    alias: String,
    service: Arc<dyn FunctionService>,
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.config.name)
            .field("alias", &self.alias)
            .field("service", &self.service)
            .finish()
    }
}

impl Function {
    /// Bind a config to a service. Does not validate.
    pub fn new(config: FunctionConfig, service: Arc<dyn FunctionService>) -> Self {
        Self {
            config,
            alias: CURRENT_ALIAS.to_string(),
            service,
        }
    }

    /// Load `function.json` from `dir` and validate it
    pub fn open(dir: &Path, service: Arc<dyn FunctionService>) -> FunctionResult<Self> {
        let config = FunctionConfig::load(dir)?;
        let dir_display = dir.display().to_string();

        if let Err(e) = config.validate() {
            log_event_with_fields(
                Event::ConfigRejected,
                &[("dir", &dir_display), ("error", &e.to_string())],
            );
            return Err(e);
        }

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("dir", &dir_display), ("function", &config.name)],
        );
        Ok(Self::new(config, service))
    }

    /// Manage a different alias than [`CURRENT_ALIAS`]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn config(&self) -> &FunctionConfig {
        &self.config
    }

    /// Delete the function
    pub fn delete(&self) -> FunctionResult<()> {
        log_event_with_fields(Event::DeleteStart, &[("function", self.name())]);

        self.service
            .delete_function(self.name())
            .map_err(|e| self.remote_failure("delete_function", e))?;

        log_event_with_fields(Event::DeleteComplete, &[("function", self.name())]);
        Ok(())
    }

    /// Move the alias one step through the version history.
    ///
    /// From the newest version this steps back to the previous one; from
    /// an older version it steps forward to the next newer one. Returns
    /// the version the alias now points at.
    pub fn rollback(&self) -> FunctionResult<String> {
        self.log_start(None);

        let alias = self
            .service
            .get_alias(self.name(), &self.alias)
            .map_err(|e| self.remote_failure("get_alias", e))?;
        let current = alias.function_version;

        let history = self
            .service
            .list_versions(self.name())
            .map_err(|e| self.remote_failure("list_versions", e))?;
        let eligible = eligible_versions(&history);

        let target = resolve_rollback_target(&current, &eligible)
            .map_err(|e| self.rejected(&current, e))?
            .to_string();

        self.switch(&current, &target)
    }

    /// Point the alias at `version`.
    ///
    /// `version` is trusted: it is not checked against the version
    /// history, only against the version currently deployed. Returns the
    /// version the alias now points at.
    pub fn rollback_version(&self, version: &str) -> FunctionResult<String> {
        self.log_start(Some(version));

        let alias = self
            .service
            .get_alias(self.name(), &self.alias)
            .map_err(|e| self.remote_failure("get_alias", e))?;
        let current = alias.function_version;

        check_explicit_target(&current, version).map_err(|e| self.rejected(&current, e))?;

        self.switch(&current, version)
    }

    /// Version the alias currently points at
    pub fn current_version(&self) -> FunctionResult<String> {
        let alias = self
            .service
            .get_alias(self.name(), &self.alias)
            .map_err(|e| self.remote_failure("get_alias", e))?;
        Ok(alias.function_version)
    }

    /// Eligible versions and the one currently deployed
    pub fn versions(&self) -> FunctionResult<VersionReport> {
        let current = self.current_version()?;
        let history = self
            .service
            .list_versions(self.name())
            .map_err(|e| self.remote_failure("list_versions", e))?;

        Ok(VersionReport {
            function: self.name().to_string(),
            alias: self.alias.clone(),
            current,
            versions: eligible_versions(&history)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
    }

    fn switch(&self, from: &str, to: &str) -> FunctionResult<String> {
        log_event_with_fields(
            Event::RollbackResolved,
            &[
                ("alias", &self.alias),
                ("from", from),
                ("function", self.name()),
                ("to", to),
            ],
        );

        let alias = self
            .service
            .update_alias(self.name(), &self.alias, to)
            .map_err(|e| self.remote_failure("update_alias", e))?;

        log_event_with_fields(
            Event::RollbackComplete,
            &[
                ("alias", &self.alias),
                ("function", self.name()),
                ("version", &alias.function_version),
            ],
        );
        Ok(alias.function_version)
    }

    fn log_start(&self, target: Option<&str>) {
        let mut fields = vec![("alias", self.alias.as_str()), ("function", self.name())];
        if let Some(target) = target {
            fields.push(("target", target));
        }
        log_event_with_fields(Event::RollbackStart, &fields);
    }

    fn rejected(&self, current: &str, err: RollbackError) -> FunctionError {
        log_event_with_fields(
            Event::RollbackRejected,
            &[
                ("current", current),
                ("function", self.name()),
                ("reason", &err.to_string()),
            ],
        );
        FunctionError::Rollback(err)
    }

    fn remote_failure(&self, call: &str, err: ServiceError) -> FunctionError {
        log_event_with_fields(
            Event::RemoteCallFailed,
            &[("call", call), ("error", err.message()), ("function", self.name())],
        );
        FunctionError::Remote(err)
    }
}
