//! Function lifecycle invariant tests
//!
//! Exercises validation, delete and both rollback paths against the
//! in-memory service, checking the exact remote calls issued.

use std::fs;
use std::sync::Arc;

use fnctl::functions::{
    Function, FunctionConfig, FunctionError, RollbackError, CONFIG_FILE, CURRENT_ALIAS,
};
use fnctl::observability::Logger;
use fnctl::service::{FunctionService, MemoryService, Operation, ServiceCall};
use tempfile::tempdir;

fn quiet() {
    Logger::set_enabled(false);
}

fn function(service: &Arc<MemoryService>) -> Function {
    let config = FunctionConfig {
        name: "testfn".to_string(),
        ..FunctionConfig::default()
    };
    Function::new(config, service.clone())
}

fn deployed(current: &str) -> Arc<MemoryService> {
    Arc::new(
        MemoryService::new()
            .with_versions("testfn", &["$LATEST", "1", "2"])
            .with_alias("testfn", CURRENT_ALIAS, current),
    )
}

fn update_to(version: &str) -> ServiceCall {
    ServiceCall::UpdateAlias {
        function_name: "testfn".to_string(),
        alias_name: "current".to_string(),
        version: version.to_string(),
    }
}

// =============================================================================
// CONFIG VALIDATION
// =============================================================================

/// Test: a definition missing one required field is rejected naming it.
#[test]
fn test_open_requires_config_values() {
    quiet();
    let full = r#""name": "testfn", "runtime": "nodejs", "memory": 128, "timeout": 5, "role": "r""#;
    let cases = [
        ("Name", r#""name": "testfn", "#),
        ("Runtime", r#""runtime": "nodejs", "#),
        ("Memory", r#""memory": 128, "#),
        ("Timeout", r#""timeout": 5, "#),
        ("Role", r#", "role": "r""#),
    ];

    for (field, removed) in cases {
        let dir = tempdir().unwrap();
        let body = format!("{{{}}}", full.replace(removed, ""));
        fs::write(dir.path().join(CONFIG_FILE), body).unwrap();

        let service: Arc<dyn FunctionService> = Arc::new(MemoryService::new());
        let err = Function::open(dir.path(), service).unwrap_err();
        assert_eq!(err.to_string(), format!("{}: zero value", field));
    }
}

/// Test: validation happens before any remote call.
#[test]
fn test_invalid_config_makes_no_remote_calls() {
    quiet();
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(CONFIG_FILE), r#"{"name": "testfn"}"#).unwrap();
    let service = Arc::new(MemoryService::new());

    assert!(Function::open(dir.path(), service.clone()).is_err());
    assert!(service.calls().is_empty());
}

// =============================================================================
// DELETE
// =============================================================================

#[test]
fn test_delete_success() {
    quiet();
    let service = deployed("1");

    function(&service).delete().unwrap();

    assert_eq!(
        service.calls(),
        vec![ServiceCall::DeleteFunction {
            name: "testfn".to_string()
        }]
    );
    assert!(!service.contains("testfn"));
}

#[test]
fn test_delete_failed() {
    quiet();
    let service = Arc::new(MemoryService::new().fail_on(Operation::DeleteFunction, "API err"));

    let err = function(&service).delete().unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert!(err.is_remote());
}

// =============================================================================
// ALIAS-RELATIVE ROLLBACK
// =============================================================================

#[test]
fn test_rollback_get_alias_failed() {
    quiet();
    let service = Arc::new(deployed_with_failure(Operation::GetAlias));

    let err = function(&service).rollback().unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert_eq!(
        service.calls(),
        vec![ServiceCall::GetAlias {
            function_name: "testfn".to_string(),
            alias_name: "current".to_string(),
        }]
    );
}

#[test]
fn test_rollback_list_versions_failed() {
    quiet();
    let service = Arc::new(deployed_with_failure(Operation::ListVersions));

    let err = function(&service).rollback().unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert_eq!(service.call_count(Operation::ListVersions), 1);
    assert_eq!(service.call_count(Operation::UpdateAlias), 0);
}

#[test]
fn test_rollback_few_versions() {
    quiet();
    let service = Arc::new(
        MemoryService::new()
            .with_versions("testfn", &["$LATEST"])
            .with_alias("testfn", CURRENT_ALIAS, "1"),
    );

    let err = function(&service).rollback().unwrap_err();
    assert_eq!(err.to_string(), "Can't rollback. Only one version deployed.");
    assert_eq!(service.call_count(Operation::UpdateAlias), 0);
}

#[test]
fn test_rollback_one_published_version() {
    quiet();
    let service = Arc::new(
        MemoryService::new()
            .with_versions("testfn", &["$LATEST", "1"])
            .with_alias("testfn", CURRENT_ALIAS, "1"),
    );

    let err = function(&service).rollback().unwrap_err();
    assert!(matches!(
        err,
        FunctionError::Rollback(RollbackError::OnlyOneVersion)
    ));
}

/// Test: on the newest version, rollback steps back one.
#[test]
fn test_rollback_previous_version() {
    quiet();
    let service = deployed("2");

    function(&service).rollback().unwrap();

    assert_eq!(service.calls().last(), Some(&update_to("1")));
    assert_eq!(
        service.alias_version("testfn", CURRENT_ALIAS),
        Some("1".to_string())
    );
}

/// Test: on an older version, rollback steps forward to the next one.
#[test]
fn test_rollback_latest_version() {
    quiet();
    let service = deployed("1");

    function(&service).rollback().unwrap();

    assert_eq!(service.calls().last(), Some(&update_to("2")));
}

#[test]
fn test_rollback_update_alias_failed() {
    quiet();
    let service = Arc::new(deployed_with_failure(Operation::UpdateAlias));

    let err = function(&service).rollback().unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert_eq!(
        service.alias_version("testfn", CURRENT_ALIAS),
        Some("1".to_string())
    );
}

/// Test: repeated rollbacks toggle between the two newest versions.
#[test]
fn test_rollback_twice_returns_to_start() {
    quiet();
    let service = deployed("2");
    let function = function(&service);

    function.rollback().unwrap();
    function.rollback().unwrap();

    assert_eq!(function.current_version().unwrap(), "2");
}

// =============================================================================
// EXPLICIT-VERSION ROLLBACK
// =============================================================================

#[test]
fn test_rollback_version_get_alias_failed() {
    quiet();
    let service = Arc::new(deployed_with_failure(Operation::GetAlias));

    let err = function(&service).rollback_version("1").unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert_eq!(service.call_count(Operation::UpdateAlias), 0);
}

#[test]
fn test_rollback_version_same_version() {
    quiet();
    let service = deployed("2");

    let err = function(&service).rollback_version("2").unwrap_err();
    assert_eq!(err.to_string(), "Specified version currently deployed.");
    assert_eq!(service.call_count(Operation::UpdateAlias), 0);
}

#[test]
fn test_rollback_version_success() {
    quiet();
    let service = deployed("2");

    function(&service).rollback_version("1").unwrap();

    assert_eq!(service.calls().last(), Some(&update_to("1")));
    assert_eq!(service.call_count(Operation::ListVersions), 0);
}

#[test]
fn test_rollback_version_update_alias_failed() {
    quiet();
    let service = Arc::new(deployed_with_failure(Operation::UpdateAlias));

    let err = function(&service).rollback_version("2").unwrap_err();
    assert_eq!(err.to_string(), "API err");
    assert!(err.is_remote());
    assert_eq!(
        service.alias_version("testfn", CURRENT_ALIAS),
        Some("1".to_string())
    );
}

/// Test: the explicit target is not checked against the version history.
///
/// Version "3" was never published, yet the alias update is issued.
/// Whether to verify existence first is an open product question.
#[test]
fn test_rollback_version_does_not_check_history() {
    quiet();
    let service = deployed("2");

    function(&service).rollback_version("3").unwrap();

    assert_eq!(service.calls().last(), Some(&update_to("3")));
    assert_eq!(
        service.alias_version("testfn", CURRENT_ALIAS),
        Some("3".to_string())
    );
}

fn deployed_with_failure(operation: Operation) -> MemoryService {
    MemoryService::new()
        .with_versions("testfn", &["$LATEST", "1", "2"])
        .with_alias("testfn", CURRENT_ALIAS, "1")
        .fail_on(operation, "API err")
}
