//! # Rollback Resolver
//!
//! Picks the version an alias should move to. Versions are compared by
//! their position in the reported history, never numerically: the
//! identifiers are opaque strings and the history is assumed to be
//! reported oldest first.

use super::errors::RollbackError;
use super::version::VersionRecord;

/// Versions eligible for rollback, in reported order, without `$LATEST`
pub fn eligible_versions(history: &[VersionRecord]) -> Vec<&str> {
    history
        .iter()
        .filter(|v| !v.is_latest())
        .map(|v| v.version.as_str())
        .collect()
}

/// Target for an alias-relative rollback from `current`.
///
/// - fewer than two eligible versions: rejected
/// - `current` is the newest: step back one version
/// - a newer version follows `current`: step forward to it
/// - `current` is not in the list: the newest version
pub fn resolve_rollback_target<'a>(
    current: &str,
    eligible: &[&'a str],
) -> Result<&'a str, RollbackError> {
    if eligible.len() < 2 {
        return Err(RollbackError::OnlyOneVersion);
    }

    let last = eligible.len() - 1;
    let target = match eligible.iter().position(|v| *v == current) {
        Some(i) if i < last => eligible[i + 1],
        Some(i) => eligible[i - 1],
        None => eligible[last],
    };
    Ok(target)
}

/// Reject an explicit rollback onto the version already deployed.
///
/// The target is not checked against the version history.
pub fn check_explicit_target(current: &str, target: &str) -> Result<(), RollbackError> {
    if current == target {
        return Err(RollbackError::AlreadyDeployed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(versions: &[&str]) -> Vec<VersionRecord> {
        versions.iter().map(|v| VersionRecord::new(*v)).collect()
    }

    #[test]
    fn test_latest_filtered_order_kept() {
        let h = history(&["$LATEST", "1", "2", "3"]);
        assert_eq!(eligible_versions(&h), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_latest_anywhere_is_filtered() {
        let h = history(&["1", "$LATEST", "2"]);
        assert_eq!(eligible_versions(&h), vec!["1", "2"]);
    }

    #[test]
    fn test_step_back_from_newest() {
        assert_eq!(resolve_rollback_target("2", &["1", "2"]), Ok("1"));
        assert_eq!(resolve_rollback_target("5", &["3", "4", "5"]), Ok("4"));
    }

    #[test]
    fn test_step_forward_from_older() {
        assert_eq!(resolve_rollback_target("1", &["1", "2"]), Ok("2"));
        assert_eq!(resolve_rollback_target("3", &["3", "4", "5"]), Ok("4"));
    }

    #[test]
    fn test_too_few_versions() {
        assert_eq!(
            resolve_rollback_target("1", &[]),
            Err(RollbackError::OnlyOneVersion)
        );
        assert_eq!(
            resolve_rollback_target("1", &["1"]),
            Err(RollbackError::OnlyOneVersion)
        );
    }

    #[test]
    fn test_unknown_current_goes_to_newest() {
        assert_eq!(resolve_rollback_target("$LATEST", &["1", "2", "3"]), Ok("3"));
        assert_eq!(resolve_rollback_target("9", &["1", "2"]), Ok("2"));
    }

    #[test]
    fn test_position_not_numeric() {
        // Non-numeric identifiers are ranked by position only
        assert_eq!(resolve_rollback_target("b", &["c", "a", "b"]), Ok("a"));
        assert_eq!(resolve_rollback_target("c", &["c", "a", "b"]), Ok("a"));
    }

    #[test]
    fn test_explicit_target() {
        assert_eq!(
            check_explicit_target("2", "2"),
            Err(RollbackError::AlreadyDeployed)
        );
        assert_eq!(check_explicit_target("2", "3"), Ok(()));
    }
}
