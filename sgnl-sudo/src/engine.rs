// sgnl-sudo/src/engine.rs
// ============================================================================
// Module: Sudo Decision Engine
// Description: Principal resolution, query composition, and decision folding.
// Purpose: Keep the decision path pure over an injectable decider.
// Dependencies: libc, sgnl-client, sgnl-config, sgnl-core
// ============================================================================

//! ## Overview
//! The engine composes one query for the base command (action `sudo`) plus
//! one per non-empty argument (the base command as the action), dispatches
//! them through an [`AccessDecider`], and folds the per-query results with
//! AND-of-decisions: the invocation is allowed only when every query is
//! individually allowed, otherwise the aggregate carries the first
//! non-allowed result's kind. Everything here is host-free so the decision
//! path is unit-testable against a stub decider.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::ffi::CStr;

use sgnl_client::AccessDecider;
use sgnl_client::aggregate;
use sgnl_config::SudoConfig;
use sgnl_core::AccessQuery;
use sgnl_core::ActionName;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::ResultKind;

// ============================================================================
// SECTION: Decision Types
// ============================================================================

/// Aggregate outcome of the decision path for one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckDecision {
    /// Every query allowed; the host may execute the command.
    Allowed,
    /// At least one query denied by policy.
    Rejected {
        /// Kind of the first non-allowed result.
        kind: ResultKind,
    },
    /// The decision could not be obtained.
    Failed {
        /// Kind of the failure.
        kind: ResultKind,
    },
}

/// Folds an aggregate kind into the decision shape the plugin maps onto the
/// host's return convention.
const fn decision_from_kind(kind: ResultKind) -> CheckDecision {
    match kind {
        ResultKind::Allowed => CheckDecision::Allowed,
        ResultKind::Denied => CheckDecision::Rejected {
            kind,
        },
        _ => CheckDecision::Failed {
            kind,
        },
    }
}

// ============================================================================
// SECTION: Principal Resolution
// ============================================================================

/// Resolves the acting principal: the `user=` entry of the host-provided
/// user info, then the `SUDO_USER` environment variable, then the password
/// database entry for the real uid, then the literal `unknown`.
#[must_use]
pub fn resolve_principal(user_info: &[String]) -> PrincipalId {
    for entry in user_info {
        if let Some(user) = entry.strip_prefix("user=") {
            if !user.is_empty() {
                return PrincipalId::new(user);
            }
        }
    }
    if let Ok(user) = env::var("SUDO_USER") {
        if !user.is_empty() {
            return PrincipalId::new(user);
        }
    }
    if let Some(name) = passwd_name(unsafe { libc::getuid() }) {
        return PrincipalId::new(name);
    }
    PrincipalId::new("unknown")
}

/// Returns true when the principal may be evaluated: non-empty and not the
/// `unknown` fallback.
#[must_use]
pub fn principal_is_usable(principal: &PrincipalId) -> bool {
    !principal.as_str().is_empty() && principal.as_str() != "unknown"
}

/// Looks up the login name of a uid in the password database.
fn passwd_name(uid: libc::uid_t) -> Option<String> {
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut buf = vec![0_u8; 1024];
    let mut result: *mut libc::passwd = std::ptr::null_mut();
    let rc = unsafe {
        libc::getpwuid_r(
            uid,
            &mut pwd,
            buf.as_mut_ptr().cast::<libc::c_char>(),
            buf.len(),
            &mut result,
        )
    };
    if rc != 0 || result.is_null() {
        return None;
    }
    if pwd.pw_name.is_null() {
        return None;
    }
    let name = unsafe { CStr::from_ptr(pwd.pw_name) }.to_string_lossy().into_owned();
    if name.is_empty() { None } else { Some(name) }
}

// ============================================================================
// SECTION: Query Composition
// ============================================================================

/// Builds the query batch for a command invocation: the base command with
/// action `sudo`, then each non-empty argument with the base command as the
/// action.
#[must_use]
pub fn build_queries(argv: &[String]) -> Vec<AccessQuery> {
    let Some(command) = argv.first() else {
        return Vec::new();
    };
    let mut queries =
        vec![AccessQuery::new(AssetId::new(command.clone()), Some(ActionName::sudo()))];
    for arg in &argv[1..] {
        if !arg.is_empty() {
            queries.push(AccessQuery::new(
                AssetId::new(arg.clone()),
                Some(ActionName::new(command.clone())),
            ));
        }
    }
    queries
}

/// Renders the invocation as one line for diagnostics.
#[must_use]
pub fn command_line(argv: &[String]) -> String {
    argv.join(" ")
}

// ============================================================================
// SECTION: Decision Path
// ============================================================================

/// Evaluates a command invocation. A single-element argv degenerates to one
/// simple check; otherwise the batch is dispatched as one call or one call
/// per query according to `settings.batch_evaluation`. The aggregate is
/// allowed only when every query is allowed.
pub fn check_command(
    decider: &mut dyn AccessDecider,
    settings: &SudoConfig,
    principal: &PrincipalId,
    argv: &[String],
) -> CheckDecision {
    let queries = build_queries(argv);
    let Some(first) = queries.first() else {
        return CheckDecision::Failed {
            kind: ResultKind::InvalidRequest,
        };
    };

    if queries.len() == 1 {
        let asset = first.asset_id.clone().unwrap_or_else(|| AssetId::new(""));
        return match decider.check_access(principal, &asset, Some(ActionName::sudo())) {
            Ok(kind) => decision_from_kind(kind),
            Err(err) => CheckDecision::Failed {
                kind: err.kind(),
            },
        };
    }

    if settings.batch_evaluation {
        return match decider.evaluate_access_batch(principal, &queries) {
            Ok(results) => decision_from_kind(aggregate(&results)),
            Err(err) => CheckDecision::Failed {
                kind: err.kind(),
            },
        };
    }

    for query in &queries {
        let asset = query.asset_id.clone().unwrap_or_else(|| AssetId::new(""));
        match decider.check_access(principal, &asset, Some(query.action.clone())) {
            Ok(kind) if kind.is_allowed() => {}
            Ok(kind) => return decision_from_kind(kind),
            Err(err) => {
                return CheckDecision::Failed {
                    kind: err.kind(),
                };
            }
        }
    }
    CheckDecision::Allowed
}

// ============================================================================
// SECTION: Listing
// ============================================================================

/// Renders the allowed-command listing. With a command argument the single
/// command is checked with action `execute`; otherwise the principal's
/// allowed assets are searched and listed one per line.
pub fn list_commands(
    decider: &mut dyn AccessDecider,
    principal: &PrincipalId,
    argv: &[String],
    list_user: Option<&str>,
) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(command) = argv.first().filter(|command| !command.is_empty()) {
        let suffix = list_user.unwrap_or("");
        let outcome = decider.check_access(
            principal,
            &AssetId::new(command.clone()),
            Some(ActionName::execute()),
        );
        match outcome {
            Ok(kind) if kind.is_allowed() => {
                lines.push(format!("You are allowed to execute '{command}'{suffix}"));
            }
            _ => lines.push(format!("You are NOT allowed to execute '{command}'{suffix}")),
        }
        return lines;
    }

    match decider.search_assets(principal, Some(ActionName::execute())) {
        Ok(result) if result.asset_count() > 0 => {
            lines.push("Allowed commands:".to_string());
            for asset in &result.asset_ids {
                lines.push(format!("  - {asset}"));
            }
        }
        _ => lines.push("No commands are currently allowed.".to_string()),
    }
    lines
}
