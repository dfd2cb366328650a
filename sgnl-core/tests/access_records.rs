// sgnl-core/tests/access_records.rs
// ============================================================================
// Module: Access Record Tests
// Description: Tests for access query and result records.
// Purpose: Ensure decision invariants and conservative defaults hold.
// Dependencies: sgnl-core
// ============================================================================
//! ## Overview
//! Validates the decision-string invariant, action defaulting, and the
//! conservative denied record used for uncovered batch slots.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use sgnl_core::AccessQuery;
use sgnl_core::AccessResult;
use sgnl_core::ActionName;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::RequestId;
use sgnl_core::ResultKind;
use sgnl_core::SearchResult;

fn request_id() -> RequestId {
    RequestId::new("sgnl-00000001-0001-0001")
}

#[test]
fn query_action_defaults_to_execute() {
    let query = AccessQuery::new(AssetId::new("whoami"), None);
    assert_eq!(query.action.as_str(), "execute");
    assert_eq!(query.asset_id.as_ref().map(AssetId::as_str), Some("whoami"));
}

#[test]
fn query_honors_explicit_action() {
    let query = AccessQuery::new(AssetId::new("cat"), Some(ActionName::sudo()));
    assert_eq!(query.action.as_str(), "sudo");
}

#[test]
fn allowed_result_matches_decision_string() {
    let query = AccessQuery::new(AssetId::new("whoami"), Some(ActionName::sudo()));
    let result =
        AccessResult::allowed(PrincipalId::new("bob"), &query, String::new(), request_id());
    assert!(result.is_allowed());
    assert_eq!(result.decision, "Allow");
    assert_eq!(result.error_code, 0);
    assert!(result.error_message.is_empty());
}

#[test]
fn denied_result_is_never_allowed() {
    let query = AccessQuery::new(AssetId::new("/etc/shadow"), Some(ActionName::new("cat")));
    let result = AccessResult::denied(
        PrincipalId::new("alice"),
        &query,
        "Deny".to_string(),
        "sensitive path".to_string(),
        request_id(),
    );
    assert!(result.is_denied());
    assert!(!result.is_allowed());
    assert_eq!(result.reason, "sensitive path");
}

#[test]
fn synthetic_denied_carries_deny_decision_string() {
    let query = AccessQuery::new(AssetId::new("tail"), None);
    let result = AccessResult::synthetic_denied(PrincipalId::new("alice"), &query, request_id());
    assert_eq!(result.result, ResultKind::Denied);
    assert_eq!(result.decision, "Deny");
    assert!(result.reason.is_empty());
}

#[test]
fn search_result_counts_assets() {
    let empty = SearchResult::found(
        PrincipalId::new("carol"),
        ActionName::list(),
        Vec::new(),
        request_id(),
    );
    assert_eq!(empty.asset_count(), 0);
    assert!(!empty.has_more_pages);
    assert!(empty.next_page_token.is_none());

    let found = SearchResult::found(
        PrincipalId::new("carol"),
        ActionName::execute(),
        vec![AssetId::new("whoami"), AssetId::new("uptime")],
        request_id(),
    );
    assert_eq!(found.asset_count(), 2);
}

#[test]
fn result_kind_predicates_partition_the_taxonomy() {
    let kinds = [
        ResultKind::Ok,
        ResultKind::Allowed,
        ResultKind::Denied,
        ResultKind::Error,
        ResultKind::ConfigError,
        ResultKind::NetworkError,
        ResultKind::AuthError,
        ResultKind::TimeoutError,
        ResultKind::InvalidRequest,
        ResultKind::MemoryError,
    ];
    for kind in kinds {
        let classes =
            usize::from(kind.is_allowed()) + usize::from(kind.is_denied()) + usize::from(kind.is_error());
        assert!(classes <= 1, "{kind} matched multiple classes");
    }
    assert!(ResultKind::NetworkError.is_error());
    assert!(!ResultKind::Ok.is_error());
}
