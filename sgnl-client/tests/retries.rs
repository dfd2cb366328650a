// sgnl-client/tests/retries.rs
// =============================================================================
// Module: Retry Tests
// Description: Bounded retry behavior for transient transport failures.
// Purpose: Ensure only network/timeout failures retry, never auth.
// =============================================================================
//! ## Overview
//! With the default policy every failure surfaces after a single attempt.
//! With a configured retry count, network and timeout failures are retried
//! up to the bound while authentication failures surface immediately.

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

use sgnl_client::ClientError;
use sgnl_client::RetryPolicy;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::ResultKind;

mod common;

fn fast_retry(count: u32) -> RetryPolicy {
    RetryPolicy {
        retry_count: count,
        retry_delay_ms: 0,
    }
}

#[test]
fn default_policy_performs_exactly_one_attempt() {
    let (mut client, state) = common::client_with_mock();
    state.push_err(ClientError::Network("connection refused".to_string()));
    let err = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect_err("network failure surfaces");
    assert_eq!(err.kind(), ResultKind::NetworkError);
    assert_eq!(state.call_count(), 1);
}

#[test]
fn network_failures_retry_up_to_the_bound() {
    let (mut client, state) = common::client_with_retry(fast_retry(2));
    state.push_err(ClientError::Network("connection refused".to_string()));
    state.push_err(ClientError::Network("connection reset".to_string()));
    state.push_ok(r#"{"decisions": [{"decision": "Allow"}]}"#);
    let kind = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect("third attempt succeeds");
    assert_eq!(kind, ResultKind::Allowed);
    assert_eq!(state.call_count(), 3);
}

#[test]
fn exhausted_retries_surface_the_final_failure() {
    let (mut client, state) = common::client_with_retry(fast_retry(1));
    state.push_err(ClientError::Network("refused".to_string()));
    state.push_err(ClientError::Timeout("deadline".to_string()));
    let err = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect_err("retries exhausted");
    assert_eq!(err.kind(), ResultKind::TimeoutError);
    assert_eq!(state.call_count(), 2);
}

#[test]
fn timeouts_are_retryable() {
    let (mut client, state) = common::client_with_retry(fast_retry(1));
    state.push_err(ClientError::Timeout("deadline".to_string()));
    state.push_ok(r#"{"decisions": [{"decision": "Allow"}]}"#);
    let kind = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect("second attempt succeeds");
    assert_eq!(kind, ResultKind::Allowed);
    assert_eq!(state.call_count(), 2);
}

#[test]
fn auth_failures_are_never_retried() {
    let (mut client, state) = common::client_with_retry(fast_retry(3));
    state.push_status(401, "");
    let err = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect_err("auth failure surfaces");
    assert_eq!(err.kind(), ResultKind::AuthError);
    assert_eq!(state.call_count(), 1);
}

#[test]
fn server_errors_count_as_network_failures_for_retry() {
    let (mut client, state) = common::client_with_retry(fast_retry(1));
    state.push_status(502, "");
    state.push_ok(r#"{"decisions": [{"decision": "Allow"}]}"#);
    let kind = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect("retry after 5xx succeeds");
    assert_eq!(kind, ResultKind::Allowed);
    assert_eq!(state.call_count(), 2);
}

#[test]
fn decision_responses_are_never_retried() {
    let (mut client, state) = common::client_with_retry(fast_retry(3));
    state.push_ok(r#"{"decisions": [{"decision": "Deny"}]}"#);
    let kind = client
        .check_access(&PrincipalId::new("alice"), &AssetId::new("cat"), None)
        .expect("denied decision is a valid outcome");
    assert_eq!(kind, ResultKind::Denied);
    assert_eq!(state.call_count(), 1);
}
