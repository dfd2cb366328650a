// sgnl-client/tests/search.rs
// =============================================================================
// Module: Asset Search Tests
// Description: Search request shape, allow filtering, and display attributes.
// Purpose: Ensure search collects only allowed assets and defaults to `list`.
// =============================================================================
//! ## Overview
//! Asset search posts an asset-less query, collects `assetId` from allowed
//! decisions only, honors the configured display attribute with an `assetId`
//! fallback, and carries no pagination on the wire.

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

use sgnl_config::CommandAttribute;
use sgnl_core::ActionName;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::ResultKind;

mod common;

#[test]
fn search_collects_allowed_assets() {
    let (mut client, state) = common::client_with_mock();
    state.push_ok(
        r#"{"decisions": [
            {"decision": "Allow", "assetId": "whoami"},
            {"decision": "Deny", "assetId": "reboot"},
            {"decision": "Allow", "assetId": "uptime"}
        ]}"#,
    );
    let result = client
        .search_assets(&PrincipalId::new("carol"), Some(ActionName::execute()))
        .expect("search succeeds");
    assert_eq!(result.result, ResultKind::Ok);
    assert_eq!(result.asset_count(), 2);
    assert_eq!(result.asset_ids[0].as_str(), "whoami");
    assert_eq!(result.asset_ids[1].as_str(), "uptime");
}

#[test]
fn search_with_no_allowed_decisions_returns_empty_list() {
    let (mut client, state) = common::client_with_mock();
    state.push_ok(r#"{"decisions": [{"decision": "Deny", "assetId": "a"}]}"#);
    let result = client
        .search_assets(&PrincipalId::new("carol"), None)
        .expect("search succeeds");
    assert_eq!(result.asset_count(), 0);
    assert!(result.asset_ids.is_empty());
}

#[test]
fn search_action_defaults_to_list() {
    let (mut client, state) = common::client_with_mock();
    state.push_ok(r#"{"decisions": []}"#);
    client.search_assets(&PrincipalId::new("carol"), None).expect("search succeeds");
    let calls = state.calls();
    assert_eq!(calls[0].endpoint, "/access/v2/search");
    assert_eq!(calls[0].body["queries"][0]["action"], "list");
    assert!(calls[0].body["queries"][0].get("assetId").is_none());
}

#[test]
fn search_carries_no_pagination() {
    let (mut client, state) = common::client_with_mock();
    state.push_ok(r#"{"decisions": [{"decision": "Allow", "assetId": "whoami"}]}"#);
    let result = client
        .search_assets(&PrincipalId::new("carol"), None)
        .expect("search succeeds");
    assert!(result.next_page_token.is_none());
    assert!(!result.has_more_pages);
}

#[test]
fn display_attribute_selects_from_decision_attributes() {
    let (mut client, state) = common::client_with_mock();
    client.set_command_attribute(CommandAttribute::DisplayName);
    state.push_ok(
        r#"{"decisions": [
            {"decision": "Allow", "assetId": "cmd-001",
             "attributes": {"name": "whoami", "displayName": "Who Am I"}},
            {"decision": "Allow", "assetId": "cmd-002"}
        ]}"#,
    );
    let result = client
        .search_assets(&PrincipalId::new("carol"), Some(ActionName::execute()))
        .expect("search succeeds");
    assert_eq!(result.asset_ids[0].as_str(), "Who Am I");
    assert_eq!(result.asset_ids[1].as_str(), "cmd-002", "missing attribute falls back to assetId");
}

#[test]
fn id_attribute_ignores_decision_attributes() {
    let (mut client, state) = common::client_with_mock();
    client.set_command_attribute(CommandAttribute::Id);
    state.push_ok(
        r#"{"decisions": [
            {"decision": "Allow", "assetId": "cmd-001",
             "attributes": {"name": "whoami"}}
        ]}"#,
    );
    let result = client
        .search_assets(&PrincipalId::new("carol"), None)
        .expect("search succeeds");
    assert_eq!(result.asset_ids[0].as_str(), "cmd-001");
}

#[test]
fn allowed_decision_without_asset_id_is_skipped() {
    let (mut client, state) = common::client_with_mock();
    state.push_ok(r#"{"decisions": [{"decision": "Allow"}]}"#);
    let result = client
        .search_assets(&PrincipalId::new("carol"), None)
        .expect("search succeeds");
    assert_eq!(result.asset_count(), 0);
}
