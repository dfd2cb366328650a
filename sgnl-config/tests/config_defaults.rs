// sgnl-config/tests/config_defaults.rs
// =============================================================================
// Module: Config Defaults Tests
// Description: Validate default behavior and the canonical round trip.
// Purpose: Ensure a minimal document resolves to the documented defaults.
// =============================================================================
//! ## Overview
//! A document carrying only the required keys must resolve to the documented
//! defaults, and rendering a resolved configuration back to JSON and parsing
//! it again must yield the same configuration.

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
use sgnl_core::LogLevel;

mod common;

#[test]
fn minimal_document_resolves_to_defaults() {
    let config = common::config_from_json(common::MINIMAL_DOCUMENT).expect("valid config");
    assert_eq!(config.api_url(), "sgnlapis.cloud");
    assert_eq!(config.token(), "test-token");
    assert_eq!(config.tenant(), "");
    assert_eq!(config.http().timeout_seconds, 10);
    assert_eq!(config.http().connect_timeout_seconds, 3);
    assert!(config.http().ssl_verify_peer);
    assert!(config.http().ssl_verify_host);
    assert_eq!(config.http().user_agent, "SGNL-Client/1.0");
    assert!(config.http().ca_bundle.is_none());
    assert!(!config.is_debug_enabled());
    assert_eq!(config.logging().log_level, "info");
    assert!(config.sudo().access_msg);
    assert_eq!(config.sudo().command_attribute, CommandAttribute::Id);
    assert!(config.sudo().batch_evaluation);
}

#[test]
fn min_log_level_follows_configured_name() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "log_level": "warning"
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    assert_eq!(config.min_log_level(), LogLevel::Warning);
}

#[test]
fn debug_flag_forces_debug_level() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "debug": true,
        "log_level": "error"
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    assert_eq!(config.min_log_level(), LogLevel::Debug);
}

#[test]
fn canonical_document_round_trips() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "round-trip-token",
        "tenant": "acme",
        "http": {"timeout": 15, "connect_timeout": 5, "ssl_verify_peer": true,
                 "ssl_verify_host": false, "user_agent": "SGNL-Client/1.0"},
        "sudo": {"access_msg": false, "command_attribute": "displayName",
                 "batch_evaluation": false},
        "debug": false, "log_level": "notice"
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    let canonical = config.canonical_document();
    let reparsed =
        common::config_from_json(&canonical.to_string()).expect("canonical form parses");
    assert_eq!(reparsed.canonical_document(), canonical);
}

#[test]
fn defaults_round_trip_through_canonical_form() {
    let config = common::config_from_json(common::MINIMAL_DOCUMENT).expect("valid config");
    let canonical = config.canonical_document();
    let reparsed =
        common::config_from_json(&canonical.to_string()).expect("canonical form parses");
    assert_eq!(reparsed.canonical_document(), canonical);
}

#[test]
fn debug_formatting_redacts_the_token() {
    let config = common::config_from_json(common::MINIMAL_DOCUMENT).expect("valid config");
    let rendered = format!("{config:?}");
    assert!(!rendered.contains("test-token"), "token leaked into debug output");
    assert!(rendered.contains("<redacted>"));
}
