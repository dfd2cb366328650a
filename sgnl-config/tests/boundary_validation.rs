// sgnl-config/tests/boundary_validation.rs
// =============================================================================
// Module: Config Boundary Validation Tests
// Description: Validate numeric bounds and flexible value parsing.
// Purpose: Ensure edge values pass and out-of-range values fail distinctly.
// =============================================================================
//! ## Overview
//! Timeout bounds are inclusive at 1-300 seconds (1-60 for connect), boolean
//! keys accept strings, and the command-attribute selector accepts exactly
//! three values.

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
use sgnl_config::ConfigError;

mod common;

fn document_with_timeout(timeout: u64) -> String {
    format!(r#"{{"api_url": "sgnlapis.cloud", "api_token": "t", "http": {{"timeout": {timeout}}}}}"#)
}

fn document_with_connect_timeout(connect: u64) -> String {
    format!(
        r#"{{"api_url": "sgnlapis.cloud", "api_token": "t", "http": {{"connect_timeout": {connect}}}}}"#
    )
}

#[test]
fn timeout_bounds_are_inclusive() {
    assert!(common::config_from_json(&document_with_timeout(1)).is_ok());
    assert!(common::config_from_json(&document_with_timeout(300)).is_ok());
    common::assert_error_contains(
        common::config_from_json(&document_with_timeout(0)),
        "http.timeout",
    );
    common::assert_error_contains(
        common::config_from_json(&document_with_timeout(301)),
        "http.timeout",
    );
}

#[test]
fn connect_timeout_bounds_are_inclusive() {
    assert!(common::config_from_json(&document_with_connect_timeout(1)).is_ok());
    assert!(common::config_from_json(&document_with_connect_timeout(60)).is_ok());
    common::assert_error_contains(
        common::config_from_json(&document_with_connect_timeout(0)),
        "http.connect_timeout",
    );
    common::assert_error_contains(
        common::config_from_json(&document_with_connect_timeout(61)),
        "http.connect_timeout",
    );
}

#[test]
fn out_of_range_values_report_invalid_value_kind() {
    let result = common::config_from_json(&document_with_timeout(301));
    assert!(matches!(result, Err(ConfigError::InvalidValue(_))), "expected InvalidValue: {result:?}");
}

#[test]
fn lenient_validation_skips_bounds_checks() {
    let config =
        common::config_from_json_lenient(&document_with_timeout(0)).expect("lenient load");
    assert_eq!(config.http().timeout_seconds, 0);
}

#[test]
fn top_level_timeout_overrides_http_section() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "timeout_seconds": 42,
        "http": {"timeout": 15}
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    assert_eq!(config.http().timeout_seconds, 42);
}

#[test]
fn boolean_keys_accept_string_forms() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "debug": "1",
        "sudo": {"access_msg": "true", "batch_evaluation": "false"}
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    assert!(config.is_debug_enabled());
    assert!(config.sudo().access_msg);
    assert!(!config.sudo().batch_evaluation);
}

#[test]
fn boolean_keys_treat_unknown_strings_as_false() {
    let document = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "debug": "yes"
    }"#;
    let config = common::config_from_json(document).expect("valid config");
    assert!(!config.is_debug_enabled());
}

#[test]
fn command_attribute_accepts_exactly_three_values() {
    for (value, expected) in [
        ("id", CommandAttribute::Id),
        ("name", CommandAttribute::Name),
        ("displayName", CommandAttribute::DisplayName),
    ] {
        let document = format!(
            r#"{{"api_url": "sgnlapis.cloud", "api_token": "t", "sudo": {{"command_attribute": "{value}"}}}}"#
        );
        let config = common::config_from_json(&document).expect("valid config");
        assert_eq!(config.sudo().command_attribute, expected);
    }

    let invalid = r#"{
        "api_url": "sgnlapis.cloud",
        "api_token": "t",
        "sudo": {"command_attribute": "basename"}
    }"#;
    let result = common::config_from_json(invalid);
    assert!(matches!(result, Err(ConfigError::Parse(_))), "expected Parse: {result:?}");
}
