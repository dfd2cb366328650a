// sgnl-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for configuration validation tests.
// Purpose: Reduce duplication across integration tests for sgnl-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::PathBuf;

use sgnl_config::ConfigError;
use sgnl_config::LoadOptions;
use sgnl_config::SgnlConfig;
use tempfile::TempDir;

/// Minimal valid document: only the required keys.
pub const MINIMAL_DOCUMENT: &str = r#"{
    "api_url": "sgnlapis.cloud",
    "api_token": "test-token"
}"#;

/// Parses a JSON string with strict validation.
pub fn config_from_json(document: &str) -> Result<SgnlConfig, ConfigError> {
    SgnlConfig::from_json_str(document, &LoadOptions::default())
}

/// Parses a JSON string with bounds checks disabled.
pub fn config_from_json_lenient(document: &str) -> Result<SgnlConfig, ConfigError> {
    let options = LoadOptions {
        strict_validation: false,
        ..LoadOptions::default()
    };
    SgnlConfig::from_json_str(document, &options)
}

/// Writes a document into a temp dir and returns its path.
pub fn write_config(dir: &TempDir, document: &str) -> PathBuf {
    let path = dir.path().join("config.json");
    fs::write(&path, document).expect("write config fixture");
    path
}

/// Asserts that the error display contains the given needle.
pub fn assert_error_contains(result: Result<SgnlConfig, ConfigError>, needle: &str) {
    match result {
        Err(error) => {
            let message = error.to_string();
            assert!(message.contains(needle), "error {message:?} did not contain {needle:?}");
        }
        Ok(_) => panic!("expected invalid config containing {needle:?}"),
    }
}
