// sgnl-config/src/lib.rs
// ============================================================================
// Module: SGNL Configuration Library
// Description: Configuration loading and validation for the SGNL integration.
// Purpose: Provide strict, fail-closed config parsing with bounded values.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Configuration is loaded from a JSON file discovered through an explicit
//! path, the `SGNL_CONFIG_PATH` environment override, or the fixed default
//! path. Missing or invalid configuration fails closed: required fields must
//! be present, numeric values are bounded, and the API token never appears in
//! log output or debug formatting.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::CommandAttribute;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_PATH;
pub use config::HttpConfig;
pub use config::LoadOptions;
pub use config::LoggingConfig;
pub use config::SgnlConfig;
pub use config::SudoConfig;

#[cfg(test)]
mod tests {
    //! Test-only lint relaxations for panic-based assertions and debug output.
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
}
