// sgnl-sudo/src/lib.rs
// ============================================================================
// Module: SGNL Sudo Plugin Library
// Description: Sudo policy plugin backed by the SGNL authorization client.
// Purpose: Expose the policy-plugin ABI plus the testable decision engine.
// Dependencies: crate::{abi, command_info, engine, plugin}
// ============================================================================

//! ## Overview
//! The plugin asks the SGNL access service whether a privileged invocation is
//! permitted before the host executes it. The decision path composes one
//! query for the base command (action `sudo`) plus one per non-empty
//! argument (action = the base command), and accepts only when every query
//! is individually allowed. The C-ABI surface lives in [`plugin`]; everything
//! the host does not touch directly is ordinary safe Rust in [`engine`] and
//! [`command_info`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod abi;
pub mod command_info;
pub mod engine;
pub mod plugin;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command_info::CommandInfo;
pub use command_info::DEFAULT_SEARCH_PATH;
pub use command_info::resolve_command_path;
pub use engine::CheckDecision;
pub use engine::build_queries;
pub use engine::check_command;
pub use engine::command_line;
pub use engine::list_commands;
pub use engine::principal_is_usable;
pub use engine::resolve_principal;

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
