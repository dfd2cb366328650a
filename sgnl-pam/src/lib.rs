// sgnl-pam/src/lib.rs
// ============================================================================
// Module: SGNL PAM Module Library
// Description: PAM account-management hook backed by the SGNL client.
// Purpose: Expose the account hook ABI plus the testable outcome mapping.
// Dependencies: crate::{abi, account, hooks}
// ============================================================================

//! ## Overview
//! The module answers the host's account-management hook by asking the SGNL
//! access service whether the principal may use the service, then mapping
//! the outcome onto the host's convention: allowed becomes success, denied
//! becomes permission denied, and every failure becomes
//! authentication-information-unavailable. The module never authenticates
//! users and never fails open. The C-ABI surface lives in [`hooks`]; the
//! outcome mapping in [`account`] is plain Rust.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod abi;
pub mod account;
// The hook shims reference host PAM symbols that resolve only inside a
// loaded PAM stack; the unit-test binary builds without them.
#[cfg(not(test))]
pub mod hooks;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use account::account_decision;
pub use account::run_account_check;
