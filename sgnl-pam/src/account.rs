// sgnl-pam/src/account.rs
// ============================================================================
// Module: Account Outcome Mapping
// Description: Maps authorization outcomes onto the host's return codes.
// Purpose: Keep the account decision total and fail-closed.
// Dependencies: sgnl-client, sgnl-core
// ============================================================================

//! ## Overview
//! The account check is one simple query: principal and service name, with
//! the action left to the client default. Allowed maps to success, denied to
//! permission denied, and everything else, including every error kind, to
//! authentication-information-unavailable. No mapping grants access on a
//! failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use libc::c_int;
use sgnl_client::AccessDecider;
use sgnl_client::ClientError;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::ResultKind;

use crate::abi::PAM_AUTHINFO_UNAVAIL;
use crate::abi::PAM_PERM_DENIED;
use crate::abi::PAM_SUCCESS;

// ============================================================================
// SECTION: Mapping
// ============================================================================

/// Maps one authorization outcome onto the host's return convention.
#[must_use]
pub fn account_decision(outcome: Result<ResultKind, ClientError>) -> c_int {
    match outcome {
        Ok(kind) if kind.is_allowed() => PAM_SUCCESS,
        Ok(kind) if kind.is_denied() => PAM_PERM_DENIED,
        Ok(_) | Err(_) => PAM_AUTHINFO_UNAVAIL,
    }
}

/// Runs the account check: validates the inputs, queries the decider with
/// the service name as the asset, and maps the outcome.
#[must_use]
pub fn run_account_check(
    decider: &mut dyn AccessDecider,
    principal: Option<&str>,
    service: Option<&str>,
) -> c_int {
    let (Some(principal), Some(service)) = (principal, service) else {
        return PAM_AUTHINFO_UNAVAIL;
    };
    if principal.is_empty() || service.is_empty() {
        return PAM_AUTHINFO_UNAVAIL;
    }
    account_decision(decider.check_access(
        &PrincipalId::new(principal),
        &AssetId::new(service),
        None,
    ))
}
