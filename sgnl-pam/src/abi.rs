// sgnl-pam/src/abi.rs
// ============================================================================
// Module: PAM ABI
// Description: Constants and types of the host account-management contract.
// Purpose: Preserve the loader-visible return codes and item types exactly.
// Dependencies: libc
// ============================================================================

//! ## Overview
//! The host resolves `pam_sm_*` symbols from the module and calls them with
//! an opaque handle. Return codes and item-type constants below follow the
//! Linux-PAM values and must not drift.

// ============================================================================
// SECTION: Imports
// ============================================================================

use libc::c_int;

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Opaque host session handle.
#[repr(C)]
pub struct PamHandle {
    _private: [u8; 0],
}

// ============================================================================
// SECTION: Return Codes
// ============================================================================

/// Successful function return.
pub const PAM_SUCCESS: c_int = 0;
/// Permission denied.
pub const PAM_PERM_DENIED: c_int = 6;
/// Underlying authentication information is unavailable.
pub const PAM_AUTHINFO_UNAVAIL: c_int = 9;

// ============================================================================
// SECTION: Item Types
// ============================================================================

/// Service name item.
pub const PAM_SERVICE: c_int = 1;
/// Requesting host name item.
pub const PAM_RHOST: c_int = 4;
