// sgnl-sudo/src/abi.rs
// ============================================================================
// Module: Sudo Plugin ABI
// Description: C-ABI types and constants of the host policy-plugin contract.
// Purpose: Preserve the loader-visible layout and return conventions exactly.
// Dependencies: libc
// ============================================================================

//! ## Overview
//! The host loads the plugin through a `policy_plugin` structure of function
//! pointers with integer return codes: accept 1, reject 0, error -1, usage
//! error -2. The layout and constants below must match the host's header
//! bit-exactly. Helper functions convert host-owned `char *` vectors into
//! owned strings; the adapter never frees host storage.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::CStr;

use libc::c_char;
use libc::c_int;
use libc::c_uint;
use libc::c_void;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Plugin type tag for policy plugins.
pub const SUDO_POLICY_PLUGIN: c_uint = 1;
/// Plugin API major version the adapter is built against.
pub const SUDO_API_VERSION_MAJOR: c_uint = 1;
/// Plugin API minor version the adapter is built against.
pub const SUDO_API_VERSION_MINOR: c_uint = 22;
/// Packed plugin API version.
pub const SUDO_API_VERSION: c_uint = (SUDO_API_VERSION_MAJOR << 16) | SUDO_API_VERSION_MINOR;

/// Accept / success return code.
pub const SUDO_RC_OK: c_int = 1;
/// Policy accepts the invocation.
pub const SUDO_RC_ACCEPT: c_int = 1;
/// Policy rejects the invocation.
pub const SUDO_RC_REJECT: c_int = 0;
/// An error occurred.
pub const SUDO_RC_ERROR: c_int = -1;
/// Usage error.
pub const SUDO_RC_USAGE_ERROR: c_int = -2;

/// Printer message type for error output.
pub const SUDO_CONV_ERROR_MSG: c_int = 0x0003;
/// Printer message type for informational output.
pub const SUDO_CONV_INFO_MSG: c_int = 0x0004;

/// Extracts the major component of a packed API version.
#[must_use]
pub const fn api_version_get_major(version: c_uint) -> c_uint {
    version >> 16
}

// ============================================================================
// SECTION: Function Pointer Types
// ============================================================================

/// Host conversation callback. The adapter stores it but never converses.
pub type SudoConvFn = Option<
    unsafe extern "C" fn(
        num_msgs: c_int,
        msgs: *const c_void,
        replies: *mut c_void,
        callback: *mut c_void,
    ) -> c_int,
>;

/// Host printf-style output callback.
pub type SudoPrintfFn =
    Option<unsafe extern "C" fn(msg_type: c_int, fmt: *const c_char, ...) -> c_int>;

// ============================================================================
// SECTION: Policy Plugin Structure
// ============================================================================

/// Loader-visible policy plugin structure.
///
/// # Invariants
/// - Field order and types mirror the host's `struct policy_plugin`.
#[repr(C)]
pub struct PolicyPlugin {
    /// Plugin type tag.
    pub type_: c_uint,
    /// Packed plugin API version.
    pub version: c_uint,
    /// Per-invocation initialization handshake.
    pub open: Option<
        unsafe extern "C" fn(
            version: c_uint,
            conversation: SudoConvFn,
            plugin_printf: SudoPrintfFn,
            settings: *const *mut c_char,
            user_info: *const *mut c_char,
            user_env: *const *mut c_char,
            plugin_options: *const *mut c_char,
            errstr: *mut *const c_char,
        ) -> c_int,
    >,
    /// Teardown after the command completes or fails.
    pub close: Option<unsafe extern "C" fn(exit_status: c_int, error: c_int)>,
    /// Version banner.
    pub show_version: Option<unsafe extern "C" fn(verbose: c_int) -> c_int>,
    /// Main decision path.
    pub check_policy: Option<
        unsafe extern "C" fn(
            argc: c_int,
            argv: *const *mut c_char,
            env_add: *mut *mut c_char,
            command_info: *mut *mut *mut c_char,
            argv_out: *mut *mut *mut c_char,
            user_env_out: *mut *mut *mut c_char,
            errstr: *mut *const c_char,
        ) -> c_int,
    >,
    /// Allowed-command listing.
    pub list: Option<
        unsafe extern "C" fn(
            argc: c_int,
            argv: *const *mut c_char,
            verbose: c_int,
            user: *const c_char,
            errstr: *mut *const c_char,
        ) -> c_int,
    >,
    /// Credential validation (unused).
    pub validate: Option<unsafe extern "C" fn(errstr: *mut *const c_char) -> c_int>,
    /// Credential invalidation (unused).
    pub invalidate: Option<unsafe extern "C" fn(rmcred: c_int)>,
    /// Session initialization before uid/gid changes.
    pub init_session: Option<
        unsafe extern "C" fn(
            pwd: *mut c_void,
            user_env_out: *mut *mut *mut c_char,
            errstr: *mut *const c_char,
        ) -> c_int,
    >,
    /// Hook registration (unused).
    pub register_hooks:
        Option<unsafe extern "C" fn(version: c_int, register_hook: *mut c_void)>,
    /// Hook deregistration (unused).
    pub deregister_hooks:
        Option<unsafe extern "C" fn(version: c_int, deregister_hook: *mut c_void)>,
    /// Event allocator, filled in by the host.
    pub event_alloc: *mut c_void,
}

// The struct is only ever read after the loader fills it in; the raw
// event_alloc pointer is host-owned.
unsafe impl Sync for PolicyPlugin {}

// ============================================================================
// SECTION: Host Array Helpers
// ============================================================================

/// Copies a counted `char *` vector into owned strings, stopping early at a
/// null entry. Host storage is left untouched.
///
/// # Safety
///
/// `argv` must be null or point to at least `argc` valid `char *` entries.
#[must_use]
pub unsafe fn counted_string_vector(argc: c_int, argv: *const *mut c_char) -> Vec<String> {
    let mut entries = Vec::new();
    if argv.is_null() {
        return entries;
    }
    let count = isize::try_from(argc.max(0)).unwrap_or(0);
    for index in 0..count {
        let entry = unsafe { *argv.offset(index) };
        if entry.is_null() {
            break;
        }
        entries.push(unsafe { CStr::from_ptr(entry) }.to_string_lossy().into_owned());
    }
    entries
}

/// Copies a null-terminated `char *` vector into owned strings. Host storage
/// is left untouched.
///
/// # Safety
///
/// `vector` must be null or a valid null-terminated `char *` array.
#[must_use]
pub unsafe fn string_vector(vector: *const *mut c_char) -> Vec<String> {
    let mut entries = Vec::new();
    if vector.is_null() {
        return entries;
    }
    let mut cursor = vector;
    loop {
        let entry = unsafe { *cursor };
        if entry.is_null() {
            break;
        }
        entries.push(unsafe { CStr::from_ptr(entry) }.to_string_lossy().into_owned());
        cursor = unsafe { cursor.add(1) };
    }
    entries
}

/// Copies one `char *` into an owned string.
///
/// # Safety
///
/// `value` must be null or a valid NUL-terminated string.
#[must_use]
pub unsafe fn cstr_to_string(value: *const c_char) -> Option<String> {
    if value.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(value) }.to_string_lossy().into_owned())
}
