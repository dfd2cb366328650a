// sgnl-pam/src/hooks.rs
// ============================================================================
// Module: PAM Hook Shims
// Description: C-ABI entry points and the module-scoped client.
// Purpose: Bridge the host account hook onto the outcome mapping safely.
// Dependencies: crate::{abi, account}, libc, sgnl-client, sgnl-core
// ============================================================================

//! ## Overview
//! The account-management hook retrieves the principal, service, and remote
//! host from the session handle, lazily initializes one module-scoped
//! client, performs a single access check, and maps the outcome. The
//! credential-management and authentication hooks return success without
//! contacting the service. Diagnostics go to the system log and the internal
//! logger. An exit hook registered at first initialization destroys the
//! client so the token storage is wiped before the process ends. The host
//! PAM symbols referenced here resolve from the loaded PAM stack.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::CStr;
use std::ffi::CString;
use std::ptr;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::Once;
use std::sync::PoisonError;

use libc::c_char;
use libc::c_int;
use libc::c_void;
use sgnl_client::ClientOptions;
use sgnl_client::SgnlClient;
use sgnl_core::LogContext;
use sgnl_core::LogLevel;
use sgnl_core::sgnl_log;

use crate::abi::PAM_AUTHINFO_UNAVAIL;
use crate::abi::PAM_RHOST;
use crate::abi::PAM_SERVICE;
use crate::abi::PAM_SUCCESS;
use crate::abi::PamHandle;
use crate::account::run_account_check;

// ============================================================================
// SECTION: Host Functions
// ============================================================================

unsafe extern "C" {
    fn pam_get_user(
        pamh: *mut PamHandle,
        user: *mut *const c_char,
        prompt: *const c_char,
    ) -> c_int;
    fn pam_get_item(pamh: *const PamHandle, item_type: c_int, item: *mut *const c_void) -> c_int;
}

// ============================================================================
// SECTION: Module State
// ============================================================================

/// Module-scoped client, created lazily on first use.
static CLIENT: Mutex<Option<SgnlClient>> = Mutex::new(None);
/// One-time registration of the exit hook.
static CLEANUP: Once = Once::new();

/// Locks the client slot, recovering from poisoning.
fn client_slot() -> MutexGuard<'static, Option<SgnlClient>> {
    CLIENT.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Exit hook: destroys the client so the token storage is wiped.
extern "C" fn module_cleanup() {
    *client_slot() = None;
}

/// Ensures the module-scoped client exists and is valid.
fn ensure_client() -> c_int {
    let ctx = LogContext::new("pam", "ensure_client");
    let mut slot = client_slot();
    if slot.is_some() {
        return PAM_SUCCESS;
    }
    let options = ClientOptions {
        user_agent: Some("SGNL-PAM/1.0".to_string()),
        retry_count: Some(2),
        retry_delay_ms: Some(1_000),
        ..ClientOptions::default()
    };
    let client = match SgnlClient::new(&options) {
        Ok(client) => client,
        Err(err) => {
            sgnl_log!(LogLevel::Error, &ctx, "failed to initialize client: {err}");
            system_log(libc::LOG_ERR, "SGNL PAM: Failed to initialize client");
            return PAM_AUTHINFO_UNAVAIL;
        }
    };
    if let Err(err) = client.validate() {
        sgnl_log!(LogLevel::Error, &ctx, "configuration validation failed: {err}");
        system_log(libc::LOG_ERR, &format!("SGNL PAM: Invalid configuration: {err}"));
        return PAM_AUTHINFO_UNAVAIL;
    }
    *slot = Some(client);
    CLEANUP.call_once(|| unsafe {
        libc::atexit(module_cleanup);
    });
    sgnl_log!(LogLevel::Info, &ctx, "client initialized");
    system_log(libc::LOG_INFO, "SGNL PAM: Client initialized successfully");
    PAM_SUCCESS
}

// ============================================================================
// SECTION: Diagnostics
// ============================================================================

/// Writes one line to the system log.
fn system_log(level: c_int, message: &str) {
    let Ok(text) = CString::new(message) else {
        return;
    };
    static FORMAT: &CStr = c"%s";
    unsafe {
        libc::syslog(level | libc::LOG_AUTHPRIV, FORMAT.as_ptr(), text.as_ptr());
    }
}

// ============================================================================
// SECTION: Handle Accessors
// ============================================================================

/// Retrieves the requesting user from the session handle.
unsafe fn session_user(pamh: *mut PamHandle) -> Option<String> {
    let mut user: *const c_char = ptr::null();
    static PROMPT: &CStr = c"Username: ";
    let rc = unsafe { pam_get_user(pamh, &mut user, PROMPT.as_ptr()) };
    if rc != PAM_SUCCESS || user.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(user) }.to_string_lossy().into_owned())
}

/// Retrieves a string item from the session handle.
unsafe fn session_item(pamh: *const PamHandle, item_type: c_int) -> Option<String> {
    let mut item: *const c_void = ptr::null();
    let rc = unsafe { pam_get_item(pamh, item_type, &mut item) };
    if rc != PAM_SUCCESS || item.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(item.cast::<c_char>()) }.to_string_lossy().into_owned())
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Account-management hook: a single access check on the service name.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_acct_mgmt(
    pamh: *mut PamHandle,
    _flags: c_int,
    _argc: c_int,
    _argv: *const *const c_char,
) -> c_int {
    let username = unsafe { session_user(pamh) };
    let service = unsafe { session_item(pamh, PAM_SERVICE) };
    let host = unsafe { session_item(pamh, PAM_RHOST) };

    let (Some(username), Some(service)) = (username, service) else {
        system_log(libc::LOG_ERR, "SGNL PAM: Missing username or service");
        return PAM_AUTHINFO_UNAVAIL;
    };

    system_log(
        libc::LOG_INFO,
        &format!(
            "SGNL PAM: Processing account for [{username}] service [{service}] host [{}]",
            host.as_deref().unwrap_or("local")
        ),
    );

    if ensure_client() != PAM_SUCCESS {
        return PAM_AUTHINFO_UNAVAIL;
    }
    let mut slot = client_slot();
    let Some(client) = slot.as_mut() else {
        return PAM_AUTHINFO_UNAVAIL;
    };

    let ctx = LogContext::new("pam", "pam_sm_acct_mgmt")
        .with_principal(&username)
        .with_asset(&service);
    sgnl_log!(LogLevel::Info, &ctx, "checking access");

    let code = run_account_check(client, Some(&username), Some(&service));
    match code {
        PAM_SUCCESS => {
            sgnl_log!(LogLevel::Info, &ctx, "access granted");
            system_log(libc::LOG_INFO, &format!("SGNL PAM: Access granted for [{username}]"));
        }
        crate::abi::PAM_PERM_DENIED => {
            sgnl_log!(LogLevel::Info, &ctx, "access denied");
            system_log(libc::LOG_INFO, &format!("SGNL PAM: Access denied for [{username}]"));
        }
        _ => {
            sgnl_log!(LogLevel::Error, &ctx, "access check failed");
            system_log(
                libc::LOG_ERR,
                &format!("SGNL PAM: Error checking access for [{username}]"),
            );
        }
    }
    code
}

/// Credential-management hook: not an integration point, always succeeds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_setcred(
    _pamh: *mut PamHandle,
    _flags: c_int,
    _argc: c_int,
    _argv: *const *const c_char,
) -> c_int {
    system_log(libc::LOG_INFO, "SGNL PAM: pam_sm_setcred - returning success");
    PAM_SUCCESS
}

/// Authentication hook: not an integration point, always succeeds.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn pam_sm_authenticate(
    _pamh: *mut PamHandle,
    _flags: c_int,
    _argc: c_int,
    _argv: *const *const c_char,
) -> c_int {
    system_log(libc::LOG_INFO, "SGNL PAM: pam_sm_authenticate - returning success");
    PAM_SUCCESS
}
