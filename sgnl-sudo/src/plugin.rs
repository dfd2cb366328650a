// sgnl-sudo/src/plugin.rs
// ============================================================================
// Module: Sudo Plugin Shims
// Description: C-ABI entry points and process-wide plugin state.
// Purpose: Bridge the host contract onto the decision engine safely.
// Dependencies: crate::{abi, command_info, engine}, sgnl-client, sgnl-config
// ============================================================================

//! ## Overview
//! The host drives one invocation as `open` then one of `check`/`list`/
//! `version` then `close`, single-threaded. State lives behind a process-wide
//! mutex: the client, the plugin settings, the host-owned environment and
//! user-info pointers (loaned, never freed here), and the command-info array
//! currently loaned to the host (owned here, reclaimed at close). Every
//! `errstr` written back points at static storage. Out-pointers are nulled
//! before any failure path and written together only after all validations
//! succeed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::ffi::CStr;
use std::ffi::CString;
use std::mem;
use std::path::PathBuf;
use std::ptr;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use libc::c_char;
use libc::c_int;
use libc::c_uint;
use libc::c_void;
use sgnl_client::ClientOptions;
use sgnl_client::SgnlClient;
use sgnl_config::CommandAttribute;
use sgnl_config::LoadOptions;
use sgnl_config::SgnlConfig;
use sgnl_config::SudoConfig;

use crate::abi::PolicyPlugin;
use crate::abi::SUDO_API_VERSION;
use crate::abi::SUDO_API_VERSION_MAJOR;
use crate::abi::SUDO_CONV_ERROR_MSG;
use crate::abi::SUDO_CONV_INFO_MSG;
use crate::abi::SUDO_POLICY_PLUGIN;
use crate::abi::SUDO_RC_ACCEPT;
use crate::abi::SUDO_RC_ERROR;
use crate::abi::SUDO_RC_OK;
use crate::abi::SUDO_RC_REJECT;
use crate::abi::SudoConvFn;
use crate::abi::SudoPrintfFn;
use crate::abi::api_version_get_major;
use crate::abi::counted_string_vector;
use crate::abi::cstr_to_string;
use crate::abi::string_vector;
use crate::command_info::CommandInfo;
use crate::command_info::resolve_command_path;
use crate::engine::CheckDecision;
use crate::engine::check_command;
use crate::engine::command_line;
use crate::engine::list_commands;
use crate::engine::principal_is_usable;
use crate::engine::resolve_principal;

// ============================================================================
// SECTION: Static Error Strings
// ============================================================================

/// Rejection message returned for denied invocations.
static MSG_ACCESS_DENIED: &CStr = c"Access denied by SGNL policy";
/// Rejection message when no command was given.
static MSG_NO_COMMAND: &CStr = c"No command specified";
/// Error message when the command cannot be found on the search path.
static MSG_COMMAND_NOT_FOUND: &CStr = c"Command not found";
/// Error message when the client is missing.
static MSG_CLIENT_NOT_INITIALIZED: &CStr = c"SGNL client not initialized";
/// Error message when the principal cannot be resolved.
static MSG_NO_PRINCIPAL: &CStr = c"Cannot determine username";
/// Error message for failures inside the decision path.
static MSG_POLICY_ERROR: &CStr = c"SGNL policy error";
/// Error message when the command-info array cannot be built.
static MSG_COMMAND_INFO_FAILED: &CStr = c"Failed to build command information";
/// Error message for invalid host-provided output parameters.
static MSG_INVALID_OUTPUTS: &CStr = c"Invalid output parameters";

// ============================================================================
// SECTION: Plugin State
// ============================================================================

/// Raw `char **` owned by the host or loaned to it; plain data either way.
#[derive(Clone, Copy)]
struct RawStringArray(*mut *mut c_char);

// Raw host pointers move with the state mutex; the host contract is
// single-threaded per invocation.
unsafe impl Send for RawStringArray {}

impl RawStringArray {
    const NULL: Self = Self(ptr::null_mut());
}

/// Process-wide plugin state, bounded by one host invocation.
struct PluginState {
    /// Authorization client, created at open and destroyed at close.
    client: Option<SgnlClient>,
    /// Plugin-local settings parsed at open.
    settings: SudoConfig,
    /// Debug flag parsed at open.
    debug: bool,
    /// Host-owned environment pointer, passed through and never freed.
    envp: RawStringArray,
    /// Parsed copy of the host-provided user info.
    user_info: Vec<String>,
    /// Command-info array currently loaned to the host.
    loaned_command_info: RawStringArray,
    /// Host printer callback.
    printer: SudoPrintfFn,
}

impl PluginState {
    const fn new() -> Self {
        Self {
            client: None,
            settings: SudoConfig {
                access_msg: true,
                command_attribute: CommandAttribute::Id,
                batch_evaluation: true,
            },
            debug: false,
            envp: RawStringArray::NULL,
            user_info: Vec::new(),
            loaned_command_info: RawStringArray::NULL,
            printer: None,
        }
    }
}

/// Plugin state for the current invocation.
static STATE: Mutex<PluginState> = Mutex::new(PluginState::new());

/// Locks the state, recovering from poisoning.
fn state() -> MutexGuard<'static, PluginState> {
    STATE.lock().unwrap_or_else(PoisonError::into_inner)
}

// ============================================================================
// SECTION: Host Output Helpers
// ============================================================================

/// Prints one line through the host's printer callback.
fn host_print(printer: SudoPrintfFn, msg_type: c_int, message: &str) {
    let Some(print_fn) = printer else {
        return;
    };
    let Ok(text) = CString::new(message) else {
        return;
    };
    static FORMAT: &CStr = c"%s";
    unsafe {
        print_fn(msg_type, FORMAT.as_ptr(), text.as_ptr());
    }
}

/// Points the host's errstr at static storage.
fn set_errstr(errstr: *mut *const c_char, message: &'static CStr) {
    if !errstr.is_null() {
        unsafe {
            *errstr = message.as_ptr();
        }
    }
}

// ============================================================================
// SECTION: Entry Points
// ============================================================================

/// Initialization handshake: verify the API major version, parse plugin
/// settings, create and validate the client, and store host references.
unsafe extern "C" fn policy_open(
    version: c_uint,
    _conversation: SudoConvFn,
    plugin_printf: SudoPrintfFn,
    _settings: *const *mut c_char,
    user_info: *const *mut c_char,
    user_env: *const *mut c_char,
    _plugin_options: *const *mut c_char,
    errstr: *mut *const c_char,
) -> c_int {
    if !errstr.is_null() {
        unsafe {
            *errstr = ptr::null();
        }
    }
    let mut guard = state();
    let plugin = &mut *guard;
    plugin.printer = plugin_printf;

    if api_version_get_major(version) != SUDO_API_VERSION_MAJOR {
        host_print(
            plugin.printer,
            SUDO_CONV_ERROR_MSG,
            &format!("SGNL plugin requires API version {SUDO_API_VERSION_MAJOR}.x\n"),
        );
        return SUDO_RC_ERROR;
    }

    plugin.envp = RawStringArray(user_env.cast_mut());
    plugin.user_info = unsafe { string_vector(user_info) };

    let load = LoadOptions {
        config_path: None,
        strict_validation: true,
        module_name: "sudo",
    };
    match SgnlConfig::load(&load) {
        Ok(config) => {
            plugin.settings = *config.sudo();
            plugin.debug = config.is_debug_enabled();
        }
        Err(err) => {
            host_print(
                plugin.printer,
                SUDO_CONV_ERROR_MSG,
                &format!("SGNL: Failed to load sudo settings: {err}\n"),
            );
            return SUDO_RC_ERROR;
        }
    }

    let client = match SgnlClient::new(&ClientOptions::default()) {
        Ok(client) => client,
        Err(err) => {
            host_print(
                plugin.printer,
                SUDO_CONV_ERROR_MSG,
                &format!("SGNL: Failed to initialize client: {err}\n"),
            );
            return SUDO_RC_ERROR;
        }
    };
    if let Err(err) = client.validate() {
        host_print(
            plugin.printer,
            SUDO_CONV_ERROR_MSG,
            &format!("SGNL: Invalid configuration: {err}\n"),
        );
        return SUDO_RC_ERROR;
    }
    plugin.client = Some(client);

    if plugin.debug {
        host_print(plugin.printer, SUDO_CONV_INFO_MSG, "SGNL: Plugin initialized successfully\n");
    }
    SUDO_RC_OK
}

/// Main decision path: compose the batch, fold with AND-of-decisions, and on
/// acceptance hand back a freshly built command-info array plus the
/// host-owned argv and environment.
unsafe extern "C" fn policy_check(
    argc: c_int,
    argv: *const *mut c_char,
    _env_add: *mut *mut c_char,
    command_info_out: *mut *mut *mut c_char,
    argv_out: *mut *mut *mut c_char,
    user_env_out: *mut *mut *mut c_char,
    errstr: *mut *const c_char,
) -> c_int {
    if command_info_out.is_null() || argv_out.is_null() || user_env_out.is_null() {
        set_errstr(errstr, MSG_INVALID_OUTPUTS);
        return SUDO_RC_ERROR;
    }
    unsafe {
        *command_info_out = ptr::null_mut();
        *argv_out = ptr::null_mut();
        *user_env_out = ptr::null_mut();
    }
    if !errstr.is_null() {
        unsafe {
            *errstr = ptr::null();
        }
    }

    let mut guard = state();
    let plugin = &mut *guard;
    let printer = plugin.printer;
    let settings = plugin.settings;

    let args = unsafe { counted_string_vector(argc, argv) };
    if args.is_empty() || args[0].is_empty() {
        host_print(printer, SUDO_CONV_ERROR_MSG, "SGNL: No command specified\n");
        set_errstr(errstr, MSG_NO_COMMAND);
        return SUDO_RC_REJECT;
    }

    let principal = resolve_principal(&plugin.user_info);
    if !principal_is_usable(&principal) {
        host_print(printer, SUDO_CONV_ERROR_MSG, "SGNL: Cannot determine username\n");
        set_errstr(errstr, MSG_NO_PRINCIPAL);
        return SUDO_RC_ERROR;
    }

    let Some(client) = plugin.client.as_mut() else {
        host_print(printer, SUDO_CONV_ERROR_MSG, "SGNL: Client not initialized\n");
        set_errstr(errstr, MSG_CLIENT_NOT_INITIALIZED);
        return SUDO_RC_ERROR;
    };

    match check_command(client, &settings, &principal, &args) {
        CheckDecision::Allowed => {}
        CheckDecision::Rejected {
            kind,
        } => {
            host_print(
                printer,
                SUDO_CONV_ERROR_MSG,
                &format!(
                    "SGNL: Access denied for {principal} to run '{}': {}\n",
                    command_line(&args),
                    kind.as_str()
                ),
            );
            set_errstr(errstr, MSG_ACCESS_DENIED);
            return SUDO_RC_REJECT;
        }
        CheckDecision::Failed {
            kind,
        } => {
            host_print(
                printer,
                SUDO_CONV_ERROR_MSG,
                &format!(
                    "SGNL: Policy evaluation failed for {principal} to run '{}': {}\n",
                    command_line(&args),
                    kind.as_str()
                ),
            );
            set_errstr(errstr, MSG_POLICY_ERROR);
            return SUDO_RC_ERROR;
        }
    }

    if settings.access_msg {
        host_print(
            printer,
            SUDO_CONV_INFO_MSG,
            &format!("SGNL: Access granted for {principal} to run {}\n", args[0]),
        );
    }

    let path_env = env::var("PATH").ok();
    let Some(resolved) = resolve_command_path(&args[0], path_env.as_deref()) else {
        host_print(
            printer,
            SUDO_CONV_ERROR_MSG,
            &format!("SGNL: Command not found: {}\n", args[0]),
        );
        set_errstr(errstr, MSG_COMMAND_NOT_FOUND);
        return SUDO_RC_ERROR;
    };
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let info = match CommandInfo::build(&resolved, &cwd) {
        Ok(info) => info,
        Err(_) => {
            host_print(printer, SUDO_CONV_ERROR_MSG, "SGNL: Failed to build command info\n");
            set_errstr(errstr, MSG_COMMAND_INFO_FAILED);
            return SUDO_RC_ERROR;
        }
    };

    let raw_info = info.into_raw();
    let previous = mem::replace(&mut plugin.loaned_command_info, RawStringArray(raw_info));
    unsafe {
        CommandInfo::free_raw(previous.0);
    }

    unsafe {
        *argv_out = argv.cast_mut();
        *user_env_out = plugin.envp.0;
        *command_info_out = raw_info;
    }
    SUDO_RC_ACCEPT
}

/// Allowed-command listing: one command check, or a full asset search.
unsafe extern "C" fn policy_list(
    argc: c_int,
    argv: *const *mut c_char,
    _verbose: c_int,
    user: *const c_char,
    errstr: *mut *const c_char,
) -> c_int {
    if !errstr.is_null() {
        unsafe {
            *errstr = ptr::null();
        }
    }
    let mut guard = state();
    let plugin = &mut *guard;
    let printer = plugin.printer;

    let principal = resolve_principal(&plugin.user_info);
    let Some(client) = plugin.client.as_mut() else {
        host_print(printer, SUDO_CONV_ERROR_MSG, "SGNL: Client not initialized\n");
        set_errstr(errstr, MSG_CLIENT_NOT_INITIALIZED);
        return SUDO_RC_ERROR;
    };

    let args = unsafe { counted_string_vector(argc, argv) };
    let list_user = unsafe { cstr_to_string(user) };
    for line in list_commands(client, &principal, &args, list_user.as_deref()) {
        host_print(printer, SUDO_CONV_INFO_MSG, &format!("{line}\n"));
    }
    SUDO_RC_OK
}

/// Version banner.
unsafe extern "C" fn policy_version(_verbose: c_int) -> c_int {
    let printer = state().printer;
    host_print(
        printer,
        SUDO_CONV_INFO_MSG,
        &format!("SGNL sudo policy plugin version {}\n", sgnl_core::VERSION),
    );
    SUDO_RC_OK
}

/// Session initialization: pass the stored host environment through.
unsafe extern "C" fn policy_init_session(
    _pwd: *mut c_void,
    user_env_out: *mut *mut *mut c_char,
    errstr: *mut *const c_char,
) -> c_int {
    if !errstr.is_null() {
        unsafe {
            *errstr = ptr::null();
        }
    }
    let guard = state();
    if guard.client.is_none() {
        host_print(
            guard.printer,
            SUDO_CONV_ERROR_MSG,
            "SGNL: Client not initialized in init_session\n",
        );
        set_errstr(errstr, MSG_CLIENT_NOT_INITIALIZED);
        return SUDO_RC_ERROR;
    }
    if guard.envp.0.is_null() {
        host_print(guard.printer, SUDO_CONV_ERROR_MSG, "SGNL: No user environment available\n");
        return SUDO_RC_ERROR;
    }
    if !user_env_out.is_null() {
        unsafe {
            *user_env_out = guard.envp.0;
        }
    }
    if guard.debug {
        let principal = resolve_principal(&guard.user_info);
        host_print(
            guard.printer,
            SUDO_CONV_INFO_MSG,
            &format!("SGNL: Session initialized for user {principal}\n"),
        );
    }
    SUDO_RC_OK
}

/// Teardown: log completion in debug mode, reclaim the loaned command-info
/// array, destroy the client, and clear stored host references.
unsafe extern "C" fn policy_close(exit_status: c_int, error: c_int) {
    let mut guard = state();
    let plugin = &mut *guard;
    let printer = plugin.printer;

    if plugin.debug {
        let principal = resolve_principal(&plugin.user_info);
        if exit_status >= 0 {
            host_print(
                printer,
                SUDO_CONV_INFO_MSG,
                &format!("SGNL: Command completed for {principal} with exit status {exit_status}\n"),
            );
        } else {
            host_print(
                printer,
                SUDO_CONV_INFO_MSG,
                &format!("SGNL: Command execution failed for {principal}\n"),
            );
        }
    }
    if error != 0 {
        host_print(
            printer,
            SUDO_CONV_ERROR_MSG,
            &format!(
                "SGNL: Command execution error: {}\n",
                std::io::Error::from_raw_os_error(error)
            ),
        );
    }

    let loaned = mem::replace(&mut plugin.loaned_command_info, RawStringArray::NULL);
    unsafe {
        CommandInfo::free_raw(loaned.0);
    }
    plugin.client = None;
    plugin.envp = RawStringArray::NULL;
    plugin.user_info = Vec::new();
}

// ============================================================================
// SECTION: Plugin Export
// ============================================================================

/// Loader-visible policy plugin symbol.
#[unsafe(no_mangle)]
#[allow(non_upper_case_globals, reason = "The loader looks the symbol up by this name.")]
pub static sgnl_policy: PolicyPlugin = PolicyPlugin {
    type_: SUDO_POLICY_PLUGIN,
    version: SUDO_API_VERSION,
    open: Some(policy_open),
    close: Some(policy_close),
    show_version: Some(policy_version),
    check_policy: Some(policy_check),
    list: Some(policy_list),
    validate: None,
    invalidate: None,
    init_session: Some(policy_init_session),
    register_hooks: None,
    deregister_hooks: None,
    event_alloc: ptr::null_mut(),
};
