// sgnl-sudo/src/command_info.rs
// ============================================================================
// Module: Command Info Construction
// Description: Command path resolution and the host-consumed key=value array.
// Purpose: Build a fully owned, null-terminated command-info array or nothing.
// Dependencies: libc
// ============================================================================

//! ## Overview
//! After an allowed decision the host consumes a null-terminated array of
//! `key=value` strings describing how to execute the command. The array is
//! built all-or-nothing: either every required entry is present or no array
//! is produced. Ownership transfers to raw storage with [`CommandInfo::into_raw`]
//! and must come back through [`CommandInfo::free_raw`] once the host is done
//! with it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::CString;
use std::ffi::NulError;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;
use std::ptr;

use libc::c_char;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Search path used when the environment carries no `PATH`.
pub const DEFAULT_SEARCH_PATH: &str = "/usr/local/sbin:/usr/local/bin:/usr/sbin:/usr/bin:/sbin:/bin";

/// Command execution timeout handed to the host, in seconds.
pub const COMMAND_TIMEOUT_SECONDS: u32 = 300;

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Resolves a command name to the path the host should execute.
///
/// A name containing a slash is taken verbatim. Otherwise the first entry of
/// `path_env` (or the fixed fallback list) containing an executable of that
/// name wins; `None` when no entry does.
#[must_use]
pub fn resolve_command_path(command: &str, path_env: Option<&str>) -> Option<PathBuf> {
    if command.contains('/') {
        return Some(PathBuf::from(command));
    }
    let search_path = path_env.unwrap_or(DEFAULT_SEARCH_PATH);
    for dir in search_path.split(':') {
        if dir.is_empty() {
            continue;
        }
        let candidate = Path::new(dir).join(command);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Returns true when the path names an executable regular file.
fn is_executable(path: &Path) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

// ============================================================================
// SECTION: Command Info
// ============================================================================

/// Owned, null-terminated `key=value` array for the host.
///
/// # Invariants
/// - Entries are complete: `command`, `runas_uid`, `runas_gid`, `cwd`,
///   `timeout` are all present or the value is never constructed.
#[derive(Debug)]
pub struct CommandInfo {
    /// Owned entries in host order.
    entries: Vec<CString>,
}

impl CommandInfo {
    /// Builds the command-info entries for a resolved command.
    ///
    /// # Errors
    ///
    /// Returns [`NulError`] when a path contains an interior NUL byte.
    pub fn build(command_path: &Path, cwd: &Path) -> Result<Self, NulError> {
        let entries = vec![
            CString::new(format!("command={}", command_path.display()))?,
            CString::new("runas_uid=0")?,
            CString::new("runas_gid=0")?,
            CString::new(format!("cwd={}", cwd.display()))?,
            CString::new(format!("timeout={COMMAND_TIMEOUT_SECONDS}"))?,
        ];
        Ok(Self {
            entries,
        })
    }

    /// Returns the entries in host order.
    #[must_use]
    pub fn entries(&self) -> &[CString] {
        &self.entries
    }

    /// Transfers ownership into a raw null-terminated array for the host.
    /// Reclaim it with [`CommandInfo::free_raw`].
    #[must_use]
    pub fn into_raw(self) -> *mut *mut c_char {
        let mut pointers: Vec<*mut c_char> =
            self.entries.into_iter().map(CString::into_raw).collect();
        pointers.push(ptr::null_mut());
        let boxed = pointers.into_boxed_slice();
        Box::into_raw(boxed).cast::<*mut c_char>()
    }

    /// Reclaims and drops an array produced by [`CommandInfo::into_raw`].
    ///
    /// # Safety
    ///
    /// `array` must be null or a pointer previously returned by `into_raw`
    /// that has not been freed, and the host must no longer reference it.
    pub unsafe fn free_raw(array: *mut *mut c_char) {
        if array.is_null() {
            return;
        }
        let mut len = 0_usize;
        while !unsafe { *array.add(len) }.is_null() {
            len += 1;
        }
        let total = len + 1;
        let entries = unsafe { Vec::from_raw_parts(array, total, total) };
        for entry in entries {
            if !entry.is_null() {
                drop(unsafe { CString::from_raw(entry) });
            }
        }
    }
}
