// sgnl-core/src/device.rs
// ============================================================================
// Module: SGNL Device Identifier
// Description: Stable per-host identifier for principal context.
// Purpose: Resolve a device id once per process with a fixed fallback chain.
// Dependencies: libc
// ============================================================================

//! ## Overview
//! The device identifier is read once per process from the first available of
//! the machine-id file, the hostname, the MAC address of the first
//! non-loopback interface, or the literal `unknown-device`. It is carried in
//! the principal block of every outbound request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// Process-wide cached device identifier.
static DEVICE_ID: OnceLock<String> = OnceLock::new();

/// Returns the device identifier, resolving it on first use.
#[must_use]
pub fn device_id() -> &'static str {
    DEVICE_ID.get_or_init(|| resolve_device_id(Path::new("/")))
}

/// Resolves the device identifier from the given filesystem root.
#[must_use]
pub fn resolve_device_id(root: &Path) -> String {
    if let Some(machine_id) = read_trimmed(&root.join("etc/machine-id")) {
        if !machine_id.is_empty() {
            return machine_id;
        }
    }
    if let Some(name) = hostname() {
        return name;
    }
    if let Some(mac) = first_interface_mac(&root.join("sys/class/net")) {
        return mac;
    }
    "unknown-device".to_string()
}

/// Returns the system hostname, if available and non-empty.
fn hostname() -> Option<String> {
    let mut buf = [0_u8; 256];
    let rc = unsafe { libc::gethostname(buf.as_mut_ptr().cast::<libc::c_char>(), buf.len()) };
    if rc != 0 {
        return None;
    }
    let end = buf.iter().position(|&byte| byte == 0).unwrap_or(buf.len());
    let name = String::from_utf8_lossy(&buf[..end]).into_owned();
    if name.is_empty() { None } else { Some(name) }
}

/// Returns the MAC address of the first non-loopback interface under the
/// given sysfs directory, preferring conventional primary interface names.
fn first_interface_mac(net_dir: &Path) -> Option<String> {
    for preferred in ["eth0", "wlan0"] {
        if let Some(mac) = interface_mac(net_dir, preferred) {
            return Some(mac);
        }
    }
    let entries = fs::read_dir(net_dir).ok()?;
    let mut names: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.') && name != "lo")
        .collect();
    names.sort();
    names.iter().find_map(|name| interface_mac(net_dir, name))
}

/// Reads a single interface's address file, if present and non-empty.
fn interface_mac(net_dir: &Path, name: &str) -> Option<String> {
    let mac = read_trimmed(&net_dir.join(name).join("address"))?;
    if mac.is_empty() { None } else { Some(mac) }
}

/// Reads a file and strips a trailing newline.
fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|content| content.trim_end_matches('\n').to_string())
}
