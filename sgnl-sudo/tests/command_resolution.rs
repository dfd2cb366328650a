// sgnl-sudo/tests/command_resolution.rs
// =============================================================================
// Module: Command Resolution Tests
// Description: Search-path scanning and command-info construction.
// Purpose: Ensure the first executable match wins and arrays are complete.
// =============================================================================
//! ## Overview
//! A command name containing a slash is taken verbatim; otherwise the first
//! search-path entry holding an executable of that name wins. The
//! command-info array always carries the full set of required entries.

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

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::path::PathBuf;

use sgnl_sudo::CommandInfo;
use sgnl_sudo::resolve_command_path;

fn create_executable(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\n").expect("write stub command");
    let mut permissions = fs::metadata(&path).expect("metadata").permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("set permissions");
    path
}

fn create_plain_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "data").expect("write plain file");
    let mut permissions = fs::metadata(&path).expect("metadata").permissions();
    permissions.set_mode(0o644);
    fs::set_permissions(&path, permissions).expect("set permissions");
    path
}

#[test]
fn name_with_slash_is_taken_verbatim() {
    assert_eq!(
        resolve_command_path("/usr/bin/whoami", None),
        Some(PathBuf::from("/usr/bin/whoami"))
    );
    assert_eq!(resolve_command_path("./tool", Some("/nonexistent")), Some(PathBuf::from("./tool")));
}

#[test]
fn first_search_path_entry_with_an_executable_wins() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    create_executable(second.path(), "backup");
    let expected = second.path().join("backup");
    let search = format!("{}:{}", first.path().display(), second.path().display());
    assert_eq!(resolve_command_path("backup", Some(&search)), Some(expected));
}

#[test]
fn earlier_entry_shadows_later_ones() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    let expected = create_executable(first.path(), "backup");
    create_executable(second.path(), "backup");
    let search = format!("{}:{}", first.path().display(), second.path().display());
    assert_eq!(resolve_command_path("backup", Some(&search)), Some(expected));
}

#[test]
fn non_executable_candidates_are_skipped() {
    let first = tempfile::tempdir().expect("tempdir");
    let second = tempfile::tempdir().expect("tempdir");
    create_plain_file(first.path(), "backup");
    let expected = create_executable(second.path(), "backup");
    let search = format!("{}:{}", first.path().display(), second.path().display());
    assert_eq!(resolve_command_path("backup", Some(&search)), Some(expected));
}

#[test]
fn missing_command_resolves_to_none() {
    let dir = tempfile::tempdir().expect("tempdir");
    let search = dir.path().display().to_string();
    assert_eq!(resolve_command_path("no-such-command", Some(&search)), None);
}

#[test]
fn command_info_carries_all_required_entries() {
    let info = CommandInfo::build(Path::new("/usr/bin/whoami"), Path::new("/home/bob"))
        .expect("command info builds");
    let entries: Vec<&str> =
        info.entries().iter().map(|entry| entry.to_str().expect("utf-8 entry")).collect();
    assert_eq!(
        entries,
        vec![
            "command=/usr/bin/whoami",
            "runas_uid=0",
            "runas_gid=0",
            "cwd=/home/bob",
            "timeout=300",
        ]
    );
}
