// sgnl-core/src/request_id.rs
// ============================================================================
// Module: SGNL Request Identifier Generation
// Description: Per-invocation tracking identifiers for outbound requests.
// Purpose: Produce opaque ids that are distinct across consecutive calls.
// Dependencies: rand
// ============================================================================

//! ## Overview
//! Request identifiers take the form `sgnl-{secs:08x}-{pid:04x}-{mix:04x}`,
//! derived from wall-clock seconds, the process id, and an entropy mix. The
//! mix folds a random draw with a process-wide counter so two consecutive
//! calls within the same second do not collide. One identifier is generated
//! per HTTP call; every result row of a batch carries the same identifier.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::OnceLock;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use crate::identifiers::RequestId;

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Monotonic per-process sequence folded into the entropy mix.
static SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// Per-process random base for the entropy mix.
static ENTROPY_BASE: OnceLock<u32> = OnceLock::new();

/// Generates a fresh request identifier.
#[must_use]
pub fn generate_request_id() -> RequestId {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0);
    let pid = std::process::id();
    let base = *ENTROPY_BASE.get_or_init(rand::random);
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let mix = (base ^ sequence) & 0xFFFF;
    RequestId::new(format!(
        "sgnl-{:08x}-{:04x}-{mix:04x}",
        (secs & 0xFFFF_FFFF) as u32,
        pid & 0xFFFF
    ))
}
