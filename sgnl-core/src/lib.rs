// sgnl-core/src/lib.rs
// ============================================================================
// Module: SGNL Core Library
// Description: Public API surface for the SGNL host authorization core.
// Purpose: Expose result taxonomy, identifiers, access records, and logging.
// Dependencies: crate::{access, device, identifiers, log, request_id, result}
// ============================================================================

//! ## Overview
//! SGNL Core provides the shared vocabulary of the host authorization
//! integration: the result taxonomy returned by every outbound operation,
//! strongly typed identifiers, access and search result records, request-id
//! generation, device-id discovery, and the process-wide logger. It is
//! transport-agnostic and carries no HTTP or host-plugin dependencies.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod access;
pub mod device;
pub mod identifiers;
pub mod log;
pub mod request_id;
pub mod result;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Library version string reported by the adapters.
pub const VERSION: &str = "1.0.0";

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::AccessQuery;
pub use access::AccessResult;
pub use access::SearchResult;
pub use device::device_id;
pub use identifiers::ActionName;
pub use identifiers::AssetId;
pub use identifiers::PrincipalId;
pub use identifiers::RequestId;
pub use identifiers::TenantId;
pub use log::LogContext;
pub use log::LogDestination;
pub use log::LogLevel;
pub use log::LoggerConfig;
pub use request_id::generate_request_id;
pub use result::ResultKind;
