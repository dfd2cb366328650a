// sgnl-client/src/lib.rs
// ============================================================================
// Module: SGNL Client Library
// Description: Authorization client for the SGNL access service.
// Purpose: Expose evaluation, search, transport, and typed errors.
// Dependencies: crate::{client, error, retry, transport, wire}
// ============================================================================

//! ## Overview
//! The SGNL client owns connection parameters and credentials, constructs and
//! sends evaluation and search requests over HTTPS, parses per-query
//! decisions, and converts every transport or HTTP outcome into the typed
//! result taxonomy. Parsing is conservative: a missing or unrecognized
//! decision is `Denied`, and no failure path grants access. The transport is
//! an explicit interface so the request pathway is injectable in tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod error;
pub mod retry;
pub mod transport;
pub mod wire;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::AccessDecider;
pub use client::ClientOptions;
pub use client::SgnlClient;
pub use client::aggregate;
pub use error::ClientError;
pub use retry::RetryPolicy;
pub use transport::DecisionTransport;
pub use transport::HttpTransport;
pub use transport::TransportReply;
pub use transport::TransportSettings;
