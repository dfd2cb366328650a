// sgnl-core/src/result.rs
// ============================================================================
// Module: SGNL Result Taxonomy
// Description: Canonical outcome kinds for authorization operations.
// Purpose: Guarantee every outbound call resolves to a typed outcome.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every authorization operation resolves to one of the kinds below; there is
//! no untyped failure path. `Allowed` and `Denied` are the only decision
//! outcomes. Every other non-`Ok` kind is an error, and no error kind ever
//! grants access.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Result Kind
// ============================================================================

/// Outcome kind for authorization operations.
///
/// # Invariants
/// - Variants are stable; adapters map them onto host return conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    /// Operation succeeded without carrying a decision.
    Ok,
    /// Access allowed by policy.
    Allowed,
    /// Access denied by policy.
    Denied,
    /// General error.
    Error,
    /// Configuration error.
    ConfigError,
    /// Network or HTTP transport error.
    NetworkError,
    /// Authentication error against the decision service.
    AuthError,
    /// Request or connect timeout.
    TimeoutError,
    /// Invalid request inputs rejected before transport.
    InvalidRequest,
    /// Allocation or resource exhaustion error.
    MemoryError,
}

impl ResultKind {
    /// Returns a stable human-readable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "Success",
            Self::Allowed => "Access Allowed",
            Self::Denied => "Access Denied",
            Self::Error => "Error",
            Self::ConfigError => "Configuration Error",
            Self::NetworkError => "Network Error",
            Self::AuthError => "Authentication Error",
            Self::TimeoutError => "Timeout Error",
            Self::InvalidRequest => "Invalid Request",
            Self::MemoryError => "Memory Error",
        }
    }

    /// Returns true when the kind grants access.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns true when the kind denies access as a policy decision.
    #[must_use]
    pub const fn is_denied(self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Returns true when the kind reports a failure rather than a decision.
    #[must_use]
    pub const fn is_error(self) -> bool {
        !matches!(self, Self::Ok | Self::Allowed | Self::Denied)
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
