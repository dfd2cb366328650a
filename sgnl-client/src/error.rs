// sgnl-client/src/error.rs
// ============================================================================
// Module: SGNL Client Errors
// Description: Typed error taxonomy for authorization client failures.
// Purpose: Map transport and HTTP outcomes onto stable result kinds.
// Dependencies: sgnl-core, thiserror
// ============================================================================

//! ## Overview
//! Every client failure is one of the variants below and maps onto the shared
//! result taxonomy through [`ClientError::kind`]. Error displays carry the
//! HTTP status where one exists and never contain the API token.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sgnl_core::ResultKind;
use thiserror::Error;

// ============================================================================
// SECTION: Client Error
// ============================================================================

/// Authorization client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Configuration is missing, invalid, or incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Request inputs were rejected before any HTTP call.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Transport-level failure or server error.
    #[error("network error: {0}")]
    Network(String),
    /// The service rejected the bearer credentials.
    #[error("HTTP {status}: authentication rejected")]
    Auth {
        /// HTTP status code (401 or 403).
        status: u16,
    },
    /// The request or connection timed out.
    #[error("timeout: {0}")]
    Timeout(String),
    /// Unexpected non-success HTTP status.
    #[error("HTTP {status}: request failed")]
    Api {
        /// HTTP status code.
        status: u16,
    },
    /// The service returned a top-level error message.
    #[error("service error: {0}")]
    Service(String),
    /// The response body could not be parsed.
    #[error("response parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Maps the error onto the shared result taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ResultKind {
        match self {
            Self::Config(_) => ResultKind::ConfigError,
            Self::InvalidRequest(_) => ResultKind::InvalidRequest,
            Self::Network(_) => ResultKind::NetworkError,
            Self::Auth { .. } => ResultKind::AuthError,
            Self::Timeout(_) => ResultKind::TimeoutError,
            Self::Api { .. } | Self::Service(_) | Self::Parse(_) => ResultKind::Error,
        }
    }

    /// Returns the HTTP status attached to the error, when one exists.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status } | Self::Api { status } => Some(*status),
            _ => None,
        }
    }

    /// Returns true when a bounded retry may be attempted. Authentication
    /// failures and decision responses are never retried.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Timeout(_))
    }
}

/// Maps a non-success HTTP status onto the error taxonomy.
#[must_use]
pub fn status_error(status: u16) -> ClientError {
    match status {
        401 | 403 => ClientError::Auth { status },
        status if status >= 500 => ClientError::Network(format!("HTTP {status}: server error")),
        status => ClientError::Api { status },
    }
}
