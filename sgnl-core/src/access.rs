// sgnl-core/src/access.rs
// ============================================================================
// Module: SGNL Access Records
// Description: Query and result records for evaluation and search operations.
// Purpose: Carry per-query decisions with owned storage and stable fields.
// Dependencies: crate::{identifiers, result}, serde, time
// ============================================================================

//! ## Overview
//! Access queries pair an optional asset with an action; access results carry
//! the decision string, reason, and request-tracking metadata for exactly one
//! query. Result records own all of their storage. A missing or unrecognized
//! decision is always rendered as `Denied`; nothing in this module can grant
//! access on absent data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::OffsetDateTime;

use crate::identifiers::ActionName;
use crate::identifiers::AssetId;
use crate::identifiers::PrincipalId;
use crate::identifiers::RequestId;
use crate::result::ResultKind;

// ============================================================================
// SECTION: Access Query
// ============================================================================

/// One evaluation query: an optional asset and an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessQuery {
    /// Asset under evaluation; search queries omit it.
    pub asset_id: Option<AssetId>,
    /// Action verb; defaults to `execute` when unspecified by the caller.
    pub action: ActionName,
}

impl AccessQuery {
    /// Creates a query for an asset, defaulting the action to `execute`.
    #[must_use]
    pub fn new(asset_id: AssetId, action: Option<ActionName>) -> Self {
        Self {
            asset_id: Some(asset_id),
            action: action.unwrap_or_else(ActionName::execute),
        }
    }

    /// Creates an asset-less query carrying only an action.
    #[must_use]
    pub fn action_only(action: ActionName) -> Self {
        Self {
            asset_id: None,
            action,
        }
    }
}

// ============================================================================
// SECTION: Access Result
// ============================================================================

/// Detailed outcome of one evaluation query.
///
/// # Invariants
/// - `result == ResultKind::Allowed` if and only if `decision == "Allow"`.
/// - The record owns all of its storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResult {
    /// Overall outcome kind.
    pub result: ResultKind,
    /// Raw decision string from the service (`Allow`, `Deny`, ...).
    pub decision: String,
    /// Reason attached to the decision, empty when absent.
    pub reason: String,
    /// Asset that was evaluated.
    pub asset_id: Option<AssetId>,
    /// Action that was evaluated.
    pub action: ActionName,
    /// Principal that was evaluated.
    pub principal_id: PrincipalId,
    /// Evaluation timestamp (unix seconds).
    pub timestamp: i64,
    /// Request identifier shared by every result of the same call.
    pub request_id: RequestId,
    /// Error message when the kind reports a failure, empty otherwise.
    pub error_message: String,
    /// Detailed error code (HTTP status where applicable), zero otherwise.
    pub error_code: i32,
}

impl AccessResult {
    /// Creates an allowed result for the given query.
    #[must_use]
    pub fn allowed(
        principal_id: PrincipalId,
        query: &AccessQuery,
        reason: String,
        request_id: RequestId,
    ) -> Self {
        Self {
            result: ResultKind::Allowed,
            decision: "Allow".to_string(),
            reason,
            asset_id: query.asset_id.clone(),
            action: query.action.clone(),
            principal_id,
            timestamp: now_unix(),
            request_id,
            error_message: String::new(),
            error_code: 0,
        }
    }

    /// Creates a denied result carrying the service's decision string.
    #[must_use]
    pub fn denied(
        principal_id: PrincipalId,
        query: &AccessQuery,
        decision: String,
        reason: String,
        request_id: RequestId,
    ) -> Self {
        Self {
            result: ResultKind::Denied,
            decision,
            reason,
            asset_id: query.asset_id.clone(),
            action: query.action.clone(),
            principal_id,
            timestamp: now_unix(),
            request_id,
            error_message: String::new(),
            error_code: 0,
        }
    }

    /// Creates the conservative denied result used for batch slots the
    /// service response did not cover.
    #[must_use]
    pub fn synthetic_denied(
        principal_id: PrincipalId,
        query: &AccessQuery,
        request_id: RequestId,
    ) -> Self {
        Self::denied(principal_id, query, "Deny".to_string(), String::new(), request_id)
    }

    /// Returns true when the result grants access.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        self.result.is_allowed()
    }

    /// Returns true when the result denies access as a policy decision.
    #[must_use]
    pub fn is_denied(&self) -> bool {
        self.result.is_denied()
    }
}

// ============================================================================
// SECTION: Search Result
// ============================================================================

/// Outcome of an asset search for one principal and action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Overall outcome kind.
    pub result: ResultKind,
    /// Assets the principal may act on; empty when none are allowed.
    pub asset_ids: Vec<AssetId>,
    /// Continuation token when the service pages results.
    pub next_page_token: Option<String>,
    /// Whether further pages are available.
    pub has_more_pages: bool,
    /// Principal that was searched for.
    pub principal_id: PrincipalId,
    /// Action that was searched for.
    pub action: ActionName,
    /// Request identifier for tracking.
    pub request_id: RequestId,
    /// Error message when the kind reports a failure, empty otherwise.
    pub error_message: String,
}

impl SearchResult {
    /// Creates a successful search result over the collected assets.
    #[must_use]
    pub fn found(
        principal_id: PrincipalId,
        action: ActionName,
        asset_ids: Vec<AssetId>,
        request_id: RequestId,
    ) -> Self {
        Self {
            result: ResultKind::Ok,
            asset_ids,
            next_page_token: None,
            has_more_pages: false,
            principal_id,
            action,
            request_id,
            error_message: String::new(),
        }
    }

    /// Returns the number of assets found.
    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.asset_ids.len()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the current wall-clock time as unix seconds.
fn now_unix() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}
