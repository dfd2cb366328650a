// sgnl-client/src/wire.rs
// ============================================================================
// Module: SGNL Wire Protocol
// Description: Request and response bodies for the access API.
// Purpose: Codify the evaluation and search JSON shapes.
// Dependencies: serde, serde_json, sgnl-core
// ============================================================================

//! ## Overview
//! Evaluation and search share one request shape: a `principal` object with
//! `id` and `deviceId`, and a `queries` array of `{assetId?, action}`.
//! Responses carry a `decisions` array; each decision has a `decision`
//! string, an optional `reason`, and (for search) an `assetId` plus optional
//! display attributes. A top-level `error.message` overrides everything.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use sgnl_core::AccessQuery;
use sgnl_core::ActionName;
use sgnl_core::PrincipalId;

// ============================================================================
// SECTION: Endpoints
// ============================================================================

/// Evaluation endpoint path.
pub const EVALUATIONS_ENDPOINT: &str = "/access/v2/evaluations";
/// Asset search endpoint path.
pub const SEARCH_ENDPOINT: &str = "/access/v2/search";

// ============================================================================
// SECTION: Request Bodies
// ============================================================================

/// Principal block carried by every request.
#[derive(Debug, Serialize)]
pub struct PrincipalBlock<'a> {
    /// Principal identifier.
    pub id: &'a str,
    /// Stable per-host device identifier.
    #[serde(rename = "deviceId")]
    pub device_id: &'a str,
}

/// One query of an evaluation or search request.
#[derive(Debug, Serialize)]
pub struct QueryBody<'a> {
    /// Asset identifier; omitted for search queries.
    #[serde(rename = "assetId", skip_serializing_if = "Option::is_none")]
    pub asset_id: Option<&'a str>,
    /// Action verb.
    pub action: &'a str,
}

/// Evaluation and search request body.
#[derive(Debug, Serialize)]
pub struct AccessRequest<'a> {
    /// Acting principal.
    pub principal: PrincipalBlock<'a>,
    /// Queries evaluated in order; responses correspond by position.
    pub queries: Vec<QueryBody<'a>>,
}

/// Builds the evaluation request body for a batch of queries.
#[must_use]
pub fn evaluation_request<'a>(
    principal: &'a PrincipalId,
    device_id: &'a str,
    queries: &'a [AccessQuery],
) -> AccessRequest<'a> {
    AccessRequest {
        principal: PrincipalBlock {
            id: principal.as_str(),
            device_id,
        },
        queries: queries
            .iter()
            .map(|query| QueryBody {
                asset_id: query.asset_id.as_ref().map(sgnl_core::AssetId::as_str),
                action: query.action.as_str(),
            })
            .collect(),
    }
}

/// Builds the search request body for one action.
#[must_use]
pub fn search_request<'a>(
    principal: &'a PrincipalId,
    device_id: &'a str,
    action: &'a ActionName,
) -> AccessRequest<'a> {
    AccessRequest {
        principal: PrincipalBlock {
            id: principal.as_str(),
            device_id,
        },
        queries: vec![QueryBody {
            asset_id: None,
            action: action.as_str(),
        }],
    }
}

// ============================================================================
// SECTION: Response Bodies
// ============================================================================

/// Response body shared by evaluation and search.
#[derive(Debug, Default, Deserialize)]
pub struct AccessResponse {
    /// Per-query decisions in request order.
    #[serde(default)]
    pub decisions: Option<Vec<DecisionBody>>,
    /// Top-level service error, overriding any decisions.
    #[serde(default)]
    pub error: Option<ApiErrorBody>,
}

/// One decision of a response.
#[derive(Debug, Default, Deserialize)]
pub struct DecisionBody {
    /// Decision string; anything other than `Allow` denies.
    #[serde(default)]
    pub decision: Option<String>,
    /// Optional reason attached to the decision.
    #[serde(default)]
    pub reason: Option<String>,
    /// Asset identifier, present on search decisions.
    #[serde(rename = "assetId", default)]
    pub asset_id: Option<String>,
    /// Optional display attributes keyed by attribute name.
    #[serde(default)]
    pub attributes: Option<BTreeMap<String, String>>,
}

impl DecisionBody {
    /// Returns true when the decision string is exactly `Allow`.
    #[must_use]
    pub fn is_allow(&self) -> bool {
        self.decision.as_deref() == Some("Allow")
    }
}

/// Top-level error body.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Service-provided message.
    #[serde(default)]
    pub message: String,
}
