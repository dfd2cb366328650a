// sgnl-sudo/tests/common/mod.rs
// =============================================================================
// Module: Sudo Test Helpers
// Description: Scripted decider stub for engine tests.
// Purpose: Drive the decision path without a client or network.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::VecDeque;

use sgnl_client::AccessDecider;
use sgnl_client::ClientError;
use sgnl_core::AccessQuery;
use sgnl_core::AccessResult;
use sgnl_core::ActionName;
use sgnl_core::AssetId;
use sgnl_core::PrincipalId;
use sgnl_core::RequestId;
use sgnl_core::ResultKind;
use sgnl_core::SearchResult;

/// One recorded simple check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckCall {
    pub principal: String,
    pub asset: String,
    pub action: Option<String>,
}

/// Decider stub replaying scripted outcomes in order.
#[derive(Default)]
pub struct StubDecider {
    pub check_replies: VecDeque<Result<ResultKind, ClientError>>,
    pub batch_replies: VecDeque<Result<Vec<AccessResult>, ClientError>>,
    pub search_replies: VecDeque<Result<SearchResult, ClientError>>,
    pub check_calls: Vec<CheckCall>,
    pub batch_calls: Vec<Vec<AccessQuery>>,
}

impl StubDecider {
    /// Scripts one simple-check outcome.
    pub fn push_check(&mut self, reply: Result<ResultKind, ClientError>) {
        self.check_replies.push_back(reply);
    }

    /// Scripts one batch outcome built from decision kinds.
    pub fn push_batch_kinds(&mut self, principal: &str, kinds: &[ResultKind]) {
        let principal = PrincipalId::new(principal);
        let request_id = RequestId::new("sgnl-00000002-0002-0002");
        let results = kinds
            .iter()
            .enumerate()
            .map(|(index, kind)| {
                let query = AccessQuery::new(AssetId::new(format!("asset-{index}")), None);
                match kind {
                    ResultKind::Allowed => AccessResult::allowed(
                        principal.clone(),
                        &query,
                        String::new(),
                        request_id.clone(),
                    ),
                    _ => AccessResult::denied(
                        principal.clone(),
                        &query,
                        "Deny".to_string(),
                        String::new(),
                        request_id.clone(),
                    ),
                }
            })
            .collect();
        self.batch_replies.push_back(Ok(results));
    }

    /// Scripts one batch failure.
    pub fn push_batch_err(&mut self, err: ClientError) {
        self.batch_replies.push_back(Err(err));
    }

    /// Scripts one search outcome over the given asset names.
    pub fn push_search_assets(&mut self, principal: &str, assets: &[&str]) {
        let result = SearchResult::found(
            PrincipalId::new(principal),
            ActionName::execute(),
            assets.iter().map(|asset| AssetId::new(*asset)).collect(),
            RequestId::new("sgnl-00000003-0003-0003"),
        );
        self.search_replies.push_back(Ok(result));
    }

    /// Scripts one search failure.
    pub fn push_search_err(&mut self, err: ClientError) {
        self.search_replies.push_back(Err(err));
    }
}

impl AccessDecider for StubDecider {
    fn check_access(
        &mut self,
        principal: &PrincipalId,
        asset: &AssetId,
        action: Option<ActionName>,
    ) -> Result<ResultKind, ClientError> {
        self.check_calls.push(CheckCall {
            principal: principal.as_str().to_string(),
            asset: asset.as_str().to_string(),
            action: action.map(|action| action.as_str().to_string()),
        });
        self.check_replies.pop_front().unwrap_or_else(|| panic!("no scripted check reply"))
    }

    fn evaluate_access_batch(
        &mut self,
        _principal: &PrincipalId,
        queries: &[AccessQuery],
    ) -> Result<Vec<AccessResult>, ClientError> {
        self.batch_calls.push(queries.to_vec());
        self.batch_replies.pop_front().unwrap_or_else(|| panic!("no scripted batch reply"))
    }

    fn search_assets(
        &mut self,
        _principal: &PrincipalId,
        _action: Option<ActionName>,
    ) -> Result<SearchResult, ClientError> {
        self.search_replies.pop_front().unwrap_or_else(|| panic!("no scripted search reply"))
    }
}
