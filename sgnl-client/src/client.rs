// sgnl-client/src/client.rs
// ============================================================================
// Module: SGNL Authorization Client
// Description: Evaluation, batch, and search operations against the service.
// Purpose: Own connection state and credentials; collapse replies to results.
// Dependencies: sgnl-config, sgnl-core, serde_json, zeroize
// ============================================================================

//! ## Overview
//! The client is created once per host-process initialization and destroyed
//! on teardown; the API token is held in zeroizing storage so the backing
//! memory is wiped on drop. Each operation generates one request identifier,
//! posts one JSON body through the transport, and parses the reply
//! conservatively: a missing `decisions` array or an uncovered batch slot is
//! `Denied`. Batch results correspond to queries by position; the client
//! never re-matches replies by asset identifier, because asset identifiers
//! may repeat across queries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use sgnl_config::CommandAttribute;
use sgnl_config::LoadOptions;
use sgnl_config::SgnlConfig;
use sgnl_core::AccessQuery;
use sgnl_core::AccessResult;
use sgnl_core::ActionName;
use sgnl_core::AssetId;
use sgnl_core::LogContext;
use sgnl_core::LogDestination;
use sgnl_core::LogLevel;
use sgnl_core::LoggerConfig;
use sgnl_core::PrincipalId;
use sgnl_core::RequestId;
use sgnl_core::ResultKind;
use sgnl_core::SearchResult;
use sgnl_core::device_id;
use sgnl_core::generate_request_id;
use sgnl_core::sgnl_log;
use sgnl_core::sgnl_secure_debug;
use zeroize::Zeroizing;

use crate::error::ClientError;
use crate::error::status_error;
use crate::retry::RetryPolicy;
use crate::transport::DecisionTransport;
use crate::transport::HttpTransport;
use crate::transport::TransportReply;
use crate::transport::TransportSettings;
use crate::wire;
use crate::wire::DecisionBody;

// ============================================================================
// SECTION: Client Options
// ============================================================================

/// Construction-time overrides applied on top of the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Explicit configuration path; defaults to the discovery rules.
    pub config_path: Option<PathBuf>,
    /// Request timeout override in seconds.
    pub timeout_seconds: Option<u64>,
    /// Force debug logging on or off.
    pub debug: Option<bool>,
    /// Set both SSL verification flags at once.
    pub validate_ssl: Option<bool>,
    /// User-agent override.
    pub user_agent: Option<String>,
    /// Additional attempts after a retryable failure.
    pub retry_count: Option<u32>,
    /// Base delay between attempts in milliseconds.
    pub retry_delay_ms: Option<u64>,
}

// ============================================================================
// SECTION: Decider Interface
// ============================================================================

/// Decision operations the host adapters depend on. Implemented by
/// [`SgnlClient`]; adapters take the trait so tests can inject a stub.
pub trait AccessDecider {
    /// Collapses a single-query evaluation to its outcome kind.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the query cannot be evaluated.
    fn check_access(
        &mut self,
        principal: &PrincipalId,
        asset: &AssetId,
        action: Option<ActionName>,
    ) -> Result<ResultKind, ClientError>;

    /// Evaluates a batch of queries in one call.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the batch cannot be evaluated.
    fn evaluate_access_batch(
        &mut self,
        principal: &PrincipalId,
        queries: &[AccessQuery],
    ) -> Result<Vec<AccessResult>, ClientError>;

    /// Lists the assets the principal may act on.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the search cannot be performed.
    fn search_assets(
        &mut self,
        principal: &PrincipalId,
        action: Option<ActionName>,
    ) -> Result<SearchResult, ClientError>;
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// Authorization client for the SGNL access service.
pub struct SgnlClient {
    /// API origin host suffix, kept for validation.
    api_url: String,
    /// Bearer API token; zeroized on drop. Never logged or displayed.
    token: Zeroizing<String>,
    /// Search-decision attribute used for command display names.
    command_attribute: CommandAttribute,
    /// Whether debug logging was requested.
    debug_enabled: bool,
    /// Bounded retry policy for transient transport failures.
    retry: RetryPolicy,
    /// Request pathway to the service.
    transport: Box<dyn DecisionTransport>,
    /// Last failure rendered for the host; never contains the token.
    last_error: Option<String>,
    /// Identifier of the most recent request.
    last_request_id: Option<RequestId>,
}

impl SgnlClient {
    /// Creates a client by loading configuration and building the HTTPS
    /// transport. Initializes the process-wide logger from the configured
    /// level.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when configuration is missing or
    /// invalid, and [`ClientError::Network`] when the transport cannot be
    /// built.
    pub fn new(options: &ClientOptions) -> Result<Self, ClientError> {
        let load = LoadOptions {
            config_path: options.config_path.clone(),
            strict_validation: true,
            module_name: "client",
        };
        let config =
            SgnlConfig::load(&load).map_err(|err| ClientError::Config(err.to_string()))?;

        let debug_enabled = options.debug.unwrap_or_else(|| config.is_debug_enabled());
        let min_level = if debug_enabled {
            LogLevel::Debug
        } else {
            LogLevel::from_name(&config.logging().log_level)
        };
        sgnl_core::log::init(LoggerConfig {
            min_level,
            destination: LogDestination::Stderr,
            ..LoggerConfig::DEFAULT
        });

        let mut settings = TransportSettings::from_config(&config);
        if let Some(timeout) = options.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(validate_ssl) = options.validate_ssl {
            settings.ssl_verify_peer = validate_ssl;
            settings.ssl_verify_host = validate_ssl;
        }
        if let Some(user_agent) = &options.user_agent {
            settings.user_agent.clone_from(user_agent);
        }
        let transport = HttpTransport::new(&settings)?;

        let retry = RetryPolicy {
            retry_count: options.retry_count.unwrap_or_default(),
            retry_delay_ms: options
                .retry_delay_ms
                .unwrap_or(RetryPolicy::default().retry_delay_ms),
        };

        let ctx = LogContext::new("client", "new");
        sgnl_log!(
            LogLevel::Debug,
            &ctx,
            "client initialized: tenant={}, api_url={}",
            config.tenant(),
            config.api_url()
        );

        Ok(Self {
            api_url: config.api_url().to_string(),
            token: Zeroizing::new(config.token().to_string()),
            command_attribute: config.sudo().command_attribute,
            debug_enabled,
            retry,
            transport: Box::new(transport),
            last_error: None,
            last_request_id: None,
        })
    }

    /// Assembles a client around an injected transport.
    #[must_use]
    pub fn from_parts(transport: Box<dyn DecisionTransport>, retry: RetryPolicy) -> Self {
        Self {
            api_url: "sgnlapis.cloud".to_string(),
            token: Zeroizing::new("injected-token".to_string()),
            command_attribute: CommandAttribute::Id,
            debug_enabled: false,
            retry,
            transport,
            last_error: None,
            last_request_id: None,
        }
    }

    /// Sets the search-decision attribute used for command display names.
    pub fn set_command_attribute(&mut self, attribute: CommandAttribute) {
        self.command_attribute = attribute;
    }

    /// Validates that the client may issue requests.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the API origin or token is empty.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.api_url.is_empty() {
            return Err(ClientError::Config("api_url is empty".to_string()));
        }
        if self.token.is_empty() {
            return Err(ClientError::Config("api_token is empty".to_string()));
        }
        Ok(())
    }

    /// Returns the last failure message, if any.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Returns the identifier of the most recent request, if any.
    #[must_use]
    pub fn last_request_id(&self) -> Option<&RequestId> {
        self.last_request_id.as_ref()
    }

    /// Returns true when debug logging was requested.
    #[must_use]
    pub const fn is_debug_enabled(&self) -> bool {
        self.debug_enabled
    }

    /// Evaluates one query and returns the detailed result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when inputs are invalid or the call fails.
    pub fn evaluate_access(
        &mut self,
        principal: &PrincipalId,
        asset: &AssetId,
        action: Option<ActionName>,
    ) -> Result<AccessResult, ClientError> {
        let query = AccessQuery::new(asset.clone(), action);
        let mut results = self.evaluate_access_batch(principal, std::slice::from_ref(&query))?;
        results
            .pop()
            .ok_or_else(|| ClientError::Parse("empty result set".to_string()))
    }

    /// Evaluates a batch of queries in one call. The returned vector has
    /// exactly one slot per query; slot `i` answers query `i`. Slots the
    /// response does not cover are `Denied`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when inputs are invalid or the call fails.
    pub fn evaluate_access_batch(
        &mut self,
        principal: &PrincipalId,
        queries: &[AccessQuery],
    ) -> Result<Vec<AccessResult>, ClientError> {
        self.last_error = None;
        if !principal.is_valid() {
            return self.fail(ClientError::InvalidRequest("invalid principal id".to_string()));
        }
        if queries.is_empty() {
            return self.fail(ClientError::InvalidRequest("no queries".to_string()));
        }
        for query in queries {
            if let Some(asset) = &query.asset_id {
                if !asset.is_valid() {
                    return self
                        .fail(ClientError::InvalidRequest("invalid asset id".to_string()));
                }
            }
        }

        let request_id = generate_request_id();
        self.last_request_id = Some(request_id.clone());
        let body = serde_json::to_value(wire::evaluation_request(
            principal,
            device_id(),
            queries,
        ))
        .map_err(|err| ClientError::InvalidRequest(err.to_string()))?;

        let ctx = LogContext::new("client", "evaluate_access_batch")
            .with_request_id(request_id.as_str())
            .with_principal(principal.as_str());
        sgnl_secure_debug!(&ctx, "evaluating {} queries: {body}", queries.len());

        let reply = self.dispatch(wire::EVALUATIONS_ENDPOINT, &request_id, &body, &ctx)?;
        let response: wire::AccessResponse = match serde_json::from_str(&reply.body) {
            Ok(response) => response,
            Err(err) => return self.fail(ClientError::Parse(err.to_string())),
        };
        if let Some(error) = response.error {
            return self.fail(ClientError::Service(error.message));
        }

        let decisions = response.decisions.unwrap_or_default();
        sgnl_secure_debug!(
            &ctx,
            "received {} decisions for {} queries",
            decisions.len(),
            queries.len()
        );
        let results = queries
            .iter()
            .enumerate()
            .map(|(index, query)| match decisions.get(index) {
                Some(decision) if decision.is_allow() => AccessResult::allowed(
                    principal.clone(),
                    query,
                    decision.reason.clone().unwrap_or_default(),
                    request_id.clone(),
                ),
                Some(decision) => AccessResult::denied(
                    principal.clone(),
                    query,
                    decision.decision.clone().unwrap_or_else(|| "Deny".to_string()),
                    decision.reason.clone().unwrap_or_default(),
                    request_id.clone(),
                ),
                None => {
                    AccessResult::synthetic_denied(principal.clone(), query, request_id.clone())
                }
            })
            .collect();
        Ok(results)
    }

    /// Collapses a single-query evaluation to its outcome kind.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when inputs are invalid or the call fails.
    pub fn check_access(
        &mut self,
        principal: &PrincipalId,
        asset: &AssetId,
        action: Option<ActionName>,
    ) -> Result<ResultKind, ClientError> {
        let result = self.evaluate_access(principal, asset, action)?;
        Ok(result.result)
    }

    /// Lists the assets for which the principal has the action allowed.
    /// The action defaults to `list`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when inputs are invalid or the call fails.
    pub fn search_assets(
        &mut self,
        principal: &PrincipalId,
        action: Option<ActionName>,
    ) -> Result<SearchResult, ClientError> {
        self.last_error = None;
        if !principal.is_valid() {
            return self.fail(ClientError::InvalidRequest("invalid principal id".to_string()));
        }
        let action = action.unwrap_or_else(ActionName::list);

        let request_id = generate_request_id();
        self.last_request_id = Some(request_id.clone());
        let body =
            serde_json::to_value(wire::search_request(principal, device_id(), &action))
                .map_err(|err| ClientError::InvalidRequest(err.to_string()))?;

        let ctx = LogContext::new("client", "search_assets")
            .with_request_id(request_id.as_str())
            .with_principal(principal.as_str())
            .with_action(action.as_str());
        sgnl_secure_debug!(&ctx, "searching assets: {body}");

        let reply = self.dispatch(wire::SEARCH_ENDPOINT, &request_id, &body, &ctx)?;
        let response: wire::AccessResponse = match serde_json::from_str(&reply.body) {
            Ok(response) => response,
            Err(err) => return self.fail(ClientError::Parse(err.to_string())),
        };
        if let Some(error) = response.error {
            return self.fail(ClientError::Service(error.message));
        }

        let decisions = response.decisions.unwrap_or_default();
        let asset_ids: Vec<AssetId> = decisions
            .iter()
            .filter(|decision| decision.is_allow())
            .filter_map(|decision| self.display_asset(decision))
            .collect();
        sgnl_secure_debug!(&ctx, "search found {} allowed assets", asset_ids.len());
        Ok(SearchResult::found(principal.clone(), action, asset_ids, request_id))
    }

    /// Posts one body under the retry policy and maps HTTP statuses onto the
    /// error taxonomy. Only transport failures are retried; authentication
    /// failures and decision responses surface immediately.
    fn dispatch(
        &mut self,
        endpoint: &str,
        request_id: &RequestId,
        body: &serde_json::Value,
        ctx: &LogContext<'_>,
    ) -> Result<TransportReply, ClientError> {
        let retry = self.retry;
        let transport = &self.transport;
        let token = &self.token;
        let outcome = retry.run(ctx, || {
            let reply = transport.post(endpoint, request_id, token, body)?;
            sgnl_secure_debug!(ctx, "http status {}", reply.status);
            match reply.status {
                200 => Ok(reply),
                status => Err(status_error(status)),
            }
        });
        match outcome {
            Ok(reply) => Ok(reply),
            Err(err) => self.fail(err),
        }
    }

    /// Selects the display identifier for a search decision according to the
    /// configured command attribute, falling back to the asset identifier.
    fn display_asset(&self, decision: &DecisionBody) -> Option<AssetId> {
        let attribute_key = match self.command_attribute {
            CommandAttribute::Id => None,
            CommandAttribute::Name => Some("name"),
            CommandAttribute::DisplayName => Some("displayName"),
        };
        if let Some(key) = attribute_key {
            if let Some(attributes) = &decision.attributes {
                if let Some(value) = attributes.get(key) {
                    return Some(AssetId::new(value.clone()));
                }
            }
        }
        decision.asset_id.clone().map(AssetId::new)
    }

    /// Records the failure for the host and propagates it.
    fn fail<T>(&mut self, err: ClientError) -> Result<T, ClientError> {
        self.last_error = Some(err.to_string());
        Err(err)
    }
}

impl AccessDecider for SgnlClient {
    fn check_access(
        &mut self,
        principal: &PrincipalId,
        asset: &AssetId,
        action: Option<ActionName>,
    ) -> Result<ResultKind, ClientError> {
        Self::check_access(self, principal, asset, action)
    }

    fn evaluate_access_batch(
        &mut self,
        principal: &PrincipalId,
        queries: &[AccessQuery],
    ) -> Result<Vec<AccessResult>, ClientError> {
        Self::evaluate_access_batch(self, principal, queries)
    }

    fn search_assets(
        &mut self,
        principal: &PrincipalId,
        action: Option<ActionName>,
    ) -> Result<SearchResult, ClientError> {
        Self::search_assets(self, principal, action)
    }
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Folds batch results with AND-of-decisions: the aggregate is `Allowed`
/// only when every slot is `Allowed`; otherwise it carries the first
/// non-allowed slot's kind.
#[must_use]
pub fn aggregate(results: &[AccessResult]) -> ResultKind {
    for result in results {
        if !result.result.is_allowed() {
            return result.result;
        }
    }
    ResultKind::Allowed
}
