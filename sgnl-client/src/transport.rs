// sgnl-client/src/transport.rs
// ============================================================================
// Module: SGNL HTTP Transport
// Description: Blocking HTTPS transport to the access service.
// Purpose: Post JSON bodies with bounded timeouts and typed failures.
// Dependencies: reqwest, sgnl-config, sgnl-core, url
// ============================================================================

//! ## Overview
//! [`DecisionTransport`] is the seam between the client and the network: it
//! posts one JSON body to one endpoint and returns the raw status and body.
//! The production implementation wraps a blocking `reqwest` client with
//! redirects disabled and the configured timeouts and TLS verification
//! flags. The bearer token is passed per call and never stored here.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use sgnl_config::SgnlConfig;
use sgnl_core::RequestId;
use url::Url;

use crate::error::ClientError;

// ============================================================================
// SECTION: Transport Interface
// ============================================================================

/// Raw reply from one transport round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

/// Request pathway to the decision service.
pub trait DecisionTransport: Send {
    /// Posts one JSON body and returns the raw reply.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Timeout`] on a timed-out round trip and
    /// [`ClientError::Network`] on any other transport failure.
    fn post(
        &self,
        endpoint: &str,
        request_id: &RequestId,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportReply, ClientError>;
}

// ============================================================================
// SECTION: Transport Settings
// ============================================================================

/// Connection parameters resolved from configuration plus caller overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportSettings {
    /// API origin host suffix.
    pub api_url: String,
    /// Tenant identifier; when empty the origin host is used alone.
    pub tenant: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Connect timeout in seconds.
    pub connect_timeout_seconds: u64,
    /// Verify the peer certificate chain.
    pub ssl_verify_peer: bool,
    /// Verify the peer hostname against its certificate.
    pub ssl_verify_host: bool,
    /// Outbound user agent.
    pub user_agent: String,
    /// Optional CA bundle overriding the system trust store.
    pub ca_bundle: Option<PathBuf>,
}

impl TransportSettings {
    /// Copies the connection parameters out of a loaded configuration.
    #[must_use]
    pub fn from_config(config: &SgnlConfig) -> Self {
        Self {
            api_url: config.api_url().to_string(),
            tenant: config.tenant().to_string(),
            timeout_seconds: config.http().timeout_seconds,
            connect_timeout_seconds: config.http().connect_timeout_seconds,
            ssl_verify_peer: config.http().ssl_verify_peer,
            ssl_verify_host: config.http().ssl_verify_host,
            user_agent: config.http().user_agent.clone(),
            ca_bundle: config.http().ca_bundle.clone(),
        }
    }

    /// Builds the base URL `https://{tenant}.{api_url}`, or
    /// `https://{api_url}` when no tenant is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] when the host does not form a valid
    /// URL.
    pub fn base_url(&self) -> Result<Url, ClientError> {
        let host = if self.tenant.is_empty() {
            self.api_url.clone()
        } else {
            format!("{}.{}", self.tenant, self.api_url)
        };
        Url::parse(&format!("https://{host}"))
            .map_err(|err| ClientError::Config(format!("invalid api host {host}: {err}")))
    }
}

// ============================================================================
// SECTION: HTTP Transport
// ============================================================================

/// Blocking HTTPS transport.
pub struct HttpTransport {
    /// HTTP client used for outbound requests.
    client: Client,
    /// Base URL of the tenant's service endpoint.
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the CA bundle is unreadable or the HTTP
    /// client cannot be constructed.
    pub fn new(settings: &TransportSettings) -> Result<Self, ClientError> {
        let base_url = settings.base_url()?;
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .connect_timeout(Duration::from_secs(settings.connect_timeout_seconds))
            .user_agent(settings.user_agent.clone())
            .redirect(Policy::none())
            .danger_accept_invalid_certs(!settings.ssl_verify_peer)
            .danger_accept_invalid_hostnames(!settings.ssl_verify_host);
        if let Some(bundle) = &settings.ca_bundle {
            let pem = fs::read(bundle).map_err(|err| {
                ClientError::Config(format!("cannot read ca bundle {}: {err}", bundle.display()))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem)
                .map_err(|err| ClientError::Config(format!("invalid ca bundle: {err}")))?;
            builder = builder.add_root_certificate(certificate);
        }
        let client = builder
            .build()
            .map_err(|err| ClientError::Network(format!("http client build failed: {err}")))?;
        Ok(Self {
            client,
            base_url,
        })
    }
}

impl DecisionTransport for HttpTransport {
    fn post(
        &self,
        endpoint: &str,
        request_id: &RequestId,
        token: &str,
        body: &serde_json::Value,
    ) -> Result<TransportReply, ClientError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|err| ClientError::InvalidRequest(format!("invalid endpoint: {err}")))?;
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header("X-Request-Id", request_id.as_str())
            .body(body.to_string())
            .send()
            .map_err(classify_transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(classify_transport_error)?;
        Ok(TransportReply {
            status,
            body,
        })
    }
}

/// Distinguishes timeouts from other transport failures.
fn classify_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(err.to_string())
    } else {
        ClientError::Network(err.to_string())
    }
}
