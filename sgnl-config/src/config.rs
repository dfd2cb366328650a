// sgnl-config/src/config.rs
// ============================================================================
// Module: SGNL Configuration
// Description: JSON configuration document parsing, defaults, and validation.
// Purpose: Resolve the config path, apply recognized keys, and fail closed.
// Dependencies: sgnl-core, serde, serde_json, zeroize
// ============================================================================

//! ## Overview
//! The configuration document is a single JSON object. `api_url` and the API
//! token are required; everything else has defaults. The token is accepted
//! under `api_token` or the legacy `protected_system_token` key (`api_token`
//! wins when both are present), is held in zeroizing storage, and is redacted
//! from debug formatting. Boolean fields accept literal booleans and the
//! strings `"true"`/`"1"`. Loading is deterministic and idempotent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;
use sgnl_core::LogContext;
use sgnl_core::LogLevel;
use sgnl_core::sgnl_log;
use zeroize::Zeroizing;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed default configuration path.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/sgnl/config.json";
/// Environment variable overriding the config path (testing only).
pub const CONFIG_ENV_VAR: &str = "SGNL_CONFIG_PATH";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Minimum request timeout in seconds.
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
/// Maximum request timeout in seconds.
pub const MAX_TIMEOUT_SECONDS: u64 = 300;
/// Minimum connect timeout in seconds.
pub const MIN_CONNECT_TIMEOUT_SECONDS: u64 = 1;
/// Maximum connect timeout in seconds.
pub const MAX_CONNECT_TIMEOUT_SECONDS: u64 = 60;
/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECONDS: u64 = 10;
/// Default connect timeout in seconds.
const DEFAULT_CONNECT_TIMEOUT_SECONDS: u64 = 3;
/// Default outbound user agent.
const DEFAULT_USER_AGENT: &str = "SGNL-Client/1.0";
/// Default minimum log level name.
const DEFAULT_LOG_LEVEL: &str = "info";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file does not exist.
    #[error("config file not found: {0}")]
    NotFound(String),
    /// I/O failure while reading the configuration file.
    #[error("config io error: {0}")]
    Io(String),
    /// Configuration file is not valid JSON.
    #[error("invalid json in config file: {0}")]
    Parse(String),
    /// A required field is absent or empty.
    #[error("missing required config field: {0}")]
    MissingRequired(&'static str),
    /// A field value is outside its permitted range.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

// ============================================================================
// SECTION: Load Options
// ============================================================================

/// Options controlling configuration discovery and validation.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Explicit config path; when absent the environment override and the
    /// default path are consulted in that order.
    pub config_path: Option<PathBuf>,
    /// When false, numeric bounds are not enforced. Required fields must be
    /// present in every mode.
    pub strict_validation: bool,
    /// Consuming module tag used in log records.
    pub module_name: &'static str,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            config_path: None,
            strict_validation: true,
            module_name: "default",
        }
    }
}

// ============================================================================
// SECTION: Configuration Sections
// ============================================================================

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Request timeout in seconds (1-300).
    pub timeout_seconds: u64,
    /// Connect timeout in seconds (1-60).
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

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT_SECONDS,
            ssl_verify_peer: true,
            ssl_verify_host: true,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            ca_bundle: None,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Force the debug level regardless of `log_level`.
    pub debug: bool,
    /// Minimum level name (`debug`, `info`, `warning`, ...).
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

/// Attribute of a search decision used as the display name of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CommandAttribute {
    /// Use the asset identifier.
    #[default]
    #[serde(rename = "id")]
    Id,
    /// Use the asset name attribute.
    #[serde(rename = "name")]
    Name,
    /// Use the asset display-name attribute.
    #[serde(rename = "displayName")]
    DisplayName,
}

impl CommandAttribute {
    /// Returns the configured attribute key.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::DisplayName => "displayName",
        }
    }
}

/// Privileged-command adapter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SudoConfig {
    /// Print an informational line after an allowed invocation.
    pub access_msg: bool,
    /// Search-decision attribute used for command display names.
    pub command_attribute: CommandAttribute,
    /// Send command-plus-arguments queries as one batched call instead of
    /// one call per query.
    pub batch_evaluation: bool,
}

impl Default for SudoConfig {
    fn default() -> Self {
        Self {
            access_msg: true,
            command_attribute: CommandAttribute::Id,
            batch_evaluation: true,
        }
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Resolved SGNL configuration.
#[derive(Clone)]
pub struct SgnlConfig {
    /// API origin host suffix (for example `sgnlapis.cloud`).
    api_url: String,
    /// Tenant identifier forming the host component of the base URL.
    tenant: String,
    /// Bearer API token; zeroized when the configuration is dropped.
    token: Zeroizing<String>,
    /// HTTP settings.
    http: HttpConfig,
    /// Logging settings.
    logging: LoggingConfig,
    /// Privileged-command adapter settings.
    sudo: SudoConfig,
}

impl SgnlConfig {
    /// Loads configuration from disk using the discovery rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, unreadable, not
    /// valid JSON, or fails validation.
    pub fn load(options: &LoadOptions) -> Result<Self, ConfigError> {
        let ctx = LogContext::new("config", "load");
        let path = resolve_path(options.config_path.as_deref());
        sgnl_log!(
            LogLevel::Debug,
            &ctx,
            "loading configuration for module {} from {}",
            options.module_name,
            path.display()
        );
        let content = read_config_file(&path)?;
        let config = Self::from_json_str(&content, options)?;
        sgnl_log!(
            LogLevel::Debug,
            &ctx,
            "configuration loaded for module {}",
            options.module_name
        );
        Ok(config)
    }

    /// Parses configuration from a JSON string and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the document is not valid JSON or fails
    /// validation.
    pub fn from_json_str(content: &str, options: &LoadOptions) -> Result<Self, ConfigError> {
        let raw: RawDocument =
            serde_json::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        let config = Self::from_raw(raw);
        config.validate_required()?;
        if options.strict_validation {
            config.validate_bounds()?;
        }
        Ok(config)
    }

    /// Applies defaults and overlays recognized keys onto the resolved form.
    fn from_raw(raw: RawDocument) -> Self {
        let token = raw.api_token.or(raw.protected_system_token).unwrap_or_default();
        let http_defaults = HttpConfig::default();
        let http = HttpConfig {
            // Top-level timeout_seconds overrides the nested http.timeout.
            timeout_seconds: raw
                .timeout_seconds
                .or(raw.http.timeout)
                .unwrap_or(http_defaults.timeout_seconds),
            connect_timeout_seconds: raw
                .http
                .connect_timeout
                .unwrap_or(http_defaults.connect_timeout_seconds),
            ssl_verify_peer: raw.http.ssl_verify_peer.map_or(true, FlexibleBool::value),
            ssl_verify_host: raw.http.ssl_verify_host.map_or(true, FlexibleBool::value),
            user_agent: raw.http.user_agent.unwrap_or(http_defaults.user_agent),
            ca_bundle: raw.http.ca_bundle,
        };
        let logging = LoggingConfig {
            debug: raw.debug.map_or(false, FlexibleBool::value),
            log_level: raw.log_level.unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };
        let sudo_defaults = SudoConfig::default();
        let sudo = SudoConfig {
            access_msg: raw.sudo.access_msg.map_or(sudo_defaults.access_msg, FlexibleBool::value),
            command_attribute: raw.sudo.command_attribute.unwrap_or_default(),
            batch_evaluation: raw
                .sudo
                .batch_evaluation
                .map_or(sudo_defaults.batch_evaluation, FlexibleBool::value),
        };
        Self {
            api_url: raw.api_url.unwrap_or_default(),
            tenant: raw.tenant.unwrap_or_default(),
            token: Zeroizing::new(token),
            http,
            logging,
            sudo,
        }
    }

    /// Validates the full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when required fields are absent or numeric
    /// values are out of bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_required()?;
        self.validate_bounds()
    }

    /// Checks required fields, enforced in every validation mode.
    fn validate_required(&self) -> Result<(), ConfigError> {
        if self.api_url.is_empty() {
            return Err(ConfigError::MissingRequired("api_url"));
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingRequired("api_token"));
        }
        Ok(())
    }

    /// Checks numeric bounds, enforced under strict validation.
    fn validate_bounds(&self) -> Result<(), ConfigError> {
        let timeout = self.http.timeout_seconds;
        if !(MIN_TIMEOUT_SECONDS..=MAX_TIMEOUT_SECONDS).contains(&timeout) {
            return Err(ConfigError::InvalidValue(format!(
                "http.timeout must be within {MIN_TIMEOUT_SECONDS}-{MAX_TIMEOUT_SECONDS} seconds, got {timeout}"
            )));
        }
        let connect = self.http.connect_timeout_seconds;
        if !(MIN_CONNECT_TIMEOUT_SECONDS..=MAX_CONNECT_TIMEOUT_SECONDS).contains(&connect) {
            return Err(ConfigError::InvalidValue(format!(
                "http.connect_timeout must be within {MIN_CONNECT_TIMEOUT_SECONDS}-{MAX_CONNECT_TIMEOUT_SECONDS} seconds, got {connect}"
            )));
        }
        Ok(())
    }

    /// API origin host suffix.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Tenant identifier.
    #[must_use]
    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Bearer API token. Never log or display this value.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// HTTP settings.
    #[must_use]
    pub const fn http(&self) -> &HttpConfig {
        &self.http
    }

    /// Logging settings.
    #[must_use]
    pub const fn logging(&self) -> &LoggingConfig {
        &self.logging
    }

    /// Privileged-command adapter settings.
    #[must_use]
    pub const fn sudo(&self) -> &SudoConfig {
        &self.sudo
    }

    /// Returns true when debug logging is forced on.
    #[must_use]
    pub const fn is_debug_enabled(&self) -> bool {
        self.logging.debug
    }

    /// Minimum log level resolved from the configured name and debug flag.
    #[must_use]
    pub fn min_log_level(&self) -> LogLevel {
        if self.logging.debug {
            LogLevel::Debug
        } else {
            LogLevel::from_name(&self.logging.log_level)
        }
    }

    /// Renders the configuration back into its canonical JSON document.
    /// The output contains the API token; treat it like the config file.
    #[must_use]
    pub fn canonical_document(&self) -> Value {
        json!({
            "api_url": &self.api_url,
            "api_token": self.token.as_str(),
            "tenant": &self.tenant,
            "http": {
                "timeout": self.http.timeout_seconds,
                "connect_timeout": self.http.connect_timeout_seconds,
                "ssl_verify_peer": self.http.ssl_verify_peer,
                "ssl_verify_host": self.http.ssl_verify_host,
                "user_agent": &self.http.user_agent,
                "ca_bundle": &self.http.ca_bundle,
            },
            "sudo": {
                "access_msg": self.sudo.access_msg,
                "command_attribute": self.sudo.command_attribute.as_str(),
                "batch_evaluation": self.sudo.batch_evaluation,
            },
            "debug": self.logging.debug,
            "log_level": &self.logging.log_level,
        })
    }
}

impl fmt::Debug for SgnlConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SgnlConfig")
            .field("api_url", &self.api_url)
            .field("tenant", &self.tenant)
            .field("token", &"<redacted>")
            .field("http", &self.http)
            .field("logging", &self.logging)
            .field("sudo", &self.sudo)
            .finish()
    }
}

// ============================================================================
// SECTION: Raw Document
// ============================================================================

/// Raw JSON document prior to default application and overlays.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDocument {
    api_url: Option<String>,
    api_token: Option<String>,
    protected_system_token: Option<String>,
    tenant: Option<String>,
    debug: Option<FlexibleBool>,
    timeout_seconds: Option<u64>,
    log_level: Option<String>,
    http: RawHttp,
    sudo: RawSudo,
}

/// Raw `http` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawHttp {
    timeout: Option<u64>,
    connect_timeout: Option<u64>,
    ssl_verify_peer: Option<FlexibleBool>,
    ssl_verify_host: Option<FlexibleBool>,
    user_agent: Option<String>,
    ca_bundle: Option<PathBuf>,
}

/// Raw `sudo` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSudo {
    access_msg: Option<FlexibleBool>,
    command_attribute: Option<CommandAttribute>,
    batch_evaluation: Option<FlexibleBool>,
}

/// Boolean accepting literal booleans and the strings `"true"`/`"1"`.
#[derive(Debug, Clone, Copy)]
struct FlexibleBool(bool);

impl FlexibleBool {
    const fn value(self) -> bool {
        self.0
    }
}

impl<'de> Deserialize<'de> for FlexibleBool {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let flag = match value {
            Value::Bool(flag) => flag,
            Value::String(text) => text == "true" || text == "1",
            _ => false,
        };
        Ok(Self(flag))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the explicit argument, the environment
/// override, or the fixed default, in that order.
fn resolve_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if !env_path.is_empty() {
            return PathBuf::from(env_path);
        }
    }
    PathBuf::from(DEFAULT_CONFIG_PATH)
}

/// Reads the configuration file whole, distinguishing absence from other
/// I/O failures and bounding the accepted size.
fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            ConfigError::NotFound(path.display().to_string())
        } else {
            ConfigError::Io(err.to_string())
        }
    })?;
    if content.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::InvalidValue("config file exceeds size limit".to_string()));
    }
    Ok(content)
}
