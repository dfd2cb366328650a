// sgnl-core/src/log.rs
// ============================================================================
// Module: SGNL Logging
// Description: Leveled, context-tagged logging for the authorization core.
// Purpose: Gate before formatting and keep secrets out of every record.
// Dependencies: libc, serde_json, time
// ============================================================================

//! ## Overview
//! A process-wide logger configuration gates messages by an eight-level
//! syslog-aligned severity and routes them to standard error or the system
//! log. Messages carry a context tuple (component, function, and optional
//! request/principal/asset/action tags). Call sites use the [`sgnl_log!`]
//! macro, which performs the gate test before any formatting work, and
//! [`sgnl_secure_debug!`] for anything that would carry per-user payloads or
//! decision detail. The API token must never reach a log call site at any
//! level. The configuration lives for the whole process; there is no
//! teardown, so the logger always outlives the clients that emit through it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::CString;
use std::fmt;
use std::sync::RwLock;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use time::OffsetDateTime;

// ============================================================================
// SECTION: Log Level
// ============================================================================

/// Message severity, aligned with syslog priorities (0 = emergency).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// System is unusable.
    Emergency,
    /// Action must be taken immediately.
    Alert,
    /// Critical conditions.
    Critical,
    /// Error conditions.
    Error,
    /// Warning conditions.
    Warning,
    /// Normal but significant conditions.
    Notice,
    /// Informational messages.
    Info,
    /// Debug messages.
    Debug,
}

impl LogLevel {
    /// Returns a stable upper-case label for the level.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Emergency => "EMERGENCY",
            Self::Alert => "ALERT",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Notice => "NOTICE",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    /// Parses a configured level name, defaulting to `Info`.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "debug" => Self::Debug,
            "notice" => Self::Notice,
            "warning" | "warn" => Self::Warning,
            "error" => Self::Error,
            "critical" => Self::Critical,
            "alert" => Self::Alert,
            "emergency" => Self::Emergency,
            _ => Self::Info,
        }
    }

    /// Returns the matching syslog priority value.
    #[must_use]
    pub const fn syslog_priority(self) -> libc::c_int {
        self as libc::c_int
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Output destination for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogDestination {
    /// Write records to standard error.
    Stderr,
    /// Write records to the system log.
    Syslog,
}

/// Process-wide logger configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Minimum severity admitted by the gate.
    pub min_level: LogLevel,
    /// Record destination.
    pub destination: LogDestination,
    /// Emit single-line JSON records instead of plain text.
    pub structured: bool,
    /// Prefix plain records with a unix timestamp.
    pub include_timestamp: bool,
    /// Prefix plain records with the process id.
    pub include_pid: bool,
}

impl LoggerConfig {
    /// Default configuration: info level, plain text on standard error.
    pub const DEFAULT: Self = Self {
        min_level: LogLevel::Info,
        destination: LogDestination::Stderr,
        structured: false,
        include_timestamp: false,
        include_pid: false,
    };
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// Context tuple attached to every record.
#[derive(Debug, Clone, Copy)]
pub struct LogContext<'a> {
    /// Emitting component tag (`client`, `config`, `sudo`, `pam`).
    pub component: &'a str,
    /// Emitting function tag.
    pub function: &'a str,
    /// Request identifier, when a request is in flight.
    pub request_id: Option<&'a str>,
    /// Principal under evaluation, when applicable.
    pub principal_id: Option<&'a str>,
    /// Asset under evaluation, when applicable.
    pub asset_id: Option<&'a str>,
    /// Action under evaluation, when applicable.
    pub action: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Creates a context with only the component and function tags.
    #[must_use]
    pub const fn new(component: &'a str, function: &'a str) -> Self {
        Self {
            component,
            function,
            request_id: None,
            principal_id: None,
            asset_id: None,
            action: None,
        }
    }

    /// Attaches a request identifier.
    #[must_use]
    pub const fn with_request_id(mut self, request_id: &'a str) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Attaches a principal identifier.
    #[must_use]
    pub const fn with_principal(mut self, principal_id: &'a str) -> Self {
        self.principal_id = Some(principal_id);
        self
    }

    /// Attaches an asset identifier.
    #[must_use]
    pub const fn with_asset(mut self, asset_id: &'a str) -> Self {
        self.asset_id = Some(asset_id);
        self
    }

    /// Attaches an action.
    #[must_use]
    pub const fn with_action(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }
}

// ============================================================================
// SECTION: Process-Wide State
// ============================================================================

/// Active logger configuration.
static LOGGER: RwLock<LoggerConfig> = RwLock::new(LoggerConfig::DEFAULT);

/// Replaces the process-wide logger configuration.
pub fn init(config: LoggerConfig) {
    if let Ok(mut guard) = LOGGER.write() {
        *guard = config;
    }
}

/// Returns a copy of the active configuration.
#[must_use]
pub fn current() -> LoggerConfig {
    LOGGER.read().map_or(LoggerConfig::DEFAULT, |guard| *guard)
}

/// Gate test: returns true when the level is admitted.
#[must_use]
pub fn enabled(level: LogLevel) -> bool {
    level <= current().min_level
}

// ============================================================================
// SECTION: Emission
// ============================================================================

/// Formats and writes one record. Call sites go through [`sgnl_log!`] so the
/// gate runs before formatting.
pub fn emit(level: LogLevel, context: &LogContext<'_>, args: fmt::Arguments<'_>) {
    let config = current();
    if level > config.min_level {
        return;
    }
    let line = render(&config, level, context, &args.to_string());
    match config.destination {
        LogDestination::Stderr => eprintln!("{line}"),
        LogDestination::Syslog => syslog_emit(level, &line),
    }
}

/// Renders one record to its final line without emitting it.
#[must_use]
pub fn render(
    config: &LoggerConfig,
    level: LogLevel,
    context: &LogContext<'_>,
    message: &str,
) -> String {
    if config.structured {
        return structured_line(level, context, message);
    }
    let mut line = String::new();
    if config.include_timestamp {
        line.push_str(&format!("{} ", OffsetDateTime::now_utc().unix_timestamp()));
    }
    if config.include_pid {
        line.push_str(&format!("[{}] ", std::process::id()));
    }
    line.push_str(&format!("[{}] {message}", context.component));
    line
}

/// Builds a single-line JSON record.
fn structured_line(level: LogLevel, context: &LogContext<'_>, message: &str) -> String {
    let mut record = serde_json::Map::new();
    record.insert("level".to_string(), Value::String(level.as_str().to_string()));
    record.insert("component".to_string(), Value::String(context.component.to_string()));
    record.insert("function".to_string(), Value::String(context.function.to_string()));
    for (key, value) in [
        ("request_id", context.request_id),
        ("principal_id", context.principal_id),
        ("asset_id", context.asset_id),
        ("action", context.action),
    ] {
        if let Some(value) = value {
            record.insert(key.to_string(), Value::String(value.to_string()));
        }
    }
    record.insert("message".to_string(), Value::String(message.to_string()));
    Value::Object(record).to_string()
}

/// Writes one line to the system log.
fn syslog_emit(level: LogLevel, line: &str) {
    let Ok(message) = CString::new(line) else {
        return;
    };
    static FORMAT: &[u8] = b"%s\0";
    unsafe {
        libc::syslog(
            level.syslog_priority() | libc::LOG_AUTHPRIV,
            FORMAT.as_ptr().cast::<libc::c_char>(),
            message.as_ptr(),
        );
    }
}

// ============================================================================
// SECTION: Macros
// ============================================================================

/// Logs a formatted message at the given level. The gate test runs before
/// the format arguments are evaluated.
#[macro_export]
macro_rules! sgnl_log {
    ($level:expr, $ctx:expr, $($arg:tt)+) => {
        if $crate::log::enabled($level) {
            $crate::log::emit($level, $ctx, ::core::format_args!($($arg)+));
        }
    };
}

/// Logs a debug message that may reference per-user payloads or decision
/// detail. A no-op unless the minimum level admits debug.
#[macro_export]
macro_rules! sgnl_secure_debug {
    ($ctx:expr, $($arg:tt)+) => {
        if $crate::log::enabled($crate::log::LogLevel::Debug) {
            $crate::log::emit(
                $crate::log::LogLevel::Debug,
                $ctx,
                ::core::format_args!($($arg)+),
            );
        }
    };
}
