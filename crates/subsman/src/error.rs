//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use subsman_config::ConfigError;
use subsman_core::CoreError;

/// Process exit codes. Success is the usual 0.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to the SubsManager backend at {url}")]
    #[diagnostic(
        code(subsman::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Override the address with --url or set backend.url in the config file."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(
        "Request timed out{}",
        .seconds.map(|s| format!(" after {s}s")).unwrap_or_default()
    )]
    #[diagnostic(
        code(subsman::timeout),
        help("Node imports and tests can be slow. Increase the limit with --timeout.")
    )]
    Timeout { seconds: Option<u64> },

    // ── Backend ──────────────────────────────────────────────────────
    #[error("Not found: {resource}")]
    #[diagnostic(
        code(subsman::not_found),
        help("Run `subsman subs list` or `subsman nodes list` to see what exists.")
    )]
    NotFound { resource: String },

    #[error("Backend rejected the request: {message}")]
    #[diagnostic(code(subsman::backend))]
    Backend { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(subsman::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(subsman::config),
        help("Inspect the effective configuration with `subsman config show`.")
    )]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(subsman::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(subsman::internal))]
    Internal(String),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Backend { .. } | Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                exit_code::GENERAL
            }
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::NotFound { resource } => CliError::NotFound { resource },

            CoreError::Backend { message, .. } => CliError::Backend { message },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}
