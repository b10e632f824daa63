use thiserror::Error;

/// Top-level error type for the `subsman-api` crate.
///
/// Network failures and backend-reported failures both land here.
/// `subsman-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Non-2xx response whose body was not a backend envelope.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    // ── Backend ─────────────────────────────────────────────────────
    /// Error reported through the `{code, message}` envelope.
    #[error("Backend error (code {code}): {message}")]
    Backend { code: i64, message: String },

    /// The envelope reported success but carried no `data` where some was required.
    #[error("Response from {endpoint} carried no data")]
    MissingData { endpoint: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Http { status: 404, .. } | Self::Backend { code: 404, .. } => true,
            _ => false,
        }
    }

    /// Extract the backend envelope code, if available.
    pub fn backend_code(&self) -> Option<i64> {
        match self {
            Self::Backend { code, .. } => Some(*code),
            _ => None,
        }
    }
}
