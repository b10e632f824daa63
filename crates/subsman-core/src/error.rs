// ── Core error types ──
//
// User-facing errors from subsman-core. Consumers never match on HTTP
// status codes or JSON parse failures directly; the
// `From<subsman_api::Error>` impl translates transport-layer errors into
// domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    /// `timeout_secs` is `None` when the client had no configured limit to
    /// report, e.g. a timeout set on a caller-supplied `reqwest::Client`.
    #[error(
        "Backend request timed out{}",
        .timeout_secs.map(|s| format!(" after {s}s")).unwrap_or_default()
    )]
    Timeout { timeout_secs: Option<u64> },

    // ── Backend errors ───────────────────────────────────────────────
    #[error("Backend error: {message}")]
    Backend {
        message: String,
        /// Envelope code, or the HTTP status when no envelope came back.
        code: Option<i64>,
    },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand used by settings validation.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<subsman_api::Error> for CoreError {
    fn from(err: subsman_api::Error) -> Self {
        if err.is_not_found() {
            return CoreError::NotFound {
                resource: not_found_resource(&err),
            };
        }

        match err {
            subsman_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: None }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Backend {
                        message: e.to_string(),
                        code: e.status().map(|s| i64::from(s.as_u16())),
                    }
                }
            }
            subsman_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            subsman_api::Error::Timeout { timeout_secs } => CoreError::Timeout {
                timeout_secs: Some(timeout_secs),
            },
            subsman_api::Error::Http { status, body } => CoreError::Backend {
                message: if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                },
                code: Some(i64::from(status)),
            },
            subsman_api::Error::Backend { code, message } => CoreError::Backend {
                message,
                code: Some(code),
            },
            subsman_api::Error::MissingData { endpoint } => {
                CoreError::Internal(format!("Backend returned no data for {endpoint}"))
            }
            subsman_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

fn not_found_resource(err: &subsman_api::Error) -> String {
    match err {
        subsman_api::Error::Backend { message, .. } => message.clone(),
        subsman_api::Error::Transport(e) => {
            e.url().map(|u| u.path().to_string()).unwrap_or_default()
        }
        _ => "resource".into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn backend_envelope_keeps_code_and_message() {
        let err: CoreError = subsman_api::Error::Backend {
            code: 500,
            message: "no merged subscription".into(),
        }
        .into();
        match err {
            CoreError::Backend { message, code } => {
                assert_eq!(message, "no merged subscription");
                assert_eq!(code, Some(500));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn http_404_is_not_found() {
        let err: CoreError = subsman_api::Error::Http {
            status: 404,
            body: String::new(),
        }
        .into();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }

    #[test]
    fn empty_http_body_falls_back_to_status() {
        let err: CoreError = subsman_api::Error::Http {
            status: 503,
            body: String::new(),
        }
        .into();
        assert_eq!(err.to_string(), "Backend error: HTTP 503");
    }

    #[test]
    fn timeout_is_preserved() {
        let err: CoreError = subsman_api::Error::Timeout { timeout_secs: 30 }.into();
        assert!(matches!(err, CoreError::Timeout { timeout_secs: Some(30) }));
        assert_eq!(err.to_string(), "Backend request timed out after 30s");
    }

    #[test]
    fn timeout_without_known_limit_omits_duration() {
        let err = CoreError::Timeout { timeout_secs: None };
        assert_eq!(err.to_string(), "Backend request timed out");
    }
}
