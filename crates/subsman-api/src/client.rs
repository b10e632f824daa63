// Backend HTTP client
//
// Wraps `reqwest::Client` with base-URL joining and envelope unwrapping.
// Endpoint groups (status, subscriptions, nodes, settings, logs) are
// implemented as inherent methods in separate files to keep this module
// focused on transport mechanics.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::ApiResponse;
use crate::transport::TransportConfig;

/// Raw HTTP client for the SubsManager backend.
///
/// Handles the `{ code, message, data }` envelope. All request helpers return
/// the unwrapped `data` payload (`None` when the backend omitted it).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the backend root, e.g. `http://localhost:3355`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: normalize_base(base_url),
            timeout: Some(transport.timeout),
        })
    }

    /// Create a client from a URL string.
    pub fn from_url(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        Self::new(Url::parse(base_url)?, transport)
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: normalize_base(base_url),
            timeout: None,
        }
    }

    /// The backend base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a backend path: `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(&format!("api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let req = self.http.get(url);
        self.send(req).await
    }

    /// Send a GET request with query parameters and unwrap the envelope.
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let req = self.http.get(url).query(query);
        self.send(req).await
    }

    /// Send a POST request with a JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("POST {}", url);
        let req = self.http.post(url).json(body);
        self.send(req).await
    }

    /// Send a bodiless POST request and unwrap the envelope.
    pub(crate) async fn post_empty<T: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("POST {}", url);
        let req = self.http.post(url);
        self.send(req).await
    }

    /// Send a DELETE request and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("DELETE {}", url);
        let req = self.http.delete(url);
        self.send(req).await
    }

    /// Send a DELETE request with a JSON body and unwrap the envelope.
    pub(crate) async fn delete_with_body<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Option<T>, Error> {
        debug!("DELETE {}", url);
        let req = self.http.delete(url).json(body);
        self.send(req).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<T>, Error> {
        let resp = req.send().await.map_err(|e| self.transport_error(e))?;
        self.parse_envelope(resp).await
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        match self.timeout {
            Some(timeout) if err.is_timeout() => Error::Timeout {
                timeout_secs: timeout.as_secs(),
            },
            _ => Error::Transport(err),
        }
    }

    /// Parse the `{ code, message, data }` envelope, returning `data` on
    /// success or an `Error::Backend` if `code != 200`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Option<T>, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            // Error responses usually still carry an envelope with a message.
            return Err(
                match serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
                    Ok(envelope) if !envelope.message.is_empty() => Error::Backend {
                        code: envelope.code,
                        message: envelope.message,
                    },
                    _ => Error::Http {
                        status: status.as_u16(),
                        body,
                    },
                },
            );
        }

        let envelope: ApiResponse<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        if envelope.is_success() {
            Ok(envelope.data)
        } else {
            Err(Error::Backend {
                code: envelope.code,
                message: envelope.message,
            })
        }
    }
}

/// `Url::join` drops the last path segment unless it ends in `/`.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
