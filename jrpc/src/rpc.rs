//! Client side of generated bindings.
//!
//! Each generated client function builds a [`Request`] (method, the
//! router-prefixed URL and the input message) and performs it with
//! [`Client::call`]: exactly one network round trip, no retries.

use std::time::Duration;

use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Error, ErrorKind};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A call description produced by generated code.
#[derive(Debug, Clone)]
pub struct Request<'a, B: ?Sized> {
    /// HTTP method of the route.
    pub method: Method,
    /// Router name followed by the route path (e.g., `service.scene/scene/set`).
    pub url: &'a str,
    /// Request body, serialized as JSON.
    pub body: &'a B,
}

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Overrides how router names are reached.
    ///
    /// When `None`, `service.scene/scene/set` is requested as
    /// `http://service.scene/scene/set`. When set, the URL is appended to
    /// the base, e.g. `http://localhost:8080/service.scene/scene/set`.
    pub base_url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// HTTP client used by generated call stubs.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Creates a client with the default configuration.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            config: ClientConfig::default(),
        }
    }

    /// Creates a client that resolves every URL against `base_url`.
    ///
    /// ## Examples
    ///
    /// ```
    /// let client = jrpc::rpc::Client::with_base_url("http://localhost:8080");
    /// let url = client.resolve("service.scene/scene/set").unwrap();
    /// assert_eq!(url.as_str(), "http://localhost:8080/service.scene/scene/set");
    /// ```
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config: ClientConfig {
                base_url: Some(base_url.into()),
                ..ClientConfig::default()
            },
        }
    }

    /// Replaces the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Creates a client from an explicit configuration.
    ///
    /// ## Errors
    ///
    /// Returns an `internal` error if the HTTP client cannot be built.
    pub fn with_config(config: ClientConfig) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::wrap(e, ErrorKind::Internal, "failed to build HTTP client"))?;
        Ok(Self { http, config })
    }

    /// Turns a router-prefixed URL into an absolute one.
    pub fn resolve(&self, url: &str) -> Result<Url, Error> {
        let absolute = match &self.config.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                url.trim_start_matches('/')
            ),
            None => format!("http://{}", url),
        };
        Url::parse(&absolute)
            .map_err(|e| Error::wrap(e, ErrorKind::Internal, format!("invalid URL '{}'", absolute)))
    }

    /// Performs `request` and decodes the response into `O`.
    ///
    /// The configured timeout applies to every call, whichever constructor
    /// built the client.
    ///
    /// ## Errors
    ///
    /// - `unavailable` when the server cannot be reached
    /// - the server-reported error when the response status is not 2xx
    /// - `internal` when a success body does not decode into `O`
    pub async fn call<B, O>(&self, request: Request<'_, B>) -> Result<O, Error>
    where
        B: Serialize + ?Sized,
        O: DeserializeOwned,
    {
        let url = self.resolve(request.url)?;
        tracing::debug!(method = %request.method, %url, "Calling route");

        let response = self
            .http
            .request(request.method.clone(), url.clone())
            .timeout(self.config.timeout)
            .json(request.body)
            .send()
            .await
            .map_err(|e| {
                Error::wrap(
                    e,
                    ErrorKind::Unavailable,
                    format!("failed to call {} {}", request.method, url),
                )
            })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| {
            Error::wrap(e, ErrorKind::Unavailable, "failed to read response body")
        })?;

        if !status.is_success() {
            return Err(Error::from_response(status, &body));
        }

        serde_json::from_slice(&body)
            .map_err(|e| Error::wrap(e, ErrorKind::Internal, "failed to decode response"))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}
