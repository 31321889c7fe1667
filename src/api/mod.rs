//! Client for the file-hosting download-authorization API.
//!
//! The protocol has three operations sharing one response envelope:
//!
//! - [`ApiClient::request_ticket`] - negotiate a short-lived download ticket,
//!   possibly with a captcha challenge attached
//! - [`ApiClient::resolve_download`] - redeem a ticket for a direct download URL
//! - [`ApiClient::fetch_info`] - look up metadata for a batch of file ids
//!
//! Every call is a single GET; nothing is cached or retried, and the client
//! holds no mutable state, so one [`ApiClient`] can be cloned into as many
//! concurrent tasks as needed.
//!
//! # Example
//!
//! ```no_run
//! use openload_core::api::{ApiClient, ClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::new(ClientConfig::default())?;
//! let ticket = client.request_ticket("72fA-_Lq8Ak", None).await?;
//! if ticket.requires_captcha() {
//!     // show ticket.captcha to a human first
//! }
//! tokio::time::sleep(ticket.wait_time()).await;
//! let grant = client
//!     .resolve_download("72fA-_Lq8Ak", &ticket.ticket, None)
//!     .await?;
//! println!("{}", grant.url);
//! # Ok(())
//! # }
//! ```

mod credentials;
mod download;
mod envelope;
mod error;
mod http_client;
mod info;
mod ticket;
mod timestamp;
mod wire;

pub use credentials::Credentials;
pub use download::DownloadGrant;
pub use envelope::{SUCCESS_STATUS, decode_envelope};
pub use error::{ApiError, BuildError, ErrorKind, ProtocolError, RemoteError};
pub use info::FileRecord;
pub use ticket::{CaptchaChallenge, Ticket};
pub use timestamp::{SERVER_TIMESTAMP_FORMAT, parse_server_timestamp};

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::user_agent;

/// Production API base URL (version 1).
pub const DEFAULT_BASE_URL: &str = "https://api.openload.co/1";

/// Default connect timeout for clients built by [`ApiClient::new`].
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// API endpoints, relative to the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Endpoint {
    Ticket,
    Download,
    Info,
}

impl Endpoint {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::Ticket => "file/dlticket",
            Self::Download => "file/dl",
            Self::Info => "file/info",
        }
    }
}

/// Settings for constructing an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Versioned API base URL.
    pub base_url: String,
    /// Connect timeout; only used when the client builds its own transport.
    pub connect_timeout: Duration,
    /// Per-call timeout applied to every request. `None` defers to the transport.
    pub request_timeout: Option<Duration>,
    /// User-Agent; only used when the client builds its own transport.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            request_timeout: None,
            user_agent: user_agent::default_api_user_agent(),
        }
    }
}

impl ClientConfig {
    /// Replaces the base URL (e.g. to point at a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the per-call timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

/// Stateless client for the download-authorization API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    request_timeout: Option<Duration>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a client with its own HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the base URL is invalid or the HTTP client
    /// cannot be constructed.
    #[tracing::instrument(skip_all, fields(base_url = %config.base_url))]
    pub fn new(config: ClientConfig) -> Result<Self, BuildError> {
        let http = http_client::build_api_http_client(&config.user_agent, config.connect_timeout)?;
        Self::with_http_client(http, config)
    }

    /// Creates a client over a caller-supplied transport.
    ///
    /// Connection pooling, TLS, proxies and retries stay the caller's; only
    /// `base_url` and `request_timeout` are taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidBaseUrl`] if the base URL is invalid.
    pub fn with_http_client(http: Client, config: ClientConfig) -> Result<Self, BuildError> {
        let base_url = normalize_base_url(&config.base_url)?;
        Ok(Self {
            http,
            base_url,
            request_timeout: config.request_timeout,
        })
    }

    /// Normalized base URL (always ends with `/`).
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the request URL for an endpoint with query parameters in order.
    pub(crate) fn endpoint_url(&self, endpoint: Endpoint, query: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        let path = format!("{}{}", self.base_url.path(), endpoint.path());
        url.set_path(&path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        url
    }

    /// Performs one GET and decodes the envelope payload.
    ///
    /// The body is read to completion before decoding, so the response is
    /// released on every exit path.
    pub(crate) async fn get_envelope<T>(&self, endpoint: Endpoint, url: Url) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let path = endpoint.path();
        debug!(endpoint = path, "Calling API");

        let mut request = self.http.get(url);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        // Request URLs carry credentials and tickets in the query; strip them
        // from transport errors before they are logged or returned.
        let response = request.send().await.map_err(|source| {
            let source = source.without_url();
            warn!(endpoint = path, error = %source, "API request failed");
            ApiError::transport(path, source)
        })?;

        let http_status = response.status().as_u16();
        let body = response.bytes().await.map_err(|source| {
            let source = source.without_url();
            warn!(endpoint = path, error = %source, "Reading API response body failed");
            ApiError::transport(path, source)
        })?;

        envelope::decode_envelope(path, http_status, &body)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url, BuildError> {
    let invalid = |reason: String| BuildError::InvalidBaseUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
