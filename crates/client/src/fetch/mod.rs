//! HTTP fetch pipeline behind the fetch gate.
//!
//! ### Request properties
//! - No cookie store and no auth headers: requests never carry credentials
//!   to third-party hosts.
//! - Plain GET with no cache-busting headers, so intermediary caches stay
//!   usable.
//! - Redirects followed up to a limit; the whole operation is bounded by
//!   one timeout covering connect through body.
//!
//! ### Admission
//! Every call acquires the fetch gate before the request goes out and holds
//! the permit in scope, so it releases on success, HTTP error, timeout, and
//! panic alike.

pub mod gate;
pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use gate::{RateGate, RatePermit};
pub use url::{UrlError, parse_target};

use unfurl_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "unfurl/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_body_bytes: usize,

    /// Overall request timeout (default: 15s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Fetch gate width: concurrent requests across all callers (default: 9)
    pub max_concurrent: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "unfurl/0.1".to_string(),
            max_body_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(15_000),
            max_redirects: 5,
            max_concurrent: 9,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The original URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header value, one of the encoding detector's hints
    pub content_type: Option<String>,
    /// Raw response body; kept as bytes because encoding conversion
    /// needs the original octets
    pub bytes: Bytes,
}

/// HTTP fetch client shared by the generic and provider paths.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
    gate: RateGate,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        let gate = RateGate::new(config.max_concurrent);

        Ok(Self { http, config, gate })
    }

    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// Waits at the fetch gate first; the permit is held for the whole
    /// request and released on every exit path.
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, Error> {
        let _permit = self.gate.acquire().await;
        let start = Instant::now();

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| classify_reqwest_error(url, &e))?;

        let status = response.status();

        if !status.is_success() {
            return Err(Error::ResponseNotOk { status: status.as_u16() });
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_body_bytes
        {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                len, self.config.max_body_bytes
            )));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(url, &e))?;

        if bytes.len() > self.config.max_body_bytes {
            return Err(Error::FetchTooLarge(format!(
                "{} bytes exceeds {}",
                bytes.len(),
                self.config.max_body_bytes
            )));
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url: url.clone(), final_url, status, content_type, bytes })
    }

    /// The fetch gate, exposed for diagnostics and tests.
    pub fn gate(&self) -> &RateGate {
        &self.gate
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}

/// Separate timeouts from other transport failures so the caller can tell
/// a cancelled operation from a refused one.
fn classify_reqwest_error(url: &Url, err: &reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::FetchTimeout(format!("{} timed out", url))
    } else {
        Error::Network(format!("request failed: {}", err))
    }
}
