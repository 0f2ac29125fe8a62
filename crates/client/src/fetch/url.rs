//! Inbound URL validation.
//!
//! The URL string is also the cache key, so it is parsed and checked but
//! never rewritten here; what the caller sent is what gets fetched and
//! stored.

/// Error type for request URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate a request payload as an absolute http(s) URL.
///
/// Leading/trailing whitespace is trimmed; everything else must already be
/// a well-formed absolute URL, since link hrefs arrive fully resolved.
pub fn parse_target(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }
}
