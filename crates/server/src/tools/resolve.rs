//! resolve_title tool implementation.
//!
//! Resolves a single URL through the full pipeline: cache, specialized
//! provider, generic HTML fetch.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unfurl_client::{TitleResolver, UrlError, parse_target};
use unfurl_core::Error;

/// Input parameters for resolve_title tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveTitleParams {
    /// The URL whose title to resolve.
    pub url: String,
}

/// Output structure for resolve_title tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveTitleOutput {
    /// The URL as requested.
    pub url: String,
    /// Resolved single-line title; null when no usable title was found.
    pub title: Option<String>,
    /// Whether the result came from the cache.
    pub cached: bool,
}

/// Validate an inbound URL string. Input problems are the one failure
/// class that reaches the caller instead of degrading to an absent title.
pub(crate) fn parse_request_url(input: &str) -> Result<url::Url, Error> {
    parse_target(input).map_err(|e| match e {
        UrlError::Empty => Error::InvalidInput("url cannot be empty".into()),
        UrlError::UnsupportedScheme(scheme) => Error::InvalidUrl(format!("unsupported scheme: {scheme}")),
        UrlError::InvalidUrl(msg) => Error::InvalidUrl(msg),
    })
}

/// Implementation of the resolve_title tool.
pub async fn resolve_impl(resolver: &TitleResolver, params: ResolveTitleParams) -> Result<CallToolResult, McpError> {
    let url = parse_request_url(&params.url)?;
    let resolution = resolver.resolve(&url).await;

    let output = ResolveTitleOutput { url: params.url, title: resolution.title, cached: resolution.cached };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
