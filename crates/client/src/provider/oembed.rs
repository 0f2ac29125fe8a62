//! Public oEmbed endpoint client for provider lookups.
//!
//! Requests go through the shared [`FetchClient`](crate::fetch::FetchClient)
//! and therefore count against the same fetch gate as generic page loads.
//! The embed markup is never executed: the endpoint is asked to omit its
//! script payload, and only the fragment's text is kept.

use crate::fetch::FetchClient;
use crate::provider::Provider;
use regex::Regex;
use scraper::Html;
use serde::Deserialize;
use std::sync::LazyLock;
use url::Url;

/// Default publish endpoint for Twitter/X oEmbed lookups.
pub const DEFAULT_TWITTER_OEMBED_URL: &str = "https://publish.twitter.com/oembed";

/// Configuration for provider oEmbed lookups.
#[derive(Debug, Clone)]
pub struct OembedConfig {
    /// Twitter/X endpoint base URL; overridable for tests.
    pub twitter_endpoint: String,
    /// Locale forwarded with each lookup.
    pub locale: String,
}

impl Default for OembedConfig {
    fn default() -> Self {
        Self { twitter_endpoint: DEFAULT_TWITTER_OEMBED_URL.to_string(), locale: "en".to_string() }
    }
}

/// Errors from a provider lookup. Every one of them is recovered by the
/// resolver falling through to the generic path.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("endpoint URL construction failed: {0}")]
    Endpoint(String),

    #[error("network failure: {0}")]
    Network(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("embed fragment contained no text")]
    EmptyEmbed,
}

/// Expected shape of an oEmbed response; only the embed markup is used.
#[derive(Debug, Deserialize)]
struct OembedResponse {
    html: String,
}

/// Replaced with newline markers before text extraction so multi-line
/// posts keep their line structure through parsing.
static BREAK_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>|</p>").expect("invalid regex"));

/// Resolve a title through the matched provider's oEmbed endpoint.
pub async fn lookup(
    provider: Provider, fetcher: &FetchClient, config: &OembedConfig, target: &Url,
) -> Result<String, ProviderError> {
    match provider {
        Provider::TwitterStatus => lookup_twitter(fetcher, config, target).await,
    }
}

async fn lookup_twitter(fetcher: &FetchClient, config: &OembedConfig, target: &Url) -> Result<String, ProviderError> {
    let mut endpoint = Url::parse(&config.twitter_endpoint).map_err(|e| ProviderError::Endpoint(e.to_string()))?;
    endpoint
        .query_pairs_mut()
        .append_pair("url", target.as_str())
        .append_pair("omit_script", "true")
        .append_pair("lang", &config.locale);

    let response = fetcher
        .fetch(&endpoint)
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let parsed: OembedResponse =
        serde_json::from_slice(&response.bytes).map_err(|e| ProviderError::SchemaMismatch(e.to_string()))?;

    let text = embed_text(&parsed.html);
    if text.trim().is_empty() {
        return Err(ProviderError::EmptyEmbed);
    }

    Ok(text)
}

/// Extract the text of an embed fragment, preserving line structure.
///
/// Paragraph and break tags become explicit newlines before parsing;
/// display normalization later collapses them to single spaces.
fn embed_text(html: &str) -> String {
    let marked = BREAK_TAGS.replace_all(html, "\n");
    let fragment = Html::parse_fragment(&marked);
    fragment.root_element().text().collect::<String>()
}
