//! resolve_batch tool implementation.
//!
//! Resolves multiple URLs concurrently, bounded by a gate that belongs to
//! this one request. Concurrent batches from different callers coordinate
//! only through the resolver's shared fetch gate.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinSet;
use unfurl_client::{RateGate, TitleResolver};
use unfurl_core::{AppConfig, Error};

use crate::tools::resolve::parse_request_url;

/// Upper bound on per-request parallelism.
const MAX_PARALLELISM: usize = 16;

/// Input parameters for resolve_batch tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ResolveBatchParams {
    /// URLs to resolve.
    pub urls: Vec<String>,

    /// Concurrent resolutions for this request (default from server
    /// configuration, max: 16).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

/// Individual batch result item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct BatchItem {
    /// The original URL.
    pub url: String,
    /// Resolved title; null when absent or when the item failed.
    pub title: Option<String>,
    /// Whether the result came from the cache.
    pub cached: bool,
    /// Input error for this item, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Output structure for resolve_batch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolveBatchOutput {
    /// Per-URL results. Resolved items arrive in completion order; each
    /// carries its URL for correlation.
    pub results: Vec<BatchItem>,
}

/// Implementation of the resolve_batch tool.
pub async fn resolve_batch_impl(
    resolver: Arc<TitleResolver>, config: &AppConfig, params: ResolveBatchParams,
) -> Result<CallToolResult, McpError> {
    if params.urls.is_empty() {
        return Err(Error::InvalidInput("urls cannot be empty".into()).into());
    }

    let parallelism = params.parallelism.unwrap_or(config.batch_parallelism).min(MAX_PARALLELISM);
    if parallelism == 0 {
        return Err(Error::InvalidInput("parallelism must be at least 1".into()).into());
    }

    let gate = RateGate::new(parallelism);
    tracing::debug!(urls = params.urls.len(), parallelism = gate.width(), "resolving batch");

    let mut join_set = JoinSet::new();
    let mut results: Vec<BatchItem> = Vec::new();

    for raw_url in params.urls {
        // Malformed items fail individually; the rest of the batch runs.
        let url = match parse_request_url(&raw_url) {
            Ok(url) => url,
            Err(e) => {
                results.push(BatchItem { url: raw_url, title: None, cached: false, error: Some(e.to_string()) });
                continue;
            }
        };

        let permit = gate.acquire().await;
        let resolver = resolver.clone();

        join_set.spawn(async move {
            // NOTE: Hold permit for task duration to enforce concurrency limit
            let _permit = permit;
            let resolution = resolver.resolve(&url).await;
            (raw_url, resolution)
        });
    }

    while let Some(result) = join_set.join_next().await {
        let (url, resolution) = result.map_err(|e| McpError::internal_error(e.to_string(), None))?;
        results.push(BatchItem { url, title: resolution.title, cached: resolution.cached, error: None });
    }

    let output = ResolveBatchOutput { results };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
