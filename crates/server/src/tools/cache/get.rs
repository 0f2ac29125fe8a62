//! cache_get tool implementation.
//!
//! Looks up the stored title record for a URL. A miss is a normal answer
//! here, not an error: the tool exists to inspect cache state.

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unfurl_core::{CacheDb, Error, TitleRecord};

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The URL whose cached record to retrieve.
    pub url: String,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    /// Whether a record exists for the URL.
    pub found: bool,
    /// The stored record, when present. Its title may be null: a recorded
    /// "no title found" is a record too.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<TitleRecord>,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(db: &CacheDb, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    if params.url.is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let record = db.get_title(&params.url).await?;
    let output = CacheGetOutput { found: record.is_some(), record };

    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize record: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}
