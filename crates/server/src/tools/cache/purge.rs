//! cache_purge tool implementation.
//!
//! Manual counterpart to the periodic eviction sweep.

use chrono::Utc;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use unfurl_core::{AppConfig, CacheDb, Error};

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge entries older than this many days. Defaults to the configured
    /// retention window; 0 purges everything.
    pub older_than_days: Option<i64>,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(db: &CacheDb, config: &AppConfig, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    let days = params.older_than_days.unwrap_or(config.retention_days);
    if days < 0 {
        return Err(Error::InvalidInput("older_than_days cannot be negative".into()).into());
    }

    let cutoff = Utc::now() - chrono::Duration::days(days);
    let deleted = db.evict_titles_older_than(cutoff).await?;

    let output = CachePurgeOutput { deleted };
    let json = serde_json::to_string_pretty(&output)
        .map_err(|e| Error::InvalidInput(format!("Failed to serialize output: {e}")))?;

    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_from(result: &CallToolResult) -> CachePurgeOutput {
        let content_val = serde_json::to_value(&result.content[0]).unwrap();
        let text = content_val
            .get("text")
            .and_then(|v| v.as_str())
            .expect("Expected text field in content");
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_purge_negative_days() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = AppConfig::default();
        let params = CachePurgeParams { older_than_days: Some(-1) };

        let result = purge_impl(&db, &config, params).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_purge_default_retention() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = AppConfig::default();

        db.put_title("https://example.com/old", Some("Old"), Utc::now() - chrono::Duration::days(8))
            .await
            .unwrap();
        db.put_title("https://example.com/fresh", Some("Fresh"), Utc::now()).await.unwrap();

        let result = purge_impl(&db, &config, CachePurgeParams::default()).await.unwrap();
        let output = output_from(&result);

        assert_eq!(output.deleted, 1);
        assert_eq!(db.title_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_explicit_age() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = AppConfig::default();

        db.put_title("https://example.com/two-days", Some("Two"), Utc::now() - chrono::Duration::days(2))
            .await
            .unwrap();
        db.put_title("https://example.com/today", Some("Today"), Utc::now()).await.unwrap();

        let result = purge_impl(&db, &config, CachePurgeParams { older_than_days: Some(1) })
            .await
            .unwrap();
        let output = output_from(&result);

        assert_eq!(output.deleted, 1);
        let remaining = db.get_title("https://example.com/today").await.unwrap();
        assert!(remaining.is_some());
    }

    #[tokio::test]
    async fn test_purge_zero_days_removes_backdated() {
        let db = CacheDb::open_in_memory().await.unwrap();
        let config = AppConfig::default();

        db.put_title("https://example.com/a", Some("A"), Utc::now() - chrono::Duration::hours(1))
            .await
            .unwrap();
        db.put_title("https://example.com/b", None, Utc::now() - chrono::Duration::hours(2))
            .await
            .unwrap();

        let result = purge_impl(&db, &config, CachePurgeParams { older_than_days: Some(0) })
            .await
            .unwrap();
        let output = output_from(&result);

        assert_eq!(output.deleted, 2);
        assert_eq!(db.title_count().await.unwrap(), 0);
    }
}
