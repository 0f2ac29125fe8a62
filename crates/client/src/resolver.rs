//! Layered title resolution.
//!
//! One resolution walks a fixed ladder: extension filter, cache lookup,
//! specialized provider, generic HTML fetch. The provider rung is an
//! enhancement and its failures fall through; a generic-fetch failure is
//! caught at the top of [`TitleResolver::resolve`], so a resolution never
//! returns an error to its caller. Successful resolutions (including
//! "no title found") are written back to the cache without being awaited.

use crate::encoding::{self, Encoding};
use crate::fetch::{FetchClient, FetchConfig};
use crate::html;
use crate::provider::{OembedConfig, Provider, oembed};
use chrono::Utc;
use scraper::Html;
use unfurl_core::{AppConfig, CacheDb, Error};
use url::Url;

/// Outcome of one resolution request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Best-effort single-line title; absent when nothing usable was found.
    pub title: Option<String>,
    /// Whether the answer came from the cache.
    pub cached: bool,
}

/// Orchestrates cache, provider, and generic resolution paths.
pub struct TitleResolver {
    fetcher: FetchClient,
    db: CacheDb,
    oembed: OembedConfig,
}

impl TitleResolver {
    /// Build a resolver from application configuration.
    pub fn new(db: CacheDb, config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig {
            user_agent: config.user_agent.clone(),
            max_body_bytes: config.max_body_bytes,
            timeout: config.fetch_timeout(),
            max_redirects: config.max_redirects,
            max_concurrent: config.max_concurrent_fetches,
        })?;
        let oembed = OembedConfig { locale: config.locale.clone(), ..OembedConfig::default() };

        Ok(Self { fetcher, db, oembed })
    }

    /// Build a resolver from pre-constructed parts.
    pub fn with_parts(db: CacheDb, fetcher: FetchClient, oembed: OembedConfig) -> Self {
        Self { fetcher, db, oembed }
    }

    /// Resolve a title for `url`, best effort.
    ///
    /// Never fails: any error past input parsing is logged and reported as
    /// an absent title. A cache hit is returned as-is, even when the cached
    /// fact is "no title found".
    pub async fn resolve(&self, url: &Url) -> Resolution {
        if url.path().to_ascii_lowercase().ends_with(".pdf") {
            tracing::debug!(%url, "skipping pdf target");
            return Resolution { title: None, cached: false };
        }

        match self.db.get_title(url.as_str()).await {
            Ok(Some(record)) => {
                tracing::debug!(%url, "cache hit");
                return Resolution { title: record.title, cached: true };
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(%url, error = %e, "cache read failed; resolving fresh"),
        }

        let title = match self.resolve_and_store(url).await {
            Ok(title) => title,
            Err(e) => {
                tracing::warn!(%url, error = %e, "resolution failed");
                None
            }
        };

        Resolution { title, cached: false }
    }

    /// Run the provider and generic paths, normalize, and schedule the
    /// cache write. Errors from the generic fetch propagate to the caller
    /// and skip the write; an in-band absence (unknown encoding, missing
    /// or empty title) is a resolved fact and is cached.
    async fn resolve_and_store(&self, url: &Url) -> Result<Option<String>, Error> {
        let raw = match self.try_provider(url).await {
            Some(text) => Some(text),
            None => self.fetch_generic(url).await?,
        };

        let title = raw.map(|t| html::normalize_title(&t)).filter(|t| !t.is_empty());
        self.spawn_write(url, title.clone());

        Ok(title)
    }

    /// Provider path. Returns text on success, None on no match or on any
    /// provider failure.
    async fn try_provider(&self, url: &Url) -> Option<String> {
        let provider = Provider::for_url(url)?;

        match oembed::lookup(provider, &self.fetcher, &self.oembed, url).await {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::debug!(%url, error = %e, "provider lookup failed; using generic fetch");
                None
            }
        }
    }

    /// Generic path: fetch the page, detect its encoding, extract `<title>`.
    async fn fetch_generic(&self, url: &Url) -> Result<Option<String>, Error> {
        let response = self.fetcher.fetch(url).await?;

        // The first parse uses a lossy decoding. That is good enough for
        // reading meta tags, not necessarily for the title text itself.
        let lossy = String::from_utf8_lossy(&response.bytes);
        let document = Html::parse_document(&lossy);

        let Some(detected) = encoding::detect(response.content_type.as_deref(), &document) else {
            tracing::debug!(%url, "encoding signals missing or conflicting");
            return Ok(None);
        };

        let title = match detected {
            Encoding::Utf8 => html::extract_title(&document),
            Encoding::ShiftJis | Encoding::EucJp => {
                // The lossy parse decoded these bytes wrongly, so its title
                // text cannot be trusted. Re-decode and re-parse.
                let decoded = detected.decode(&response.bytes);
                let document = Html::parse_document(&decoded);
                html::extract_title(&document)
            }
        };

        Ok(title)
    }

    /// Persist the result without making the caller wait for the write.
    /// Write failures surface only in the log.
    fn spawn_write(&self, url: &Url, title: Option<String>) {
        let db = self.db.clone();
        let url = url.to_string();

        tokio::spawn(async move {
            if let Err(e) = db.put_title(&url, title.as_deref(), Utc::now()).await {
                tracing::warn!(%url, error = %e, "failed to persist title");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use unfurl_core::TitleRecord;
    use wiremock::matchers::{any, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn resolver_with(db: &CacheDb, oembed: OembedConfig) -> TitleResolver {
        let fetcher = FetchClient::new(FetchConfig::default()).unwrap();
        TitleResolver::with_parts(db.clone(), fetcher, oembed)
    }

    async fn wait_for_entry(db: &CacheDb, url: &str) -> TitleRecord {
        for _ in 0..50 {
            if let Ok(Some(record)) = db.get_title(url).await {
                return record;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("cache write did not land for {url}");
    }

    #[tokio::test]
    async fn test_resolve_utf8_title_then_cache_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>Example</title></head><body></body></html>",
                "text/html; charset=utf-8",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/page", server.uri())).unwrap();

        let first = resolver.resolve(&url).await;
        assert_eq!(first.title.as_deref(), Some("Example"));
        assert!(!first.cached);

        let record = wait_for_entry(&db, url.as_str()).await;
        assert_eq!(record.title.as_deref(), Some("Example"));

        // The stored entry answers the second request; expect(1) above
        // verifies no second fetch happened.
        let second = resolver.resolve(&url).await;
        assert_eq!(second.title.as_deref(), Some("Example"));
        assert!(second.cached);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_cache_hit_never_fetches() {
        let server = MockServer::start().await;
        Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let url = format!("{}/stored", server.uri());
        db.put_title(&url, Some("Stored"), Utc::now()).await.unwrap();

        let resolver = resolver_with(&db, OembedConfig::default());
        let resolution = resolver.resolve(&Url::parse(&url).unwrap()).await;

        assert_eq!(resolution.title.as_deref(), Some("Stored"));
        assert!(resolution.cached);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_cached_absence_is_a_hit() {
        let server = MockServer::start().await;
        Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let url = format!("{}/known-absent", server.uri());
        db.put_title(&url, None, Utc::now()).await.unwrap();

        let resolver = resolver_with(&db, OembedConfig::default());
        let resolution = resolver.resolve(&Url::parse(&url).unwrap()).await;

        assert_eq!(resolution.title, None);
        assert!(resolution.cached);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_pdf_never_fetches_or_caches() {
        let server = MockServer::start().await;
        Mock::given(any()).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/paper.PDF", server.uri())).unwrap();

        let resolution = resolver.resolve(&url).await;
        assert_eq!(resolution.title, None);
        assert!(!resolution.cached);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(db.title_count().await.unwrap(), 0);
        server.verify().await;
    }

    #[tokio::test]
    async fn test_conflicting_encoding_hints_cached_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/conflicted"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><meta charset=\"Shift_JIS\"><title>X</title></head></html>",
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/conflicted", server.uri())).unwrap();

        let resolution = resolver.resolve(&url).await;
        assert_eq!(resolution.title, None);
        assert!(!resolution.cached);

        // Ambiguity is a resolved fact, not an error: it gets cached.
        let record = wait_for_entry(&db, url.as_str()).await;
        assert_eq!(record.title, None);
    }

    #[tokio::test]
    async fn test_shift_jis_page_decodes_cleanly() {
        let html = "<html><head><title>\u{65e5}\u{672c}\u{8a9e}</title></head><body></body></html>";
        let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(html);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/jp"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(encoded.into_owned(), "text/html; charset=Shift_JIS"),
            )
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/jp", server.uri())).unwrap();

        let resolution = resolver.resolve(&url).await;
        assert_eq!(resolution.title.as_deref(), Some("\u{65e5}\u{672c}\u{8a9e}"));
    }

    #[tokio::test]
    async fn test_provider_post_collapses_to_single_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/oembed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "html": "<blockquote><p>Line one</p><p>Line two</p></blockquote>",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let oembed = OembedConfig {
            twitter_endpoint: format!("{}/oembed", server.uri()),
            locale: "en".to_string(),
        };
        let resolver = resolver_with(&db, oembed);
        let url = Url::parse("https://x.com/someone/status/123").unwrap();

        let resolution = resolver.resolve(&url).await;
        let title = resolution.title.unwrap();

        assert_eq!(title, "Line one Line two");
        assert!(!title.contains('\n'));
        server.verify().await;
    }

    #[tokio::test]
    async fn test_http_error_is_absent_and_not_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/missing", server.uri())).unwrap();

        let resolution = resolver.resolve(&url).await;
        assert_eq!(resolution.title, None);
        assert!(!resolution.cached);

        // A transport failure is not a resolved fact; nothing is written,
        // so the next request will retry.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(db.title_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_only_title_cached_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/blank"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "<html><head><title>   </title></head></html>",
                "text/html; charset=utf-8",
            ))
            .mount(&server)
            .await;

        let db = CacheDb::open_in_memory().await.unwrap();
        let resolver = resolver_with(&db, OembedConfig::default());
        let url = Url::parse(&format!("{}/blank", server.uri())).unwrap();

        let resolution = resolver.resolve(&url).await;
        assert_eq!(resolution.title, None);

        let record = wait_for_entry(&db, url.as_str()).await;
        assert_eq!(record.title, None);
    }
}
