//! Title cache operations.
//!
//! One row per URL, overwritten on every re-resolution. A NULL title
//! records that resolution found nothing; serving that absence back is
//! intentional, so a hit and a miss are distinct outcomes.

use super::connection::CacheDb;
use crate::Error;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::{params, rusqlite};

/// A cached title resolution result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TitleRecord {
    /// The URL the title was resolved for (cache key).
    pub url: String,
    /// The resolved title, or None when resolution found no title.
    pub title: Option<String>,
    /// RFC 3339 timestamp of when the entry was written.
    pub created_at: String,
}

impl CacheDb {
    /// Look up the cached resolution for a URL.
    ///
    /// Returns None when the URL has never been resolved (or its entry was
    /// evicted). A `Some` record may still carry `title: None`.
    pub async fn get_title(&self, url: &str) -> Result<Option<TitleRecord>, Error> {
        let url = url.to_string();
        self.conn
            .call(move |conn| -> Result<Option<TitleRecord>, Error> {
                let mut stmt = conn.prepare("SELECT url, title, created_at FROM titles WHERE url = ?1")?;

                let result = stmt.query_row(params![url], |row| {
                    Ok(TitleRecord { url: row.get(0)?, title: row.get(1)?, created_at: row.get(2)? })
                });

                match result {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Insert or overwrite the resolution for a URL.
    ///
    /// Uses UPSERT semantics: a fresh resolution always replaces the prior
    /// entry, including replacing a stored title with `None`. The timestamp
    /// is taken as a parameter so callers control the entry's age.
    pub async fn put_title(&self, url: &str, title: Option<&str>, created_at: DateTime<Utc>) -> Result<(), Error> {
        let url = url.to_string();
        let title = title.map(str::to_string);
        let created_at = created_at.to_rfc3339();

        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO titles (url, title, created_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(url) DO UPDATE SET
                        title = excluded.title,
                        created_at = excluded.created_at",
                    params![url, title, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete entries created before the cutoff.
    ///
    /// Returns the number of deleted entries.
    pub async fn evict_titles_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, Error> {
        let cutoff = cutoff.to_rfc3339();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count = conn.execute("DELETE FROM titles WHERE created_at < ?1", params![cutoff])?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Number of cached entries.
    pub async fn title_count(&self) -> Result<u64, Error> {
        self.conn
            .call(|conn| -> Result<u64, Error> {
                let count: i64 = conn.query_row("SELECT COUNT(*) FROM titles", [], |row| row.get(0))?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}
