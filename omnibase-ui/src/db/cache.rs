//! External API response cache
//!
//! Responses from the streaming availability API are cached for 7 days,
//! keyed on normalized title + country.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;

/// Cache entries older than this are considered stale
pub const CACHE_TTL: Duration = Duration::days(7);

/// Look up a fresh cached response. Stale entries are treated as misses
/// (they get overwritten by the next store).
pub async fn get_cached(pool: &SqlitePool, cache_key: &str) -> Result<Option<serde_json::Value>> {
    let row: Option<(String, String)> =
        sqlx::query_as("SELECT response, fetched_at FROM api_cache WHERE cache_key = ?")
            .bind(cache_key)
            .fetch_optional(pool)
            .await?;

    let Some((response, fetched_at)) = row else {
        return Ok(None);
    };

    let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now() - CACHE_TTL - Duration::seconds(1));

    if Utc::now() - fetched_at >= CACHE_TTL {
        tracing::debug!(cache_key, "Cache entry stale, refetching");
        return Ok(None);
    }

    Ok(serde_json::from_str(&response).ok())
}

/// Store (or refresh) a cached response with the current timestamp
pub async fn store_cached(
    pool: &SqlitePool,
    cache_key: &str,
    response: &serde_json::Value,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO api_cache (cache_key, response, fetched_at) VALUES (?, ?, ?)
        ON CONFLICT(cache_key) DO UPDATE SET
            response = excluded.response,
            fetched_at = excluded.fetched_at
        "#,
    )
    .bind(cache_key)
    .bind(response.to_string())
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;
    Ok(())
}
