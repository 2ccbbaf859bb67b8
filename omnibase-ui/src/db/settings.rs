//! Settings persistence (key/value) and the external API usage counter
//!
//! Holds API keys, the AI provider selection, the UI preferences that the
//! original kept in browser localStorage (dark mode, main color, language,
//! active mode, last shown section), and the monthly API call budget.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;

/// Monthly budget for external API calls
pub const API_USAGE_LIMIT: u32 = 1000;

/// Settings keys holding key material; masked on read-out
pub const SECRET_KEYS: [&str; 4] = [
    "streaming_api_key",
    "rawg_api_key",
    "openai_api_key",
    "gemini_api_key",
];

pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    Ok(value)
}

pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value) VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

/// Load all settings as a map
pub async fn all_settings(pool: &SqlitePool) -> Result<HashMap<String, String>> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().collect())
}

/// Current month key for the usage counter reset ("YYYY-MM")
fn current_month() -> String {
    Utc::now().format("%Y-%m").to_string()
}

/// Current API usage count, resetting the counter when a new month began
pub async fn get_api_usage(pool: &SqlitePool) -> Result<u32> {
    let last_reset = get_setting(pool, "last_reset_month").await?;
    let month = current_month();

    if last_reset.as_deref() != Some(month.as_str()) {
        set_setting(pool, "api_usage_count", "0").await?;
        set_setting(pool, "last_reset_month", &month).await?;
        return Ok(0);
    }

    Ok(get_setting(pool, "api_usage_count")
        .await?
        .and_then(|v| v.parse().ok())
        .unwrap_or(0))
}

/// Increment the usage counter, returning the new count
pub async fn increment_api_usage(pool: &SqlitePool) -> Result<u32> {
    let count = get_api_usage(pool).await? + 1;
    set_setting(pool, "api_usage_count", &count.to_string()).await?;
    set_setting(pool, "last_reset_month", &current_month()).await?;
    Ok(count)
}

/// Whether enough monthly budget remains for `needed_calls` more calls
///
/// `needed_calls` comes from request payloads, so the addition must not
/// overflow.
pub async fn check_api_usage_limit(pool: &SqlitePool, needed_calls: u32) -> Result<bool> {
    let count = get_api_usage(pool).await?;
    Ok(count
        .checked_add(needed_calls)
        .map_or(false, |total| total <= API_USAGE_LIMIT))
}
