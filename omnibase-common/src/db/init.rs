//! Schema initialization
//!
//! All tables are created idempotently at startup. JSON-shaped fields
//! (platforms, stores, streaming_info) are stored as serialized TEXT.

use crate::Result;
use sqlx::SqlitePool;

/// Create all OmniBase tables if they don't exist
pub async fn create_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query("PRAGMA foreign_keys = ON").execute(pool).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS movies (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            kind TEXT NOT NULL DEFAULT 'movie',
            year INTEGER,
            director TEXT,
            genre TEXT,
            rating REAL NOT NULL DEFAULT 0.0,
            imdb_rating REAL,
            poster TEXT,
            imdb_id TEXT,
            tmdb_id TEXT,
            streaming_info TEXT NOT NULL DEFAULT '{}',
            notes TEXT,
            source TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS games (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            genre TEXT,
            platforms TEXT NOT NULL DEFAULT '[]',
            stores TEXT NOT NULL DEFAULT '[]',
            rating REAL NOT NULL DEFAULT 0.0,
            rawg_rating REAL NOT NULL DEFAULT 0.0,
            release_date TEXT,
            background_image TEXT,
            notes TEXT,
            source TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            artist TEXT,
            album TEXT,
            genre TEXT,
            rating REAL NOT NULL DEFAULT 0.0,
            popularity REAL,
            spotify_link TEXT,
            image TEXT,
            notes TEXT,
            source TEXT,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Key/value settings: API keys, AI provider selection, UI preferences,
    // API usage counter, last shown section, active mode
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // External API response cache with per-entry fetch timestamp (7-day TTL)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS api_cache (
            cache_key TEXT PRIMARY KEY,
            response TEXT NOT NULL,
            fetched_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (movies, games, tracks, settings, api_cache)");

    Ok(())
}
