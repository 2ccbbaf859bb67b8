//! Database access for OmniBase
//!
//! Single shared SQLite database (`omnibase.db` in the root folder) holding
//! all three collections plus settings and the external API response cache.

pub mod init;

use crate::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Initialize database connection pool
///
/// Creates the database file and schema on first run.
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // mode=rwc: read, write, create
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(&db_url).await?;

    init::create_tables(&pool).await?;

    Ok(pool)
}

/// Connection pool backed by an in-memory database, schema included.
/// Used by unit and integration tests.
pub async fn init_memory_pool() -> Result<SqlitePool> {
    let pool = SqlitePool::connect("sqlite::memory:").await?;
    init::create_tables(&pool).await?;
    Ok(pool)
}
