//! Game collection persistence

use anyhow::Result;
use chrono::{DateTime, Utc};
use omnibase_common::models::Game;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn game_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Game> {
    let id: String = row.get("id");
    let platforms: String = row.get("platforms");
    let stores: String = row.get("stores");
    let created_at: Option<String> = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");

    Ok(Game {
        id: Uuid::parse_str(&id)?,
        title: row.get("title"),
        genre: row.get("genre"),
        platforms: serde_json::from_str(&platforms).unwrap_or_default(),
        stores: serde_json::from_str(&stores).unwrap_or_default(),
        rating: row.get("rating"),
        rawg_rating: row.get("rawg_rating"),
        release_date: row.get("release_date"),
        background_image: row.get("background_image"),
        notes: row.get("notes"),
        source: row.get("source"),
        created_at: created_at.and_then(parse_timestamp),
        updated_at: updated_at.and_then(parse_timestamp),
    })
}

fn parse_timestamp(s: String) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Load all games, insertion order
pub async fn list_games(pool: &SqlitePool) -> Result<Vec<Game>> {
    let rows = sqlx::query("SELECT * FROM games ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    rows.iter().map(game_from_row).collect()
}

pub async fn get_game(pool: &SqlitePool, id: Uuid) -> Result<Option<Game>> {
    let row = sqlx::query("SELECT * FROM games WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(game_from_row).transpose()
}

pub async fn title_exists(pool: &SqlitePool, title: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM games WHERE title = ?")
        .bind(title)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn insert_game(pool: &SqlitePool, game: &Game) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO games (
            id, title, genre, platforms, stores, rating, rawg_rating,
            release_date, background_image, notes, source, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(game.id.to_string())
    .bind(&game.title)
    .bind(&game.genre)
    .bind(serde_json::to_string(&game.platforms)?)
    .bind(serde_json::to_string(&game.stores)?)
    .bind(game.rating)
    .bind(game.rawg_rating)
    .bind(&game.release_date)
    .bind(&game.background_image)
    .bind(&game.notes)
    .bind(&game.source)
    .bind(game.created_at.unwrap_or_else(Utc::now).to_rfc3339())
    .bind(game.updated_at.unwrap_or_else(Utc::now).to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Full-object replace; returns false when the id is unknown
pub async fn update_game(pool: &SqlitePool, game: &Game) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE games SET
            title = ?, genre = ?, platforms = ?, stores = ?, rating = ?,
            rawg_rating = ?, release_date = ?, background_image = ?,
            notes = ?, source = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&game.title)
    .bind(&game.genre)
    .bind(serde_json::to_string(&game.platforms)?)
    .bind(serde_json::to_string(&game.stores)?)
    .bind(game.rating)
    .bind(game.rawg_rating)
    .bind(&game.release_date)
    .bind(&game.background_image)
    .bind(&game.notes)
    .bind(&game.source)
    .bind(Utc::now().to_rfc3339())
    .bind(game.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a game, returning the removed record when it existed
pub async fn delete_game(pool: &SqlitePool, id: Uuid) -> Result<Option<Game>> {
    let Some(game) = get_game(pool, id).await? else {
        return Ok(None);
    };
    sqlx::query("DELETE FROM games WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(Some(game))
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibase_common::db::init_memory_pool;

    fn sample(title: &str) -> Game {
        Game {
            id: Uuid::new_v4(),
            title: title.to_string(),
            genre: Some("Action RPG".to_string()),
            platforms: vec!["PC".to_string(), "PlayStation 5".to_string()],
            stores: vec!["Steam".to_string()],
            rating: 4.5,
            rawg_rating: 4.3,
            release_date: Some("2022-02-25".to_string()),
            background_image: None,
            notes: None,
            source: Some("api".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn platforms_roundtrip_as_json() {
        let pool = init_memory_pool().await.unwrap();
        let game = sample("Elden Ring");
        insert_game(&pool, &game).await.unwrap();

        let loaded = get_game(&pool, game.id).await.unwrap().unwrap();
        assert_eq!(loaded.platforms, vec!["PC", "PlayStation 5"]);
        assert_eq!(loaded.release_year(), Some(2022));
    }

    #[tokio::test]
    async fn delete_unknown_id_is_none() {
        let pool = init_memory_pool().await.unwrap();
        assert!(delete_game(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }
}
