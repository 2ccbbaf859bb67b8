//! Movie collection persistence

use anyhow::Result;
use chrono::{DateTime, Utc};
use omnibase_common::models::{Movie, TitleKind};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn kind_to_str(kind: TitleKind) -> &'static str {
    match kind {
        TitleKind::Movie => "movie",
        TitleKind::Series => "series",
    }
}

fn kind_from_str(s: &str) -> TitleKind {
    match s {
        "series" => TitleKind::Series,
        _ => TitleKind::Movie,
    }
}

fn movie_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Movie> {
    let id: String = row.get("id");
    let kind: String = row.get("kind");
    let streaming_info: String = row.get("streaming_info");
    let created_at: Option<String> = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");

    Ok(Movie {
        id: Uuid::parse_str(&id)?,
        title: row.get("title"),
        kind: kind_from_str(&kind),
        year: row.get("year"),
        director: row.get("director"),
        genre: row.get("genre"),
        rating: row.get("rating"),
        imdb_rating: row.get("imdb_rating"),
        poster: row.get("poster"),
        imdb_id: row.get("imdb_id"),
        tmdb_id: row.get("tmdb_id"),
        streaming_info: serde_json::from_str(&streaming_info)
            .unwrap_or(serde_json::Value::Object(Default::default())),
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

/// Load all movies, insertion order
pub async fn list_movies(pool: &SqlitePool) -> Result<Vec<Movie>> {
    let rows = sqlx::query("SELECT * FROM movies ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    rows.iter().map(movie_from_row).collect()
}

/// Load a single movie by id
pub async fn get_movie(pool: &SqlitePool, id: Uuid) -> Result<Option<Movie>> {
    let row = sqlx::query("SELECT * FROM movies WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(movie_from_row).transpose()
}

/// Check whether a title already exists (exact match, for import dedup)
pub async fn title_exists(pool: &SqlitePool, title: &str) -> Result<bool> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM movies WHERE title = ?")
        .bind(title)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

/// Insert a new movie
pub async fn insert_movie(pool: &SqlitePool, movie: &Movie) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO movies (
            id, title, kind, year, director, genre, rating, imdb_rating,
            poster, imdb_id, tmdb_id, streaming_info, notes, source,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(movie.id.to_string())
    .bind(&movie.title)
    .bind(kind_to_str(movie.kind))
    .bind(movie.year)
    .bind(&movie.director)
    .bind(&movie.genre)
    .bind(movie.rating)
    .bind(movie.imdb_rating)
    .bind(&movie.poster)
    .bind(&movie.imdb_id)
    .bind(&movie.tmdb_id)
    .bind(movie.streaming_info.to_string())
    .bind(&movie.notes)
    .bind(&movie.source)
    .bind(movie.created_at.unwrap_or_else(Utc::now).to_rfc3339())
    .bind(movie.updated_at.unwrap_or_else(Utc::now).to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Full-object replace; returns false when the id is unknown
pub async fn update_movie(pool: &SqlitePool, movie: &Movie) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE movies SET
            title = ?, kind = ?, year = ?, director = ?, genre = ?,
            rating = ?, imdb_rating = ?, poster = ?, imdb_id = ?, tmdb_id = ?,
            streaming_info = ?, notes = ?, source = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&movie.title)
    .bind(kind_to_str(movie.kind))
    .bind(movie.year)
    .bind(&movie.director)
    .bind(&movie.genre)
    .bind(movie.rating)
    .bind(movie.imdb_rating)
    .bind(&movie.poster)
    .bind(&movie.imdb_id)
    .bind(&movie.tmdb_id)
    .bind(movie.streaming_info.to_string())
    .bind(&movie.notes)
    .bind(&movie.source)
    .bind(Utc::now().to_rfc3339())
    .bind(movie.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a movie, returning the removed record when it existed
pub async fn delete_movie(pool: &SqlitePool, id: Uuid) -> Result<Option<Movie>> {
    let Some(movie) = get_movie(pool, id).await? else {
        return Ok(None);
    };
    sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(Some(movie))
}
