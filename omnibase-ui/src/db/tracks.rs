//! Music track collection persistence

use anyhow::Result;
use chrono::{DateTime, Utc};
use omnibase_common::models::Track;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn track_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Track> {
    let id: String = row.get("id");
    let created_at: Option<String> = row.get("created_at");
    let updated_at: Option<String> = row.get("updated_at");

    Ok(Track {
        id: Uuid::parse_str(&id)?,
        name: row.get("name"),
        artist: row.get("artist"),
        album: row.get("album"),
        genre: row.get("genre"),
        rating: row.get("rating"),
        popularity: row.get("popularity"),
        spotify_link: row.get("spotify_link"),
        image: row.get("image"),
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

/// Load all tracks, insertion order
pub async fn list_tracks(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query("SELECT * FROM tracks ORDER BY created_at, id")
        .fetch_all(pool)
        .await?;
    rows.iter().map(track_from_row).collect()
}

pub async fn get_track(pool: &SqlitePool, id: Uuid) -> Result<Option<Track>> {
    let row = sqlx::query("SELECT * FROM tracks WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(track_from_row).transpose()
}

/// Dedup check on name + artist: the same song title by another artist
/// is a different track
pub async fn track_exists(pool: &SqlitePool, name: &str, artist: Option<&str>) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tracks WHERE name = ? AND COALESCE(artist, '') = COALESCE(?, '')",
    )
    .bind(name)
    .bind(artist)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn insert_track(pool: &SqlitePool, track: &Track) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tracks (
            id, name, artist, album, genre, rating, popularity,
            spotify_link, image, notes, source, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(track.id.to_string())
    .bind(&track.name)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.genre)
    .bind(track.rating)
    .bind(track.popularity)
    .bind(&track.spotify_link)
    .bind(&track.image)
    .bind(&track.notes)
    .bind(&track.source)
    .bind(track.created_at.unwrap_or_else(Utc::now).to_rfc3339())
    .bind(track.updated_at.unwrap_or_else(Utc::now).to_rfc3339())
    .execute(pool)
    .await?;

    Ok(())
}

/// Full-object replace; returns false when the id is unknown
pub async fn update_track(pool: &SqlitePool, track: &Track) -> Result<bool> {
    let result = sqlx::query(
        r#"
        UPDATE tracks SET
            name = ?, artist = ?, album = ?, genre = ?, rating = ?,
            popularity = ?, spotify_link = ?, image = ?, notes = ?,
            source = ?, updated_at = ?
        WHERE id = ?
        "#,
    )
    .bind(&track.name)
    .bind(&track.artist)
    .bind(&track.album)
    .bind(&track.genre)
    .bind(track.rating)
    .bind(track.popularity)
    .bind(&track.spotify_link)
    .bind(&track.image)
    .bind(&track.notes)
    .bind(&track.source)
    .bind(Utc::now().to_rfc3339())
    .bind(track.id.to_string())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a track, returning the removed record when it existed
pub async fn delete_track(pool: &SqlitePool, id: Uuid) -> Result<Option<Track>> {
    let Some(track) = get_track(pool, id).await? else {
        return Ok(None);
    };
    sqlx::query("DELETE FROM tracks WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;
    Ok(Some(track))
}

#[cfg(test)]
mod tests {
    use super::*;
    use omnibase_common::db::init_memory_pool;

    fn sample(name: &str, artist: &str) -> Track {
        Track {
            id: Uuid::new_v4(),
            name: name.to_string(),
            artist: Some(artist.to_string()),
            album: Some("OK Computer".to_string()),
            genre: Some("Alternative Rock".to_string()),
            rating: 0.0,
            popularity: Some(82.0),
            spotify_link: None,
            image: None,
            notes: None,
            source: Some("manual".to_string()),
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn insert_and_list() {
        let pool = init_memory_pool().await.unwrap();
        insert_track(&pool, &sample("Paranoid Android", "Radiohead"))
            .await
            .unwrap();
        let tracks = list_tracks(&pool).await.unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].popularity, Some(82.0));
    }

    #[tokio::test]
    async fn exists_distinguishes_artists() {
        let pool = init_memory_pool().await.unwrap();
        insert_track(&pool, &sample("Hurt", "Nine Inch Nails"))
            .await
            .unwrap();
        assert!(track_exists(&pool, "Hurt", Some("Nine Inch Nails"))
            .await
            .unwrap());
        assert!(!track_exists(&pool, "Hurt", Some("Johnny Cash"))
            .await
            .unwrap());
    }
}
