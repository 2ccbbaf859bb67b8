//! Music collection CSV import, one track per row
//!
//! Accepts both a plain `name` header and the `Track Name`/`Artist Name(s)`
//! style headers that Spotify playlist exports use.

use super::ImportError;
use omnibase_common::models::Track;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct TrackRow {
    #[serde(alias = "Track Name")]
    name: String,
    #[serde(default, alias = "Artist Name(s)")]
    artist: Option<String>,
    #[serde(default, alias = "Album Name")]
    album: Option<String>,
    #[serde(default, alias = "Genres")]
    genre: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default, alias = "Popularity")]
    popularity: Option<f64>,
    #[serde(default, alias = "Spotify Link")]
    spotify_link: Option<String>,
    #[serde(default, alias = "Image URL")]
    image: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

/// Parse an uploaded track CSV into collection entries.
///
/// Rows without a track name are dropped.
pub fn parse_music_csv(csv_bytes: &[u8]) -> Result<Vec<Track>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let mut tracks = Vec::new();
    for row in reader.deserialize::<TrackRow>() {
        let row = row?;
        if row.name.is_empty() {
            continue;
        }
        tracks.push(Track {
            id: Uuid::new_v4(),
            name: row.name,
            artist: row.artist.filter(|a| !a.is_empty()),
            album: row.album.filter(|a| !a.is_empty()),
            genre: row.genre.filter(|g| !g.is_empty()),
            rating: row.rating.unwrap_or(0.0),
            popularity: row.popularity,
            spotify_link: row.spotify_link.filter(|l| !l.is_empty()),
            image: row.image.filter(|i| !i.is_empty()),
            notes: row.notes.filter(|n| !n.is_empty()),
            source: Some("csv_import".to_string()),
            created_at: None,
            updated_at: None,
        });
    }
    Ok(tracks)
}
