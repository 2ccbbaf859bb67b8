//! Data models shared across OmniBase crates
//!
//! Wire formats match the web client: movie fields are camelCase, game and
//! track fields are snake_case.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Top-level media category. Determines which section set and API
/// endpoints are active in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Movies,
    Games,
    Music,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Movies, Mode::Games, Mode::Music];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Movies => "Movies",
            Mode::Games => "Games",
            Mode::Music => "Music",
        }
    }

    /// Parse a persisted mode name; unknown values fall back to Movies.
    pub fn parse_or_default(s: &str) -> Mode {
        match s {
            "Games" => Mode::Games,
            "Music" => Mode::Music,
            _ => Mode::Movies,
        }
    }
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Movies
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Movie vs. series distinction within the Movies collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleKind {
    Movie,
    Series,
}

impl Default for TitleKind {
    fn default() -> Self {
        TitleKind::Movie
    }
}

/// A movie or TV series in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: TitleKind,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub director: Option<String>,
    /// Free-text, comma-separated genre list
    #[serde(default)]
    pub genre: Option<String>,
    /// User rating 0-5 in half-star steps; 0 = not rated
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub imdb_rating: Option<f64>,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<String>,
    /// Provider name -> streaming offers, as returned by the availability API
    #[serde(default)]
    pub streaming_info: serde_json::Value,
    #[serde(default)]
    pub notes: Option<String>,
    /// Where this entry came from: manual, api, netflix_import
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A game in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub stores: Vec<String>,
    /// User rating 0-5 in half-star steps; 0 = not rated
    #[serde(default)]
    pub rating: f64,
    /// RAWG community rating 0-5; 0 = not rated there
    #[serde(default)]
    pub rawg_rating: f64,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Game {
    /// Year of release, parsed from the leading `YYYY-` of `release_date`
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|d| d.get(0..4))
            .and_then(|y| y.parse().ok())
    }
}

/// A music track in the collection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    /// Free-text, comma-separated genre list (aggregated from artists)
    #[serde(default)]
    pub genre: Option<String>,
    /// User rating 0-5 in half-star steps; 0 = not rated
    #[serde(default)]
    pub rating: f64,
    /// Spotify popularity 0-100
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub spotify_link: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
