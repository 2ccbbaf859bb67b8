//! RAWG game database client
//!
//! Title search against api.rawg.io, normalized into collection entries.
//! RAWG calls are not cached and do not count against the monthly
//! availability API budget.

use super::ClientError;
use omnibase_common::models::Game;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use uuid::Uuid;

const API_URL: &str = "https://api.rawg.io/api/games";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Placeholder image when RAWG has none
const NO_IMAGE_URL: &str = "https://placehold.co/300x450/e2e8f0/1e293b?text=No+Image";

/// Maximum results returned per search
const PAGE_SIZE: u32 = 10;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RawgGame>,
}

#[derive(Debug, Deserialize)]
struct RawgGame {
    name: String,
    #[serde(default)]
    released: Option<String>,
    #[serde(default)]
    background_image: Option<String>,
    /// Community rating on RAWG's 0-5 scale
    #[serde(default)]
    rating: f64,
    #[serde(default)]
    genres: Vec<Named>,
    #[serde(default)]
    platforms: Vec<PlatformEntry>,
    #[serde(default)]
    stores: Vec<StoreEntry>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PlatformEntry {
    platform: Named,
}

#[derive(Debug, Deserialize)]
struct StoreEntry {
    store: Named,
}

impl RawgGame {
    fn into_game(self) -> Game {
        let genre = if self.genres.is_empty() {
            None
        } else {
            Some(
                self.genres
                    .iter()
                    .map(|g| g.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };
        Game {
            id: Uuid::new_v4(),
            title: self.name,
            genre,
            platforms: self.platforms.into_iter().map(|p| p.platform.name).collect(),
            stores: self.stores.into_iter().map(|s| s.store.name).collect(),
            rating: 0.0,
            rawg_rating: self.rating,
            release_date: self.released.filter(|r| !r.is_empty()),
            background_image: Some(
                self.background_image
                    .filter(|i| !i.is_empty())
                    .unwrap_or_else(|| NO_IMAGE_URL.to_string()),
            ),
            notes: None,
            source: Some("api".to_string()),
            created_at: None,
            updated_at: None,
        }
    }
}

/// RAWG game search client
pub struct RawgClient {
    http_client: Client,
}

impl RawgClient {
    pub fn new() -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Search RAWG by title, returning normalized collection entries
    pub async fn search_games(
        &self,
        api_key: &str,
        title: &str,
    ) -> Result<Vec<Game>, ClientError> {
        if api_key.trim().is_empty() {
            return Err(ClientError::MissingKey("rawg_api_key".to_string()));
        }

        let page_size = PAGE_SIZE.to_string();
        let response = self
            .http_client
            .get(API_URL)
            .query(&[
                ("key", api_key),
                ("search", title),
                ("page_size", page_size.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("RAWG request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ClientError::Api(format!(
                "RAWG returned error {}",
                response.status()
            )));
        }

        let data: SearchResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse RAWG response: {}", e)))?;

        Ok(data.results.into_iter().map(RawgGame::into_game).collect())
    }
}

impl Default for RawgClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_rawg_result() {
        let raw: RawgGame = serde_json::from_value(serde_json::json!({
            "name": "Hades",
            "released": "2020-09-17",
            "background_image": "https://img/hades.jpg",
            "rating": 4.45,
            "genres": [{"name": "Action"}, {"name": "Indie"}],
            "platforms": [
                {"platform": {"name": "PC"}},
                {"platform": {"name": "Nintendo Switch"}}
            ],
            "stores": [{"store": {"name": "Steam"}}]
        }))
        .unwrap();

        let game = raw.into_game();
        assert_eq!(game.title, "Hades");
        assert_eq!(game.genre.as_deref(), Some("Action, Indie"));
        assert_eq!(game.platforms, vec!["PC", "Nintendo Switch"]);
        assert_eq!(game.stores, vec!["Steam"]);
        assert_eq!(game.rating, 0.0);
        assert_eq!(game.rawg_rating, 4.45);
        assert_eq!(game.release_year(), Some(2020));
    }

    #[test]
    fn missing_image_gets_placeholder() {
        let raw: RawgGame = serde_json::from_value(serde_json::json!({"name": "Obscure"})).unwrap();
        let game = raw.into_game();
        assert_eq!(game.background_image.as_deref(), Some(NO_IMAGE_URL));
        assert!(game.genre.is_none());
        assert!(game.release_date.is_none());
    }
}
