//! Streaming availability client (RapidAPI)
//!
//! Title search against the streaming-availability API with a 7-day
//! SQLite-backed response cache and the shared monthly call budget enforced
//! before every network request.

use super::ClientError;
use crate::db::{cache, settings};
use omnibase_common::models::{Movie, TitleKind};
use reqwest::Client;
use serde_json::Value;
use sqlx::SqlitePool;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

/// Streaming availability API base URL
const API_URL: &str = "https://streaming-availability.p.rapidapi.com/shows/search/title";

/// RapidAPI host header value
const API_HOST: &str = "streaming-availability.p.rapidapi.com";

/// Default timeout for availability API requests
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default lookup country
pub const DEFAULT_COUNTRY: &str = "DE";

/// Placeholder poster when the API has none
const NO_POSTER_URL: &str = "https://placehold.co/300x450/e2e8f0/1e293b?text=No+Poster";

/// Streaming availability client
pub struct StreamingClient {
    http_client: Client,
}

impl StreamingClient {
    pub fn new() -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Search for a title, returning the raw API response.
    ///
    /// Cache first (7-day TTL), then budget check, then the network. Only
    /// actual network calls count against the monthly budget.
    pub async fn search_title(
        &self,
        pool: &SqlitePool,
        api_key: &str,
        title: &str,
        country: &str,
    ) -> Result<Value, ClientError> {
        let normalized = title.to_lowercase().trim().to_string();
        let cache_key = format!("{}_{}", normalized, country);

        if let Some(cached) = cache::get_cached(pool, &cache_key).await? {
            debug!(title, "Using cached availability data");
            return Ok(cached);
        }

        if api_key.trim().is_empty() {
            return Err(ClientError::MissingKey("streaming_api_key".to_string()));
        }

        if !settings::check_api_usage_limit(pool, 1).await? {
            warn!(title, "API budget exhausted, skipping availability lookup");
            return Err(ClientError::BudgetExhausted);
        }

        let response = self
            .http_client
            .get(API_URL)
            .query(&[
                ("country", country),
                ("title", title),
                ("series_granularity", "show"),
            ])
            .header("x-rapidapi-key", api_key)
            .header("x-rapidapi-host", API_HOST)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Availability API request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(format!(
                "Availability API returned error {}: {}",
                status, body
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse availability response: {}", e)))?;

        settings::increment_api_usage(pool).await?;
        cache::store_cached(pool, &cache_key, &data).await?;

        Ok(data)
    }

    /// Search and normalize into a collection entry in one step
    pub async fn lookup_movie(
        &self,
        pool: &SqlitePool,
        api_key: &str,
        title: &str,
        country: &str,
    ) -> Result<Movie, ClientError> {
        let response = self.search_title(pool, api_key, title, country).await?;
        process_response(&response).ok_or(ClientError::NoResults)
    }
}

impl Default for StreamingClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract a collection entry from an availability API response.
///
/// Handles both the live API shape (`results` array, `posterURLs`) and the
/// older cached shape (bare array, `imageSet.verticalPoster`). Returns None
/// when no result is present or the shape is unrecognized.
pub fn process_response(response: &Value) -> Option<Movie> {
    // Bare array (cache shape) or standard `results` array
    let show = if let Some(list) = response.as_array() {
        list.first()?
    } else if let Some(results) = response.get("results").and_then(Value::as_array) {
        results.first()?
    } else {
        warn!("Unexpected availability API data shape");
        return None;
    };

    // `showType` in the cache shape, `type` in the API shape
    let kind_str = show
        .get("showType")
        .or_else(|| show.get("type"))
        .and_then(Value::as_str)
        .unwrap_or("movie");
    let kind = if kind_str == "series" {
        TitleKind::Series
    } else {
        TitleKind::Movie
    };

    let poster = extract_poster(show);
    let genre = extract_genres(show);
    let director = extract_directors(show);

    let year = show
        .get("year")
        .or_else(|| show.get("releaseYear"))
        .and_then(Value::as_i64)
        .map(|y| y as i32);

    let imdb_rating = extract_imdb_rating(show);
    let streaming_info = extract_streaming_info(show);

    Some(Movie {
        id: Uuid::new_v4(),
        title: show
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        kind,
        year,
        director,
        genre,
        // User rating starts unrated
        rating: 0.0,
        imdb_rating,
        poster: Some(poster),
        imdb_id: show
            .get("imdbId")
            .and_then(Value::as_str)
            .map(str::to_string),
        tmdb_id: show
            .get("tmdbId")
            .and_then(Value::as_str)
            .map(str::to_string),
        streaming_info,
        notes: show
            .get("overview")
            .and_then(Value::as_str)
            .map(str::to_string),
        source: Some("api".to_string()),
        created_at: None,
        updated_at: None,
    })
}

/// Poster URL with fallbacks across both response shapes
fn extract_poster(show: &Value) -> String {
    if let Some(posters) = show.get("posterURLs") {
        for size in ["300", "500", "original"] {
            if let Some(url) = posters.get(size).and_then(Value::as_str) {
                if !url.is_empty() {
                    return url.to_string();
                }
            }
        }
    }
    if let Some(vertical) = show
        .get("imageSet")
        .and_then(|s| s.get("verticalPoster"))
    {
        for size in ["w480", "w720", "w600", "w360", "w240"] {
            if let Some(url) = vertical.get(size).and_then(Value::as_str) {
                if !url.is_empty() {
                    return url.to_string();
                }
            }
        }
    }
    NO_POSTER_URL.to_string()
}

/// Genres arrive either as `[{"name": ...}]` or `[...strings]`
fn extract_genres(show: &Value) -> Option<String> {
    let genres = show.get("genres")?.as_array()?;
    let names: Vec<&str> = genres
        .iter()
        .filter_map(|g| {
            g.get("name")
                .and_then(Value::as_str)
                .or_else(|| g.as_str())
        })
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return None;
    }
    Some(names.join(", "))
}

fn extract_directors(show: &Value) -> Option<String> {
    let directors = show.get("directors")?.as_array()?;
    let names: Vec<&str> = directors.iter().filter_map(Value::as_str).collect();
    if names.is_empty() {
        return None;
    }
    Some(names.join(", "))
}

/// IMDB rating, falling back to the cache shape's 0-100 `rating` field
/// (scaled down when it is clearly out of the 0-10 range)
fn extract_imdb_rating(show: &Value) -> Option<f64> {
    if let Some(rating) = show.get("imdbRating").and_then(Value::as_f64) {
        return Some(rating);
    }
    let raw = show.get("rating").and_then(Value::as_f64)?;
    if raw > 10.0 {
        Some(raw / 10.0)
    } else {
        Some(raw)
    }
}

/// Streaming offers: either a ready `streamingInfo` map or an `offers`
/// array regrouped by provider name
fn extract_streaming_info(show: &Value) -> Value {
    if let Some(info) = show.get("streamingInfo") {
        return info.clone();
    }

    let mut grouped = serde_json::Map::new();
    if let Some(offers) = show.get("offers").and_then(Value::as_array) {
        for offer in offers {
            let provider = offer
                .get("provider")
                .and_then(|p| p.get("name"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase();
            if provider.is_empty() {
                continue;
            }
            let offer_type = offer.get("type").and_then(Value::as_str).unwrap_or_default();
            let entry = serde_json::json!({
                "link": offer.get("url").and_then(Value::as_str).unwrap_or_default(),
                "type": if offer_type == "subscription" { "flatrate" } else { offer_type },
            });
            grouped
                .entry(provider)
                .or_insert_with(|| Value::Array(vec![]))
                .as_array_mut()
                .map(|list| list.push(entry));
        }
    }
    Value::Object(grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processes_standard_api_response() {
        let response = serde_json::json!({
            "results": [{
                "title": "The Matrix",
                "type": "movie",
                "year": 1999,
                "genres": [{"name": "Action"}, {"name": "Sci-Fi"}],
                "directors": ["Lana Wachowski", "Lilly Wachowski"],
                "posterURLs": {"300": "https://img/300.jpg"},
                "imdbId": "tt0133093",
                "imdbRating": 8.7,
                "overview": "A hacker learns the truth.",
                "streamingInfo": {"netflix": [{"type": "flatrate"}]}
            }]
        });

        let movie = process_response(&response).unwrap();
        assert_eq!(movie.title, "The Matrix");
        assert_eq!(movie.kind, TitleKind::Movie);
        assert_eq!(movie.year, Some(1999));
        assert_eq!(movie.genre.as_deref(), Some("Action, Sci-Fi"));
        assert_eq!(
            movie.director.as_deref(),
            Some("Lana Wachowski, Lilly Wachowski")
        );
        assert_eq!(movie.poster.as_deref(), Some("https://img/300.jpg"));
        assert_eq!(movie.rating, 0.0);
        assert_eq!(movie.imdb_rating, Some(8.7));
        assert_eq!(movie.notes.as_deref(), Some("A hacker learns the truth."));
    }

    #[test]
    fn processes_cached_array_shape() {
        let response = serde_json::json!([{
            "title": "Dark",
            "showType": "series",
            "releaseYear": 2017,
            "genres": ["Mystery", "Thriller"],
            "imageSet": {"verticalPoster": {"w480": "https://img/480.jpg"}},
            "rating": 85
        }]);

        let movie = process_response(&response).unwrap();
        assert_eq!(movie.kind, TitleKind::Series);
        assert_eq!(movie.year, Some(2017));
        assert_eq!(movie.genre.as_deref(), Some("Mystery, Thriller"));
        assert_eq!(movie.poster.as_deref(), Some("https://img/480.jpg"));
        // 0-100 scale folded down to 0-10
        assert_eq!(movie.imdb_rating, Some(8.5));
    }

    #[test]
    fn empty_results_yield_none() {
        assert!(process_response(&serde_json::json!({"results": []})).is_none());
        assert!(process_response(&serde_json::json!([])).is_none());
        assert!(process_response(&serde_json::json!({"weird": true})).is_none());
    }

    #[test]
    fn missing_poster_falls_back_to_placeholder() {
        let response = serde_json::json!({"results": [{"title": "Obscure"}]});
        let movie = process_response(&response).unwrap();
        assert_eq!(movie.poster.as_deref(), Some(NO_POSTER_URL));
    }

    #[test]
    fn offers_are_regrouped_by_provider() {
        let response = serde_json::json!({
            "results": [{
                "title": "Some Film",
                "offers": [
                    {"provider": {"name": "Netflix"}, "url": "https://n", "type": "subscription"},
                    {"provider": {"name": "Netflix"}, "url": "https://n2", "type": "rent"},
                    {"provider": {"name": ""}, "url": "https://x", "type": "buy"}
                ]
            }]
        });

        let movie = process_response(&response).unwrap();
        let netflix = movie.streaming_info["netflix"].as_array().unwrap();
        assert_eq!(netflix.len(), 2);
        assert_eq!(netflix[0]["type"], "flatrate");
        assert_eq!(netflix[1]["type"], "rent");
        assert!(movie.streaming_info.get("").is_none());
    }

    #[tokio::test]
    async fn cache_hit_skips_budget_and_network() {
        let pool = omnibase_common::db::init_memory_pool().await.unwrap();
        let cached = serde_json::json!({"results": [{"title": "The Matrix"}]});
        crate::db::cache::store_cached(&pool, "the matrix_DE", &cached)
            .await
            .unwrap();

        // No API key configured; a cache miss would fail with MissingKey
        let client = StreamingClient::new();
        let result = client
            .search_title(&pool, "", "The Matrix", "DE")
            .await
            .unwrap();
        assert_eq!(result, cached);
        assert_eq!(crate::db::settings::get_api_usage(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn budget_exhaustion_blocks_network_calls() {
        let pool = omnibase_common::db::init_memory_pool().await.unwrap();
        let month = chrono::Utc::now().format("%Y-%m").to_string();
        crate::db::settings::set_setting(&pool, "last_reset_month", &month)
            .await
            .unwrap();
        crate::db::settings::set_setting(&pool, "api_usage_count", "1000")
            .await
            .unwrap();

        let client = StreamingClient::new();
        let result = client.search_title(&pool, "some-key", "Dune", "DE").await;
        assert!(matches!(result, Err(ClientError::BudgetExhausted)));
    }
}
