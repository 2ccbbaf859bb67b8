//! AI endpoints: free-text chat and recommendation generation

use crate::clients::ai::{
    self, extract_recommendations, formulate_music_prompt, formulate_suggestion_prompt,
    MusicPrompt, SuggestionPrompt,
};
use crate::clients::streaming::DEFAULT_COUNTRY;
use crate::collection::stats::{self, Favorite};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use omnibase_common::models::{Movie, Track};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AskAiRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct AskAiResponse {
    pub success: bool,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionsRequest {
    /// "all" or "rated"
    #[serde(default = "default_selection_mode")]
    pub selection_mode: String,
    /// "movie", "series" or "both"
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub description: String,
    /// User-edited favorites override the computed top list
    #[serde(default)]
    pub favorites: Vec<Favorite>,
    #[serde(default = "default_count")]
    pub suggestion_count: u32,
}

fn default_selection_mode() -> String {
    "all".to_string()
}

fn default_content_type() -> String {
    "both".to_string()
}

fn default_count() -> u32 {
    5
}

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub success: bool,
    pub recommendations: Vec<Movie>,
    pub favorites: Vec<Favorite>,
    /// Prompt and raw reply kept for client-side debugging
    pub prompt: String,
    pub ai_response: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MusicSuggestionsRequest {
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_count")]
    pub suggestion_count: u32,
}

#[derive(Debug, Serialize)]
pub struct MusicSuggestionsResponse {
    pub success: bool,
    pub recommendations: Vec<Track>,
    pub prompt: String,
    pub ai_response: String,
}

/// POST /api/ask_ai
pub async fn ask_ai(
    State(state): State<AppState>,
    Json(payload): Json<AskAiRequest>,
) -> ApiResult<Json<AskAiResponse>> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("No message provided".to_string()));
    }

    let settings = db::settings::all_settings(&state.db).await?;
    let provider = ai::provider_from_settings(&settings)?;
    let answer = provider.complete(&payload.message).await?;

    Ok(Json(AskAiResponse {
        success: true,
        answer,
    }))
}

/// POST /api/ai_suggestions
pub async fn ai_suggestions(
    State(state): State<AppState>,
    Json(payload): Json<SuggestionsRequest>,
) -> ApiResult<Json<SuggestionsResponse>> {
    // Every recommendation costs one availability lookup
    if !db::settings::check_api_usage_limit(&state.db, payload.suggestion_count).await? {
        return Err(ApiError::BudgetExhausted(
            "API usage limit reached. Please try again next month or reduce the \
             suggestion count."
                .to_string(),
        ));
    }

    let all_movies = db::movies::list_movies(&state.db).await?;

    let genre_source: Vec<&Movie> = if payload.selection_mode == "rated" {
        all_movies.iter().filter(|m| m.rating > 0.0).collect()
    } else {
        all_movies.iter().collect()
    };
    let genre_source: Vec<Movie> = genre_source.into_iter().cloned().collect();

    let mut genre_ratings: Vec<(String, f64)> =
        stats::genre_ratings(&genre_source).into_iter().collect();
    genre_ratings.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let favorites = if payload.favorites.is_empty() {
        stats::favorite_titles(&all_movies, 10)
    } else {
        payload.favorites
    };

    let watched: Vec<String> = all_movies.iter().map(|m| m.title.clone()).collect();

    let prompt = formulate_suggestion_prompt(&SuggestionPrompt {
        content_type: &payload.content_type,
        count: payload.suggestion_count,
        description: &payload.description,
        genre_ratings: &genre_ratings,
        favorites: &favorites,
        watched: &watched,
    });

    let settings = db::settings::all_settings(&state.db).await?;
    let provider = ai::provider_from_settings(&settings)?;
    let ai_response = provider.complete(&prompt).await?;

    let titles = extract_recommendations(&ai_response);
    info!(count = titles.len(), "Extracted AI recommendations");

    let api_key = settings
        .get("streaming_api_key")
        .cloned()
        .unwrap_or_default();

    let mut recommendations = Vec::new();
    for title in titles {
        match state
            .streaming
            .lookup_movie(&state.db, &api_key, &title, DEFAULT_COUNTRY)
            .await
        {
            Ok(movie) => recommendations.push(movie),
            Err(e) => warn!(%title, "Skipping recommendation without lookup data: {}", e),
        }
    }

    Ok(Json(SuggestionsResponse {
        success: true,
        recommendations,
        favorites,
        prompt,
        ai_response,
    }))
}

/// POST /api/music_suggestions
pub async fn music_suggestions(
    State(state): State<AppState>,
    Json(payload): Json<MusicSuggestionsRequest>,
) -> ApiResult<Json<MusicSuggestionsResponse>> {
    let tracks = db::tracks::list_tracks(&state.db).await?;

    // Genre set and artist frequency drive the prompt
    let mut genres: Vec<String> = Vec::new();
    let mut artist_counts: HashMap<String, usize> = HashMap::new();
    for track in &tracks {
        if let Some(genre) = &track.genre {
            for part in genre.split(',') {
                let part = part.trim();
                if !part.is_empty() && !genres.iter().any(|g| g == part) {
                    genres.push(part.to_string());
                }
            }
        }
        if let Some(artist) = &track.artist {
            *artist_counts.entry(artist.clone()).or_insert(0) += 1;
        }
    }
    let mut top_artists: Vec<(String, usize)> = artist_counts.into_iter().collect();
    top_artists.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_artists.truncate(10);

    let prompt = formulate_music_prompt(&MusicPrompt {
        count: payload.suggestion_count,
        description: &payload.description,
        genres: &genres,
        top_artists: &top_artists,
    });

    let settings = db::settings::all_settings(&state.db).await?;
    let provider = ai::provider_from_settings(&settings)?;
    let ai_response = provider.complete(&prompt).await?;

    let recommendations = extract_recommendations(&ai_response)
        .into_iter()
        .map(|entry| track_from_recommendation(&entry))
        .collect();

    Ok(Json(MusicSuggestionsResponse {
        success: true,
        recommendations,
        prompt,
        ai_response,
    }))
}

/// Split an "Artist - Track" reply entry into a bare track
fn track_from_recommendation(entry: &str) -> Track {
    let (artist, name) = match entry.split_once(" - ") {
        Some((artist, name)) => (Some(artist.trim().to_string()), name.trim().to_string()),
        None => (None, entry.trim().to_string()),
    };
    Track {
        id: Uuid::new_v4(),
        name,
        artist,
        album: None,
        genre: None,
        rating: 0.0,
        popularity: None,
        spotify_link: None,
        image: None,
        notes: None,
        source: Some("ai_suggestion".to_string()),
        created_at: None,
        updated_at: None,
    }
}

/// Build AI routes
pub fn ai_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ask_ai", post(ask_ai))
        .route("/api/ai_suggestions", post(ai_suggestions))
        .route("/api/music_suggestions", post(music_suggestions))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_artist_and_track() {
        let track = track_from_recommendation("Radiohead - Weird Fishes");
        assert_eq!(track.name, "Weird Fishes");
        assert_eq!(track.artist.as_deref(), Some("Radiohead"));
        assert_eq!(track.source.as_deref(), Some("ai_suggestion"));
    }

    #[test]
    fn bare_entry_becomes_track_name() {
        let track = track_from_recommendation("Weird Fishes");
        assert_eq!(track.name, "Weird Fishes");
        assert!(track.artist.is_none());
    }
}
