//! Movie collection endpoints
//!
//! CRUD over the movies table plus the structured availability lookup.
//! List requests run the filter engine server-side when any filter
//! parameter is present.

use crate::clients::streaming::DEFAULT_COUNTRY;
use crate::clients::ClientError;
use crate::collection::filter::{self, Filters};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Json, Router,
};
use omnibase_common::models::Movie;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Create/update payload: a movie plus the enrichment flag
#[derive(Debug, Deserialize)]
pub struct MovieRequest {
    #[serde(default, rename = "useApi")]
    pub use_api: bool,
    #[serde(flatten)]
    pub movie: Movie,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    #[serde(default)]
    pub title: String,
}

/// GET /api/movies
pub async fn list_movies(
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> ApiResult<Json<Vec<Movie>>> {
    let movies = db::movies::list_movies(&state.db).await?;
    let filtered = filter::apply(&movies, &filters);
    Ok(Json(filtered.into_iter().cloned().collect()))
}

/// POST /api/movies
pub async fn add_movie(
    State(state): State<AppState>,
    Json(payload): Json<MovieRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<Movie>)> {
    let mut movie = payload.movie;
    if movie.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    if payload.use_api {
        enrich_from_api(&state, &mut movie).await;
    }

    movie.id = Uuid::new_v4();
    db::movies::insert_movie(&state.db, &movie).await?;
    info!(title = %movie.title, "Added movie");

    let stored = db::movies::get_movie(&state.db, movie.id)
        .await?
        .unwrap_or(movie);
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// PUT /api/movies/:id
pub async fn update_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovieRequest>,
) -> ApiResult<Json<Movie>> {
    let existing = db::movies::get_movie(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Movie not found: {}", id)))?;

    let mut movie = payload.movie;
    movie.id = id;

    // Re-enrich only when the title actually changed
    if payload.use_api && movie.title != existing.title {
        enrich_from_api(&state, &mut movie).await;
        movie.id = id;
    }

    if !db::movies::update_movie(&state.db, &movie).await? {
        return Err(ApiError::NotFound(format!("Movie not found: {}", id)));
    }

    let updated = db::movies::get_movie(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Movie not found: {}", id)))?;
    Ok(Json(updated))
}

/// DELETE /api/movies/:id
pub async fn delete_movie(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Movie>> {
    let deleted = db::movies::delete_movie(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Movie not found: {}", id)))?;
    info!(title = %deleted.title, "Deleted movie");
    Ok(Json(deleted))
}

/// GET /api/movies/search?title=
pub async fn search_movie(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> ApiResult<Json<Movie>> {
    if query.title.trim().is_empty() {
        return Err(ApiError::BadRequest("No title provided".to_string()));
    }

    let api_key = db::settings::get_setting(&state.db, "streaming_api_key")
        .await?
        .unwrap_or_default();

    let movie = state
        .streaming
        .lookup_movie(&state.db, &api_key, &query.title, DEFAULT_COUNTRY)
        .await
        .map_err(|e| match e {
            ClientError::NoResults => ApiError::NotFound("No results found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(movie))
}

/// Fill empty fields from an availability lookup; user input wins
async fn enrich_from_api(state: &AppState, movie: &mut Movie) {
    let api_key = match db::settings::get_setting(&state.db, "streaming_api_key").await {
        Ok(key) => key.unwrap_or_default(),
        Err(e) => {
            warn!("Could not load API key: {}", e);
            return;
        }
    };

    match state
        .streaming
        .lookup_movie(&state.db, &api_key, &movie.title, DEFAULT_COUNTRY)
        .await
    {
        Ok(api_movie) => merge_api_movie(movie, api_movie),
        Err(e) => warn!(title = %movie.title, "Enrichment skipped: {}", e),
    }
}

fn merge_api_movie(user: &mut Movie, api: Movie) {
    if user.year.is_none() {
        user.year = api.year;
    }
    if user.director.as_deref().unwrap_or("").is_empty() {
        user.director = api.director;
    }
    if user.genre.as_deref().unwrap_or("").is_empty() {
        user.genre = api.genre;
    }
    if user.imdb_rating.is_none() {
        user.imdb_rating = api.imdb_rating;
    }
    if user.poster.as_deref().unwrap_or("").is_empty() {
        user.poster = api.poster;
    }
    if user.imdb_id.is_none() {
        user.imdb_id = api.imdb_id;
    }
    if user.tmdb_id.is_none() {
        user.tmdb_id = api.tmdb_id;
    }
    if user.streaming_info.is_null()
        || user.streaming_info.as_object().is_some_and(|o| o.is_empty())
    {
        user.streaming_info = api.streaming_info;
    }
    if user.notes.as_deref().unwrap_or("").is_empty() {
        user.notes = api.notes;
    }
    if user.source.is_none() {
        user.source = Some("api".to_string());
    }
}

/// Build movie routes
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/api/movies", get(list_movies).post(add_movie))
        .route("/api/movies/search", get(search_movie))
        .route("/api/movies/:id", put(update_movie).delete(delete_movie))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_user_fields() {
        let mut user = Movie {
            id: Uuid::new_v4(),
            title: "The Matrix".into(),
            kind: Default::default(),
            year: Some(1999),
            director: None,
            genre: Some(String::new()),
            rating: 4.5,
            imdb_rating: None,
            poster: None,
            imdb_id: None,
            tmdb_id: None,
            streaming_info: serde_json::Value::Null,
            notes: None,
            source: None,
            created_at: None,
            updated_at: None,
        };
        let api = Movie {
            year: Some(2003),
            director: Some("The Wachowskis".into()),
            genre: Some("Sci-Fi".into()),
            imdb_rating: Some(8.7),
            ..user.clone()
        };

        merge_api_movie(&mut user, api);
        // User-provided year stays, empty fields are filled
        assert_eq!(user.year, Some(1999));
        assert_eq!(user.director.as_deref(), Some("The Wachowskis"));
        assert_eq!(user.genre.as_deref(), Some("Sci-Fi"));
        assert_eq!(user.imdb_rating, Some(8.7));
        assert_eq!(user.rating, 4.5);
        assert_eq!(user.source.as_deref(), Some("api"));
    }
}
