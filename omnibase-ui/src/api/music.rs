//! Music collection endpoints

use crate::collection::filter::{self, Filters};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use omnibase_common::models::Track;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct AddTrackResponse {
    pub success: bool,
    pub track: Track,
}

/// GET /api/tracks
pub async fn list_tracks(
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> ApiResult<Json<Vec<Track>>> {
    let tracks = db::tracks::list_tracks(&state.db).await?;
    let filtered = filter::apply(&tracks, &filters);
    Ok(Json(filtered.into_iter().cloned().collect()))
}

/// POST /api/tracks
pub async fn create_track(
    State(state): State<AppState>,
    Json(mut track): Json<Track>,
) -> ApiResult<(axum::http::StatusCode, Json<Track>)> {
    if track.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Track name is required".to_string()));
    }
    track.id = Uuid::new_v4();
    db::tracks::insert_track(&state.db, &track).await?;
    info!(name = %track.name, "Added track");

    let stored = db::tracks::get_track(&state.db, track.id)
        .await?
        .unwrap_or(track);
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// POST /api/add_track
///
/// Adds a track, skipping name/artist pairs that are already present.
pub async fn add_track(
    State(state): State<AppState>,
    Json(mut track): Json<Track>,
) -> ApiResult<Json<AddTrackResponse>> {
    if track.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Track name is required".to_string()));
    }
    if db::tracks::track_exists(&state.db, &track.name, track.artist.as_deref()).await? {
        return Err(ApiError::BadRequest(format!(
            "Track already in collection: {}",
            track.name
        )));
    }

    track.id = Uuid::new_v4();
    db::tracks::insert_track(&state.db, &track).await?;
    info!(name = %track.name, "Added track from search");

    let stored = db::tracks::get_track(&state.db, track.id)
        .await?
        .unwrap_or(track);
    Ok(Json(AddTrackResponse {
        success: true,
        track: stored,
    }))
}

/// PUT /api/tracks/:id
pub async fn update_track(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut track): Json<Track>,
) -> ApiResult<Json<Track>> {
    track.id = id;
    if !db::tracks::update_track(&state.db, &track).await? {
        return Err(ApiError::NotFound(format!("Track not found: {}", id)));
    }
    let updated = db::tracks::get_track(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Track not found: {}", id)))?;
    Ok(Json(updated))
}

/// DELETE /api/tracks/:id
pub async fn delete_track(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Track>> {
    let deleted = db::tracks::delete_track(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Track not found: {}", id)))?;
    info!(name = %deleted.name, "Deleted track");
    Ok(Json(deleted))
}

/// Build music routes
pub fn music_routes() -> Router<AppState> {
    Router::new()
        .route("/api/tracks", get(list_tracks).post(create_track))
        .route("/api/tracks/:id", put(update_track).delete(delete_track))
        .route("/api/add_track", post(add_track))
}
