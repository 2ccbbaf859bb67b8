//! Game collection endpoints
//!
//! CRUD over the games table, RAWG title search, and the structured
//! add-from-search-result endpoint.

use crate::collection::filter::{self, Filters};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use omnibase_common::models::Game;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::movies::TitleQuery;

#[derive(Debug, Serialize)]
pub struct AddGameResponse {
    pub success: bool,
    pub game: Game,
}

/// GET /api/games
pub async fn list_games(
    State(state): State<AppState>,
    Query(filters): Query<Filters>,
) -> ApiResult<Json<Vec<Game>>> {
    let games = db::games::list_games(&state.db).await?;
    let filtered = filter::apply(&games, &filters);
    Ok(Json(filtered.into_iter().cloned().collect()))
}

/// POST /api/games
pub async fn create_game(
    State(state): State<AppState>,
    Json(mut game): Json<Game>,
) -> ApiResult<(axum::http::StatusCode, Json<Game>)> {
    if game.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    game.id = Uuid::new_v4();
    db::games::insert_game(&state.db, &game).await?;
    info!(title = %game.title, "Added game");

    let stored = db::games::get_game(&state.db, game.id).await?.unwrap_or(game);
    Ok((axum::http::StatusCode::CREATED, Json(stored)))
}

/// POST /api/add_game
///
/// Adds a structured search result to the collection, skipping titles
/// that are already present.
pub async fn add_game(
    State(state): State<AppState>,
    Json(mut game): Json<Game>,
) -> ApiResult<Json<AddGameResponse>> {
    if game.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }
    if db::games::title_exists(&state.db, &game.title).await? {
        return Err(ApiError::BadRequest(format!(
            "Game already in collection: {}",
            game.title
        )));
    }

    game.id = Uuid::new_v4();
    db::games::insert_game(&state.db, &game).await?;
    info!(title = %game.title, "Added game from search");

    let stored = db::games::get_game(&state.db, game.id).await?.unwrap_or(game);
    Ok(Json(AddGameResponse {
        success: true,
        game: stored,
    }))
}

/// PUT /api/games/:id
pub async fn update_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(mut game): Json<Game>,
) -> ApiResult<Json<Game>> {
    game.id = id;
    if !db::games::update_game(&state.db, &game).await? {
        return Err(ApiError::NotFound(format!("Game not found: {}", id)));
    }
    let updated = db::games::get_game(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Game not found: {}", id)))?;
    Ok(Json(updated))
}

/// DELETE /api/games/:id
pub async fn delete_game(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Game>> {
    let deleted = db::games::delete_game(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Game not found: {}", id)))?;
    info!(title = %deleted.title, "Deleted game");
    Ok(Json(deleted))
}

/// GET /api/games/search?title=
pub async fn search_games(
    State(state): State<AppState>,
    Query(query): Query<TitleQuery>,
) -> ApiResult<Json<Vec<Game>>> {
    if query.title.trim().is_empty() {
        return Err(ApiError::BadRequest("No title provided".to_string()));
    }

    let api_key = db::settings::get_setting(&state.db, "rawg_api_key")
        .await?
        .unwrap_or_default();

    let games = state.rawg.search_games(&api_key, &query.title).await?;
    Ok(Json(games))
}

/// Build game routes
pub fn game_routes() -> Router<AppState> {
    Router::new()
        .route("/api/games", get(list_games).post(create_game))
        .route("/api/games/search", get(search_games))
        .route("/api/games/:id", put(update_game).delete(delete_game))
        .route("/api/add_game", post(add_game))
}
