//! Collection statistics endpoint
//!
//! Serves the aggregated numbers the stats page charts are built from.

use crate::collection::stats::{self, CollectionStats, Favorite};
use crate::collection::Mode;
use crate::{db, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const FAVORITES_LIMIT: usize = 10;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    #[serde(default)]
    pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub mode: String,
    #[serde(flatten)]
    pub stats: CollectionStats,
    /// Genre frequency normalized to a 0-5 rating
    pub genre_ratings: HashMap<String, f64>,
    pub favorites: Vec<Favorite>,
}

/// GET /api/stats?mode=
pub async fn collection_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<StatsResponse>> {
    let mode = Mode::parse_or_default(query.mode.as_deref().unwrap_or_default());

    let response = match mode {
        Mode::Movies => {
            let items = db::movies::list_movies(&state.db).await?;
            aggregate(mode, &items)
        }
        Mode::Games => {
            let items = db::games::list_games(&state.db).await?;
            aggregate(mode, &items)
        }
        Mode::Music => {
            let items = db::tracks::list_tracks(&state.db).await?;
            aggregate(mode, &items)
        }
    };

    Ok(Json(response))
}

fn aggregate<T: crate::collection::Filterable>(mode: Mode, items: &[T]) -> StatsResponse {
    StatsResponse {
        mode: mode.as_str().to_string(),
        stats: stats::collection_stats(items),
        genre_ratings: stats::genre_ratings(items),
        favorites: stats::favorite_titles(items, FAVORITES_LIMIT),
    }
}

/// Build stats routes
pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/api/stats", get(collection_stats))
}
