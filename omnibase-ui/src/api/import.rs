//! CSV import endpoints
//!
//! All three importers take a multipart upload with a single `file` field.
//! The Netflix importer additionally enriches every new title through the
//! availability client when the monthly budget allows it.

use crate::import::{games, music, netflix, ImportSummary};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Multipart, State},
    routing::post,
    Json, Router,
};
use omnibase_common::models::{Movie, TitleKind};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct NetflixImportResponse {
    pub success: bool,
    pub imported: u32,
    pub skipped: u32,
    pub movies: Vec<String>,
    pub series: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub imported: u32,
    pub skipped: u32,
}

impl From<ImportSummary> for ImportResponse {
    fn from(summary: ImportSummary) -> Self {
        Self {
            success: true,
            imported: summary.imported,
            skipped: summary.skipped,
        }
    }
}

/// Pull the `file` field out of a multipart upload
async fn read_upload(multipart: &mut Multipart) -> ApiResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Invalid upload: {}", e)))?;
            if bytes.is_empty() {
                return Err(ApiError::BadRequest("No file selected".to_string()));
            }
            return Ok(bytes.to_vec());
        }
    }
    Err(ApiError::BadRequest("No file provided".to_string()))
}

/// POST /api/import/netflix
pub async fn import_netflix(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<NetflixImportResponse>> {
    let bytes = read_upload(&mut multipart).await?;
    let analysis = netflix::analyze_history(&bytes)?;

    // Every new title costs one availability lookup
    if !db::settings::check_api_usage_limit(&state.db, analysis.lookup_count()).await? {
        return Err(ApiError::BudgetExhausted(
            "API usage limit reached. Please try again next month or use manual entry."
                .to_string(),
        ));
    }

    let api_key = db::settings::get_setting(&state.db, "streaming_api_key")
        .await?
        .unwrap_or_default();

    let mut imported = 0u32;
    let mut skipped = 0u32;

    for title in &analysis.movies {
        if db::movies::title_exists(&state.db, title).await? {
            skipped += 1;
            continue;
        }
        let movie = enriched_or_basic(&state, &api_key, title, title, TitleKind::Movie).await;
        db::movies::insert_movie(&state.db, &movie).await?;
        imported += 1;
    }

    for label in &analysis.series {
        if db::movies::title_exists(&state.db, label).await? {
            skipped += 1;
            continue;
        }
        // Look up by the bare series name, keep the season label as title
        let lookup = netflix::clean_series_title(label);
        let movie = enriched_or_basic(&state, &api_key, label, lookup, TitleKind::Series).await;
        db::movies::insert_movie(&state.db, &movie).await?;
        imported += 1;
    }

    info!(imported, skipped, "Netflix history import finished");
    Ok(Json(NetflixImportResponse {
        success: true,
        imported,
        skipped,
        movies: analysis.movies,
        series: analysis.series,
    }))
}

/// Availability-enriched entry, or a bare one when the lookup fails
async fn enriched_or_basic(
    state: &AppState,
    api_key: &str,
    title: &str,
    lookup_title: &str,
    kind: TitleKind,
) -> Movie {
    let base = Movie {
        id: Uuid::new_v4(),
        title: title.to_string(),
        kind,
        year: None,
        director: None,
        genre: None,
        rating: 0.0,
        imdb_rating: None,
        poster: None,
        imdb_id: None,
        tmdb_id: None,
        streaming_info: Value::Object(Default::default()),
        notes: None,
        source: Some("netflix_import".to_string()),
        created_at: None,
        updated_at: None,
    };

    match state
        .streaming
        .lookup_movie(&state.db, api_key, lookup_title, crate::clients::streaming::DEFAULT_COUNTRY)
        .await
    {
        Ok(mut movie) => {
            movie.id = base.id;
            movie.title = base.title;
            movie.kind = kind;
            movie.rating = 0.0;
            movie.source = base.source;
            movie
        }
        Err(e) => {
            warn!(title, "Import lookup failed, storing basic entry: {}", e);
            base
        }
    }
}

/// POST /api/import/games
pub async fn import_games(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResponse>> {
    let bytes = read_upload(&mut multipart).await?;
    let parsed = games::parse_games_csv(&bytes)?;

    let mut summary = ImportSummary::default();
    for game in parsed {
        if db::games::title_exists(&state.db, &game.title).await? {
            summary.skipped += 1;
            continue;
        }
        db::games::insert_game(&state.db, &game).await?;
        summary.imported += 1;
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Game CSV import finished"
    );
    Ok(Json(summary.into()))
}

/// POST /api/import/music
pub async fn import_music(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportResponse>> {
    let bytes = read_upload(&mut multipart).await?;
    let parsed = music::parse_music_csv(&bytes)?;

    let mut summary = ImportSummary::default();
    for track in parsed {
        if db::tracks::track_exists(&state.db, &track.name, track.artist.as_deref()).await? {
            summary.skipped += 1;
            continue;
        }
        db::tracks::insert_track(&state.db, &track).await?;
        summary.imported += 1;
    }

    info!(
        imported = summary.imported,
        skipped = summary.skipped,
        "Music CSV import finished"
    );
    Ok(Json(summary.into()))
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/api/import/netflix", post(import_netflix))
        .route("/api/import/games", post(import_games))
        .route("/api/import/music", post(import_music))
}
