//! Server-rendered pages and UI state endpoints
//!
//! The index page restores the persisted mode and last shown section; the
//! state endpoints drive the section router and the per-mode view cursor,
//! persisting both so a reload lands where the user left off.

use crate::collection::{filter, Mode, SectionRouter, ViewIndex};
use crate::{db, ApiError, ApiResult, AppState};
use axum::{
    extract::{Query, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct ShowSectionRequest {
    pub section: String,
}

#[derive(Debug, Serialize)]
pub struct ShowSectionResponse {
    /// Logical section name
    pub section: String,
    /// Concrete id to show under the active mode
    pub shown: String,
    /// Concrete ids to hide
    pub hidden: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetModeRequest {
    pub mode: String,
}

#[derive(Debug, Serialize)]
pub struct SetModeResponse {
    pub mode: String,
    /// Concrete id of the restored section under the new mode
    pub shown: String,
}

#[derive(Debug, Deserialize)]
pub struct ViewEventRequest {
    pub mode: String,
    /// One of: filters_changed, rating_saved, item_deleted, next, prev
    pub event: String,
    #[serde(default)]
    pub filtered_len: usize,
}

#[derive(Debug, Serialize)]
pub struct ViewEventResponse {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct FilterOptionsQuery {
    #[serde(default)]
    pub mode: String,
}

/// Facet values for the filter dropdowns
#[derive(Debug, Serialize)]
pub struct FilterOptionsResponse {
    pub genres: Vec<String>,
    pub years: Vec<i32>,
}

async fn load_view_index(state: &AppState, mode: Mode) -> ApiResult<ViewIndex> {
    let key = format!("view_index_{}", mode);
    let value = db::settings::get_setting(&state.db, &key).await?;
    Ok(ViewIndex(
        value.and_then(|v| v.parse().ok()).unwrap_or(0),
    ))
}

async fn store_view_index(state: &AppState, mode: Mode, index: ViewIndex) -> ApiResult<()> {
    let key = format!("view_index_{}", mode);
    db::settings::set_setting(&state.db, &key, &index.0.to_string()).await?;
    Ok(())
}

/// Restore the persisted mode into the shared router
async fn restore_mode(state: &AppState, router: &mut SectionRouter) -> ApiResult<Mode> {
    let stored = db::settings::get_setting(&state.db, "mode")
        .await?
        .unwrap_or_default();
    let mode = Mode::parse_or_default(&stored);
    if router.mode() != mode {
        router.set_mode(mode);
    }
    Ok(mode)
}

/// POST /api/ui/section
pub async fn show_section(
    State(state): State<AppState>,
    Json(payload): Json<ShowSectionRequest>,
) -> ApiResult<Json<ShowSectionResponse>> {
    let mut router = state.sections.write().await;
    restore_mode(&state, &mut router).await?;
    let transition = router.show(&payload.section);
    drop(router);

    if let Some(name) = transition.persist {
        db::settings::set_setting(&state.db, "last_section", name).await?;
    }
    debug!(section = %transition.shown, "Section shown");

    Ok(Json(ShowSectionResponse {
        section: transition.section.logical_id().to_string(),
        shown: transition.shown,
        hidden: transition.hidden,
    }))
}

/// POST /api/ui/mode
pub async fn set_mode(
    State(state): State<AppState>,
    Json(payload): Json<SetModeRequest>,
) -> ApiResult<Json<SetModeResponse>> {
    let mode = Mode::parse_or_default(&payload.mode);
    db::settings::set_setting(&state.db, "mode", mode.as_str()).await?;

    let last_section = db::settings::get_setting(&state.db, "last_section")
        .await?
        .unwrap_or_default();

    let mut router = state.sections.write().await;
    router.set_mode(mode);
    let transition = router.show(&last_section);

    Ok(Json(SetModeResponse {
        mode: mode.as_str().to_string(),
        shown: transition.shown,
    }))
}

/// POST /api/ui/view_event
pub async fn view_event(
    State(state): State<AppState>,
    Json(payload): Json<ViewEventRequest>,
) -> ApiResult<Json<ViewEventResponse>> {
    let mode = Mode::parse_or_default(&payload.mode);
    let current = load_view_index(&state, mode).await?;

    let next = match payload.event.as_str() {
        "filters_changed" => current.filters_changed(),
        "rating_saved" => current.rating_saved(payload.filtered_len),
        "item_deleted" => current.item_deleted(payload.filtered_len),
        "next" => current.next(payload.filtered_len),
        "prev" => current.prev(payload.filtered_len),
        other => {
            return Err(ApiError::BadRequest(format!(
                "Unknown view event: {}",
                other
            )))
        }
    };

    store_view_index(&state, mode, next).await?;
    Ok(Json(ViewEventResponse { index: next.0 }))
}

/// GET /api/filter_options
///
/// Distinct genres and years of the active mode's collection, for the
/// filter dropdowns.
pub async fn filter_options(
    State(state): State<AppState>,
    Query(query): Query<FilterOptionsQuery>,
) -> ApiResult<Json<FilterOptionsResponse>> {
    let mode = Mode::parse_or_default(&query.mode);
    let (genres, years) = match mode {
        Mode::Movies => {
            let items = db::movies::list_movies(&state.db).await?;
            (filter::genre_options(&items), filter::year_options(&items))
        }
        Mode::Games => {
            let items = db::games::list_games(&state.db).await?;
            (filter::genre_options(&items), filter::year_options(&items))
        }
        Mode::Music => {
            let items = db::tracks::list_tracks(&state.db).await?;
            (filter::genre_options(&items), filter::year_options(&items))
        }
    };
    Ok(Json(FilterOptionsResponse { genres, years }))
}

/// GET /
///
/// Landing page: restores mode and last section, links the section pages.
pub async fn index_page(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let settings = db::settings::all_settings(&state.db).await?;
    let mode = Mode::parse_or_default(settings.get("mode").map(String::as_str).unwrap_or(""));
    let last_section = settings
        .get("last_section")
        .cloned()
        .unwrap_or_else(|| "collectionSection".to_string());

    let mut router = state.sections.write().await;
    router.set_mode(mode);
    let transition = router.show(&last_section);
    drop(router);

    let movie_count = db::movies::list_movies(&state.db).await?.len();
    let game_count = db::games::list_games(&state.db).await?.len();
    let track_count = db::tracks::list_tracks(&state.db).await?.len();

    let version = env!("CARGO_PKG_VERSION");
    let mode_links = Mode::ALL
        .iter()
        .map(|m| {
            let marker = if *m == mode { " (active)" } else { "" };
            format!(
                r##"<li><a href="#" data-mode="{m}">{m}{marker}</a></li>"##,
                m = m,
                marker = marker
            )
        })
        .collect::<Vec<_>>()
        .join("\n            ");

    Ok(Html(format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>OmniBase</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        .container {{
            padding: 20px;
            max-width: 960px;
            margin: 0 auto;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
        }}
        h1 {{
            font-size: 26px;
            color: #4a9eff;
        }}
        .subtitle {{
            color: #888;
            font-size: 14px;
        }}
        ul {{
            list-style: none;
            margin: 10px 0;
        }}
        a {{
            color: #4a9eff;
            text-decoration: none;
        }}
        .counts {{
            color: #888;
            margin-top: 20px;
        }}
    </style>
</head>
<body>
    <header>
        <h1>OmniBase</h1>
        <div class="subtitle">Media collection tracker v{version}</div>
    </header>
    <div class="container">
        <h2>Mode</h2>
        <ul>
            {mode_links}
        </ul>
        <h2>Active section</h2>
        <p id="{shown}">{shown}</p>
        <div class="counts">
            {movie_count} movies &middot; {game_count} games &middot; {track_count} tracks
        </div>
    </div>
</body>
</html>
"#,
        version = version,
        mode_links = mode_links,
        shown = transition.shown,
        movie_count = movie_count,
        game_count = game_count,
        track_count = track_count,
    )))
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_page))
        .route("/api/filter_options", get(filter_options))
        .route("/api/ui/section", post(show_section))
        .route("/api/ui/mode", post(set_mode))
        .route("/api/ui/view_event", post(view_event))
}
