//! Settings, API usage and translations endpoints

use crate::{db, ApiResult, AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::info;

/// Masked stand-in returned for stored key material
const MASKED: &str = "********";

#[derive(Debug, Serialize)]
pub struct SaveSettingsResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiUsageResponse {
    pub usage_count: u32,
    pub limit: u32,
    pub percentage: f64,
}

/// GET /api/settings
///
/// API keys are masked; clients display the mask and post it back
/// unchanged, which the merge below then ignores.
pub async fn get_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<HashMap<String, String>>> {
    let mut settings = db::settings::all_settings(&state.db).await?;
    for key in db::settings::SECRET_KEYS {
        if settings.get(key).is_some_and(|v| !v.is_empty()) {
            settings.insert(key.to_string(), MASKED.to_string());
        }
    }
    Ok(Json(settings))
}

/// POST /api/settings
///
/// Merges into the stored settings; empty values and the mask are
/// left untouched so a partial form post cannot clear a key.
pub async fn save_settings(
    State(state): State<AppState>,
    Json(payload): Json<HashMap<String, Value>>,
) -> ApiResult<Json<SaveSettingsResponse>> {
    for (key, value) in payload {
        let value = match value {
            Value::String(s) => s,
            other => other.to_string(),
        };
        if value.is_empty() || value == MASKED {
            continue;
        }
        db::settings::set_setting(&state.db, &key, &value).await?;
    }
    info!("Settings updated");

    Ok(Json(SaveSettingsResponse {
        success: true,
        message: "Settings saved successfully".to_string(),
    }))
}

/// GET /api/api_usage
pub async fn api_usage(State(state): State<AppState>) -> ApiResult<Json<ApiUsageResponse>> {
    let usage_count = db::settings::get_api_usage(&state.db).await?;
    let limit = db::settings::API_USAGE_LIMIT;
    Ok(Json(ApiUsageResponse {
        usage_count,
        limit,
        percentage: (usage_count as f64 / limit as f64) * 100.0,
    }))
}

/// GET /api/translations
///
/// Serves the translation table from the root folder; an absent or
/// unreadable file yields an empty object.
pub async fn translations(State(state): State<AppState>) -> Json<Value> {
    let path = omnibase_common::config::translations_path(&state.root_folder);
    let table = tokio::fs::read_to_string(&path)
        .await
        .ok()
        .and_then(|text| serde_json::from_str(&text).ok())
        .unwrap_or_else(|| Value::Object(Default::default()));
    Json(table)
}

/// Build settings routes
pub fn settings_routes() -> Router<AppState> {
    Router::new()
        .route("/api/settings", get(get_settings).post(save_settings))
        .route("/api/api_usage", get(api_usage))
        .route("/api/translations", get(translations))
}
