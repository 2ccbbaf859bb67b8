//! omnibase-ui library - media collection web service
//!
//! Serves the collection REST API, the server-rendered pages, the CSV
//! importers and the external lookup clients over a shared SQLite pool.

pub mod api;
pub mod clients;
pub mod collection;
pub mod db;
pub mod error;
pub mod import;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use clients::{rawg::RawgClient, streaming::StreamingClient};
use collection::router::TracingHooks;
use collection::{Mode, SectionRouter};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Root folder holding the database and translation files
    pub root_folder: PathBuf,
    /// Streaming availability client
    pub streaming: Arc<StreamingClient>,
    /// RAWG game search client
    pub rawg: Arc<RawgClient>,
    /// Section navigation state, shared across page loads
    pub sections: Arc<RwLock<SectionRouter>>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, root_folder: PathBuf) -> Self {
        let mut sections = SectionRouter::new(Mode::Movies);
        for mode in Mode::ALL {
            sections.register_hooks(mode, Arc::new(TracingHooks::new(mode)));
        }
        Self {
            db,
            root_folder,
            streaming: Arc::new(StreamingClient::new()),
            rawg: Arc::new(RawgClient::new()),
            sections: Arc::new(RwLock::new(sections)),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::movie_routes())
        .merge(api::game_routes())
        .merge(api::music_routes())
        .merge(api::import_routes())
        .merge(api::settings_routes())
        .merge(api::stats_routes())
        .merge(api::ai_routes())
        .merge(api::health_routes())
        .merge(api::ui_routes())
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state)
}
