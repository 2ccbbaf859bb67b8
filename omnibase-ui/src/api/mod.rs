//! HTTP API handlers for omnibase-ui

pub mod ai;
pub mod games;
pub mod health;
pub mod import;
pub mod movies;
pub mod music;
pub mod settings;
pub mod stats;
pub mod ui;

pub use ai::ai_routes;
pub use games::game_routes;
pub use health::health_routes;
pub use import::import_routes;
pub use movies::movie_routes;
pub use music::music_routes;
pub use settings::settings_routes;
pub use stats::stats_routes;
pub use ui::ui_routes;
