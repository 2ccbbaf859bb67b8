//! # OmniBase Common Library
//!
//! Shared code for the OmniBase media tracker:
//! - Data models (movies, games, tracks)
//! - Database pool and schema initialization
//! - Configuration loading and root folder resolution
//! - Common error types

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use error::{Error, Result};
pub use models::Mode;
