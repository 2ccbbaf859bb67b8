//! CSV importers
//!
//! Netflix viewing-history analysis plus the plain one-row-per-item game and
//! music importers. Parsing is pure over the uploaded bytes; the API layer
//! handles persistence and duplicate skipping.

pub mod games;
pub mod music;
pub mod netflix;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    /// CSV could not be parsed at all
    #[error("Invalid CSV file: {0}")]
    InvalidCsv(String),

    /// CSV parsed but a required column is absent
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::InvalidCsv(e.to_string())
    }
}

/// Outcome counters reported by all import endpoints
#[derive(Debug, Default, Clone, Copy, Serialize)]
pub struct ImportSummary {
    pub imported: u32,
    pub skipped: u32,
}
