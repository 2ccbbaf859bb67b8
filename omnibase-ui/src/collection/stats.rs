//! Client-side chart aggregation, moved server-side
//!
//! Pure aggregation over the collection: genre counts, frequency-derived
//! genre ratings, rating distribution, and the favorites list feeding the
//! AI suggestion prompt.

use crate::collection::filter::Filterable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection statistics for the stats page and charts
#[derive(Debug, Clone, Serialize)]
pub struct CollectionStats {
    pub total: usize,
    pub rated: usize,
    pub not_rated: usize,
    /// Rounded whole-number percentage of unrated items
    pub not_rated_percentage: u32,
    /// Mean over rated items only, 0.0 when nothing is rated
    pub average_rating: f64,
    /// Genre -> number of titles, for the genre chart
    pub genre_counts: HashMap<String, usize>,
}

/// A favorite entry for the AI suggestion prompt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    pub title: String,
    #[serde(default)]
    pub rating: f64,
}

/// Aggregate collection statistics
pub fn collection_stats<T: Filterable>(items: &[T]) -> CollectionStats {
    let total = items.len();
    let rated = items.iter().filter(|i| i.user_rating() > 0.0).count();
    let not_rated = total - rated;

    let average_rating = if rated > 0 {
        let sum: f64 = items
            .iter()
            .map(Filterable::user_rating)
            .filter(|r| *r > 0.0)
            .sum();
        sum / rated as f64
    } else {
        0.0
    };

    let not_rated_percentage = if total > 0 {
        ((not_rated as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    CollectionStats {
        total,
        rated,
        not_rated,
        not_rated_percentage,
        average_rating,
        genre_counts: genre_counts(items),
    }
}

/// Count titles per genre across the comma-joined genre fields
pub fn genre_counts<T: Filterable>(items: &[T]) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for item in items {
        if let Some(genre) = item.genre() {
            for g in genre.split(',') {
                let g = g.trim();
                if !g.is_empty() {
                    *counts.entry(g.to_string()).or_insert(0) += 1;
                }
            }
        }
    }
    counts
}

/// Rate genres by entry frequency, normalized linearly to a 0-5 scale with
/// one decimal place. The most frequent genre always scores 5.0.
pub fn genre_ratings<T: Filterable>(items: &[T]) -> HashMap<String, f64> {
    let counts = genre_counts(items);
    let max_count = counts.values().copied().max().unwrap_or(0);
    if max_count == 0 {
        return HashMap::new();
    }
    counts
        .into_iter()
        .map(|(genre, count)| {
            let rating = (count as f64 / max_count as f64 * 5.0 * 10.0).round() / 10.0;
            (genre, rating)
        })
        .collect()
}

/// Top rated titles, rating descending, at most `limit` entries.
/// Ties keep collection order (stable sort).
pub fn favorite_titles<T: Filterable>(items: &[T], limit: usize) -> Vec<Favorite> {
    let mut rated: Vec<&T> = items.iter().filter(|i| i.user_rating() > 0.0).collect();
    rated.sort_by(|a, b| {
        b.user_rating()
            .partial_cmp(&a.user_rating())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rated
        .into_iter()
        .take(limit)
        .map(|i| Favorite {
            title: i.title().to_string(),
            rating: i.user_rating(),
        })
        .collect()
}
