//! Filter/search engine
//!
//! Given the full collection and the current filter values, produces an
//! ordered deterministic subset. Input order is preserved; every predicate
//! is conjunctive.

use omnibase_common::models::{Game, Movie, TitleKind, Track};
use serde::Deserialize;

/// A single rating facet value: either the `notRated` sentinel or a
/// minimum-inclusive threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingFilter {
    /// Keep only items with no rating at all
    NotRated,
    /// Keep items rated at or above the threshold
    Min(f64),
}

impl RatingFilter {
    /// Parse a raw facet value. Empty strings mean "no filter";
    /// unparseable numbers are treated the same way.
    pub fn parse(raw: &str) -> Option<RatingFilter> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if raw == "notRated" {
            return Some(RatingFilter::NotRated);
        }
        raw.parse::<f64>().ok().map(RatingFilter::Min)
    }
}

/// View-type facet: collection-level subsetting inside a mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewType {
    #[default]
    All,
    /// Movies mode: movies only
    Movie,
    /// Movies mode: series only
    Series,
    /// Games mode: PC platforms
    Pc,
    /// Games mode: console platforms
    Console,
}

impl ViewType {
    pub fn parse(raw: &str) -> ViewType {
        match raw.trim().to_lowercase().as_str() {
            "movie" => ViewType::Movie,
            "series" => ViewType::Series,
            "pc" => ViewType::Pc,
            "console" => ViewType::Console,
            _ => ViewType::All,
        }
    }
}

/// Current filter values, derived per request and never persisted
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Filters {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Raw facet value: "notRated" or a minimum threshold
    #[serde(default)]
    pub user_rating: Option<String>,
    /// Raw facet value for the external rating (IMDB / RAWG / popularity)
    #[serde(default)]
    pub external_rating: Option<String>,
    #[serde(default)]
    pub view: Option<String>,
}

impl Filters {
    pub fn search_term(&self) -> &str {
        self.search.as_deref().unwrap_or("").trim()
    }

    pub fn user_rating_filter(&self) -> Option<RatingFilter> {
        self.user_rating.as_deref().and_then(RatingFilter::parse)
    }

    pub fn external_rating_filter(&self) -> Option<RatingFilter> {
        self.external_rating
            .as_deref()
            .and_then(RatingFilter::parse)
    }

    pub fn view_type(&self) -> ViewType {
        self.view.as_deref().map(ViewType::parse).unwrap_or_default()
    }
}

/// Items the filter engine can run over
pub trait Filterable {
    fn title(&self) -> &str;
    /// Comma-separated free-text genre list
    fn genre(&self) -> Option<&str>;
    fn year(&self) -> Option<i32>;
    /// User rating; 0 = not rated
    fn user_rating(&self) -> f64;
    /// External rating (IMDB, RAWG, popularity); None = not rated there
    fn external_rating(&self) -> Option<f64>;
    fn platforms(&self) -> &[String] {
        &[]
    }
    /// Whether the item belongs to the given view-type subset
    fn matches_view(&self, view: ViewType) -> bool;
}

impl Filterable for Movie {
    fn title(&self) -> &str {
        &self.title
    }
    fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }
    fn year(&self) -> Option<i32> {
        self.year
    }
    fn user_rating(&self) -> f64 {
        self.rating
    }
    fn external_rating(&self) -> Option<f64> {
        self.imdb_rating
    }
    fn matches_view(&self, view: ViewType) -> bool {
        match view {
            ViewType::All => true,
            ViewType::Movie => self.kind == TitleKind::Movie,
            ViewType::Series => self.kind == TitleKind::Series,
            // PC/Console views don't apply to movies
            _ => true,
        }
    }
}

impl Filterable for Game {
    fn title(&self) -> &str {
        &self.title
    }
    fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }
    fn year(&self) -> Option<i32> {
        self.release_year()
    }
    fn user_rating(&self) -> f64 {
        self.rating
    }
    fn external_rating(&self) -> Option<f64> {
        // RAWG reports 0.0 for unrated games
        (self.rawg_rating > 0.0).then_some(self.rawg_rating)
    }
    fn platforms(&self) -> &[String] {
        &self.platforms
    }
    fn matches_view(&self, view: ViewType) -> bool {
        match view {
            ViewType::All => true,
            // Substring heuristics, no canonical platform taxonomy. A title
            // tagged both PC and Xbox appears in both views.
            ViewType::Pc => self.platforms.iter().any(|p| is_pc_platform(p)),
            ViewType::Console => self.platforms.iter().any(|p| is_console_platform(p)),
            _ => true,
        }
    }
}

impl Filterable for Track {
    fn title(&self) -> &str {
        &self.name
    }
    fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }
    fn year(&self) -> Option<i32> {
        None
    }
    fn user_rating(&self) -> f64 {
        self.rating
    }
    fn external_rating(&self) -> Option<f64> {
        self.popularity
    }
    fn matches_view(&self, _view: ViewType) -> bool {
        true
    }
}

/// PC platform classifier ("pc", "windows")
fn is_pc_platform(platform: &str) -> bool {
    let p = platform.to_lowercase();
    p.contains("pc") || p.contains("windows")
}

/// Console platform classifier ("playstation", "xbox", "nintendo", "switch")
fn is_console_platform(platform: &str) -> bool {
    let p = platform.to_lowercase();
    p.contains("playstation") || p.contains("xbox") || p.contains("nintendo") || p.contains("switch")
}

/// Apply all filter predicates, preserving input order
pub fn apply<'a, T: Filterable>(items: &'a [T], filters: &Filters) -> Vec<&'a T> {
    let search = filters.search_term().to_lowercase();
    let genre = filters
        .genre
        .as_deref()
        .map(|g| g.trim().to_lowercase())
        .filter(|g| !g.is_empty());
    let platform = filters
        .platform
        .as_deref()
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty());
    let user_rating = filters.user_rating_filter();
    let external_rating = filters.external_rating_filter();
    let view = filters.view_type();

    items
        .iter()
        .filter(|item| {
            if !item.matches_view(view) {
                return false;
            }
            if !search.is_empty() && !item.title().to_lowercase().contains(&search) {
                return false;
            }
            if let Some(ref genre) = genre {
                match item.genre() {
                    Some(g) if g.to_lowercase().contains(genre.as_str()) => {}
                    _ => return false,
                }
            }
            if let Some(ref platform) = platform {
                if !item
                    .platforms()
                    .iter()
                    .any(|p| p.to_lowercase().contains(platform.as_str()))
                {
                    return false;
                }
            }
            if let Some(year) = filters.year {
                if item.year() != Some(year) {
                    return false;
                }
            }
            match user_rating {
                Some(RatingFilter::NotRated) if item.user_rating() > 0.0 => return false,
                Some(RatingFilter::Min(min)) if item.user_rating() < min => return false,
                _ => {}
            }
            match external_rating {
                Some(RatingFilter::NotRated) if item.external_rating().is_some() => return false,
                Some(RatingFilter::Min(min)) => match item.external_rating() {
                    Some(ext) if ext >= min => {}
                    _ => return false,
                },
                _ => {}
            }
            true
        })
        .collect()
}

/// Distinct genres across the collection, sorted, for facet dropdowns
pub fn genre_options<T: Filterable>(items: &[T]) -> Vec<String> {
    let mut genres: Vec<String> = items
        .iter()
        .filter_map(|i| i.genre())
        .flat_map(|g| g.split(','))
        .map(|g| g.trim().to_string())
        .filter(|g| !g.is_empty())
        .collect();
    genres.sort();
    genres.dedup();
    genres
}

/// Distinct years across the collection, newest first
pub fn year_options<T: Filterable>(items: &[T]) -> Vec<i32> {
    let mut years: Vec<i32> = items.iter().filter_map(|i| i.year()).collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}
