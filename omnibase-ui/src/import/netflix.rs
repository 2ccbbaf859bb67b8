//! Netflix viewing-history analysis
//!
//! Turns the raw `Title` column of a Netflix history export into distinct
//! movie titles and season-grouped series labels. Episodes of one series
//! share the text before the first colon, so titles are grouped by that
//! prefix and each group is classified by its shape.

use super::ImportError;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::OnceLock;

/// Classified history: plain movie titles and `Name (Staffel 1, 2)` labels
#[derive(Debug, Default, PartialEq)]
pub struct HistoryAnalysis {
    pub movies: Vec<String>,
    pub series: Vec<String>,
}

impl HistoryAnalysis {
    /// Titles needing an availability lookup when importing
    pub fn lookup_count(&self) -> u32 {
        (self.movies.len() + self.series.len()) as u32
    }
}

/// Strip the season annotation off a series label for API lookups,
/// `"Dark (Staffel 1, 2)"` -> `"Dark"`
pub fn clean_series_title(label: &str) -> &str {
    match label.find('(') {
        Some(idx) => label[..idx].trim(),
        None => label.trim(),
    }
}

fn season_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:Staffel|Season)\s*(\d+)").unwrap())
}

fn episode_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)S(\d+)E\d+").unwrap())
}

fn folge_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)(?:Folge|Episode|Kapitel)\s*\d+").unwrap())
}

/// Parse a history CSV and classify its titles.
///
/// Only the `Title` column is read, all other columns are ignored.
pub fn analyze_history(csv_bytes: &[u8]) -> Result<HistoryAnalysis, ImportError> {
    let mut reader = csv::Reader::from_reader(csv_bytes);

    let title_idx = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == "Title")
        .ok_or(ImportError::MissingColumn("Title"))?;

    let mut titles = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(title) = record.get(title_idx) {
            let title = title.trim();
            if !title.is_empty() {
                titles.push(title.to_string());
            }
        }
    }

    Ok(classify_titles(&titles))
}

/// Group titles by series prefix and classify each group
pub fn classify_titles(titles: &[String]) -> HistoryAnalysis {
    // Group by the text before the first colon, keeping first-seen order
    let mut group_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&str>> = HashMap::new();
    for title in titles {
        let prefix = match title.split_once(':') {
            Some((prefix, _)) => prefix.trim().to_string(),
            None => title.clone(),
        };
        groups
            .entry(prefix.clone())
            .or_insert_with(|| {
                group_order.push(prefix);
                Vec::new()
            })
            .push(title.as_str());
    }

    let mut series: BTreeMap<String, BTreeSet<u32>> = BTreeMap::new();
    let mut movies: Vec<String> = Vec::new();

    for prefix in &group_order {
        let group = &groups[prefix];
        if is_series_group(group) {
            let mut seasons = extract_seasons(group);
            if seasons.is_empty() {
                seasons.insert(1);
            }
            series.insert(prefix.clone(), seasons);
        } else {
            movies.extend(group.iter().map(|t| t.to_string()));
        }
    }

    // Post-pass: titles sharing a known series prefix, and multi-colon
    // stragglers, belong to a series even when their own group said movie
    for title in titles {
        if series
            .keys()
            .any(|prefix| title.starts_with(&format!("{}:", prefix)))
        {
            movies.retain(|m| m != title);
            continue;
        }
        if title.matches(':').count() >= 2 {
            let prefix = title
                .split_once(':')
                .map(|(p, _)| p.trim().to_string())
                .unwrap_or_else(|| title.clone());
            series.entry(prefix).or_insert_with(|| {
                let mut s = BTreeSet::new();
                s.insert(1);
                s
            });
            movies.retain(|m| m != title);
        }
    }

    movies.sort();
    movies.dedup();

    let series_labels = series
        .into_iter()
        .map(|(name, seasons)| {
            let list = seasons
                .iter()
                .map(u32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} (Staffel {})", name, list)
        })
        .collect();

    HistoryAnalysis {
        movies,
        series: series_labels,
    }
}

fn is_series_group(group: &[&str]) -> bool {
    let has_multiple_colons = group.iter().any(|t| t.matches(':').count() >= 2);
    let has_season = group.iter().any(|t| season_re().is_match(t));
    let has_episode = group.iter().any(|t| episode_re().is_match(t));
    let has_miniserie = group.iter().any(|t| t.to_lowercase().contains("miniserie"));
    let has_folge = group.iter().any(|t| folge_re().is_match(t));
    let has_structure = has_multiple_colons || has_season || has_episode || has_miniserie || has_folge;

    // Three or more entries under one prefix is practically always a series
    if group.len() >= 3 {
        return true;
    }
    if group.len() == 2 && has_structure {
        return true;
    }
    if group.len() == 1 && (has_season || has_episode || has_miniserie || has_folge) {
        return true;
    }
    if has_multiple_colons {
        return true;
    }
    // A pair of distinct, similarly shaped suffixes reads like episode titles
    if group.len() >= 2 && group.iter().all(|t| t.contains(':')) {
        let suffixes: Vec<&str> = group
            .iter()
            .filter_map(|t| t.split_once(':').map(|(_, s)| s.trim()))
            .collect();
        let distinct: BTreeSet<&&str> = suffixes.iter().collect();
        if distinct.len() == suffixes.len() {
            let max = suffixes.iter().map(|s| s.len()).max().unwrap_or(0);
            let min = suffixes.iter().map(|s| s.len()).min().unwrap_or(0);
            if max - min < 20 {
                return true;
            }
        }
    }
    false
}

fn extract_seasons(group: &[&str]) -> BTreeSet<u32> {
    let mut seasons = BTreeSet::new();
    for title in group {
        if let Some(caps) = season_re().captures(title) {
            if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                seasons.insert(n);
                continue;
            }
        }
        if let Some(caps) = episode_re().captures(title) {
            if let Some(n) = caps.get(1).and_then(|m| m.as_str().parse().ok()) {
                seasons.insert(n);
            }
        }
    }
    seasons
}
