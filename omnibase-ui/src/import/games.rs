//! Game collection CSV import, one game per row

use super::ImportError;
use omnibase_common::models::Game;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
struct GameRow {
    title: String,
    #[serde(default)]
    genre: Option<String>,
    /// Semicolon- or comma-separated list
    #[serde(default)]
    platforms: Option<String>,
    #[serde(default)]
    stores: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    rawg_rating: Option<f64>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    background_image: Option<String>,
    #[serde(default)]
    notes: Option<String>,
}

fn split_list(value: Option<String>) -> Vec<String> {
    value
        .unwrap_or_default()
        .split([';', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse an uploaded game CSV into collection entries.
///
/// Rows without a title are dropped. Columns are matched by header name;
/// everything except `title` is optional.
pub fn parse_games_csv(csv_bytes: &[u8]) -> Result<Vec<Game>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_bytes);

    let mut games = Vec::new();
    for row in reader.deserialize::<GameRow>() {
        let row = row?;
        if row.title.is_empty() {
            continue;
        }
        games.push(Game {
            id: Uuid::new_v4(),
            title: row.title,
            genre: row.genre.filter(|g| !g.is_empty()),
            platforms: split_list(row.platforms),
            stores: split_list(row.stores),
            rating: row.rating.unwrap_or(0.0),
            rawg_rating: row.rawg_rating.unwrap_or(0.0),
            release_date: row.release_date.filter(|d| !d.is_empty()),
            background_image: row.background_image.filter(|i| !i.is_empty()),
            notes: row.notes.filter(|n| !n.is_empty()),
            source: Some("csv_import".to_string()),
            created_at: None,
            updated_at: None,
        });
    }
    Ok(games)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_with_optional_columns() {
        let csv = "title,genre,platforms,rating\n\
                   Hades,Roguelike,PC; Nintendo Switch,4.5\n\
                   Celeste,,,\n";
        let games = parse_games_csv(csv.as_bytes()).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].title, "Hades");
        assert_eq!(games[0].platforms, vec!["PC", "Nintendo Switch"]);
        assert_eq!(games[0].rating, 4.5);
        assert_eq!(games[1].title, "Celeste");
        assert!(games[1].genre.is_none());
        assert_eq!(games[1].rating, 0.0);
        assert_eq!(games[1].source.as_deref(), Some("csv_import"));
    }

    #[test]
    fn empty_titles_are_dropped() {
        let csv = "title,genre\n,Action\nHades,Roguelike\n";
        let games = parse_games_csv(csv.as_bytes()).unwrap();
        assert_eq!(games.len(), 1);
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let csv = b"title,genre\n\"unterminated,Action\n";
        assert!(parse_games_csv(csv).is_err());
    }
}
