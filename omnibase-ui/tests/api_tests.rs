//! Integration tests for omnibase-ui API endpoints
//!
//! Tests cover the collection CRUD surface, server-side filtering, the
//! settings/masking behavior, CSV imports and the UI state endpoints,
//! all against an in-memory database.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use omnibase_ui::{build_router, AppState};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: app over a fresh in-memory database
async fn setup_app() -> axum::Router {
    let pool = omnibase_common::db::init_memory_pool()
        .await
        .expect("Should create in-memory database");
    let state = AppState::new(pool, std::env::temp_dir());
    build_router(state)
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Test helper: single-file multipart upload
fn multipart_request(uri: &str, filename: &str, content: &str) -> Request<Body> {
    let boundary = "test-boundary";
    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{boundary}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "omnibase-ui");
    assert!(body["version"].is_string());
    assert!(body["uptime_seconds"].is_number());
}

// =============================================================================
// Movie CRUD and filtering
// =============================================================================

#[tokio::test]
async fn test_movie_create_list_update_delete() {
    let app = setup_app().await;

    // Create
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/movies",
            json!({"title": "The Matrix", "type": "movie", "year": 1999, "genre": "Sci-Fi"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    assert_eq!(created["title"], "The Matrix");
    let id = created["id"].as_str().unwrap().to_string();

    // List
    let response = app.clone().oneshot(get_request("/api/movies")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 1);

    // Update rating (full replace)
    let mut updated = created.clone();
    updated["rating"] = json!(4.5);
    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/movies/{}", id),
            updated,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["rating"], 4.5);

    // Delete returns the removed item
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/movies/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let deleted = extract_json(response.into_body()).await;
    assert_eq!(deleted["title"], "The Matrix");

    // Second delete is a 404 with the error envelope
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/movies/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_movie_create_requires_title() {
    let app = setup_app().await;
    let response = app
        .oneshot(json_request("POST", "/api/movies", json!({"title": "  "})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_movie_list_filters_run_server_side() {
    let app = setup_app().await;

    for (title, rating) in [("The Matrix", 4.5), ("Arrival", 0.0), ("Matrix Reloaded", 0.0)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/movies",
                json!({"title": title, "rating": rating}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    // Case-insensitive title substring search
    let response = app
        .clone()
        .oneshot(get_request("/api/movies?search=matrix"))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 2);

    // notRated keeps only unrated items
    let response = app
        .clone()
        .oneshot(get_request("/api/movies?user_rating=notRated"))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Arrival", "Matrix Reloaded"]);

    // Minimum threshold is inclusive
    let response = app
        .oneshot(get_request("/api/movies?user_rating=4.5"))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "The Matrix");
}

#[tokio::test]
async fn test_movie_search_requires_title() {
    let app = setup_app().await;
    let response = app
        .oneshot(get_request("/api/movies/search"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Games
// =============================================================================

#[tokio::test]
async fn test_add_game_skips_duplicates() {
    let app = setup_app().await;
    let game = json!({"title": "Hades", "platforms": ["PC"], "rawg_rating": 4.4});

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/add_game", game.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["game"]["title"], "Hades");

    let response = app
        .oneshot(json_request("POST", "/api/add_game", game))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_game_view_filter_classifies_platforms() {
    let app = setup_app().await;

    for (title, platforms) in [
        ("Hades", json!(["PC", "Nintendo Switch"])),
        ("Bloodborne", json!(["PlayStation 4"])),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/games",
                json!({"title": title, "platforms": platforms}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/games?view=pc"))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["title"], "Hades");

    // A Switch title counts as Console too
    let response = app
        .oneshot(get_request("/api/games?view=console"))
        .await
        .unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

// =============================================================================
// Music
// =============================================================================

#[tokio::test]
async fn test_track_crud_roundtrip() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tracks",
            json!({"name": "Hyperballad", "artist": "Bjork", "album": "Post"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = extract_json(response.into_body()).await;
    let id = created["id"].as_str().unwrap().to_string();

    // Duplicate via add_track is rejected
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/add_track",
            json!({"name": "Hyperballad", "artist": "Bjork"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/tracks/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Settings and usage
// =============================================================================

#[tokio::test]
async fn test_settings_mask_and_merge() {
    let app = setup_app().await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/settings",
            json!({"streaming_api_key": "secret-key", "language": "de", "empty": ""}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);

    let response = app
        .clone()
        .oneshot(get_request("/api/settings"))
        .await
        .unwrap();
    let settings = extract_json(response.into_body()).await;
    assert_eq!(settings["streaming_api_key"], "********");
    assert_eq!(settings["language"], "de");
    assert!(settings.get("empty").is_none());

    // Posting the mask back must not clobber the stored key
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/settings",
            json!({"streaming_api_key": "********", "language": "en"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/api/settings")).await.unwrap();
    let settings = extract_json(response.into_body()).await;
    assert_eq!(settings["language"], "en");
    assert_eq!(settings["streaming_api_key"], "********");
}

#[tokio::test]
async fn test_api_usage_starts_at_zero() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/api/api_usage")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["usage_count"], 0);
    assert_eq!(body["limit"], 1000);
    assert_eq!(body["percentage"], 0.0);
}

#[tokio::test]
async fn test_translations_default_to_empty_object() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/api/translations")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert!(body.as_object().is_some());
}

// =============================================================================
// CSV imports
// =============================================================================

#[tokio::test]
async fn test_games_import_counts_and_skips_duplicates() {
    let app = setup_app().await;
    let csv = "title,genre,platforms\nHades,Roguelike,PC\nCeleste,Platformer,PC\n";

    let response = app
        .clone()
        .oneshot(multipart_request("/api/import/games", "games.csv", csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["skipped"], 0);

    // Second upload skips everything
    let response = app
        .oneshot(multipart_request("/api/import/games", "games.csv", csv))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["imported"], 0);
    assert_eq!(body["skipped"], 2);
}

#[tokio::test]
async fn test_music_import_counts() {
    let app = setup_app().await;
    let csv = "name,artist\nHyperballad,Bjork\nArmy of Me,Bjork\n";

    let response = app
        .clone()
        .oneshot(multipart_request("/api/import/music", "music.csv", csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["imported"], 2);
    assert_eq!(body["skipped"], 0);

    let response = app.oneshot(get_request("/api/tracks")).await.unwrap();
    let list = extract_json(response.into_body()).await;
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_netflix_import_without_api_key_stores_basic_entries() {
    let app = setup_app().await;
    let csv = "Title,Date\nInception,2024-01-01\nDark: Staffel 1: Geheimnisse,2024-01-02\n";

    let response = app
        .clone()
        .oneshot(multipart_request("/api/import/netflix", "history.csv", csv))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["skipped"], 0);
    assert_eq!(body["movies"], json!(["Inception"]));
    assert_eq!(body["series"], json!(["Dark (Staffel 1)"]));

    // Entries land in the movie collection with the import source
    let response = app.oneshot(get_request("/api/movies")).await.unwrap();
    let list = extract_json(response.into_body()).await;
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert!(list
        .iter()
        .all(|m| m["source"] == "netflix_import"));
    let series = list
        .iter()
        .find(|m| m["title"] == "Dark (Staffel 1)")
        .unwrap();
    assert_eq!(series["type"], "series");
}

#[tokio::test]
async fn test_import_rejects_missing_file() {
    let app = setup_app().await;
    let boundary = "test-boundary";
    let body = format!("--{boundary}--\r\n");
    let request = Request::builder()
        .method("POST")
        .uri("/api/import/games")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// UI state endpoints
// =============================================================================

#[tokio::test]
async fn test_section_resolution_follows_mode() {
    let app = setup_app().await;

    // Default mode resolves the plain id
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ui/section",
            json!({"section": "collectionSection"}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["shown"], "collectionSection");

    // Under Games the same logical section is mode-prefixed
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/ui/mode", json!({"mode": "Games"})))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["shown"], "gamesCollectionSection");

    // A persisted foreign concrete id re-resolves through the logical name
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/ui/section",
            json!({"section": "musicStatsSection"}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["shown"], "gamesStatsSection");
}

#[tokio::test]
async fn test_view_events_drive_the_cursor() {
    let app = setup_app().await;

    // Rating save advances to the next item
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ui/view_event",
            json!({"mode": "Movies", "event": "rating_saved", "filtered_len": 3}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["index"], 1);

    // Filter changes reset to the first item
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ui/view_event",
            json!({"mode": "Movies", "event": "filters_changed", "filtered_len": 3}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["index"], 0);

    // Deleting the last item resets to zero
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/ui/view_event",
            json!({"mode": "Movies", "event": "item_deleted", "filtered_len": 0}),
        ))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["index"], 0);

    // Unknown events are rejected
    let response = app
        .oneshot(json_request(
            "POST",
            "/api/ui/view_event",
            json!({"mode": "Movies", "event": "warp", "filtered_len": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_index_page_renders() {
    let app = setup_app().await;

    let response = app.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("OmniBase"));
    assert!(html.contains("collectionSection"));
    // Mode links render as anchors with a data-mode attribute
    assert!(html.contains(r##"<li><a href="#" data-mode="Movies">Movies (active)</a></li>"##));
    assert!(html.contains(r#"data-mode="Games""#));
}

#[tokio::test]
async fn test_filter_options_per_mode() {
    let app = setup_app().await;

    for (title, year, genre) in [
        ("The Matrix", 1999, "Action, Sci-Fi"),
        ("Arrival", 2016, "Sci-Fi"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/movies",
                json!({"title": title, "year": year, "genre": genre}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(get_request("/api/filter_options?mode=Movies"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    // Genres sorted and deduplicated, years newest first
    assert_eq!(body["genres"], json!(["Action", "Sci-Fi"]));
    assert_eq!(body["years"], json!([2016, 1999]));

    // Other modes have their own option sets
    let response = app
        .oneshot(get_request("/api/filter_options?mode=Games"))
        .await
        .unwrap();
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["genres"], json!([]));
}

#[tokio::test]
async fn test_stats_endpoint_aggregates() {
    let app = setup_app().await;

    for (title, rating, genre) in [
        ("The Matrix", 5.0, "Sci-Fi"),
        ("Arrival", 4.0, "Sci-Fi"),
        ("Heat", 0.0, "Crime"),
    ] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/movies",
                json!({"title": title, "rating": rating, "genre": genre}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .oneshot(get_request("/api/stats?mode=Movies"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["rated"], 2);
    assert_eq!(body["not_rated"], 1);
    assert_eq!(body["genre_counts"]["Sci-Fi"], 2);
    assert_eq!(body["genre_ratings"]["Sci-Fi"], 5.0);
    assert_eq!(body["genre_ratings"]["Crime"], 2.5);
    assert_eq!(body["favorites"][0]["title"], "The Matrix");
}
