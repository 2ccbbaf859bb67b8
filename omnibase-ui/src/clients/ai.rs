//! AI recommendation providers
//!
//! A provider trait over the OpenAI and Gemini chat APIs, selected by the
//! `ai_provider` setting, plus the recommendation prompt builders and the
//! parser that pulls titles back out of the model's reply.

use super::ClientError;
use crate::collection::stats::Favorite;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::warn;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const OPENAI_MODEL: &str = "gpt-4o-mini";

const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.0-flash";

/// AI requests can take a while on long prompts
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A chat-completion backend
#[async_trait]
pub trait AiProvider: Send + Sync {
    /// Provider name for logging and error messages
    fn name(&self) -> &'static str;

    /// Send a single user message and return the model's text reply
    async fn complete(&self, message: &str) -> Result<String, ClientError>;
}

/// Select a provider from the stored settings.
///
/// `ai_provider` chooses the backend (`gemini` or anything else for the
/// OpenAI default), matching key setting must be present.
pub fn provider_from_settings(
    settings: &std::collections::HashMap<String, String>,
) -> Result<Box<dyn AiProvider>, ClientError> {
    let provider = settings
        .get("ai_provider")
        .map(String::as_str)
        .unwrap_or("openai");

    if provider == "gemini" {
        let key = settings
            .get("gemini_api_key")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ClientError::MissingKey("gemini_api_key".to_string()))?;
        Ok(Box::new(GeminiProvider::new(key.clone())))
    } else {
        let key = settings
            .get("openai_api_key")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ClientError::MissingKey("openai_api_key".to_string()))?;
        Ok(Box::new(OpenAiProvider::new(key.clone())))
    }
}

/// OpenAI chat completions backend
pub struct OpenAiProvider {
    http_client: Client,
    api_key: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
        }
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, message: &str) -> Result<String, ClientError> {
        let body = json!({
            "model": OPENAI_MODEL,
            "messages": [
                {"role": "system", "content": "You are a helpful assistant."},
                {"role": "user", "content": message}
            ],
            "temperature": 1,
            "max_tokens": 2048,
        });

        let response = self
            .http_client
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(format!(
                "OpenAI returned error {}: {}",
                status, text
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse OpenAI response: {}", e)))?;

        data["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::Parse("OpenAI response had no message content".to_string()))
    }
}

/// Google Gemini backend
pub struct GeminiProvider {
    http_client: Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            http_client: Client::builder()
                .timeout(DEFAULT_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key,
        }
    }
}

#[async_trait]
impl AiProvider for GeminiProvider {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn complete(&self, message: &str) -> Result<String, ClientError> {
        let url = format!("{}/{}:generateContent", GEMINI_URL, GEMINI_MODEL);
        let body = json!({
            "contents": [
                {"role": "user", "parts": [{"text": message}]}
            ],
            "generationConfig": {
                "temperature": 1,
                "topP": 0.95,
                "topK": 40,
                "maxOutputTokens": 8192,
            }
        });

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| ClientError::Network(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::Api(format!(
                "Gemini returned error {}: {}",
                status, text
            )));
        }

        let data: Value = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("Failed to parse Gemini response: {}", e)))?;

        data["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| ClientError::Parse("Gemini response had no text part".to_string()))
    }
}

/// Parameters for a movie/series suggestion prompt
pub struct SuggestionPrompt<'a> {
    /// "movie", "series" or "both"
    pub content_type: &'a str,
    pub count: u32,
    pub description: &'a str,
    /// Genre name with its 0-5 frequency rating
    pub genre_ratings: &'a [(String, f64)],
    pub favorites: &'a [Favorite],
    /// Titles excluded from the recommendations
    pub watched: &'a [String],
}

/// Build the recommendation prompt sent to the provider.
///
/// The format instruction pins the reply to a JSON array of
/// `recomendation_N` keys (the key misspelling is part of the wire
/// contract, `extract_recommendations` matches it).
pub fn formulate_suggestion_prompt(params: &SuggestionPrompt<'_>) -> String {
    let mut prompt = String::from("I need recommendations for ");

    match params.content_type {
        "movie" => prompt.push_str("movies "),
        "series" => prompt.push_str("TV series "),
        _ => prompt.push_str("movies or TV series "),
    }

    prompt.push_str(&format!(
        "(please suggest exactly {} titles). ",
        params.count
    ));

    if !params.description.is_empty() {
        prompt.push_str(&format!(
            "I'm looking for something about: {}. ",
            params.description
        ));
    }

    if !params.genre_ratings.is_empty() {
        prompt.push_str(
            "Based on my collection, I seem to prefer these genres \
             (with ratings based on frequency out of 5): ",
        );
        let items: Vec<String> = params
            .genre_ratings
            .iter()
            .map(|(genre, rating)| format!("{} ({}/5)", genre, rating))
            .collect();
        prompt.push_str(&items.join(", "));
        prompt.push_str(". ");
    }

    if !params.favorites.is_empty() {
        prompt.push_str("My favorite titles are: ");
        let items: Vec<String> = params
            .favorites
            .iter()
            .map(|f| format!("{} ({}/5)", f.title, f.rating))
            .collect();
        prompt.push_str(&items.join(", "));
        prompt.push_str(". ");
    }

    if !params.watched.is_empty() {
        prompt.push_str(
            "Please DO NOT recommend any of these titles as I've already seen them: ",
        );
        prompt.push_str(&params.watched.join(", "));
        prompt.push_str(". ");
    }

    prompt.push_str(
        "Please format your answer ONLY as a JSON object with the following syntax: \
         [{\"recomendation_1\":\"title_of_the_recomendation\", \
         \"recomendation_2\":\"title_of_the_recomendation\"}]. \
         Do not include any other text or explanations in your response, \
         just the JSON array with exactly the recommendations I asked for.",
    );

    prompt
}

/// Parameters for a music suggestion prompt
pub struct MusicPrompt<'a> {
    pub count: u32,
    pub description: &'a str,
    pub genres: &'a [String],
    /// Artist name with track count, most frequent first
    pub top_artists: &'a [(String, usize)],
}

/// Build a track recommendation prompt. Replies use the same
/// `recomendation_N` contract, with each value as "Artist - Track".
pub fn formulate_music_prompt(params: &MusicPrompt<'_>) -> String {
    let mut prompt = format!(
        "I need music recommendations (please suggest exactly {} tracks). ",
        params.count
    );

    if !params.description.is_empty() {
        prompt.push_str(&format!(
            "I'm looking for something like: {}. ",
            params.description
        ));
    }

    if !params.top_artists.is_empty() {
        prompt.push_str("My most listened artists are: ");
        let items: Vec<String> = params
            .top_artists
            .iter()
            .map(|(name, count)| format!("{} ({} tracks)", name, count))
            .collect();
        prompt.push_str(&items.join(", "));
        prompt.push_str(". ");
    }

    if !params.genres.is_empty() {
        prompt.push_str("My preferred genres include: ");
        prompt.push_str(&params.genres.join(", "));
        prompt.push_str(". ");
    }

    prompt.push_str(
        "Please format your answer ONLY as a JSON object with the following syntax: \
         [{\"recomendation_1\":\"Artist - Track\", \
         \"recomendation_2\":\"Artist - Track\"}]. \
         Do not include any other text or explanations in your response, \
         just the JSON array with exactly the recommendations I asked for.",
    );

    prompt
}

fn recommendation_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"recomendation_\d+"\s*:\s*"([^"]+)""#).unwrap())
}

/// Pull the recommended titles out of a model reply.
///
/// Tries the bracketed JSON slice first, then the whole reply as JSON, then
/// a regex sweep for `recomendation_N` pairs. Returns an empty list when
/// nothing matches.
pub fn extract_recommendations(ai_response: &str) -> Vec<String> {
    let json_slice = match (ai_response.find('['), ai_response.rfind(']')) {
        (Some(start), Some(end)) if end > start => &ai_response[start..=end],
        _ => ai_response,
    };

    if let Ok(parsed) = serde_json::from_str::<Value>(json_slice) {
        let titles = collect_recommendation_values(&parsed);
        if !titles.is_empty() {
            return titles;
        }
    }

    let matches: Vec<String> = recommendation_regex()
        .captures_iter(ai_response)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect();

    if matches.is_empty() {
        warn!("Could not extract recommendations from AI response");
    }
    matches
}

fn collect_recommendation_values(parsed: &Value) -> Vec<String> {
    let mut titles = Vec::new();
    match parsed {
        Value::Array(items) => {
            for item in items {
                if let Value::Object(map) = item {
                    collect_from_map(map, &mut titles);
                }
            }
        }
        Value::Object(map) => collect_from_map(map, &mut titles),
        _ => {}
    }
    titles
}

fn collect_from_map(map: &serde_json::Map<String, Value>, titles: &mut Vec<String>) {
    // Map iteration is lexicographic, which would put recomendation_10
    // before recomendation_2; sort by the numeric suffix instead.
    let mut entries: Vec<(u32, &str)> = Vec::new();
    for (key, value) in map {
        let Some(suffix) = key.strip_prefix("recomendation_") else {
            continue;
        };
        let Some(title) = value.as_str() else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        entries.push((suffix.parse().unwrap_or(u32::MAX), title));
    }
    entries.sort_by_key(|(n, _)| *n);
    titles.extend(entries.into_iter().map(|(_, title)| title.to_string()));
}
