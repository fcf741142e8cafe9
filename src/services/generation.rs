//! Text-generation stage.
//!
//! Asks an instruction-tuned model for a journey as a JSON array and turns
//! the answer into recommendations. Every failure is reported as a
//! [`GenerationError`] so the caller can fall back to the rule-based engine.

use async_trait::async_trait;
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::{MoodTag, RecommendationRequest, TrackRecommendation};

/// How many top artists and top tracks are quoted in the model prompt
const PROMPT_CONTEXT_ITEMS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("no text generation credential configured")]
    MissingCredential,

    #[error("text generation request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("text generation returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("text generation returned no text")]
    EmptyResponse,

    #[error("generated text contains no JSON array")]
    NoJsonArray,

    #[error("generated JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("generated JSON holds no usable tracks")]
    NoUsableTracks,
}

/// Completion backend used by the generation stage
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the raw generated text for `prompt`
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    do_sample: bool,
    return_full_text: bool,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_new_tokens: 2048,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
            return_full_text: false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    #[serde(default)]
    generated_text: String,
}

/// Hugging Face inference API client
#[derive(Clone)]
pub struct HuggingFaceGenerator {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl HuggingFaceGenerator {
    /// Creates a client whose calls give up after `timeout`
    pub fn new(
        api_key: impl Into<String>,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::MissingCredential);
        }

        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.into(),
        })
    }
}

#[async_trait]
impl TextGenerator for HuggingFaceGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let payload = GenerationRequest {
            inputs: prompt,
            parameters: GenerationParameters::default(),
        };

        let response = self
            .http_client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let generated: Vec<GeneratedText> = response.json().await?;

        generated
            .into_iter()
            .next()
            .map(|item| item.generated_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(GenerationError::EmptyResponse)
    }

    fn name(&self) -> &'static str {
        "huggingface"
    }
}

/// Builds the instruction prompt sent to the model
pub fn build_prompt(request: &RecommendationRequest) -> String {
    let mut context = String::new();

    if !request.top_artists.is_empty() {
        let names: Vec<&str> = request
            .top_artists
            .iter()
            .take(PROMPT_CONTEXT_ITEMS)
            .map(|artist| artist.name.as_str())
            .collect();
        context.push_str(&format!("Your top artists are: {}\n", names.join(", ")));
    }

    if !request.top_tracks.is_empty() {
        let tracks: Vec<String> = request
            .top_tracks
            .iter()
            .take(PROMPT_CONTEXT_ITEMS)
            .map(|track| format!("{} by {}", track.name, track.primary_artist()))
            .collect();
        context.push_str(&format!("Your top tracks are: {}\n", tracks.join(", ")));
    }

    format!(
        r#"<s>[INST] You are a music recommendation AI that creates personalized playlists.

{context}
The user wants a playlist with this description:
{prompt}

Create a playlist of 15-20 songs that follows this emotional journey. For each song, provide the song title, the artist name and a brief explanation of why the song fits in this part of the journey.

Format your response as a JSON array of objects with the following structure:
[
    {{
        "title": "Song Title",
        "artist": "Artist Name",
        "album": "Album Name (if known)",
        "mood": "The mood of this song (e.g., energetic, vibey, melancholic, sad, upbeat)",
        "reason": "Brief explanation of why this song fits here"
    }}
]

Only return the JSON array, nothing else. [/INST]"#,
        prompt = request.prompt.trim(),
    )
}

#[derive(Debug, Deserialize)]
struct GeneratedTrack {
    title: String,
    artist: String,
    #[serde(default)]
    album: Option<String>,
    #[serde(default)]
    mood: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Extracts the outermost JSON array from generated text and keeps every
/// element that names both a title and an artist
pub fn parse_generated(text: &str) -> Result<Vec<TrackRecommendation>, GenerationError> {
    let start = text.find('[').ok_or(GenerationError::NoJsonArray)?;
    let end = text.rfind(']').ok_or(GenerationError::NoJsonArray)?;
    if end < start {
        return Err(GenerationError::NoJsonArray);
    }

    let items: Vec<serde_json::Value> = serde_json::from_str(&text[start..=end])?;

    let tracks: Vec<TrackRecommendation> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<GeneratedTrack>(item).ok())
        .filter(|track| !track.title.trim().is_empty() && !track.artist.trim().is_empty())
        .map(|track| TrackRecommendation {
            title: track.title.trim().to_string(),
            artists: vec![track.artist.trim().to_string()],
            album: track.album.filter(|album| !album.trim().is_empty()),
            mood: MoodTag::from(track.mood.unwrap_or_default()),
            reason: track.reason.unwrap_or_default(),
        })
        .collect();

    if tracks.is_empty() {
        return Err(GenerationError::NoUsableTracks);
    }

    Ok(tracks)
}
