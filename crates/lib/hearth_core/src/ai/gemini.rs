//! Gemini `generateContent` client for hashtags and audio replies.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AiError, AudioResponder, HashtagGenerator, ensure_success, require_key};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Model used to tag feed posts.
pub const HASHTAG_MODEL: &str = "gemini-1.5-flash";

/// Model used to answer assistant audio clips.
pub const CHAT_MODEL: &str = "gemini-1.5-pro";

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
struct Candidate {
    #[serde(default)]
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    fn first_text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Words of `text` that start with `#`, in order of first appearance.
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        if word.len() > 1 && word.starts_with('#') && !tags.iter().any(|t| t == word) {
            tags.push(word.to_string());
        }
    }
    tags
}

fn hashtag_prompt(text: &str) -> String {
    format!(
        "Generate many relevant hashtags in English, only hashtags separated by spaces. Text:\n\n{text}"
    )
}

/// Gemini API client bound to one model.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: &'static str,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: Option<String>, model: &'static str) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    async fn generate_content(&self, parts: Vec<Part<'_>>) -> Result<GenerateResponse, AiError> {
        let api_key = require_key(&self.api_key, "Gemini")?;
        let resp = self
            .client
            .post(format!("{API_BASE}/{}:generateContent", self.model))
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest {
                contents: vec![Content { parts }],
            })
            .send()
            .await?;
        Ok(ensure_success(resp, "Gemini").await?.json().await?)
    }
}

#[async_trait]
impl HashtagGenerator for GeminiClient {
    async fn generate(&self, text: &str) -> Result<Vec<String>, AiError> {
        let prompt = hashtag_prompt(text);
        let response = self.generate_content(vec![Part::Text { text: &prompt }]).await?;
        Ok(response
            .first_text()
            .map(|t| extract_hashtags(&t))
            .unwrap_or_default())
    }
}

#[async_trait]
impl AudioResponder for GeminiClient {
    async fn respond(
        &self,
        audio: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, AiError> {
        let parts = vec![
            Part::InlineData {
                inline_data: InlineData {
                    mime_type,
                    data: STANDARD.encode(audio),
                },
            },
            Part::Text { text: prompt },
        ];
        let response = self.generate_content(parts).await?;
        Ok(response.first_text().unwrap_or_default())
    }
}
