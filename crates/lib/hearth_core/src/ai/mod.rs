//! External speech, language-model and media services.
//!
//! Each collaborator is a trait so that callers can be tested without the
//! network. The HTTP implementations share one `reqwest::Client` with a 30 s
//! timeout; nothing here retries.
//!
//! - [`elevenlabs::ElevenLabsClient`] — speech-to-text and text-to-speech
//! - [`gemini::GeminiClient`] — hashtag generation and audio replies
//! - [`cloudinary::CloudinaryClient`] — media upload

pub mod cloudinary;
pub mod config;
pub mod elevenlabs;
pub mod gemini;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use config::AiConfig;

/// Timeout applied to every external API call.
pub const EXTERNAL_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from external services.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Speech-to-text for media reachable by URL.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, media_url: &str) -> Result<String, AiError>;
}

/// Hashtags describing a piece of text.
#[async_trait]
pub trait HashtagGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<Vec<String>, AiError>;
}

/// Text-to-speech.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, AiError>;
}

/// Media storage upload. Callers treat failures as best-effort.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, path: &Path, folder: &str) -> Result<(), AiError>;
}

/// Multimodal model answering an audio clip according to `prompt`. An empty
/// string means the model produced no text.
#[async_trait]
pub trait AudioResponder: Send + Sync {
    async fn respond(&self, audio: &[u8], mime_type: &str, prompt: &str)
    -> Result<String, AiError>;
}

/// The full set of collaborators used by the feed and the assistant.
#[derive(Clone)]
pub struct AiServices {
    pub transcriber: Arc<dyn Transcriber>,
    pub hashtags: Arc<dyn HashtagGenerator>,
    pub speech: Arc<dyn SpeechSynthesizer>,
    pub media: Arc<dyn MediaUploader>,
    pub responder: Arc<dyn AudioResponder>,
}

impl AiServices {
    /// Build HTTP-backed collaborators. Missing keys are reported lazily, per
    /// call, as [`AiError::Config`].
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder().timeout(EXTERNAL_API_TIMEOUT).build()?;

        let feed_speech = Arc::new(elevenlabs::ElevenLabsClient::new(
            client.clone(),
            config.elevenlabs_api_key.clone(),
        ));
        let chat_speech = Arc::new(elevenlabs::ElevenLabsClient::new(
            client.clone(),
            config.chat_elevenlabs_key(),
        ));
        let tagger = Arc::new(gemini::GeminiClient::new(
            client.clone(),
            config.gemini_api_key.clone(),
            gemini::HASHTAG_MODEL,
        ));
        let responder = Arc::new(gemini::GeminiClient::new(
            client.clone(),
            config.chat_gemini_key(),
            gemini::CHAT_MODEL,
        ));
        let media = Arc::new(cloudinary::CloudinaryClient::new(
            client,
            config.cloudinary.clone(),
        ));

        Ok(Self {
            transcriber: feed_speech,
            hashtags: tagger,
            speech: chat_speech,
            media,
            responder,
        })
    }
}

/// Return the key or a `Config` error naming the service.
fn require_key<'a>(key: &'a Option<String>, service: &str) -> Result<&'a str, AiError> {
    key.as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| AiError::Config(format!("{service} API key not configured")))
}

/// Turn a non-2xx response into a provider error carrying the body.
async fn ensure_success(
    resp: reqwest::Response,
    service: &str,
) -> Result<reqwest::Response, AiError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(AiError::Provider(format!("{service} API error: {status} {body}")))
}
