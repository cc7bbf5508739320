//! External service configuration.
//!
//! Keys come from the environment. The audio-chat assistant may use its own
//! keys and falls back to the feed keys when they are unset.

use std::env;

/// Cloudinary account credentials.
#[derive(Debug, Clone, Default)]
pub struct CloudinaryConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

/// Resolved API keys for the speech, language-model and media services.
#[derive(Debug, Clone, Default)]
pub struct AiConfig {
    pub gemini_api_key: Option<String>,
    pub elevenlabs_api_key: Option<String>,
    pub chat_gemini_api_key: Option<String>,
    pub chat_elevenlabs_api_key: Option<String>,
    pub cloudinary: CloudinaryConfig,
}

impl AiConfig {
    /// Reads configuration from environment variables.
    ///
    /// | Variable                  | Used for                         |
    /// |---------------------------|----------------------------------|
    /// | `GEMINI_API_KEY`          | hashtag generation               |
    /// | `ELEVENLABS_API_KEY`      | post transcription               |
    /// | `CHAT_GEMINI_API_KEY`     | assistant replies (→ Gemini key) |
    /// | `CHAT_ELEVENLABS_API_KEY` | assistant speech (→ ElevenLabs)  |
    /// | `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET` | media upload |
    pub fn from_env() -> Self {
        Self {
            gemini_api_key: non_empty_var("GEMINI_API_KEY"),
            elevenlabs_api_key: non_empty_var("ELEVENLABS_API_KEY"),
            chat_gemini_api_key: non_empty_var("CHAT_GEMINI_API_KEY"),
            chat_elevenlabs_api_key: non_empty_var("CHAT_ELEVENLABS_API_KEY"),
            cloudinary: CloudinaryConfig {
                cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME"),
                api_key: non_empty_var("CLOUDINARY_API_KEY"),
                api_secret: non_empty_var("CLOUDINARY_API_SECRET"),
            },
        }
    }

    /// Gemini key for the assistant, falling back to the feed key.
    pub fn chat_gemini_key(&self) -> Option<String> {
        first_non_empty(&[&self.chat_gemini_api_key, &self.gemini_api_key])
    }

    /// ElevenLabs key for the assistant, falling back to the feed key.
    pub fn chat_elevenlabs_key(&self) -> Option<String> {
        first_non_empty(&[&self.chat_elevenlabs_api_key, &self.elevenlabs_api_key])
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn first_non_empty(values: &[&Option<String>]) -> Option<String> {
    values
        .iter()
        .filter_map(|v| v.as_deref())
        .find(|v| !v.trim().is_empty())
        .map(str::to_string)
}
