//! ElevenLabs speech-to-text and text-to-speech.

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::Form;
use serde::{Deserialize, Serialize};

use super::{AiError, SpeechSynthesizer, Transcriber, ensure_success, require_key};

const STT_URL: &str = "https://api.elevenlabs.io/v1/speech-to-text";
const TTS_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const STT_MODEL: &str = "scribe_v1";
const TTS_MODEL: &str = "eleven_multilingual_v2";
const DEFAULT_VOICE_ID: &str = "iWNf11sz1GrUE4ppxTOL";

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    language_code: &'a str,
    voice_settings: VoiceSettings,
}

/// ElevenLabs API client.
pub struct ElevenLabsClient {
    client: Client,
    api_key: Option<String>,
    voice_id: String,
}

impl ElevenLabsClient {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self {
            client,
            api_key,
            voice_id: DEFAULT_VOICE_ID.to_string(),
        }
    }
}

#[async_trait]
impl Transcriber for ElevenLabsClient {
    async fn transcribe(&self, media_url: &str) -> Result<String, AiError> {
        let api_key = require_key(&self.api_key, "ElevenLabs")?;
        let form = Form::new()
            .text("model_id", STT_MODEL)
            .text("cloud_storage_url", media_url.to_string())
            .text("language_code", "en");

        let resp = self
            .client
            .post(STT_URL)
            .header("xi-api-key", api_key)
            .multipart(form)
            .send()
            .await?;
        let data: TranscriptionResponse = ensure_success(resp, "ElevenLabs").await?.json().await?;
        Ok(data.text)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, language: &str) -> Result<Vec<u8>, AiError> {
        let api_key = require_key(&self.api_key, "ElevenLabs")?;
        let resp = self
            .client
            .post(format!("{TTS_URL}/{}", self.voice_id))
            .header("xi-api-key", api_key)
            .json(&SpeechRequest {
                text,
                model_id: TTS_MODEL,
                language_code: language,
                voice_settings: VoiceSettings {
                    stability: 0.5,
                    similarity_boost: 0.75,
                },
            })
            .send()
            .await?;
        let bytes = ensure_success(resp, "ElevenLabs").await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
