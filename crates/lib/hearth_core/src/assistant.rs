//! Spoken assistant: answer an audio clip with text and synthesized speech.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai::{AiError, AiServices, AudioResponder, MediaUploader, SpeechSynthesizer};

/// Folder that uploaded clips are stored under.
pub const MEDIA_FOLDER: &str = "audio_files";

/// Reply used when the model returns no text.
pub const EMPTY_REPLY: &str = "No response from Gemini.";

const DEFAULT_LANGUAGE: &str = "en";

const PROMPT: &str = "You are an assistant AI.
1. Transcribe accurately.
2. Detect language.
3. Answer in same language.
4. Append [xx] language code.";

/// Assistant errors.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dependency failure: {0}")]
    Dependency(#[from] AiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The assistant's answer. `audio_path` is the URL path of the spoken reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantReply {
    pub reply: String,
    pub audio_path: String,
}

/// Split a trailing `[xx]` language code off a reply.
///
/// Returns the trimmed reply and the code, or [`DEFAULT_LANGUAGE`] when the
/// reply does not end with a two-letter lowercase code.
pub fn split_language_tag(reply: &str) -> (&str, &str) {
    let trimmed = reply.trim_end();
    if let Some(open) = trimmed.len().checked_sub(4)
        && let Some(tag) = trimmed.get(open..)
        && tag.starts_with('[')
        && tag.ends_with(']')
        && tag[1..3].bytes().all(|b| b.is_ascii_lowercase())
    {
        return (trimmed[..open].trim(), &tag[1..3]);
    }
    (trimmed.trim(), DEFAULT_LANGUAGE)
}

/// Answers audio clips and writes spoken replies under `audio_dir`.
#[derive(Clone)]
pub struct AudioAssistant {
    media: Arc<dyn MediaUploader>,
    responder: Arc<dyn AudioResponder>,
    speech: Arc<dyn SpeechSynthesizer>,
    audio_dir: PathBuf,
}

impl AudioAssistant {
    pub fn new(ai: &AiServices, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            media: ai.media.clone(),
            responder: ai.responder.clone(),
            speech: ai.speech.clone(),
            audio_dir: audio_dir.into(),
        }
    }

    /// Answer `audio` (of `mime_type`, uploaded with file `extension`).
    ///
    /// The media upload is best-effort; reply generation and speech
    /// synthesis failures are returned.
    pub async fn reply(
        &self,
        audio: &[u8],
        mime_type: &str,
        extension: &str,
    ) -> Result<AssistantReply, AssistantError> {
        if audio.is_empty() {
            return Err(AssistantError::Validation("no audio uploaded".into()));
        }

        let suffix = match extension.trim_start_matches('.') {
            "" => String::new(),
            ext => format!(".{ext}"),
        };
        let mut staged = tempfile::Builder::new()
            .prefix("audio_")
            .suffix(&suffix)
            .tempfile()?;
        staged.write_all(audio)?;
        staged.flush()?;

        if let Err(e) = self.media.upload(staged.path(), MEDIA_FOLDER).await {
            warn!("audio upload failed: {e}");
        }

        let raw = self.responder.respond(audio, mime_type, PROMPT).await?;
        let raw = if raw.trim().is_empty() {
            EMPTY_REPLY.to_string()
        } else {
            raw
        };
        let (reply, language) = split_language_tag(&raw);
        debug!(language, "assistant reply generated");

        let speech = self.speech.synthesize(reply, language).await?;

        tokio::fs::create_dir_all(&self.audio_dir).await?;
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let file_name = format!("reply_{nanos}.mp3");
        tokio::fs::write(self.audio_dir.join(&file_name), &speech).await?;
        info!(file = %file_name, bytes = speech.len(), "assistant reply written");

        Ok(AssistantReply {
            reply: reply.to_string(),
            audio_path: format!("/audio/{file_name}"),
        })
    }
}
