//! Spoken assistant handler.

use axum::Json;
use axum::extract::{Multipart, State};
use hearth_core::assistant::AssistantReply;

use crate::AppState;
use crate::error::{AppError, AppResult};

const DEFAULT_AUDIO_MIME: &str = "audio/webm";

/// `POST /api/audio-chat` — multipart form with an `audio` file part.
pub async fn audio_chat_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AssistantReply>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        if field.name() != Some("audio") {
            continue;
        }
        let mime = field
            .content_type()
            .unwrap_or(DEFAULT_AUDIO_MIME)
            .to_string();
        let extension = field
            .file_name()
            .and_then(|name| std::path::Path::new(name).extension())
            .map(|ext| ext.to_string_lossy().into_owned())
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .unwrap_or_default();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;

        let reply = state.assistant.reply(&bytes, &mime, &extension).await?;
        return Ok(Json(reply));
    }
    Err(AppError::Validation("no audio uploaded".into()))
}
