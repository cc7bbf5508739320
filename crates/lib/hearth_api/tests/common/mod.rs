//! Shared fixtures for router integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use hearth_api::config::ApiConfig;
use hearth_api::{AppState, router};
use hearth_core::ai::{
    AiError, AiServices, AudioResponder, HashtagGenerator, MediaUploader, SpeechSynthesizer,
    Transcriber,
};
use hearth_core::store::memory::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

/// Offline stand-ins for every external service.
pub struct FakeAi;

#[async_trait]
impl Transcriber for FakeAi {
    async fn transcribe(&self, media_url: &str) -> Result<String, AiError> {
        if media_url.contains("broken") {
            return Err(AiError::Provider("unreachable".into()));
        }
        Ok("need groceries".into())
    }
}

#[async_trait]
impl HashtagGenerator for FakeAi {
    async fn generate(&self, text: &str) -> Result<Vec<String>, AiError> {
        Ok(text.split_whitespace().map(|w| format!("#{w}")).collect())
    }
}

#[async_trait]
impl SpeechSynthesizer for FakeAi {
    async fn synthesize(&self, _text: &str, _language: &str) -> Result<Vec<u8>, AiError> {
        Ok(b"ID3".to_vec())
    }
}

#[async_trait]
impl MediaUploader for FakeAi {
    async fn upload(&self, _path: &Path, _folder: &str) -> Result<(), AiError> {
        Err(AiError::Config("Cloudinary API key not configured".into()))
    }
}

#[async_trait]
impl AudioResponder for FakeAi {
    async fn respond(&self, _audio: &[u8], _mime: &str, _prompt: &str) -> Result<String, AiError> {
        Ok("Hola, ¿cómo estás? [es]".into())
    }
}

pub fn fake_ai() -> AiServices {
    let fake = Arc::new(FakeAi);
    AiServices {
        transcriber: fake.clone(),
        hashtags: fake.clone(),
        speech: fake.clone(),
        media: fake.clone(),
        responder: fake,
    }
}

/// A router over a fresh in-memory store. Keep the returned directory alive
/// for as long as assistant audio is read back.
pub fn app() -> (Router, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".into(),
        database_url: None,
        jwt_secret: "test-secret".into(),
        audio_dir: dir.path().to_path_buf(),
    };
    let state = AppState::new(config, Arc::new(MemoryStore::new()), fake_ai());
    (router(state), dir)
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.expect("request");
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("read body");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

pub fn post_json(uri: &str, body: Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}
