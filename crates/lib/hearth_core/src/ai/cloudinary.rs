//! Cloudinary signed upload.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use sha2::{Digest, Sha256};

use super::config::CloudinaryConfig;
use super::{AiError, MediaUploader, ensure_success, require_key};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Signature over the sorted upload parameters followed by the API secret.
fn sign(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("folder={folder}&timestamp={timestamp}{api_secret}").as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Uploads audio/video files to a Cloudinary account.
pub struct CloudinaryClient {
    client: Client,
    config: CloudinaryConfig,
}

impl CloudinaryClient {
    pub fn new(client: Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl MediaUploader for CloudinaryClient {
    async fn upload(&self, path: &Path, folder: &str) -> Result<(), AiError> {
        let cloud_name = require_key(&self.config.cloud_name, "Cloudinary cloud name")?;
        let api_key = require_key(&self.config.api_key, "Cloudinary")?;
        let api_secret = require_key(&self.config.api_secret, "Cloudinary secret")?;

        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        let timestamp = Utc::now().timestamp();

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(file_name))
            .text("api_key", api_key.to_string())
            .text("timestamp", timestamp.to_string())
            .text("folder", folder.to_string())
            .text("signature", sign(folder, timestamp, api_secret))
            .text("signature_algorithm", "sha256");

        let resp = self
            .client
            .post(format!("{API_BASE}/{cloud_name}/video/upload"))
            .multipart(form)
            .send()
            .await?;
        ensure_success(resp, "Cloudinary").await?;
        Ok(())
    }
}
