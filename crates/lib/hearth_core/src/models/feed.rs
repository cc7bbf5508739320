//! Feed post models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A post as stored. `user_name` is a snapshot taken at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub content: String,
    pub media_url: String,
    pub media_type: String,
    pub section: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Author-supplied post fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPayload {
    pub content: String,
    pub media_url: String,
    pub media_type: String,
    pub section: String,
}

impl PostPayload {
    /// Audio and video posts with a media URL get their tags from a transcript.
    pub fn needs_transcript(&self) -> bool {
        !self.media_url.trim().is_empty()
            && matches!(
                self.media_type.trim().to_ascii_lowercase().as_str(),
                "audio" | "video"
            )
    }
}
