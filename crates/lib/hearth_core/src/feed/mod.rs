//! Social feed posts with derived hashtags.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ai::{HashtagGenerator, Transcriber};
use crate::models::auth::Identity;
use crate::models::feed::{Post, PostPayload};
use crate::store::{PostStore, StoreError};
use crate::uuid::uuidv7;

/// Feed errors. Only the store write can fail a post.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Posts over a document store, tagged by an external hashtag generator.
#[derive(Clone)]
pub struct FeedStore {
    posts: Arc<dyn PostStore>,
    transcriber: Arc<dyn Transcriber>,
    hashtags: Arc<dyn HashtagGenerator>,
}

impl FeedStore {
    pub fn new(
        posts: Arc<dyn PostStore>,
        transcriber: Arc<dyn Transcriber>,
        hashtags: Arc<dyn HashtagGenerator>,
    ) -> Self {
        Self {
            posts,
            transcriber,
            hashtags,
        }
    }

    /// Store a post by `author`, tagging it once at creation.
    ///
    /// Audio and video posts are tagged from their transcript, falling back
    /// to `content` when transcription fails. Tagging failures leave the
    /// post with no tags.
    pub async fn create_post(&self, author: &Identity, payload: PostPayload) -> Result<Post, FeedError> {
        let tags = self.derive_tags(&payload).await;
        let PostPayload {
            content,
            media_url,
            media_type,
            section,
        } = payload;

        let post = Post {
            id: uuidv7().to_string(),
            user_id: author.id.clone(),
            user_name: author.name.clone(),
            content,
            media_url,
            media_type,
            section,
            tags,
            created_at: Utc::now(),
        };
        let created = self.posts.insert_post(post).await?;
        info!(id = %created.id, user_id = %created.user_id, tags = created.tags.len(), "post created");
        Ok(created)
    }

    async fn derive_tags(&self, payload: &PostPayload) -> Vec<String> {
        let mut source = payload.content.clone();
        if payload.needs_transcript() {
            match self.transcriber.transcribe(&payload.media_url).await {
                Ok(transcript) => source = transcript,
                Err(e) => warn!(media_url = %payload.media_url, "transcription failed: {e}"),
            }
        }

        if source.trim().is_empty() {
            debug!("no text to tag");
            return Vec::new();
        }
        match self.hashtags.generate(&source).await {
            Ok(tags) => dedup_preserving_order(tags),
            Err(e) => {
                warn!("hashtag generation failed: {e}");
                Vec::new()
            }
        }
    }

    pub async fn list_feed(&self) -> Result<Vec<Post>, FeedError> {
        Ok(self.posts.list_posts().await?)
    }

    pub async fn list_by_author(
        &self,
        author_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<Post>, FeedError> {
        let section = section.map(str::trim).filter(|s| !s.is_empty());
        Ok(self.posts.list_posts_by_author(author_id, section).await?)
    }
}

fn dedup_preserving_order(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}
