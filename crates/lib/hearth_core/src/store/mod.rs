//! Document-store backends.
//!
//! The domain stores ([`crate::auth::credentials::CredentialStore`],
//! [`crate::help::RequestStore`], [`crate::feed::FeedStore`]) own the
//! invariants; the traits here only persist documents. Every write is atomic
//! for a single document. There are no multi-document transactions.
//!
//! - [`memory::MemoryStore`] — in-process, used by tests and dev runs
//! - [`postgres::PgStore`] — PostgreSQL via `sqlx`

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{Identity, Realm};
use crate::models::feed::Post;
use crate::models::help::{HelpRequest, RequestStatus};

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate document: {0}")]
    Conflict(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Corrupt document: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Identity documents, partitioned by realm.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Insert a new identity. Fails with `Conflict` if the id or the email is
    /// already taken in the realm.
    async fn insert_identity(&self, identity: Identity) -> Result<Identity, StoreError>;

    async fn find_identity_by_email(
        &self,
        realm: Realm,
        email: &str,
    ) -> Result<Option<Identity>, StoreError>;

    async fn find_identity_by_id(
        &self,
        realm: Realm,
        id: &str,
    ) -> Result<Option<Identity>, StoreError>;

    /// Snapshot of every identity holding `role`.
    async fn list_identities_by_role(
        &self,
        realm: Realm,
        role: &str,
    ) -> Result<Vec<Identity>, StoreError>;

    /// Add `amount` to the reward balance, returning the new balance.
    async fn add_reward(&self, realm: Realm, id: &str, amount: i64) -> Result<i64, StoreError>;
}

/// Help request documents.
#[async_trait]
pub trait HelpRequestStore: Send + Sync {
    async fn insert_request(&self, request: HelpRequest) -> Result<HelpRequest, StoreError>;

    async fn get_request(&self, id: &str) -> Result<Option<HelpRequest>, StoreError>;

    /// All requests, oldest first.
    async fn list_requests(&self) -> Result<Vec<HelpRequest>, StoreError>;

    /// Atomically move one request to `to` if its current status is one of
    /// `from`. A given `helper_id` replaces the assignee; `None` keeps it.
    ///
    /// Returns `Ok(None)` when the current status is not in `from`, and
    /// `NotFound` when the id is unknown.
    async fn transition_request(
        &self,
        id: &str,
        from: &[RequestStatus],
        to: RequestStatus,
        helper_id: Option<&str>,
    ) -> Result<Option<HelpRequest>, StoreError>;
}

/// Feed post documents.
#[async_trait]
pub trait PostStore: Send + Sync {
    async fn insert_post(&self, post: Post) -> Result<Post, StoreError>;

    /// All posts in the store's natural order.
    async fn list_posts(&self) -> Result<Vec<Post>, StoreError>;

    async fn list_posts_by_author(
        &self,
        user_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<Post>, StoreError>;
}

/// A backend serving all three document collections.
pub trait DocumentStore: IdentityStore + HelpRequestStore + PostStore {
    /// Backend name for logs and health checks.
    fn backend(&self) -> &'static str;
}
