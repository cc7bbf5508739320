//! PostgreSQL document store.
//!
//! Schema lives in `hearth_core/migrations/`. Each write is a single
//! statement, so single-document atomicity comes from PostgreSQL itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{DocumentStore, HelpRequestStore, IdentityStore, PostStore, StoreError};
use crate::models::auth::{Identity, Realm};
use crate::models::feed::Post;
use crate::models::geo::GeoPoint;
use crate::models::help::{HelpRequest, RequestStatus};

const IDENTITY_COLUMNS: &str =
    "id, name, email, password_hash, role, lat, lng, reward, created_at";

const REQUEST_COLUMNS: &str = "id, elder_id, elder_lat, elder_lng, title, audio_url, \
     transcript, status, helper_id, created_at";

const POST_COLUMNS: &str =
    "id, user_id, user_name, content, media_url, media_type, section, tags, created_at";

type IdentityRow = (
    String,
    String,
    String,
    String,
    String,
    Option<f64>,
    Option<f64>,
    i64,
    DateTime<Utc>,
);

type RequestRow = (
    String,
    String,
    f64,
    f64,
    String,
    Option<String>,
    String,
    String,
    Option<String>,
    DateTime<Utc>,
);

type PostRow = (
    String,
    String,
    String,
    String,
    String,
    String,
    String,
    Vec<String>,
    DateTime<Utc>,
);

/// Document store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn identity_from_row(realm: Realm, row: IdentityRow) -> Identity {
    let (id, name, email, password_hash, role, lat, lng, reward, created_at) = row;
    Identity {
        id,
        realm,
        name,
        email,
        password_hash,
        role,
        location: lat.zip(lng).map(|(lat, lng)| GeoPoint::new(lat, lng)),
        reward,
        created_at,
    }
}

fn request_from_row(row: RequestRow) -> Result<HelpRequest, StoreError> {
    let (id, elder_id, lat, lng, title, audio_url, transcript, status, helper_id, created_at) = row;
    let status = status.parse::<RequestStatus>().map_err(StoreError::Corrupt)?;
    Ok(HelpRequest {
        id,
        elder_id,
        elder_location: GeoPoint::new(lat, lng),
        title,
        audio_url,
        transcript,
        status,
        helper_id,
        created_at,
    })
}

fn post_from_row(row: PostRow) -> Post {
    let (id, user_id, user_name, content, media_url, media_type, section, tags, created_at) = row;
    Post {
        id,
        user_id,
        user_name,
        content,
        media_url,
        media_type,
        section,
        tags,
        created_at,
    }
}

/// Map unique violations to `Conflict`, everything else to `Db`.
fn conflict_or_db(e: sqlx::Error, what: String) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return StoreError::Conflict(what);
    }
    StoreError::Db(e)
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn insert_identity(&self, identity: Identity) -> Result<Identity, StoreError> {
        sqlx::query(
            "INSERT INTO identities \
             (realm, id, name, email, password_hash, role, lat, lng, reward, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(identity.realm.as_str())
        .bind(&identity.id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.password_hash)
        .bind(&identity.role)
        .bind(identity.location.map(|l| l.lat))
        .bind(identity.location.map(|l| l.lng))
        .bind(identity.reward)
        .bind(identity.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("email {}", identity.email)))?;
        Ok(identity)
    }

    async fn find_identity_by_email(
        &self,
        realm: Realm,
        email: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE realm = $1 AND email = $2"
        ))
        .bind(realm.as_str())
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| identity_from_row(realm, r)))
    }

    async fn find_identity_by_id(
        &self,
        realm: Realm,
        id: &str,
    ) -> Result<Option<Identity>, StoreError> {
        let row = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities WHERE realm = $1 AND id = $2"
        ))
        .bind(realm.as_str())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| identity_from_row(realm, r)))
    }

    async fn list_identities_by_role(
        &self,
        realm: Realm,
        role: &str,
    ) -> Result<Vec<Identity>, StoreError> {
        let rows = sqlx::query_as::<_, IdentityRow>(&format!(
            "SELECT {IDENTITY_COLUMNS} FROM identities \
             WHERE realm = $1 AND role = $2 \
             ORDER BY created_at, id"
        ))
        .bind(realm.as_str())
        .bind(role)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|r| identity_from_row(realm, r)).collect())
    }

    async fn add_reward(&self, realm: Realm, id: &str, amount: i64) -> Result<i64, StoreError> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE identities SET reward = reward + $3 \
             WHERE realm = $1 AND id = $2 \
             RETURNING reward",
        )
        .bind(realm.as_str())
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound(format!("identity {id}")))
    }
}

#[async_trait]
impl HelpRequestStore for PgStore {
    async fn insert_request(&self, request: HelpRequest) -> Result<HelpRequest, StoreError> {
        sqlx::query(
            "INSERT INTO help_requests \
             (id, elder_id, elder_lat, elder_lng, title, audio_url, transcript, status, helper_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(&request.id)
        .bind(&request.elder_id)
        .bind(request.elder_location.lat)
        .bind(request.elder_location.lng)
        .bind(&request.title)
        .bind(&request.audio_url)
        .bind(&request.transcript)
        .bind(request.status.as_str())
        .bind(&request.helper_id)
        .bind(request.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("help request {}", request.id)))?;
        Ok(request)
    }

    async fn get_request(&self, id: &str) -> Result<Option<HelpRequest>, StoreError> {
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM help_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(request_from_row).transpose()
    }

    async fn list_requests(&self) -> Result<Vec<HelpRequest>, StoreError> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "SELECT {REQUEST_COLUMNS} FROM help_requests ORDER BY created_at, id"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(request_from_row).collect()
    }

    async fn transition_request(
        &self,
        id: &str,
        from: &[RequestStatus],
        to: RequestStatus,
        helper_id: Option<&str>,
    ) -> Result<Option<HelpRequest>, StoreError> {
        let allowed: Vec<String> = from.iter().map(|s| s.as_str().to_string()).collect();
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "UPDATE help_requests \
             SET status = $3, helper_id = COALESCE($4, helper_id) \
             WHERE id = $1 AND status = ANY($2) \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(&allowed)
        .bind(to.as_str())
        .bind(helper_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => request_from_row(row).map(Some),
            None => match self.get_request(id).await? {
                Some(_) => Ok(None),
                None => Err(StoreError::NotFound(format!("help request {id}"))),
            },
        }
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        sqlx::query(
            "INSERT INTO posts \
             (id, user_id, user_name, content, media_url, media_type, section, tags, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(&post.id)
        .bind(&post.user_id)
        .bind(&post.user_name)
        .bind(&post.content)
        .bind(&post.media_url)
        .bind(&post.media_type)
        .bind(&post.section)
        .bind(&post.tags)
        .bind(post.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| conflict_or_db(e, format!("post {}", post.id)))?;
        Ok(post)
    }

    async fn list_posts(&self) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!("SELECT {POST_COLUMNS} FROM posts"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(post_from_row).collect())
    }

    async fn list_posts_by_author(
        &self,
        user_id: &str,
        section: Option<&str>,
    ) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE user_id = $1 AND ($2::text IS NULL OR section = $2)"
        ))
        .bind(user_id)
        .bind(section)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(post_from_row).collect())
    }
}

impl DocumentStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }
}
