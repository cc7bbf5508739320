//! # hearth_api
//!
//! HTTP API library for Hearth.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use hearth_core::ai::AiServices;
use hearth_core::assistant::AudioAssistant;
use hearth_core::auth::credentials::CredentialStore;
use hearth_core::auth::jwt::SessionTokenService;
use hearth_core::feed::FeedStore;
use hearth_core::help::RequestStore;
use hearth_core::models::auth::Realm;
use hearth_core::store::DocumentStore;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ApiConfig;
use crate::handlers::{assistant, auth, feed, health, neighbour};

/// Upper bound for uploaded assistant audio.
const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: ApiConfig,
    /// Session token issuer/verifier for both realms.
    pub tokens: SessionTokenService,
    /// Feed members.
    pub members: CredentialStore,
    /// Neighbourhood elders and helpers.
    pub neighbours: CredentialStore,
    pub feed: FeedStore,
    pub requests: RequestStore,
    pub assistant: AudioAssistant,
    /// External collaborators.
    pub ai: AiServices,
    /// Storage backend name.
    pub backend: &'static str,
}

impl AppState {
    /// Wire every component onto one document store.
    pub fn new<S>(config: ApiConfig, store: Arc<S>, ai: AiServices) -> Self
    where
        S: DocumentStore + 'static,
    {
        let backend = store.backend();
        let members = CredentialStore::new(Realm::Feed, store.clone());
        let neighbours = CredentialStore::new(Realm::Neighbourhood, store.clone());
        let feed = FeedStore::new(store.clone(), ai.transcriber.clone(), ai.hashtags.clone());
        let requests = RequestStore::new(store, neighbours.clone());
        let assistant = AudioAssistant::new(&ai, config.audio_dir.clone());

        Self {
            tokens: SessionTokenService::new(config.jwt_secret.as_bytes()),
            config,
            members,
            neighbours,
            feed,
            requests,
            assistant,
            ai,
            backend,
        }
    }
}

/// Run embedded database migrations.
///
/// Delegates to `hearth_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    hearth_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/health", get(health::health))
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/feed", get(feed::list_feed_handler))
        .route("/api/signup", post(neighbour::signup_handler))
        .route("/api/signin", post(neighbour::signin_handler))
        .route("/api/upload", post(neighbour::upload_handler))
        .route("/api/helper", get(neighbour::helper_requests_handler))
        .route("/api/assignRequest", post(neighbour::assign_handler))
        .route("/api/eld-people/confirm", post(neighbour::confirm_handler))
        .route("/api/reward/claim", post(neighbour::claim_reward_handler))
        .route(
            "/api/audio-chat",
            post(assistant::audio_chat_handler).layer(DefaultBodyLimit::max(MAX_AUDIO_BYTES)),
        );

    // Protected routes (require auth)
    let protected = Router::new()
        .route("/posts", post(feed::create_post_handler))
        .route("/user/posts", post(feed::user_posts_handler))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let audio = ServeDir::new(state.config.audio_dir.clone());

    Router::new()
        .merge(public)
        .merge(protected)
        .nest_service("/audio", audio)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
