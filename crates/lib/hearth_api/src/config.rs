//! API server configuration.

use std::path::PathBuf;

use hearth_core::auth::jwt::resolve_jwt_secret;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:8000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Session token signing secret.
    pub jwt_secret: String,
    /// Directory that assistant replies are written to and served from.
    pub audio_dir: PathBuf,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                               |
    /// |--------------------|---------------------------------------|
    /// | `BIND_ADDR`        | `127.0.0.1:8000`                      |
    /// | `DATABASE_URL`     | unset (in-memory store)               |
    /// | `AUDIO_DIR`        | `public/audio`                        |
    /// | `JWT_SECRET` / `AUTH_SECRET` | generated & persisted to file |
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8000".into()),
            database_url: std::env::var("DATABASE_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            jwt_secret: resolve_jwt_secret(),
            audio_dir: std::env::var("AUDIO_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public/audio")),
        }
    }
}
