//! Hearth API server binary.
//!
//! Serves the feed and neighbourhood APIs. Uses PostgreSQL when a database
//! URL is given, otherwise an in-memory store that is lost on exit.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use hearth_api::config::ApiConfig;
use hearth_core::ai::AiServices;
use hearth_core::ai::config::AiConfig;
use hearth_core::store::memory::MemoryStore;
use hearth_core::store::postgres::PgStore;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "hearth_server", about = "Hearth API server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8000")]
    bind_addr: String,

    /// PostgreSQL connection URL. Without it, data is kept in memory.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Directory that assistant replies are written to and served from.
    #[arg(long, env = "AUDIO_DIR", default_value = "public/audio")]
    audio_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hearth_api=debug,hearth_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    // CLI flags override the environment
    let mut config = ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    config.audio_dir = args.audio_dir;
    if let Some(url) = args.database_url.filter(|url| !url.trim().is_empty()) {
        config.database_url = Some(url);
    }
    let ai = AiServices::from_config(&AiConfig::from_env())?;

    let state = match &config.database_url {
        Some(url) => {
            info!(max_connections = args.max_connections, "connecting to PostgreSQL");
            let pool = PgPoolOptions::new()
                .max_connections(args.max_connections)
                .acquire_timeout(std::time::Duration::from_secs(30))
                .connect(url)
                .await?;

            info!("running database migrations");
            hearth_api::migrate(&pool).await?;

            hearth_api::AppState::new(config.clone(), Arc::new(PgStore::new(pool)), ai)
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory store");
            hearth_api::AppState::new(config.clone(), Arc::new(MemoryStore::new()), ai)
        }
    };

    tokio::fs::create_dir_all(&config.audio_dir).await?;
    let app = hearth_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
