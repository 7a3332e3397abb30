use anyhow::Result;
use axum::Router;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{fs, io::ErrorKind, path::Path, str::FromStr, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + migrate flag ---
    let (cfg, migrate_only) = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting shareit with config: {:?}", cfg);

    // --- Initialize SQLite connection ---
    let db_url = &cfg.database_url;
    tracing::debug!("Connecting using raw URL => {}", db_url);

    // Extract the local file path SQLx will use
    let db_path = db_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("file:");

    // Create parent directory if needed
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    let options = SqliteConnectOptions::from_str(db_url)?.create_if_missing(true);
    let db: Arc<sqlx::Pool<sqlx::Sqlite>> = Arc::new(
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?,
    );

    // --- Apply migrations ---
    sqlx::migrate!().run(&*db).await?;
    if migrate_only {
        tracing::info!("Database migration complete.");
        return Ok(()); // exit after migration
    }

    // --- Initialize services ---
    let state = services::AppState::new(db);

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(state);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
