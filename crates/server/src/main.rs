use std::str::FromStr;
use std::sync::Arc;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing_subscriber::EnvFilter;

use api::{AppState, router};
use auth::AuthService;
use authkit_core::AppConfig;
use store::{SqliteUserStore, run_migrations};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Missing secrets are a startup failure, never a runtime one.
    let config = AppConfig::load_with_env().unwrap_or_else(|e| {
        eprintln!("configuration error: {e}");
        std::process::exit(1);
    });

    let options = SqliteConnectOptions::from_str(&config.database.url)
        .unwrap_or_else(|e| {
            eprintln!("invalid database url: {e}");
            std::process::exit(1);
        })
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .unwrap_or_else(|e| {
            eprintln!("failed to open database: {e}");
            std::process::exit(1);
        });

    if let Err(e) = run_migrations(&pool).await {
        eprintln!("migration failed: {e}");
        std::process::exit(1);
    }

    let auth_service = AuthService::new(
        Arc::new(SqliteUserStore::new(pool)),
        config.auth.access_secret,
        config.auth.refresh_secret,
        config.auth.access_ttl_seconds,
        config.auth.refresh_ttl_seconds,
    );

    let app = router::router(Arc::new(AppState::new(auth_service)));

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        eprintln!("failed to bind {addr}: {e}");
        std::process::exit(1);
    });

    tracing::info!(addr = %addr, "listening");
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "server exited");
        std::process::exit(1);
    }
}
