//! Account balance service - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Pick the account store: Postgres when `DATABASE_URL` is set, memory otherwise
//! 3. Run database migrations (Postgres only)
//! 4. Build HTTP router with routes and middleware
//! 5. Start server on configured port

use tracing_subscriber::EnvFilter;

use user_balance_server::{
    config::Config,
    db,
    handlers::AppState,
    routes,
    services::ledger::Ledger,
    store::{AccountStore, MemoryStore, PgStore},
    validation::Validator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded");

    match config.database_url.as_deref() {
        Some(url) => {
            let pool = db::create_pool(url, config.max_db_connections).await?;
            tracing::info!("Database pool created");

            db::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            serve(&config, PgStore::new(pool)).await
        }
        None => {
            tracing::warn!("DATABASE_URL not set, accounts are kept in memory only");
            serve(&config, MemoryStore::new()).await
        }
    }
}

async fn serve<S: AccountStore>(config: &Config, store: S) -> anyhow::Result<()> {
    let validator = Validator::from_config(config)?;
    let state = AppState::new(Ledger::new(store), validator);
    let app = routes::router(state, config.request_timeout());

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
