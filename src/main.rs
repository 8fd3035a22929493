use moka::future::Cache;
use rust_fiscal_api::config::Config;
use rust_fiscal_api::db::Database;
use rust_fiscal_api::handlers::AppState;
use rust_fiscal_api::routes;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the application.
///
/// Sets up tracing, loads configuration, opens the database pool and serves the
/// router built by [`routes::app`].
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_fiscal_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize database connection pool
    let db = Database::new(&config.database_url).await?;
    tracing::info!("Database connection pool established");

    // Same-day recurrence trigger guard (1 hour TTL)
    let recent_runs_cache = Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(1_000)
        .build();
    tracing::info!("Recurrence run cache initialized (1h TTL)");

    let app_state = Arc::new(AppState {
        db: db.pool.clone(),
        config: config.clone(),
        recent_runs_cache,
    });

    let app = routes::app(app_state)?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
