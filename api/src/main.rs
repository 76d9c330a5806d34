use anyhow::Result;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use workout_api::config::{AppConfig, StorageBackend};
use workout_api::observability::Observability;
use workout_api::repository::{InMemoryRepository, PgRepository, Repository};
use workout_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();

    let obs = Observability::init()?;
    let config = AppConfig::from_env()?;

    let repo: Arc<dyn Repository> = match &config.storage {
        StorageBackend::Postgres {
            connection_string,
            max_connections,
        } => {
            let pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(connection_string)
                .await?;

            sqlx::migrate!("../migrations").run(&pool).await?;
            tracing::info!("Database connected and migrations applied");

            Arc::new(PgRepository::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, data is lost on shutdown");
            Arc::new(InMemoryRepository::new())
        }
    };

    let state = AppState::new(repo, config.limits, obs.registry);
    let app = workout_api::app(state);

    tracing::info!("API server listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
