use std::{sync::Arc, time::Duration};

use anyhow::Context;
use marquee::{
    api::{create_router, AppState},
    config::Config,
    db::Cache,
    logging,
    services::{providers::TmdbProvider, PosterService, Recommender},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init_logging(config.log_format);

    // Data problems are fatal: there is nothing to serve without them
    let recommender = Recommender::from_config(&config).context("Failed to load movie data")?;
    tracing::info!(movies = recommender.len(), "Movie data ready");

    let provider = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.poster_timeout_secs),
    )?;
    let posters = PosterService::new(
        Arc::new(provider),
        Cache::new(),
        config.tmdb_image_base_url.clone(),
    );

    let app = create_router(AppState::new(recommender, posters));

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!("Server running on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
