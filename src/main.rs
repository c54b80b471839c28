use anyhow::Context;
use tracing_subscriber::EnvFilter;

use rentease::backend::Backend;
use rentease::config::config;
use rentease::{app, is_development, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up BACKEND_URL, BACKEND_ANON_KEY, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rentease=info,tower_http=info")),
        )
        .init();

    let config = config();
    config.validate().context("invalid configuration")?;
    tracing::info!("Starting RentEase in {:?} mode", config.environment);
    if is_development!() {
        tracing::info!("Development defaults in effect");
    }

    let backend = Backend::from_config(&config.backend).await?;
    let app = app(AppState::new(backend, config.clone()));

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("RentEase view server listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
