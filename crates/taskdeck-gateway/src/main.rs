use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taskdeck_gateway::app::{self, AppState};
use taskdeck_gateway::config::GatewayConfig;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = GatewayConfig::load()?;
    init_tracing(&config);

    let addr = config.socket_addr();
    let upstream = config.upstream.base_url.clone();

    let app = app::router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Gateway listening at http://{}", addr);
    tracing::info!("Proxying /api requests to {}", upstream);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(config: &GatewayConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.log_filter().into());

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format.to_lowercase().as_str() {
        "compact" => registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init(),
        "full" => registry.with(tracing_subscriber::fmt::layer()).init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}
