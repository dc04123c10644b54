//! watch-together-hub server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use tracing_subscriber::EnvFilter;

use watch_together_hub::app_state::AppState;
use watch_together_hub::config::HubConfig;
use watch_together_hub::server::build_app;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = HubConfig::from_env()?;

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt().with_env_filter(
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    );
    if config.log_json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        chat_addressing = %config.chat_addressing,
        retain_empty_rooms = config.retain_empty_rooms,
        "starting watch-together-hub"
    );

    let app = build_app(AppState::from_config(&config));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
