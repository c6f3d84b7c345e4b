use std::sync::Arc;

use storybook_server::{api, provider::OpenRouterClient, AppState, Config};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook_server=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!(
        port = config.port,
        model = %config.model,
        provider = %config.provider_base_url,
        "storybook server starting"
    );
    if config.api_key.is_none() {
        warn!("OPENROUTER_API_KEY is not set; outline requests will fail until it is configured");
    }

    let provider = OpenRouterClient::new(reqwest::Client::new(), &config.provider_base_url);
    let frontend_dist = config.frontend_dist.clone();
    let port = config.port;
    let state = Arc::new(AppState::new(config, Arc::new(provider)));

    // Dioxus WASM frontend — served from the dx build output directory.
    // Unknown paths fall back to index.html so the client-side app handles them.
    info!(path = %frontend_dist, "serving frontend assets from");
    let frontend = ServeDir::new(&frontend_dist)
        .fallback(ServeFile::new(format!("{frontend_dist}/index.html")));

    let app = api::router()
        .fallback_service(frontend)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = format!("0.0.0.0:{port}");
    info!("listening on {addr}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
