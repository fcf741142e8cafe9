use std::{sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use journey_api::{
    config::Config,
    routes::{create_router, AppState},
    services::{
        generation::{HuggingFaceGenerator, TextGenerator},
        providers::SpotifyClient,
        recommendations::Recommender,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("journey_api=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let music = Arc::new(SpotifyClient::new(
        config.spotify_client_id.clone(),
        config.spotify_client_secret.clone(),
        config.callback_uri(),
    ));

    let generator: Option<Arc<dyn TextGenerator>> = match config.generation_api_key() {
        Some(api_key) => {
            let generator = HuggingFaceGenerator::new(
                api_key,
                config.generation_api_url.clone(),
                Duration::from_secs(config.generation_timeout_secs),
            )?;
            Some(Arc::new(generator))
        }
        None => {
            tracing::warn!("No text generation key configured, using rule-based recommendations only");
            None
        }
    };

    let state = AppState::new(music, Recommender::new(generator), config.frontend_url.clone());

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();
    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let app = create_router(state).layer(cors);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
