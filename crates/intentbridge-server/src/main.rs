mod configuration;
mod error;
mod routes;
mod state;

use anyhow::Context;
use intentbridge::{
    completion::CompletionClient, providers::openai::OpenAiProvider, webhook::WebhookHandler,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let settings = configuration::Settings::new()?;
    let addr = settings
        .server
        .socket_addr()
        .context("invalid server host/port")?;

    let webhook = settings.webhook;
    info!(
        model = %settings.provider.model,
        endpoint = %settings.provider.endpoint,
        timeout_secs = settings.provider.timeout_secs,
        fallback_intent = %webhook.fallback_intent,
        "configured completion provider"
    );

    // Create app state
    let provider = OpenAiProvider::new(settings.provider.into_config())?;
    let client = CompletionClient::new(Arc::new(provider)).with_persona(webhook.persona);
    let handler = WebhookHandler::new(client).with_fallback_intent(webhook.fallback_intent);
    let state = state::AppState::new(handler);

    // Create router
    let app = routes::configure(state);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
