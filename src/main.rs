use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use tripai::api::AppState;
use tripai::config::Settings;
use tripai::gemini::GeminiClient;
use tripai::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = Settings::from_env();
    let provider = Arc::new(GeminiClient::new(settings.api_key.clone()));

    web::run(settings.port, AppState { provider }).await
}
