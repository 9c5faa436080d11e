//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{FileStore, ProviderRegistry},
    config::{Config, ConfigError},
    error::ApiError,
    web::{rest::ApiDoc, router, state::AppState},
};
use axum::http::{header::{ACCEPT, CONTENT_TYPE}, HeaderValue, Method};
use axum::Router;
use quizsmith_core::{QuizGenerator, StudyStore};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Open the Settings & History Store ---
    let file_store = FileStore::open(config.data_dir.clone()).await?;
    let store = StudyStore::new(Arc::new(file_store));
    info!(data_dir = %config.data_dir.display(), "Study store ready");
    if config.gemini_api_key.is_none() {
        info!("GEMINI_API_KEY is not set; Gemini requires a key in the saved settings.");
    }

    // --- 3. Initialize Provider Adapters ---
    let http = reqwest::Client::new();
    let registry = ProviderRegistry::new(http, &config);
    let generator = QuizGenerator::new(Arc::new(registry));

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState::new(store, generator));

    // --- 5. Create the Web Router ---
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
    })?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, ACCEPT]);

    let app = Router::new()
        .merge(router(app_state).layer(cors))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
