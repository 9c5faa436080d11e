//! services/api/src/web/settings.rs
//!
//! Handlers for reading and replacing the persisted provider settings.

use axum::{extract::State, response::Json};
use quizsmith_core::ProviderSettings;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiError;
use crate::web::state::AppState;

/// Read the saved provider settings, with defaults filled in.
#[utoipa::path(
    get,
    path = "/settings",
    responses(
        (status = 200, description = "The provider selection and per-provider credentials")
    )
)]
pub async fn get_settings_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<ProviderSettings>, ApiError> {
    Ok(Json(app_state.store.load_settings().await?))
}

/// Replace the provider settings. Missing fields take their defaults.
#[utoipa::path(
    put,
    path = "/settings",
    request_body(content_type = "application/json", description = "`{ provider, gemini: { apiKey }, openai: { baseUrl, apiKey, model } }`"),
    responses(
        (status = 200, description = "The settings as saved"),
        (status = 400, description = "The body is not valid settings JSON")
    )
)]
pub async fn put_settings_handler(
    State(app_state): State<Arc<AppState>>,
    Json(settings): Json<ProviderSettings>,
) -> Result<Json<ProviderSettings>, ApiError> {
    app_state.store.save_settings(&settings).await?;
    info!(provider = ?settings.provider, "Provider settings saved");
    Ok(Json(settings))
}
