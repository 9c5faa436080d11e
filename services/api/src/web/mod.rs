pub mod history;
pub mod protocol;
pub mod quiz;
pub mod rest;
pub mod settings;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use quizsmith_core::MAX_UPLOAD_BYTES;
use std::sync::Arc;

use state::AppState;

/// Room for the multipart framing and the difficulty field around the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Builds the API router. CORS and the Swagger UI are layered on by the binary.
pub fn router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/quizzes", post(quiz::create_quiz_handler))
        .route(
            "/session",
            get(quiz::get_session_handler).delete(quiz::end_session_handler),
        )
        .route("/session/answer", post(quiz::answer_handler))
        .route("/session/advance", post(quiz::advance_handler))
        .route(
            "/settings",
            get(settings::get_settings_handler).put(settings::put_settings_handler),
        )
        .route(
            "/history",
            get(history::list_history_handler).delete(history::clear_history_handler),
        )
        .route("/history/{id}", delete(history::delete_history_entry_handler))
        .route("/history/{id}/retake", post(history::retake_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + MULTIPART_OVERHEAD))
        .with_state(app_state)
}
