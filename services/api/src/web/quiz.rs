//! services/api/src/web/quiz.rs
//!
//! Handlers for generating a quiz from an upload and for taking it one question
//! at a time.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use bytes::Bytes;
use quizsmith_core::{DifficultyLevel, HistoryEntry, MediaType, UploadedDocument, MAX_UPLOAD_BYTES};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::web::protocol::{AnswerRequest, SessionView};
use crate::web::state::{ActiveQuiz, AppState};

//=========================================================================================
// Upload Validation
//=========================================================================================

/// Resolves the media type from the declared MIME type, falling back to the file
/// extension when the browser sent nothing useful.
pub fn detect_media_type(declared: Option<&str>, file_name: &str) -> Result<MediaType, ApiError> {
    if let Some(media_type) = declared.and_then(MediaType::from_mime) {
        return Ok(media_type);
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => Ok(MediaType::Pdf),
        Some("txt") | Some("md") => Ok(MediaType::PlainText),
        Some("jpg") | Some("jpeg") => Ok(MediaType::Jpeg),
        Some("png") => Ok(MediaType::Png),
        Some("webp") => Ok(MediaType::Webp),
        _ => Err(ApiError::UnsupportedMediaType(
            declared.unwrap_or(file_name).to_string(),
        )),
    }
}

/// Checks type and size before anything reaches the core.
pub fn validate_upload(
    file_name: String,
    declared: Option<&str>,
    data: Bytes,
) -> Result<UploadedDocument, ApiError> {
    let media_type = detect_media_type(declared, &file_name)?;
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::FileTooLarge(data.len()));
    }
    if data.is_empty() {
        return Err(ApiError::InvalidUpload("the file is empty".to_string()));
    }
    Ok(UploadedDocument::new(file_name, media_type, data))
}

//=========================================================================================
// Generation
//=========================================================================================

/// Generates a quiz, records it in history and makes it the active quiz.
/// Rejects the request while another generation is still running.
pub async fn generate_and_start(
    state: &AppState,
    document: UploadedDocument,
    difficulty: DifficultyLevel,
) -> Result<SessionView, ApiError> {
    let _in_flight = state
        .generation
        .try_lock()
        .map_err(|_| ApiError::GenerationInProgress)?;

    let settings = state.store.load_settings().await?;
    let questions = state
        .generator
        .generate(&document, difficulty, &settings)
        .await?;

    let entry = HistoryEntry::new(document.file_name.clone(), difficulty, questions.clone());
    let history_id = entry.id;
    if let Err(e) = state.store.record_quiz(entry).await {
        warn!(error = %e, "Could not save the quiz to history");
    }

    let quiz = ActiveQuiz {
        history_id,
        file_name: document.file_name,
        difficulty,
        session: quizsmith_core::QuizSession::new(questions),
    };
    let view = SessionView::from(&quiz);
    *state.active_quiz.lock().await = Some(quiz);
    Ok(view)
}

/// Generate a quiz from an uploaded document.
///
/// Accepts a multipart/form-data request with a `file` part and an optional
/// `difficulty` part (`Easy`, `Medium` or `Hard`; defaults to `Medium`).
#[utoipa::path(
    post,
    path = "/quizzes",
    request_body(content_type = "multipart/form-data", description = "The document to turn into a quiz, plus the difficulty."),
    responses(
        (status = 201, description = "Quiz generated and started", body = SessionView),
        (status = 400, description = "Missing file, bad difficulty, or missing provider credentials"),
        (status = 409, description = "Another quiz is being generated"),
        (status = 413, description = "File larger than 5 MiB"),
        (status = 415, description = "Unsupported file type"),
        (status = 422, description = "The document could not be read or has no text"),
        (status = 502, description = "The provider failed or returned an unusable quiz")
    )
)]
pub async fn create_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let mut upload = None;
    let mut difficulty = DifficultyLevel::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(format!("failed to read multipart data: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("untitled").to_string();
                let declared = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidUpload(format!("failed to read file bytes: {}", e)))?;
                upload = Some((file_name, declared, data));
            }
            Some("difficulty") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::InvalidUpload(e.to_string()))?;
                difficulty = text.parse().map_err(ApiError::InvalidUpload)?;
            }
            _ => {}
        }
    }

    let (file_name, declared, data) = upload
        .ok_or_else(|| ApiError::InvalidUpload("multipart form must include a file".to_string()))?;
    let document = validate_upload(file_name, declared.as_deref(), data)?;

    let view = generate_and_start(&app_state, document, difficulty).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

//=========================================================================================
// Taking the Quiz
//=========================================================================================

/// Show the active quiz.
#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "The active quiz", body = SessionView),
        (status = 404, description = "No quiz is in progress")
    )
)]
pub async fn get_session_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, ApiError> {
    let active = app_state.active_quiz.lock().await;
    let quiz = active.as_ref().ok_or(ApiError::NoActiveSession)?;
    Ok(Json(SessionView::from(quiz)))
}

/// Answer the current question. Answers are final; repeating the call changes nothing.
#[utoipa::path(
    post,
    path = "/session/answer",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "The answer is locked in and revealed", body = SessionView),
        (status = 400, description = "The option index is not 0 to 3"),
        (status = 404, description = "No quiz is in progress"),
        (status = 409, description = "The quiz is already completed")
    )
)]
pub async fn answer_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut active = app_state.active_quiz.lock().await;
    let quiz = active.as_mut().ok_or(ApiError::NoActiveSession)?;
    quiz.session.select_option(request.option)?;
    Ok(Json(SessionView::from(&*quiz)))
}

/// Move on from a revealed question. Completes the quiz after the last one.
#[utoipa::path(
    post,
    path = "/session/advance",
    responses(
        (status = 200, description = "The next question, or the final result", body = SessionView),
        (status = 404, description = "No quiz is in progress"),
        (status = 409, description = "The current question has not been answered")
    )
)]
pub async fn advance_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<SessionView>, ApiError> {
    let mut active = app_state.active_quiz.lock().await;
    let quiz = active.as_mut().ok_or(ApiError::NoActiveSession)?;
    quiz.session.advance()?;

    if let Some(result) = quiz.session.result() {
        info!(
            history_id = %quiz.history_id,
            score = result.score,
            total = result.total,
            "Quiz completed"
        );
    }
    Ok(Json(SessionView::from(&*quiz)))
}

/// Abandon the active quiz and return home.
#[utoipa::path(
    delete,
    path = "/session",
    responses((status = 204, description = "The active quiz was discarded"))
)]
pub async fn end_session_handler(State(app_state): State<Arc<AppState>>) -> StatusCode {
    app_state.active_quiz.lock().await.take();
    StatusCode::NO_CONTENT
}
