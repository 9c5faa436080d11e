//! services/api/src/web/history.rs
//!
//! Handlers for browsing, deleting and retaking previously generated quizzes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use quizsmith_core::QuizSession;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::protocol::{HistorySummary, SessionView};
use crate::web::state::{ActiveQuiz, AppState};

/// List saved quizzes, newest first.
#[utoipa::path(
    get,
    path = "/history",
    responses((status = 200, description = "Up to 20 saved quizzes", body = [HistorySummary]))
)]
pub async fn list_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<Vec<HistorySummary>>, ApiError> {
    let history = app_state.store.load_history().await?;
    Ok(Json(history.iter().map(HistorySummary::from).collect()))
}

/// Remove every saved quiz.
#[utoipa::path(
    delete,
    path = "/history",
    responses((status = 204, description = "History cleared"))
)]
pub async fn clear_history_handler(
    State(app_state): State<Arc<AppState>>,
) -> Result<StatusCode, ApiError> {
    app_state.store.clear_history().await?;
    info!("History cleared");
    Ok(StatusCode::NO_CONTENT)
}

/// Remove one saved quiz.
#[utoipa::path(
    delete,
    path = "/history/{id}",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "No such entry")
    )
)]
pub async fn delete_history_entry_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    app_state.store.delete_history_entry(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Start a fresh session over a saved quiz's questions. No provider is called.
#[utoipa::path(
    post,
    path = "/history/{id}/retake",
    params(("id" = Uuid, Path, description = "History entry id")),
    responses(
        (status = 201, description = "A new session over the saved questions", body = SessionView),
        (status = 404, description = "No such entry")
    )
)]
pub async fn retake_handler(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<SessionView>), ApiError> {
    let entry = app_state.store.find_history_entry(id).await?;
    let quiz = ActiveQuiz {
        history_id: entry.id,
        file_name: entry.file_name,
        difficulty: entry.difficulty,
        session: QuizSession::new(entry.questions),
    };
    let view = SessionView::from(&quiz);
    *app_state.active_quiz.lock().await = Some(quiz);

    info!(history_id = %id, "Retaking saved quiz");
    Ok((StatusCode::CREATED, Json(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::quiz::{answer_handler, tests::test_state};
    use crate::web::protocol::AnswerRequest;
    use quizsmith_core::{
        DifficultyLevel, HistoryEntry, PortError, ProviderResolver, ProviderSettings, Question, QuizProvider,
    };

    struct Unused;

    impl ProviderResolver for Unused {
        fn resolve(&self, _: &ProviderSettings) -> Arc<dyn QuizProvider> {
            unreachable!("history handlers never generate")
        }
    }

    fn entry(file_name: &str) -> HistoryEntry {
        let question = Question {
            id: 0,
            question_text: "Which way do rivers flow?".to_string(),
            options: ["up".into(), "down".into(), "sideways".into(), "nowhere".into()],
            correct_answer_index: 1,
            explanation: "Gravity.".to_string(),
        };
        HistoryEntry::new(file_name, DifficultyLevel::Easy, vec![question])
    }

    #[tokio::test]
    async fn retake_starts_a_clean_session_from_history() {
        let state = test_state(Arc::new(Unused));
        let saved = entry("rivers.pdf");
        let id = saved.id;
        state.store.record_quiz(saved).await.unwrap();

        let (status, view) = retake_handler(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(view.0.history_id, id);
        assert_eq!(view.0.state, "awaiting_answer");

        answer_handler(State(state.clone()), Json(AnswerRequest { option: 1 })).await.unwrap();

        // A second retake discards the previous attempt.
        let (_, again) = retake_handler(State(state.clone()), Path(id)).await.unwrap();
        assert_eq!(again.0.state, "awaiting_answer");
        assert!(again.0.reveal.is_none());

        // Retaking does not add to history.
        assert_eq!(state.store.load_history().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_entries_are_not_found() {
        let state = test_state(Arc::new(Unused));

        let err = retake_handler(State(state.clone()), Path(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ApiError::Port(PortError::NotFound(_))));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = delete_history_entry_handler(State(state), Path(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, ApiError::Port(PortError::NotFound(_))));
    }

    #[tokio::test]
    async fn listing_deleting_and_clearing() {
        let state = test_state(Arc::new(Unused));
        let older = entry("older.txt");
        let older_id = older.id;
        state.store.record_quiz(older).await.unwrap();
        state.store.record_quiz(entry("newer.txt")).await.unwrap();

        let listed = list_history_handler(State(state.clone())).await.unwrap().0;
        let names: Vec<_> = listed.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, ["newer.txt", "older.txt"]);
        assert_eq!(listed[0].question_count, 1);

        delete_history_entry_handler(State(state.clone()), Path(older_id)).await.unwrap();
        assert_eq!(list_history_handler(State(state.clone())).await.unwrap().0.len(), 1);

        clear_history_handler(State(state.clone())).await.unwrap();
        assert!(list_history_handler(State(state)).await.unwrap().0.is_empty());
    }
}
