//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use utoipa::OpenApi;

use crate::web::{history, protocol, quiz, settings};

#[derive(OpenApi)]
#[openapi(
    paths(
        quiz::create_quiz_handler,
        quiz::get_session_handler,
        quiz::answer_handler,
        quiz::advance_handler,
        quiz::end_session_handler,
        settings::get_settings_handler,
        settings::put_settings_handler,
        history::list_history_handler,
        history::clear_history_handler,
        history::delete_history_entry_handler,
        history::retake_handler,
    ),
    components(
        schemas(
            protocol::AnswerRequest,
            protocol::QuestionView,
            protocol::RevealView,
            protocol::ReviewedQuestion,
            protocol::ResultView,
            protocol::SessionView,
            protocol::HistorySummary,
        )
    ),
    tags(
        (name = "Quizsmith API", description = "Turn study material into multiple-choice quizzes and take them.")
    )
)]
pub struct ApiDoc;
