//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the single active quiz.

use quizsmith_core::{DifficultyLevel, QuizGenerator, QuizSession, StudyStore};
use tokio::sync::Mutex;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
pub struct AppState {
    pub store: StudyStore,
    pub generator: QuizGenerator,
    /// The quiz being taken. Starting a new quiz or going home replaces it.
    pub active_quiz: Mutex<Option<ActiveQuiz>>,
    /// Held for the duration of a generation; only one may be in flight.
    pub generation: Mutex<()>,
}

impl AppState {
    pub fn new(store: StudyStore, generator: QuizGenerator) -> Self {
        Self {
            store,
            generator,
            active_quiz: Mutex::new(None),
            generation: Mutex::new(()),
        }
    }
}

//=========================================================================================
// ActiveQuiz (The Session Being Taken)
//=========================================================================================

/// A quiz session plus the history entry it came from.
pub struct ActiveQuiz {
    pub history_id: Uuid,
    pub file_name: String,
    pub difficulty: DifficultyLevel,
    pub session: QuizSession,
}
