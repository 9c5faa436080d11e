//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the browser and the API server.
//! Correct answers and explanations only appear once a question is revealed.

use chrono::{DateTime, Utc};
use quizsmith_core::{HistoryEntry, Question, QuizResult, Reveal, SessionState};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::state::ActiveQuiz;

//=========================================================================================
// Requests FROM the Browser
//=========================================================================================

/// Locks in an answer for the current question.
#[derive(Deserialize, Debug, ToSchema)]
pub struct AnswerRequest {
    /// 0-based option index.
    pub option: usize,
}

//=========================================================================================
// Responses TO the Browser
//=========================================================================================

/// A question as shown before it is answered.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: usize,
    pub question_text: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            question_text: question.question_text.clone(),
            options: question.options.to_vec(),
        }
    }
}

/// Correctness and explanation for an answered question.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevealView {
    pub selected: usize,
    pub correct_answer_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

impl From<Reveal> for RevealView {
    fn from(reveal: Reveal) -> Self {
        Self {
            selected: reveal.selected,
            correct_answer_index: reveal.correct_answer_index,
            is_correct: reveal.is_correct,
            explanation: reveal.explanation,
        }
    }
}

/// A fully disclosed question, used for the end-of-quiz review.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewedQuestion {
    pub id: usize,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: usize,
    pub explanation: String,
    pub user_answer: Option<usize>,
}

#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultView {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub user_answers: Vec<Option<usize>>,
    pub questions: Vec<ReviewedQuestion>,
}

impl From<QuizResult> for ResultView {
    fn from(result: QuizResult) -> Self {
        let percentage = result.percentage();
        let questions = result
            .questions
            .iter()
            .zip(result.user_answers.iter())
            .map(|(question, answer)| ReviewedQuestion {
                id: question.id,
                question_text: question.question_text.clone(),
                options: question.options.to_vec(),
                correct_answer_index: question.correct_answer_index,
                explanation: question.explanation.clone(),
                user_answer: *answer,
            })
            .collect();
        Self {
            score: result.score,
            total: result.total,
            percentage,
            user_answers: result.user_answers,
            questions,
        }
    }
}

/// Where the quiz stands, with exactly what the browser may show at this point.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub history_id: Uuid,
    pub file_name: String,
    pub difficulty: String,
    /// `awaiting_answer`, `revealed` or `completed`.
    pub state: String,
    /// 0-based index of the current question; equals `total` once completed.
    pub position: usize,
    pub total: usize,
    pub question: Option<QuestionView>,
    pub reveal: Option<RevealView>,
    pub result: Option<ResultView>,
}

impl From<&ActiveQuiz> for SessionView {
    fn from(quiz: &ActiveQuiz) -> Self {
        let session = &quiz.session;
        let (state, position) = match session.state() {
            SessionState::AwaitingAnswer(i) => ("awaiting_answer", i),
            SessionState::Revealed(i) => ("revealed", i),
            SessionState::Completed => ("completed", session.total()),
        };
        Self {
            history_id: quiz.history_id,
            file_name: quiz.file_name.clone(),
            difficulty: quiz.difficulty.to_string(),
            state: state.to_string(),
            position,
            total: session.total(),
            question: session.current_question().map(QuestionView::from),
            reveal: session.reveal().map(RevealView::from),
            result: session.result().map(ResultView::from),
        }
    }
}

/// One row of the history list.
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: Uuid,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub difficulty: String,
    pub question_count: usize,
}

impl From<&HistoryEntry> for HistorySummary {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: entry.id,
            file_name: entry.file_name.clone(),
            created_at: entry.created_at,
            difficulty: entry.difficulty.to_string(),
            question_count: entry.questions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizsmith_core::{DifficultyLevel, QuizSession};

    fn active(correct: &[usize]) -> ActiveQuiz {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(id, &correct_answer_index)| Question {
                id,
                question_text: format!("Q{}", id),
                options: ["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer_index,
                explanation: "why".to_string(),
            })
            .collect();
        ActiveQuiz {
            history_id: Uuid::new_v4(),
            file_name: "notes.pdf".to_string(),
            difficulty: DifficultyLevel::Medium,
            session: QuizSession::new(questions),
        }
    }

    #[test]
    fn unanswered_question_hides_the_answer() {
        let quiz = active(&[2, 1]);
        let view = SessionView::from(&quiz);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["state"], "awaiting_answer");
        assert_eq!(json["question"]["questionText"], "Q0");
        assert!(json["question"].get("correctAnswerIndex").is_none());
        assert!(json["reveal"].is_null());
        assert!(json["result"].is_null());
    }

    #[test]
    fn completed_quiz_carries_the_review() {
        let mut quiz = active(&[2]);
        quiz.session.select_option(0).unwrap();
        quiz.session.advance().unwrap();

        let view = SessionView::from(&quiz);
        assert_eq!(view.state, "completed");
        assert_eq!(view.position, 1);
        assert!(view.question.is_none());

        let result = view.result.unwrap();
        assert_eq!((result.score, result.total, result.percentage), (0, 1, 0));
        assert_eq!(result.questions[0].user_answer, Some(0));
        assert_eq!(result.questions[0].correct_answer_index, 2);
    }
}
