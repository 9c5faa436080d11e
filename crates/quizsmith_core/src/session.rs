//! crates/quizsmith_core/src/session.rs
//!
//! The quiz-taking state machine. One question at a time: an answer is recorded
//! once, then revealed, then the session advances. There is no skipping and no
//! going back.

use serde::Serialize;

use crate::domain::{Question, QuizResult, OPTIONS_PER_QUESTION};

/// Where a session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "index", rename_all = "snake_case")]
pub enum SessionState {
    AwaitingAnswer(usize),
    Revealed(usize),
    Completed,
}

/// Illegal transitions and invalid input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Question {index} must be answered before advancing")]
    NotAnswered { index: usize },
    #[error("Option {option} does not exist, expected 0 to 3")]
    InvalidOption { option: usize },
    #[error("The quiz is already completed")]
    AlreadyCompleted,
}

/// What the user sees once an answer is locked in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reveal {
    pub question_index: usize,
    pub selected: usize,
    pub correct_answer_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

/// One attempt at a question sequence.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    state: SessionState,
}

impl QuizSession {
    /// Starts a session at the first question. An empty sequence is completed immediately.
    pub fn new(questions: Vec<Question>) -> Self {
        let state = if questions.is_empty() {
            SessionState::Completed
        } else {
            SessionState::AwaitingAnswer(0)
        };
        Self {
            answers: vec![None; questions.len()],
            questions,
            state,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// The question being shown, if the session is not completed.
    pub fn current_question(&self) -> Option<&Question> {
        match self.state {
            SessionState::AwaitingAnswer(i) | SessionState::Revealed(i) => self.questions.get(i),
            SessionState::Completed => None,
        }
    }

    /// The reveal for the current question, once it has been answered.
    pub fn reveal(&self) -> Option<Reveal> {
        let SessionState::Revealed(index) = self.state else {
            return None;
        };
        let question = &self.questions[index];
        let selected = self.answers[index]?;
        Some(Reveal {
            question_index: index,
            selected,
            correct_answer_index: question.correct_answer_index,
            is_correct: question.is_correct(selected),
            explanation: question.explanation.clone(),
        })
    }

    /// Records an answer for the current question and reveals it.
    ///
    /// Answers are write-once: selecting again on a revealed question leaves the
    /// recorded answer untouched and returns the existing reveal.
    pub fn select_option(&mut self, option: usize) -> Result<Reveal, SessionError> {
        match self.state {
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
            SessionState::Revealed(_) => self.reveal().ok_or(SessionError::AlreadyCompleted),
            SessionState::AwaitingAnswer(index) => {
                if option >= OPTIONS_PER_QUESTION {
                    return Err(SessionError::InvalidOption { option });
                }
                self.answers[index] = Some(option);
                self.state = SessionState::Revealed(index);
                self.reveal().ok_or(SessionError::NotAnswered { index })
            }
        }
    }

    /// Moves past a revealed question. Only legal from `Revealed`.
    pub fn advance(&mut self) -> Result<SessionState, SessionError> {
        match self.state {
            SessionState::AwaitingAnswer(index) => Err(SessionError::NotAnswered { index }),
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
            SessionState::Revealed(index) => {
                let next = index + 1;
                self.state = if next < self.questions.len() {
                    SessionState::AwaitingAnswer(next)
                } else {
                    SessionState::Completed
                };
                Ok(self.state)
            }
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// The final result, available once the session is completed.
    /// Unanswered questions count as incorrect.
    pub fn result(&self) -> Option<QuizResult> {
        if !self.is_completed() {
            return None;
        }

        let score = self
            .answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| answer.is_some_and(|a| question.is_correct(a)))
            .count();

        Some(QuizResult {
            score,
            total: self.questions.len(),
            user_answers: self.answers.clone(),
            questions: self.questions.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions(correct: &[usize]) -> Vec<Question> {
        correct
            .iter()
            .enumerate()
            .map(|(id, &correct_answer_index)| Question {
                id,
                question_text: format!("Question {}", id),
                options: ["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer_index,
                explanation: format!("Explanation {}", id),
            })
            .collect()
    }

    #[test]
    fn scores_a_mixed_attempt() {
        let mut session = QuizSession::new(questions(&[1, 2, 0]));

        for option in [1, 3, 0] {
            session.select_option(option).unwrap();
            session.advance().unwrap();
        }

        let result = session.result().unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.user_answers, vec![Some(1), Some(3), Some(0)]);
        assert_eq!(result.questions.len(), 3);
    }

    #[test]
    fn n_cycles_reach_completed() {
        for n in 1..6 {
            let mut session = QuizSession::new(questions(&vec![0; n]));
            for i in 0..n {
                assert_eq!(session.state(), SessionState::AwaitingAnswer(i));
                assert!(session.advance().is_err());
                session.select_option(2).unwrap();
                assert_eq!(session.state(), SessionState::Revealed(i));
                session.advance().unwrap();
            }
            assert_eq!(session.state(), SessionState::Completed);
            assert_eq!(session.result().unwrap().user_answers.len(), n);
        }
    }

    #[test]
    fn second_selection_is_ignored() {
        let mut session = QuizSession::new(questions(&[1, 0]));
        let first = session.select_option(1).unwrap();
        let second = session.select_option(3).unwrap();

        assert_eq!(first, second);
        assert!(second.is_correct);
        assert_eq!(session.answers()[0], Some(1));
    }

    #[test]
    fn advance_before_answer_is_illegal() {
        let mut session = QuizSession::new(questions(&[0]));
        assert_eq!(session.advance(), Err(SessionError::NotAnswered { index: 0 }));
        assert_eq!(session.state(), SessionState::AwaitingAnswer(0));
    }

    #[test]
    fn reveal_exposes_correctness_and_explanation() {
        let mut session = QuizSession::new(questions(&[2]));
        assert!(session.reveal().is_none());

        let reveal = session.select_option(0).unwrap();
        assert!(!reveal.is_correct);
        assert_eq!(reveal.correct_answer_index, 2);
        assert_eq!(reveal.explanation, "Explanation 0");
    }

    #[test]
    fn rejects_out_of_range_options() {
        let mut session = QuizSession::new(questions(&[0]));
        assert_eq!(session.select_option(4), Err(SessionError::InvalidOption { option: 4 }));
        assert_eq!(session.state(), SessionState::AwaitingAnswer(0));
    }

    #[test]
    fn completed_session_is_frozen() {
        let mut session = QuizSession::new(questions(&[0]));
        session.select_option(0).unwrap();
        session.advance().unwrap();

        assert_eq!(session.select_option(1), Err(SessionError::AlreadyCompleted));
        assert_eq!(session.advance(), Err(SessionError::AlreadyCompleted));
        assert!(session.current_question().is_none());
        assert_eq!(session.result().unwrap().score, 1);
    }

    #[test]
    fn result_is_unavailable_mid_quiz() {
        let mut session = QuizSession::new(questions(&[0, 1]));
        session.select_option(0).unwrap();
        session.advance().unwrap();
        assert!(session.result().is_none());
    }

    #[test]
    fn empty_sequence_completes_immediately() {
        let session = QuizSession::new(Vec::new());
        let result = session.result().unwrap();
        assert_eq!((result.score, result.total), (0, 0));
    }
}
