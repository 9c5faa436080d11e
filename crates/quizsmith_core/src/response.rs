//! crates/quizsmith_core/src/response.rs
//!
//! The output contract shared by every provider: decoding the raw JSON payload
//! and validating it into `Question`s. Provider output is untrusted regardless of
//! whether the backend claims schema-constrained generation.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::domain::{Question, OPTIONS_PER_QUESTION};
use crate::ports::{PortError, PortResult};

/// `{questions: [{questionText, options, correctAnswerIndex, explanation}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuizResponse {
    pub questions: Vec<GeneratedQuestion>,
}

/// A question record as the provider sent it, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer_index: i64,
    pub explanation: String,
}

fn code_fence() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[a-zA-Z]*\s*(.*?)\s*```$").expect("code fence pattern is valid")
    })
}

/// Decodes a provider payload. Markdown code fences around the JSON are tolerated;
/// anything that still fails to decode is a `MalformedResponse`.
pub fn parse_generated_quiz(payload: &str) -> PortResult<GeneratedQuizResponse> {
    let trimmed = payload.trim();
    if trimmed.is_empty() {
        return Err(PortError::EmptyResponse);
    }

    let json = code_fence()
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map_or(trimmed, |m| m.as_str());

    serde_json::from_str(json).map_err(|e| PortError::MalformedResponse(e.to_string()))
}

impl GeneratedQuestion {
    fn into_question(self, id: usize) -> PortResult<Question> {
        let option_count = self.options.len();
        let options: [String; OPTIONS_PER_QUESTION] = self.options.try_into().map_err(|_| {
            PortError::MalformedResponse(format!(
                "question {} has {} options, expected {}",
                id, option_count, OPTIONS_PER_QUESTION
            ))
        })?;

        let correct_answer_index = usize::try_from(self.correct_answer_index)
            .ok()
            .filter(|index| *index < OPTIONS_PER_QUESTION)
            .ok_or_else(|| {
                PortError::MalformedResponse(format!(
                    "question {} has correct answer index {}, expected 0..{}",
                    id, self.correct_answer_index, OPTIONS_PER_QUESTION
                ))
            })?;

        if self.question_text.trim().is_empty() {
            return Err(PortError::MalformedResponse(format!("question {} has no text", id)));
        }

        Ok(Question {
            id,
            question_text: self.question_text,
            options,
            correct_answer_index,
            explanation: self.explanation,
        })
    }
}

impl GeneratedQuizResponse {
    /// Validates every record and assigns ordinal ids in the order received.
    /// A single invalid record rejects the whole quiz.
    pub fn into_questions(self) -> PortResult<Vec<Question>> {
        if self.questions.is_empty() {
            return Err(PortError::MalformedResponse("the quiz contains no questions".to_string()));
        }

        self.questions
            .into_iter()
            .enumerate()
            .map(|(id, raw)| raw.into_question(id))
            .collect()
    }
}
