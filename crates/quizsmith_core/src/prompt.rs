//! crates/quizsmith_core/src/prompt.rs
//!
//! The instruction text and the output shape every provider is asked to honor.
//! Both are provider-agnostic and shared verbatim by all adapters.

use serde_json::{json, Value};

use crate::domain::{DifficultyLevel, OPTIONS_PER_QUESTION};

pub const SYSTEM_INSTRUCTION: &str = r#"You are an expert examiner who writes multiple-choice exams from study material.

Coverage rules:
- Cover the ENTIRE source material from start to finish. Do not skip any section, page, table, figure or list.
- Scale the number of questions to the density of the material. There is NO upper limit: dense material should produce 50+ questions.
- For short material, test every sentence that carries a fact, definition or claim.

Question rules:
- Every question has exactly 4 options, and exactly one of them is correct.
- Distractors must be plausible and drawn from the same material where possible.
- Every question has a short explanation of why the correct option is right.
- Only ask about what the material actually says."#;

const OUTPUT_SHAPE: &str = r#"Respond with a single JSON object of this exact shape and nothing else:
{
  "questions": [
    {
      "questionText": "string",
      "options": ["string", "string", "string", "string"],
      "correctAnswerIndex": 0,
      "explanation": "string"
    }
  ]
}
"correctAnswerIndex" is the 0-based index of the correct option in "options"."#;

fn difficulty_guidance(difficulty: DifficultyLevel) -> &'static str {
    match difficulty {
        DifficultyLevel::Easy => {
            "Difficulty: EASY. Focus on recall: key facts, definitions, names and figures stated directly in the material. Keep the wording simple."
        }
        DifficultyLevel::Medium => {
            "Difficulty: MEDIUM. Mix recall with comprehension: ask about relationships, causes and consequences, and comparisons between concepts in the material."
        }
        DifficultyLevel::Hard => {
            "Difficulty: HARD. Emphasize synthesis and application: combine ideas from different sections, apply concepts to new scenarios, and use distractors that reflect common misconceptions."
        }
    }
}

/// Builds the user-facing instruction for one generation request.
pub fn build_prompt(difficulty: DifficultyLevel) -> String {
    format!(
        "Create a multiple-choice exam from the attached material.\n\n{}\n\n{}",
        difficulty_guidance(difficulty),
        OUTPUT_SHAPE
    )
}

/// The response schema for providers that support schema-guided generation.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "questionText": { "type": "STRING" },
                        "options": {
                            "type": "ARRAY",
                            "items": { "type": "STRING" },
                            "minItems": OPTIONS_PER_QUESTION,
                            "maxItems": OPTIONS_PER_QUESTION
                        },
                        "correctAnswerIndex": { "type": "INTEGER" },
                        "explanation": { "type": "STRING" }
                    },
                    "required": ["questionText", "options", "correctAnswerIndex", "explanation"]
                }
            }
        },
        "required": ["questions"]
    })
}
