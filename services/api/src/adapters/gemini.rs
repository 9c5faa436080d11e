//! services/api/src/adapters/gemini.rs
//!
//! This module contains the adapter for the Google Gemini API, the primary provider.
//! It implements the `QuizProvider` port from the `core` crate. Gemini reads PDFs,
//! text and images natively, so documents are sent inline and the reply is
//! constrained by a response schema.

use async_trait::async_trait;
use quizsmith_core::{
    prompt::{build_prompt, response_schema, SYSTEM_INSTRUCTION},
    response::parse_generated_quiz,
    DifficultyLevel, GeneratedQuizResponse, NormalizedContent, PortError, PortResult, QuizProvider,
    UploadedDocument,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::common::{normalize_document, read_json, transport_error};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: &'static str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizProvider` on Gemini's `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiQuizAdapter {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiQuizAdapter {
    /// Creates a new `GeminiQuizAdapter`. A missing key is only reported when a quiz is requested.
    pub fn new(http: reqwest::Client, base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    fn build_request(content: NormalizedContent, difficulty: DifficultyLevel) -> GenerateContentRequest {
        let document_part = match content {
            NormalizedContent::Inline { media_type, data } => Part::Inline {
                inline_data: InlineData {
                    mime_type: media_type.mime(),
                    data,
                },
            },
            NormalizedContent::Text(text) => Part::Text { text },
        };

        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part::Text {
                    text: SYSTEM_INSTRUCTION.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![
                    document_part,
                    Part::Text {
                        text: build_prompt(difficulty),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }
}

//=========================================================================================
// `QuizProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizProvider for GeminiQuizAdapter {
    async fn generate(
        &self,
        document: &UploadedDocument,
        difficulty: DifficultyLevel,
    ) -> PortResult<GeneratedQuizResponse> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| PortError::MissingCredential("Gemini API key".to_string()))?;

        let content = normalize_document(document, true).await?;
        let request = Self::build_request(content, difficulty);

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(%url, "Calling Gemini");

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;
        let reply: GenerateContentResponse = read_json(response).await?;

        let text: String = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(PortError::EmptyResponse);
        }
        parse_generated_quiz(&text)
    }
}
