//! services/api/src/adapters/openai_compat.rs
//!
//! This module contains the adapter for any OpenAI-compatible chat-completions
//! backend (OpenAI, OpenRouter, a local Ollama, ...). It implements the
//! `QuizProvider` port from the `core` crate.
//!
//! These backends cannot be relied on to read PDFs, so PDFs are reduced to their
//! text layer first. Only JSON-object output is requested, which is a weaker
//! guarantee than a schema, so the reply is parsed defensively.

use async_trait::async_trait;
use quizsmith_core::{
    prompt::{build_prompt, SYSTEM_INSTRUCTION},
    response::parse_generated_quiz,
    DifficultyLevel, GeneratedQuizResponse, NormalizedContent, PortError, PortResult, QuizProvider,
    UploadedDocument,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::common::{normalize_document, read_json, transport_error};

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
enum ChatMessage {
    System { content: String },
    User { content: Vec<ContentPart> },
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizProvider` on `POST {base_url}/chat/completions`.
#[derive(Clone)]
pub struct OpenAiCompatibleAdapter {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiCompatibleAdapter {
    /// Creates a new `OpenAiCompatibleAdapter`.
    pub fn new(http: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.trim().to_string(),
        }
    }

    fn build_request(&self, content: NormalizedContent, difficulty: DifficultyLevel) -> ChatCompletionRequest<'_> {
        let document_part = match content {
            NormalizedContent::Text(text) => ContentPart::Text { text },
            inline => ContentPart::ImageUrl {
                image_url: ImageUrl {
                    url: inline.data_uri().unwrap_or_default(),
                },
            },
        };
        let parts = vec![
            ContentPart::Text {
                text: build_prompt(difficulty),
            },
            document_part,
        ];

        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage::System {
                    content: SYSTEM_INSTRUCTION.to_string(),
                },
                ChatMessage::User { content: parts },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

//=========================================================================================
// `QuizProvider` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizProvider for OpenAiCompatibleAdapter {
    async fn generate(
        &self,
        document: &UploadedDocument,
        difficulty: DifficultyLevel,
    ) -> PortResult<GeneratedQuizResponse> {
        if self.base_url.is_empty() {
            return Err(PortError::MissingCredential("OpenAI-compatible base URL".to_string()));
        }
        if self.model.is_empty() {
            return Err(PortError::MissingCredential("OpenAI-compatible model name".to_string()));
        }

        let content = normalize_document(document, false).await?;
        let request = self.build_request(content, difficulty);

        let url = format!("{}/chat/completions", self.base_url);
        debug!(%url, model = %self.model, "Calling OpenAI-compatible provider");

        let mut builder = self.http.post(&url).json(&request);
        // Local servers often run without a key.
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }
        let response = builder.send().await.map_err(transport_error)?;
        let reply: ChatCompletionResponse = read_json(response).await?;

        let content = reply
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(PortError::EmptyResponse)?;

        parse_generated_quiz(&content)
    }
}
