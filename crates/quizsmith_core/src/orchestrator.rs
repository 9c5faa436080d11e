//! crates/quizsmith_core/src/orchestrator.rs
//!
//! Coordinates one generation attempt: pick the provider for the active settings,
//! ask it for a quiz, and validate the records into `Question`s. Errors propagate
//! untouched and nothing is retried.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::{DifficultyLevel, ProviderSettings, Question, UploadedDocument};
use crate::ports::{PortResult, ProviderResolver};

#[derive(Clone)]
pub struct QuizGenerator {
    providers: Arc<dyn ProviderResolver>,
}

impl QuizGenerator {
    pub fn new(providers: Arc<dyn ProviderResolver>) -> Self {
        Self { providers }
    }

    /// Generates the question sequence for a document. All-or-nothing: any invalid
    /// record fails the whole attempt.
    pub async fn generate(
        &self,
        document: &UploadedDocument,
        difficulty: DifficultyLevel,
        settings: &ProviderSettings,
    ) -> PortResult<Vec<Question>> {
        info!(
            file_name = %document.file_name,
            media_type = %document.media_type,
            %difficulty,
            provider = ?settings.provider,
            "Generating quiz"
        );

        let provider = self.providers.resolve(settings);
        let result = async {
            let response = provider.generate(document, difficulty).await?;
            response.into_questions()
        }
        .await;

        match &result {
            Ok(questions) => info!(count = questions.len(), "Quiz generated"),
            Err(e) => warn!(error = %e, "Quiz generation failed"),
        }
        result
    }
}
