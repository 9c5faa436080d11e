//! services/api/src/adapters/registry.rs
//!
//! Builds the provider adapter for the settings active at call time. Adding a
//! provider means adding a `ProviderKind` variant and a match arm here.

use quizsmith_core::{ActiveProvider, ProviderResolver, ProviderSettings, QuizProvider};
use std::sync::Arc;

use super::gemini::GeminiQuizAdapter;
use super::openai_compat::OpenAiCompatibleAdapter;
use crate::config::Config;

#[derive(Clone)]
pub struct ProviderRegistry {
    http: reqwest::Client,
    gemini_base_url: String,
    gemini_model: String,
    gemini_fallback_key: Option<String>,
}

impl ProviderRegistry {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            gemini_base_url: config.gemini_base_url.clone(),
            gemini_model: config.gemini_model.clone(),
            gemini_fallback_key: config.gemini_api_key.clone(),
        }
    }
}

impl ProviderResolver for ProviderRegistry {
    fn resolve(&self, settings: &ProviderSettings) -> Arc<dyn QuizProvider> {
        match settings.active() {
            ActiveProvider::Gemini(gemini) => {
                // A key entered by the user wins over the one from the environment.
                let api_key = Some(gemini.api_key.trim().to_string())
                    .filter(|key| !key.is_empty())
                    .or_else(|| self.gemini_fallback_key.clone());
                Arc::new(GeminiQuizAdapter::new(
                    self.http.clone(),
                    &self.gemini_base_url,
                    &self.gemini_model,
                    api_key,
                ))
            }
            ActiveProvider::Openai(openai) => Arc::new(OpenAiCompatibleAdapter::new(
                self.http.clone(),
                &openai.base_url,
                &openai.api_key,
                &openai.model,
            )),
        }
    }
}
