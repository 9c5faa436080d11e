//! crates/quizsmith_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete LLM providers and storage backends.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::{DifficultyLevel, ProviderSettings, UploadedDocument};
use crate::response::GeneratedQuizResponse;

//=========================================================================================
// Port Error and Result Types
//=========================================================================================

/// The error type shared by all port operations.
///
/// Every generation failure is terminal for the current attempt; nothing in the core
/// retries.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Missing provider credentials: {0}")]
    MissingCredential(String),
    #[error("The provider returned an empty response")]
    EmptyResponse,
    #[error("The provider returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("Provider request failed with status {status}: {message}")]
    ProviderHttp { status: u16, message: String },
    #[error("Could not reach the provider: {0}")]
    Transport(String),
    #[error("Could not read the document: {0}")]
    DocumentLoad(String),
    #[error("The document contains no extractable text")]
    EmptyDocument,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// One LLM backend. Implementations own every provider-specific concern: how the
/// document is normalized, how the request is shaped and authenticated, and how
/// the raw payload is pulled out of the reply.
#[async_trait]
pub trait QuizProvider: Send + Sync {
    /// Generates raw question records for a document.
    async fn generate(
        &self,
        document: &UploadedDocument,
        difficulty: DifficultyLevel,
    ) -> PortResult<GeneratedQuizResponse>;
}

/// Selects the provider implementation for the active settings.
pub trait ProviderResolver: Send + Sync {
    fn resolve(&self, settings: &ProviderSettings) -> Arc<dyn QuizProvider>;
}

/// A string key-value store holding opaque JSON blobs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> PortResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> PortResult<()>;
}
