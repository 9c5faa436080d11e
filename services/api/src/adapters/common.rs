//! services/api/src/adapters/common.rs
//!
//! HTTP plumbing shared by the provider adapters.

use quizsmith_core::{normalizer, NormalizedContent, PortError, PortResult, UploadedDocument};
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// The `{"error": {"message": ...}}` envelope both provider families use.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Maps a network-level failure. Anything that never produced an HTTP status lands here.
pub fn transport_error(e: reqwest::Error) -> PortError {
    PortError::Transport(e.to_string())
}

/// Reads a provider reply, turning non-success statuses into `ProviderHttp` with the
/// upstream message and undecodable bodies into `MalformedResponse`.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> PortResult<T> {
    let status = response.status();
    let body = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| {
                let raw = body.trim();
                if raw.is_empty() {
                    status.canonical_reason().unwrap_or("unknown error").to_string()
                } else {
                    raw.to_string()
                }
            });
        return Err(PortError::ProviderHttp {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| PortError::MalformedResponse(e.to_string()))
}

/// Runs the normalizer on the blocking pool; PDF parsing is CPU-bound.
pub async fn normalize_document(
    document: &UploadedDocument,
    native_documents: bool,
) -> PortResult<NormalizedContent> {
    let document = document.clone();
    tokio::task::spawn_blocking(move || normalizer::normalize(&document, native_documents))
        .await
        .map_err(|e| PortError::DocumentLoad(format!("document processing aborted: {}", e)))?
}
