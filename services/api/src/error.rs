//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how each error
//! is presented to the browser.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use quizsmith_core::{PortError, SessionError, MAX_UPLOAD_BYTES};
use tracing::error;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("{0}")]
    Port(#[from] PortError),

    /// An illegal quiz session transition.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// The upload request itself is invalid (missing file, bad difficulty, ...).
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    #[error("Unsupported file type '{0}'. Upload a PDF, text file, or JPEG/PNG/WebP image.")]
    UnsupportedMediaType(String),

    #[error("File is {0} bytes, the limit is {} bytes", MAX_UPLOAD_BYTES)]
    FileTooLarge(usize),

    /// A quiz is already being generated.
    #[error("A quiz is already being generated")]
    GenerationInProgress,

    #[error("No quiz is in progress")]
    NoActiveSession,

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Port(port) => match port {
                PortError::MissingCredential(_) => StatusCode::BAD_REQUEST,
                PortError::DocumentLoad(_) | PortError::EmptyDocument => StatusCode::UNPROCESSABLE_ENTITY,
                PortError::EmptyResponse
                | PortError::MalformedResponse(_)
                | PortError::ProviderHttp { .. }
                | PortError::Transport(_) => StatusCode::BAD_GATEWAY,
                PortError::NotFound(_) => StatusCode::NOT_FOUND,
                PortError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Session(SessionError::InvalidOption { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Session(_) | ApiError::GenerationInProgress => StatusCode::CONFLICT,
            ApiError::NoActiveSession => StatusCode::NOT_FOUND,
            ApiError::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Config(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }
        (status, self.to_string()).into_response()
    }
}
