//! crates/quizsmith_core/src/domain.rs
//!
//! Defines the core data structures for the application: uploaded documents,
//! generated questions, quiz results, history entries and provider settings.
//! Persisted shapes (settings, history) carry their serde attributes here because
//! the persistence port only stores opaque JSON blobs.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Largest upload the front end may hand to the core (5 MiB).
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Every generated question has exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

//=========================================================================================
// Uploads
//=========================================================================================

/// The media types accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "application/pdf")]
    Pdf,
    #[serde(rename = "text/plain")]
    PlainText,
    #[serde(rename = "image/jpeg")]
    Jpeg,
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/webp")]
    Webp,
}

impl MediaType {
    pub const ALL: [MediaType; 5] = [
        MediaType::Pdf,
        MediaType::PlainText,
        MediaType::Jpeg,
        MediaType::Png,
        MediaType::Webp,
    ];

    /// The MIME string sent to providers.
    pub fn mime(&self) -> &'static str {
        match self {
            MediaType::Pdf => "application/pdf",
            MediaType::PlainText => "text/plain",
            MediaType::Jpeg => "image/jpeg",
            MediaType::Png => "image/png",
            MediaType::Webp => "image/webp",
        }
    }

    /// Parses a declared MIME type. Parameters such as `; charset=utf-8` are ignored.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.mime().eq_ignore_ascii_case(essence))
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime())
    }
}

/// A file selected by the user. Immutable; discarded once normalized.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: MediaType,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, media_type: MediaType, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type,
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

//=========================================================================================
// Difficulty
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[serde(alias = "easy")]
    Easy,
    #[default]
    #[serde(alias = "medium")]
    Medium,
    #[serde(alias = "hard")]
    Hard,
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DifficultyLevel::Easy => "Easy",
            DifficultyLevel::Medium => "Medium",
            DifficultyLevel::Hard => "Hard",
        };
        f.write_str(label)
    }
}

impl FromStr for DifficultyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" => Ok(DifficultyLevel::Medium),
            "hard" => Ok(DifficultyLevel::Hard),
            other => Err(format!("'{}' is not a difficulty level", other)),
        }
    }
}

//=========================================================================================
// Questions and results
//=========================================================================================

/// A single multiple-choice question. `id` is its ordinal position in the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: usize,
    pub question_text: String,
    pub options: [String; OPTIONS_PER_QUESTION],
    pub correct_answer_index: usize,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_answer_index
    }
}

/// The final outcome of a completed quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub user_answers: Vec<Option<usize>>,
    pub questions: Vec<Question>,
}

impl QuizResult {
    /// Score as a whole-number percentage; an empty quiz scores 0.
    pub fn percentage(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.score as f64 / self.total as f64) * 100.0).round() as u32
    }
}

//=========================================================================================
// History
//=========================================================================================

/// A previously generated quiz, retakable without a new generation.
/// Answers are deliberately not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
    pub difficulty: DifficultyLevel,
    pub questions: Vec<Question>,
}

impl HistoryEntry {
    pub fn new(file_name: impl Into<String>, difficulty: DifficultyLevel, questions: Vec<Question>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            created_at: Utc::now(),
            difficulty,
            questions,
        }
    }
}

//=========================================================================================
// Provider settings
//=========================================================================================

/// Identifies which provider configuration is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    Openai,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeminiSettings {
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OpenAiSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}

/// The persisted settings object. Both provider configurations are kept so that
/// switching back and forth does not lose credentials; `provider` picks the active one.
/// `#[serde(default)]` fills fields missing from older persisted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub gemini: GeminiSettings,
    pub openai: OpenAiSettings,
}

/// A borrowed view of the active provider's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveProvider<'a> {
    Gemini(&'a GeminiSettings),
    Openai(&'a OpenAiSettings),
}

impl ProviderSettings {
    pub fn active(&self) -> ActiveProvider<'_> {
        match self.provider {
            ProviderKind::Gemini => ActiveProvider::Gemini(&self.gemini),
            ProviderKind::Openai => ActiveProvider::Openai(&self.openai),
        }
    }
}
