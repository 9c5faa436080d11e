pub mod domain;
pub mod normalizer;
pub mod orchestrator;
pub mod ports;
pub mod prompt;
pub mod response;
pub mod session;
pub mod store;

pub use domain::{
    ActiveProvider, DifficultyLevel, GeminiSettings, HistoryEntry, MediaType, OpenAiSettings, ProviderKind,
    ProviderSettings, Question, QuizResult, UploadedDocument, MAX_UPLOAD_BYTES,
};
pub use normalizer::NormalizedContent;
pub use orchestrator::QuizGenerator;
pub use ports::{KeyValueStore, PortError, PortResult, ProviderResolver, QuizProvider};
pub use response::{GeneratedQuestion, GeneratedQuizResponse};
pub use session::{QuizSession, Reveal, SessionError, SessionState};
pub use store::{InMemoryStore, StudyStore};
