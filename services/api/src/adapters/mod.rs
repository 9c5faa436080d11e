pub mod common;
pub mod file_store;
pub mod gemini;
pub mod openai_compat;
pub mod registry;

pub use file_store::FileStore;
pub use gemini::GeminiQuizAdapter;
pub use openai_compat::OpenAiCompatibleAdapter;
pub use registry::ProviderRegistry;
