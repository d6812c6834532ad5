//! Google Gemini REST backend.

mod backend;

pub use backend::GeminiBackend;

/// Result type for Gemini operations.
pub type GeminiResult<T> = Result<T, parley_error::GeminiError>;
