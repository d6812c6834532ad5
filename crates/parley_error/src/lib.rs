//! Error types for the Parley workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use parley_error::{ConfigError, ParleyResult};
//!
//! fn load() -> ParleyResult<u32> {
//!     Err(ConfigError::new("max_attempts must be at least 1"))?
//! }
//!
//! assert!(load().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod terminal;
mod tokenizer;

pub use config::ConfigError;
pub use error::{ParleyError, ParleyErrorKind, ParleyResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use terminal::TerminalError;
pub use tokenizer::TokenizerError;
