//! Parley - a rate-limited, retrying terminal client for Google Gemini.
//!
//! Parley reads prompts from the terminal, sends them to a Gemini model and
//! prints the answers, staying inside the API's request quotas:
//!
//! - **Quota tracking**: per-minute and per-day request limits, with a wait
//!   when the minute window is full and a refusal once the day is spent
//! - **Retries**: recoverable failures are retried with linear backoff
//! - **Usage reporting**: context-window and quota usage after every answer
//! - **Two modes**: `chat` keeps one conversation, `text` sends independent prompts
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use parley::{
//!     ContextConfig, GeminiBackend, Mode, QuotaLimits, QuotaTracker, RetryConfig,
//!     RetryGovernor, Session, UsageReporter,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let limits = QuotaLimits::default();
//!     let tracker = Arc::new(QuotaTracker::new(limits));
//!     let reporter = UsageReporter::new(5, ContextConfig::default(), limits);
//!     let governor = RetryGovernor::new(tracker, RetryConfig::default(), reporter);
//!
//!     let backend = GeminiBackend::from_env("gemini-1.5-pro", "You are helpful assistant")?;
//!     let session = Session::new(Mode::Chat, backend);
//!     governor.execute(&session, "Hello, world!").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Parley is organized as a workspace with focused crates:
//!
//! - `parley_error` - Error types
//! - `parley_core` - Core data types (Mode, Turn, Reply, etc.)
//! - `parley_interface` - GenerativeBackend and Invoker traits
//! - `parley_rate_limit` - Quota tracking, retry governor, usage reporting, configuration
//! - `parley_models` - Gemini backend and session adapters
//!
//! This crate (`parley`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod logging;
mod terminal;

pub use logging::{LoggingConfig, init_logging};
pub use terminal::{Terminal, run_loop};

// Re-export workspace crates
pub use parley_core::*;
pub use parley_error::*;
pub use parley_interface::*;
pub use parley_models::*;
pub use parley_rate_limit::*;
