//! Model integrations for Parley.
//!
//! - [`GeminiBackend`] talks to the Gemini REST API through `gemini-rust`.
//! - [`StatelessInvoker`] and [`ConversationalInvoker`] adapt a backend to the
//!   two call shapes, and [`Session`] picks one of them from a [`Mode`].
//! - [`count_tokens`] measures text with the local tokenizer.
//!
//! # Example
//!
//! ```no_run
//! use parley_core::Mode;
//! use parley_interface::Invoker;
//! use parley_models::{GeminiBackend, Session};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = GeminiBackend::from_env("gemini-1.5-pro", "You are helpful assistant")?;
//! let session = Session::new(Mode::Chat, backend);
//! let reply = session.invoke("Hello").await?;
//! println!("{}", reply.text());
//! # Ok(())
//! # }
//! ```
//!
//! [`Mode`]: parley_core::Mode

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod session;
mod token_counting;

pub use gemini::GeminiBackend;
pub use session::{ConversationalInvoker, Session, StatelessInvoker};
pub use token_counting::{count_tokens, tokenizer};
