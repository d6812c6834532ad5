//! Trait definitions for the remote model and the session adapters.

use async_trait::async_trait;
use parley_core::{Mode, RawResponse, Reply, Turn};
use parley_error::ParleyResult;
use std::sync::Arc;

/// A remote generative-language service.
///
/// Implementations own the transport, authentication and serialization. Errors
/// should carry enough classification (see `parley_error::RetryableError`) for
/// the governor to decide whether to retry.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Send `prompt`, preceded by `history`, and return the raw payload.
    async fn generate(&self, prompt: &str, history: &[Turn]) -> ParleyResult<RawResponse>;

    /// Model identifier (e.g., "gemini-1.5-pro").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<B: GenerativeBackend + ?Sized> GenerativeBackend for Arc<B> {
    async fn generate(&self, prompt: &str, history: &[Turn]) -> ParleyResult<RawResponse> {
        (**self).generate(prompt, history).await
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// One call shape (stateless or conversational) behind a single interface.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Send one prompt and return the validated reply.
    ///
    /// An absent response or one without text must be reported as a
    /// retryable error.
    async fn invoke(&self, prompt: &str) -> ParleyResult<Reply>;

    /// The mode this invoker was built for.
    fn mode(&self) -> Mode;

    /// Number of turns held by the session, if the invoker keeps one.
    fn history_len(&self) -> Option<usize> {
        None
    }
}
