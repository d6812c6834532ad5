//! Session adapters: one [`Invoker`] per call shape.
//!
//! Both adapters validate the raw payload the same way. A response without
//! text is [`GeminiErrorKind::EmptyResponse`] and a response without a token
//! count is [`GeminiErrorKind::MalformedResponse`]; both are retryable.

use async_trait::async_trait;
use parley_core::{Mode, RawResponse, Reply, Turn};
use parley_error::{GeminiError, GeminiErrorKind, ParleyResult};
use parley_interface::{GenerativeBackend, Invoker};
use tokio::sync::Mutex;
use tracing::{debug, instrument};

fn validate(raw: RawResponse) -> ParleyResult<Reply> {
    let text = match raw.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(GeminiError::new(GeminiErrorKind::EmptyResponse).into()),
    };
    let total_tokens = raw.total_token_count.ok_or_else(|| {
        GeminiError::new(GeminiErrorKind::MalformedResponse(
            "response carried no usage metadata".to_string(),
        ))
    })?;
    Ok(Reply::new(text, total_tokens))
}

/// Sends each prompt on its own, with no memory of earlier prompts.
#[derive(Debug)]
pub struct StatelessInvoker<B> {
    backend: B,
}

impl<B: GenerativeBackend> StatelessInvoker<B> {
    /// Wrap a backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

#[async_trait]
impl<B: GenerativeBackend> Invoker for StatelessInvoker<B> {
    #[instrument(skip(self, prompt), fields(model = self.backend.model_name()))]
    async fn invoke(&self, prompt: &str) -> ParleyResult<Reply> {
        let raw = self.backend.generate(prompt, &[]).await?;
        validate(raw)
    }

    fn mode(&self) -> Mode {
        Mode::Text
    }
}

/// Sends each prompt after the turns exchanged so far.
///
/// History only grows after a successful call, so a failed attempt can be
/// retried without leaving a dangling user turn behind.
#[derive(Debug)]
pub struct ConversationalInvoker<B> {
    backend: B,
    history: Mutex<Vec<Turn>>,
}

impl<B: GenerativeBackend> ConversationalInvoker<B> {
    /// Start an empty session on a backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            history: Mutex::new(Vec::new()),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Copy of the turns exchanged so far.
    pub async fn history(&self) -> Vec<Turn> {
        self.history.lock().await.clone()
    }
}

#[async_trait]
impl<B: GenerativeBackend> Invoker for ConversationalInvoker<B> {
    #[instrument(skip(self, prompt), fields(model = self.backend.model_name()))]
    async fn invoke(&self, prompt: &str) -> ParleyResult<Reply> {
        let mut history = self.history.lock().await;
        let raw = self.backend.generate(prompt, &history).await?;
        let reply = validate(raw)?;

        history.push(Turn::user(prompt));
        history.push(Turn::model(reply.text().clone()));
        debug!(turns = history.len(), "Appended exchange to session");

        Ok(reply)
    }

    fn mode(&self) -> Mode {
        Mode::Chat
    }

    fn history_len(&self) -> Option<usize> {
        self.history.try_lock().ok().map(|history| history.len())
    }
}

/// The invoker chosen for the process, built once from the selected [`Mode`].
#[derive(Debug)]
pub enum Session<B> {
    /// Independent prompts
    Stateless(StatelessInvoker<B>),
    /// One ongoing conversation
    Conversational(ConversationalInvoker<B>),
}

impl<B: GenerativeBackend> Session<B> {
    /// Build the adapter for `mode`.
    pub fn new(mode: Mode, backend: B) -> Self {
        match mode {
            Mode::Text => Self::Stateless(StatelessInvoker::new(backend)),
            Mode::Chat => Self::Conversational(ConversationalInvoker::new(backend)),
        }
    }
}

#[async_trait]
impl<B: GenerativeBackend> Invoker for Session<B> {
    async fn invoke(&self, prompt: &str) -> ParleyResult<Reply> {
        match self {
            Self::Stateless(invoker) => invoker.invoke(prompt).await,
            Self::Conversational(invoker) => invoker.invoke(prompt).await,
        }
    }

    fn mode(&self) -> Mode {
        match self {
            Self::Stateless(invoker) => invoker.mode(),
            Self::Conversational(invoker) => invoker.mode(),
        }
    }

    fn history_len(&self) -> Option<usize> {
        match self {
            Self::Stateless(invoker) => invoker.history_len(),
            Self::Conversational(invoker) => invoker.history_len(),
        }
    }
}
