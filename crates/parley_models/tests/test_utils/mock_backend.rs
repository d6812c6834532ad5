//! Mock generative backend for testing.

use async_trait::async_trait;
use parley_core::{RawResponse, Turn};
use parley_error::{GeminiError, GeminiErrorKind, ParleyResult};
use parley_interface::GenerativeBackend;
use std::sync::{Arc, Mutex};

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the given payload
    Success(RawResponse),
    /// Always return the specified error
    Error(GeminiErrorKind),
    /// Fail N times with the error, then succeed with the payload
    FailThenSucceed {
        fail_count: usize,
        error: GeminiErrorKind,
        success: RawResponse,
    },
    /// Return a sequence of responses (errors or success)
    Sequence(Vec<MockResponse>),
}

/// A single mock response (payload or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(RawResponse),
    Error(GeminiErrorKind),
}

/// Mock backend that records every call it receives.
pub struct MockBackend {
    behavior: MockBehavior,
    calls: Arc<Mutex<Vec<(String, Vec<Turn>)>>>,
    model_name: String,
}

/// A complete payload with text and a token count.
pub fn payload(text: &str, total_token_count: u64) -> RawResponse {
    RawResponse {
        text: Some(text.to_string()),
        total_token_count: Some(total_token_count),
    }
}

impl MockBackend {
    /// Create a mock with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(Mutex::new(Vec::new())),
            model_name: "mock-gemini".to_string(),
        }
    }

    /// Create a mock that always succeeds with the given text.
    pub fn new_success(text: &str, total_token_count: u64) -> Self {
        Self::new_with_behavior(MockBehavior::Success(payload(text, total_token_count)))
    }

    /// Create a mock that always fails with the given error.
    pub fn new_error(error: GeminiErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Error(error))
    }

    /// Create a mock that fails N times, then succeeds.
    #[allow(dead_code)]
    pub fn new_fail_then_succeed(fail_count: usize, error: GeminiErrorKind, text: &str) -> Self {
        Self::new_with_behavior(MockBehavior::FailThenSucceed {
            fail_count,
            error,
            success: payload(text, 10),
        })
    }

    /// Create a mock with a sequence of responses.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Get the number of times generate() was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// History length seen by each call, in order.
    #[allow(dead_code)]
    pub fn history_lengths(&self) -> Vec<usize> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, history)| history.len())
            .collect()
    }

    /// The history passed with the most recent call.
    #[allow(dead_code)]
    pub fn last_history(&self) -> Vec<Turn> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, history)| history.clone())
            .unwrap_or_default()
    }

    fn next_response(&self, prompt: &str, history: &[Turn]) -> ParleyResult<RawResponse> {
        let mut calls = self.calls.lock().unwrap();
        let current_count = calls.len();
        calls.push((prompt.to_string(), history.to_vec()));

        let response = match &self.behavior {
            MockBehavior::Success(raw) => MockResponse::Success(raw.clone()),
            MockBehavior::Error(kind) => MockResponse::Error(kind.clone()),
            MockBehavior::FailThenSucceed {
                fail_count,
                error,
                success,
            } => {
                if current_count < *fail_count {
                    MockResponse::Error(error.clone())
                } else {
                    MockResponse::Success(success.clone())
                }
            }
            MockBehavior::Sequence(responses) => {
                responses.get(current_count).cloned().unwrap_or_else(|| {
                    MockResponse::Error(GeminiErrorKind::Transport(format!(
                        "Mock sequence exhausted (call {} beyond {} responses)",
                        current_count + 1,
                        responses.len()
                    )))
                })
            }
        };

        match response {
            MockResponse::Success(raw) => Ok(raw),
            MockResponse::Error(kind) => Err(GeminiError::new(kind).into()),
        }
    }
}

#[async_trait]
impl GenerativeBackend for MockBackend {
    async fn generate(&self, prompt: &str, history: &[Turn]) -> ParleyResult<RawResponse> {
        self.next_response(prompt, history)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
