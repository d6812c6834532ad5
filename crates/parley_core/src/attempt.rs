//! Per-attempt values created and discarded inside one call's retry loop.

use crate::Mode;

/// One try at sending a prompt.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct CallAttempt {
    /// 1-based attempt number
    attempt_number: usize,
    /// Upper bound on attempts for this call
    max_attempts: usize,
    /// Prompt being sent
    prompt: String,
    /// Session shape the prompt is sent through
    mode: Mode,
    /// Turns already in the session before this prompt (conversational only)
    session_turns: Option<usize>,
}

impl CallAttempt {
    /// Create an attempt record.
    pub fn new(
        attempt_number: usize,
        max_attempts: usize,
        prompt: impl Into<String>,
        mode: Mode,
        session_turns: Option<usize>,
    ) -> Self {
        Self {
            attempt_number,
            max_attempts,
            prompt: prompt.into(),
            mode,
            session_turns,
        }
    }

    /// Whether no further attempt will follow if this one fails.
    pub fn is_last(&self) -> bool {
        self.attempt_number >= self.max_attempts
    }
}

/// Result of an attempt, or of a whole call once the retry loop ends.
///
/// # Examples
///
/// ```
/// use parley_core::CallOutcome;
///
/// let ok = CallOutcome::Success { text: "hi".into(), tokens_used: 12 };
/// assert_eq!(ok.into_text(), Some("hi".to_string()));
/// assert_eq!(CallOutcome::Exhausted.into_text(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum CallOutcome {
    /// The model answered
    #[display("success ({} tokens)", tokens_used)]
    Success {
        /// Response text
        text: String,
        /// Tokens consumed by the exchange
        tokens_used: u64,
    },
    /// The attempt failed in a way that may succeed on retry
    #[display("recoverable failure: {}", reason)]
    RecoverableFailure {
        /// Human-readable cause
        reason: String,
    },
    /// Every attempt failed
    #[display("retries exhausted")]
    Exhausted,
    /// The daily request cap refused the call before contacting the service
    #[display("denied by daily quota")]
    Denied,
}

impl CallOutcome {
    /// The response text, if the call succeeded.
    pub fn into_text(self) -> Option<String> {
        match self {
            CallOutcome::Success { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Whether the outcome carries a response.
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }
}
