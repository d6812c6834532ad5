//! Raw and validated model responses.

use serde::{Deserialize, Serialize};

/// Payload returned by the remote service before validation.
///
/// Either field may be missing when the service answers with a blocked,
/// truncated or otherwise degenerate candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Text of the first candidate, if any
    pub text: Option<String>,
    /// Total tokens billed for the exchange, if reported
    pub total_token_count: Option<u64>,
}

/// A validated response: non-empty text plus the tokens it consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct Reply {
    /// Response text
    text: String,
    /// Total tokens used by prompt, history and response
    total_tokens: u64,
}

impl Reply {
    /// Create a reply.
    pub fn new(text: impl Into<String>, total_tokens: u64) -> Self {
        Self {
            text: text.into(),
            total_tokens,
        }
    }

    /// Consume the reply, keeping only the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
