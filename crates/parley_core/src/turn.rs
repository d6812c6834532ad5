//! Conversation history entries.

use serde::{Deserialize, Serialize};

/// Author of a conversation turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Role {
    /// The person typing prompts
    #[display("user")]
    User,
    /// The generative model
    #[display("model")]
    Model,
}

/// One message in a conversational session.
///
/// # Examples
///
/// ```
/// use parley_core::{Role, Turn};
///
/// let turn = Turn::user("What is a GCRA?");
/// assert_eq!(turn.role, Role::User);
/// assert_eq!(turn.text, "What is a GCRA?");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who wrote the message
    pub role: Role,
    /// Message text
    pub text: String,
}

impl Turn {
    /// A turn authored by the user.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// A turn authored by the model.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}
