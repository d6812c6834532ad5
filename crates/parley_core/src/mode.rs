//! Interaction mode selected once at startup.

use serde::{Deserialize, Serialize};

/// How prompts are sent to the model for the lifetime of the process.
///
/// Parsing is case-insensitive.
///
/// # Examples
///
/// ```
/// use parley_core::Mode;
/// use std::str::FromStr;
///
/// assert_eq!(Mode::from_str("CHAT").unwrap(), Mode::Chat);
/// assert_eq!(Mode::from_str("text").unwrap(), Mode::Text);
/// assert!(Mode::from_str("banana").is_err());
/// assert_eq!(Mode::Chat.to_string(), "chat");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Mode {
    /// Multi-turn conversation; every prompt extends one session history.
    Chat,
    /// Single-shot generation with no memory of earlier prompts.
    Text,
}

impl Mode {
    /// Whether calls in this mode carry a session history.
    pub fn is_conversational(&self) -> bool {
        matches!(self, Mode::Chat)
    }
}
