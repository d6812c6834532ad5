//! Local token counting with tiktoken.
//!
//! Gemini does not ship a local tokenizer, so counts here use the
//! `cl100k_base` vocabulary and are approximate for Gemini models. They are
//! only used to report how much of the context window the system instruction
//! takes, never to enforce a limit.

use parley_error::{ParleyResult, TokenizerError};

/// Load the `cl100k_base` tokenizer.
pub fn tokenizer() -> ParleyResult<tiktoken_rs::CoreBPE> {
    tiktoken_rs::cl100k_base().map_err(|e| {
        TokenizerError::new(format!("Failed to load tokenizer: {}", e)).into()
    })
}

/// Count the tokens in `text`.
pub fn count_tokens(text: &str) -> ParleyResult<u64> {
    let tokenizer = tokenizer()?;
    Ok(tokenizer.encode_with_special_tokens(text).len() as u64)
}
