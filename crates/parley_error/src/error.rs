//! Top-level error wrapper types.

use crate::{ConfigError, GeminiError, RetryableError, TerminalError, TokenizerError};

/// Every error condition the workspace can surface.
///
/// # Examples
///
/// ```
/// use parley_error::{ParleyError, ConfigError};
///
/// let err: ParleyError = ConfigError::new("missing [model] section").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ParleyErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini API error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Terminal I/O error
    #[from(TerminalError)]
    Terminal(TerminalError),
    /// Tokenizer error
    #[from(TokenizerError)]
    Tokenizer(TokenizerError),
}

/// Parley error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Parley Error: {}", _0)]
pub struct ParleyError(Box<ParleyErrorKind>);

impl ParleyError {
    /// Create a new error from a kind.
    pub fn new(kind: ParleyErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ParleyErrorKind {
        &self.0
    }

    /// The innermost message, without wrapper prefixes or source location.
    ///
    /// Use this for lines shown to the user; the `Display` form is for logs.
    ///
    /// # Examples
    ///
    /// ```
    /// use parley_error::{GeminiError, GeminiErrorKind, ParleyError};
    ///
    /// let err: ParleyError = GeminiError::new(GeminiErrorKind::EmptyResponse).into();
    /// assert_eq!(err.message(), "Received an empty response from the model");
    /// ```
    pub fn message(&self) -> String {
        match self.kind() {
            ParleyErrorKind::Config(err) => err.message.clone(),
            ParleyErrorKind::Gemini(err) => err.kind.to_string(),
            ParleyErrorKind::Terminal(err) => err.message.clone(),
            ParleyErrorKind::Tokenizer(err) => err.message.clone(),
        }
    }
}

// Generic From implementation for any type that converts to ParleyErrorKind
impl<T> From<T> for ParleyError
where
    T: Into<ParleyErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for ParleyError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            ParleyErrorKind::Gemini(err) => err.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Parley operations.
pub type ParleyResult<T> = std::result::Result<T, ParleyError>;
