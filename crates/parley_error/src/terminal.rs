//! Terminal I/O error types.

/// Failure reading from or writing to the interactive terminal.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Terminal Error: {} at line {} in {}", message, line, file)]
pub struct TerminalError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl TerminalError {
    /// Create a new TerminalError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl From<std::io::Error> for TerminalError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}
