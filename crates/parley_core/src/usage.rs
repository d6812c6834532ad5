//! Context-window usage derived from a successful call.

use serde::{Deserialize, Serialize};

/// Read-only view of how much of the context window one exchange consumed.
///
/// # Examples
///
/// ```
/// use parley_core::UsageSnapshot;
///
/// let usage = UsageSnapshot::measure(100, 6500, 8192);
/// assert_eq!(*usage.context_window_tokens(), 6600);
/// assert!(usage.exceeds(0.8));
///
/// let usage = UsageSnapshot::measure(100, 6000, 8192);
/// assert!(!usage.exceeds(0.8));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct UsageSnapshot {
    /// System instruction tokens plus the tokens of the latest exchange
    context_window_tokens: u64,
    /// Context window size the usage is measured against
    max_context_tokens: u64,
    /// `context_window_tokens` as a percentage of `max_context_tokens`
    percent_of_limit: f64,
}

impl UsageSnapshot {
    /// Combine the fixed instruction cost with the tokens of one exchange.
    pub fn measure(
        system_instruction_tokens: u64,
        total_tokens_used: u64,
        max_context_tokens: u64,
    ) -> Self {
        let context_window_tokens = system_instruction_tokens.saturating_add(total_tokens_used);
        let percent_of_limit = if max_context_tokens == 0 {
            100.0
        } else {
            context_window_tokens as f64 / max_context_tokens as f64 * 100.0
        };
        Self {
            context_window_tokens,
            max_context_tokens,
            percent_of_limit,
        }
    }

    /// Whether usage is strictly above `threshold` (a fraction) of the window.
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.context_window_tokens as f64 > self.max_context_tokens as f64 * threshold
    }
}
