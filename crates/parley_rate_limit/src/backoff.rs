//! Linear retry delay schedule.

use std::time::Duration;

/// Yields `base * 1`, `base * 2`, `base * 3`, ... forever.
///
/// Bound it with [`Iterator::take`] to cap the number of retries.
///
/// # Example
///
/// ```
/// use parley_rate_limit::LinearBackoff;
/// use std::time::Duration;
///
/// let delays: Vec<_> = LinearBackoff::new(Duration::from_secs(1)).take(3).collect();
/// assert_eq!(
///     delays,
///     vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(3)]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LinearBackoff {
    base: Duration,
    step: u32,
}

impl LinearBackoff {
    /// Start a schedule whose first delay is `base`.
    pub fn new(base: Duration) -> Self {
        Self { base, step: 0 }
    }
}

impl Iterator for LinearBackoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        self.step = self.step.saturating_add(1);
        Some(self.base.saturating_mul(self.step))
    }
}
