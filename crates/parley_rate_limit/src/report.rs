//! User-facing status lines: responses, usage and retry progress.
//!
//! Everything here is printed to stdout regardless of the log level; the
//! matching `tracing` events carry the same facts for the logs.

use crate::{ContextConfig, QuotaLimits, QuotaState};
use parley_core::{CallAttempt, CallOutcome, UsageSnapshot};
use std::fmt;
use std::time::Duration;
use tracing::{info, warn};

/// Rendered usage for one successful call.
///
/// # Example
///
/// ```
/// use parley_core::UsageSnapshot;
/// use parley_rate_limit::{QuotaLimits, UsageReport};
///
/// let usage = UsageSnapshot::measure(100, 6500, 8192);
/// let report = UsageReport::new(usage, 0.8, QuotaLimits::default(), 1, 1, 6500);
/// assert!(report.warning());
/// assert!(report.to_string().contains("6600 / 8192"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    usage: UsageSnapshot,
    warning_threshold: f64,
    limits: QuotaLimits,
    requests_this_minute: u32,
    requests_today: u32,
    tokens_this_minute: u64,
}

impl UsageReport {
    /// Assemble a report from a usage snapshot and quota counters.
    pub fn new(
        usage: UsageSnapshot,
        warning_threshold: f64,
        limits: QuotaLimits,
        requests_this_minute: u32,
        requests_today: u32,
        tokens_this_minute: u64,
    ) -> Self {
        Self {
            usage,
            warning_threshold,
            limits,
            requests_this_minute,
            requests_today,
            tokens_this_minute,
        }
    }

    /// Whether the context window is above the warning threshold.
    pub fn warning(&self) -> bool {
        self.usage.exceeds(self.warning_threshold)
    }

    /// The usage snapshot being reported.
    pub fn usage(&self) -> &UsageSnapshot {
        &self.usage
    }
}

fn limit_label<T: fmt::Display + PartialEq>(value: T, unlimited: T) -> String {
    if value == unlimited {
        "unlimited".to_string()
    } else {
        value.to_string()
    }
}

impl fmt::Display for UsageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Context Window Usage: {} / {} tokens",
            self.usage.context_window_tokens(),
            self.usage.max_context_tokens()
        )?;
        if self.warning() {
            writeln!(
                f,
                "Warning: Context window token count is {}, approaching {}% of the limit!",
                self.usage.context_window_tokens(),
                self.warning_threshold * 100.0
            )?;
        }
        writeln!(f, "Rate Limit Usage:")?;
        writeln!(
            f,
            "    - Requests per Minute: {} / {}",
            self.requests_this_minute,
            limit_label(*self.limits.rpm(), u32::MAX)
        )?;
        writeln!(
            f,
            "    - Requests per Day: {} / {}",
            self.requests_today,
            limit_label(*self.limits.rpd(), u32::MAX)
        )?;
        writeln!(
            f,
            "    - Tokens per Minute: {} / {}",
            self.tokens_this_minute,
            limit_label(*self.limits.tpm(), u64::MAX)
        )
    }
}

/// Prints call progress and post-call usage.
///
/// Holds no mutable state. The system-instruction token count is measured
/// once by the caller and cached here for the life of the process.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReporter {
    system_instruction_tokens: u64,
    context: ContextConfig,
    limits: QuotaLimits,
}

impl UsageReporter {
    /// Create a reporter.
    pub fn new(system_instruction_tokens: u64, context: ContextConfig, limits: QuotaLimits) -> Self {
        Self {
            system_instruction_tokens,
            context,
            limits,
        }
    }

    /// Cached token count of the system instruction.
    pub fn system_instruction_tokens(&self) -> u64 {
        self.system_instruction_tokens
    }

    /// Measure one exchange against the context window.
    pub fn measure(&self, total_tokens_used: u64) -> UsageSnapshot {
        UsageSnapshot::measure(
            self.system_instruction_tokens,
            total_tokens_used,
            self.context.max_tokens,
        )
    }

    /// Build the usage report for a snapshot and the tracker's counters.
    pub fn build_report(&self, usage: UsageSnapshot, quota: &QuotaState) -> UsageReport {
        UsageReport::new(
            usage,
            self.context.warning_threshold,
            self.limits,
            *quota.requests_this_minute(),
            *quota.requests_today(),
            *quota.tokens_this_minute(),
        )
    }

    /// Print usage after a successful call.
    pub fn report(&self, usage: UsageSnapshot, quota: &QuotaState) -> UsageReport {
        let report = self.build_report(usage, quota);
        if report.warning() {
            warn!(
                context_window_tokens = usage.context_window_tokens(),
                max_context_tokens = usage.max_context_tokens(),
                "Context window nearly full"
            );
        }
        info!(
            context_window_tokens = usage.context_window_tokens(),
            requests_this_minute = quota.requests_this_minute(),
            requests_today = quota.requests_today(),
            tokens_this_minute = quota.tokens_this_minute(),
            "Call succeeded"
        );
        print!("{}", report);
        report
    }

    /// Print the model's answer.
    pub fn response(&self, text: &str) {
        println!("Response: {}\n", text);
    }

    /// Announce a minute-window wait before it starts.
    pub fn minute_limit_wait(&self, wait: Duration) {
        println!(
            "Minute API request limit exceeded, waiting {:.1}s...",
            wait.as_secs_f64()
        );
    }

    /// Announce that the daily cap refused the call.
    pub fn daily_limit_reached(&self) {
        println!("You have exceeded the daily API request limit. Please try again later.");
    }

    /// The status line for a failed attempt.
    pub fn attempt_failed_line(&self, attempt: &CallAttempt, outcome: &CallOutcome) -> String {
        let detail = match outcome {
            CallOutcome::RecoverableFailure { reason } => reason.clone(),
            other => other.to_string(),
        };
        format!(
            "Error ({}/{}): {}",
            attempt.attempt_number(),
            attempt.max_attempts(),
            detail
        )
    }

    /// Announce a failed attempt.
    pub fn attempt_failed(&self, attempt: &CallAttempt, outcome: &CallOutcome) {
        warn!(
            attempt = attempt.attempt_number(),
            max_attempts = attempt.max_attempts(),
            mode = %attempt.mode(),
            %outcome,
            "Attempt failed"
        );
        println!("{}", self.attempt_failed_line(attempt, outcome));
    }

    /// Announce that every attempt failed.
    pub fn retries_exhausted(&self) {
        println!("Maximum retries reached. Please try again later.");
    }
}
