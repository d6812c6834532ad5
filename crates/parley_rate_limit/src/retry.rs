//! Quota-aware retry of a single logical call.
//!
//! Per call the governor runs:
//!
//! ```text
//! CheckQuota ─deny─────────────────────────────────▶ Denied (no attempt made)
//!     │admit / wait then admit
//!     ▼
//!   Invoke ─ok──▶ RecordUsage ─▶ Success
//!     │recoverable
//!     ▼
//!   Backoff (base * k) ─▶ CheckQuota        until max_attempts
//!     │after the last backoff
//!     ▼
//!   Exhausted
//!     │unclassified
//!     ▼
//!   Err(..)
//! ```

use crate::{AdmitDecision, QuotaTracker, RetryConfig, UsageReporter};
use parley_core::{CallAttempt, CallOutcome, Reply};
use parley_error::{ParleyError, ParleyResult, RetryableError};
use parley_interface::Invoker;
use std::sync::Arc;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Why the retry loop stopped without a reply.
#[derive(Debug, derive_more::Display)]
enum Halt {
    /// The daily cap refused the attempt before the service was contacted.
    #[display("daily request limit reached")]
    Denied,
    /// A recoverable failure; final once no attempts remain.
    #[display("{}", _0)]
    Recoverable(ParleyError),
    /// An error outside the recoverable classification.
    #[display("{}", _0)]
    Unclassified(ParleyError),
}

/// Wraps one logical call with quota admission, retries and reporting.
///
/// # Example
///
/// ```rust,ignore
/// let governor = RetryGovernor::new(tracker, RetryConfig::default(), reporter);
/// if let Some(text) = governor.execute(&session, "Hello").await? {
///     // already printed by the reporter
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RetryGovernor {
    tracker: Arc<QuotaTracker>,
    retry: RetryConfig,
    reporter: UsageReporter,
}

impl RetryGovernor {
    /// Create a governor over a shared tracker.
    pub fn new(tracker: Arc<QuotaTracker>, retry: RetryConfig, reporter: UsageReporter) -> Self {
        Self {
            tracker,
            retry,
            reporter,
        }
    }

    /// The tracker consulted before each attempt.
    pub fn tracker(&self) -> &Arc<QuotaTracker> {
        &self.tracker
    }

    /// The retry policy in force.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Send `prompt` and return the response text.
    ///
    /// Returns `Ok(None)` when the daily cap denied the call or every attempt
    /// failed recoverably; both cases have already been reported to the user.
    ///
    /// # Errors
    ///
    /// Errors outside the recoverable classification end the call
    /// immediately and are returned as-is.
    pub async fn execute<I>(&self, invoker: &I, prompt: &str) -> ParleyResult<Option<String>>
    where
        I: Invoker + ?Sized,
    {
        Ok(self.execute_outcome(invoker, prompt).await?.into_text())
    }

    /// Send `prompt` and return how the call ended.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    #[instrument(skip(self, invoker, prompt), fields(mode = %invoker.mode(), prompt_len = prompt.len()))]
    pub async fn execute_outcome<I>(&self, invoker: &I, prompt: &str) -> ParleyResult<CallOutcome>
    where
        I: Invoker + ?Sized,
    {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt_number = 0;
        let governor = self;

        let between_attempts = self.retry.delays().take(max_attempts - 1);
        let result = Retry::spawn(between_attempts, move || {
            attempt_number += 1;
            let attempt = CallAttempt::new(
                attempt_number,
                max_attempts,
                prompt,
                invoker.mode(),
                invoker.history_len(),
            );
            governor.attempt(invoker, attempt)
        })
        .await;

        match result {
            Ok(reply) => {
                let tokens_used = *reply.total_tokens();
                self.tracker.record_usage(tokens_used).await;
                let quota = self.tracker.snapshot().await;
                let text = reply.into_text();
                self.reporter.response(&text);
                self.reporter.report(self.reporter.measure(tokens_used), &quota);
                Ok(CallOutcome::Success { text, tokens_used })
            }
            Err(Halt::Denied) => {
                self.reporter.daily_limit_reached();
                Ok(CallOutcome::Denied)
            }
            Err(Halt::Recoverable(err)) => {
                tokio::time::sleep(self.retry.delay_after(max_attempts)).await;
                warn!(error = %err, attempts = max_attempts, "Retries exhausted");
                self.reporter.retries_exhausted();
                Ok(CallOutcome::Exhausted)
            }
            Err(Halt::Unclassified(err)) => {
                warn!(error = %err, "Unclassified error, abandoning call");
                Err(err)
            }
        }
    }

    /// One pass through CheckQuota and Invoke.
    async fn attempt<I>(&self, invoker: &I, attempt: CallAttempt) -> Result<Reply, RetryError<Halt>>
    where
        I: Invoker + ?Sized,
    {
        let decision = self
            .tracker
            .check_and_admit_with(|wait| self.reporter.minute_limit_wait(wait))
            .await;
        if decision == AdmitDecision::Deny {
            return Err(RetryError::Permanent(Halt::Denied));
        }

        debug!(
            attempt = attempt.attempt_number(),
            max_attempts = attempt.max_attempts(),
            %decision,
            "Invoking model"
        );

        match invoker.invoke(attempt.prompt()).await {
            Ok(reply) => Ok(reply),
            Err(err) if err.is_retryable() => {
                debug!(error = %err, attempt = attempt.attempt_number(), "Recoverable failure");
                let outcome = CallOutcome::RecoverableFailure {
                    reason: err.message(),
                };
                self.reporter.attempt_failed(&attempt, &outcome);
                if attempt.is_last() {
                    Err(RetryError::Permanent(Halt::Recoverable(err)))
                } else {
                    Err(RetryError::Transient {
                        err: Halt::Recoverable(err),
                        retry_after: None,
                    })
                }
            }
            Err(err) => Err(RetryError::Permanent(Halt::Unclassified(err))),
        }
    }
}
