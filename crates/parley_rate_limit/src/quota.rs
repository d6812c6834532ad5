//! Request and token quota tracking over rolling windows.
//!
//! The tracker gates calls on request counts only. Tokens per minute are
//! counted so they can be reported, but a call is never delayed or refused
//! because of them.
//!
//! Time is read from [`tokio::time::Instant`] and waits use
//! [`tokio::time::sleep`], so tests can drive the windows with Tokio's paused
//! clock instead of real wall-clock time.

use crate::Tier;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Length of the request/token minute window.
pub const MINUTE: Duration = Duration::from_secs(60);

/// Length of the rolling day window.
pub const DAY: Duration = Duration::from_secs(24 * 60 * 60);

/// When the per-day request counter starts over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyReset {
    /// Never during the life of the process; the daily cap is a process-lifetime cap.
    #[default]
    Never,
    /// 24 hours after the day window opened.
    Rolling,
}

/// Concrete limits the tracker enforces.
///
/// `u32::MAX`/`u64::MAX` stand for "no limit".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_getters::Getters)]
pub struct QuotaLimits {
    /// Requests per minute
    rpm: u32,
    /// Requests per day
    rpd: u32,
    /// Tokens per minute (reported only)
    tpm: u64,
}

impl QuotaLimits {
    /// Create limits from explicit values.
    pub fn new(rpm: u32, rpd: u32, tpm: u64) -> Self {
        Self { rpm, rpd, tpm }
    }

    /// Create limits from a tier, treating absent limits as unlimited.
    pub fn from_tier(tier: &impl Tier) -> Self {
        Self {
            rpm: tier.rpm().unwrap_or(u32::MAX),
            rpd: tier.rpd().unwrap_or(u32::MAX),
            tpm: tier.tpm().unwrap_or(u64::MAX),
        }
    }
}

impl Default for QuotaLimits {
    fn default() -> Self {
        Self::from_tier(&crate::tiers::GeminiTier::Free)
    }
}

/// Verdict on whether an attempt may go ahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum AdmitDecision {
    /// Proceed immediately.
    #[display("admit")]
    Admit,
    /// The minute window was full; proceed once `_0` has elapsed.
    ///
    /// Returned by [`QuotaTracker::check_and_admit`] after the wait has been
    /// served and the minute window reset.
    #[display("admit after {:?}", _0)]
    WaitThenAdmit(Duration),
    /// The daily cap is spent; do not contact the service.
    #[display("deny")]
    Deny,
}

/// Counters owned by the [`QuotaTracker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct QuotaState {
    /// Successful requests in the current minute window
    requests_this_minute: u32,
    /// Successful requests in the current day window
    requests_today: u32,
    /// Tokens consumed in the current minute window
    tokens_this_minute: u64,
    /// Start of the current minute window
    window_start: Instant,
    /// Start of the current day window
    day_start: Instant,
}

impl QuotaState {
    fn new(now: Instant) -> Self {
        Self {
            requests_this_minute: 0,
            requests_today: 0,
            tokens_this_minute: 0,
            window_start: now,
            day_start: now,
        }
    }

    fn reset_minute(&mut self, now: Instant) {
        self.requests_this_minute = 0;
        self.tokens_this_minute = 0;
        self.window_start = now;
    }

    /// Start new windows where due and return the time spent in the minute window.
    fn roll_windows(&mut self, now: Instant, daily_reset: DailyReset) -> Duration {
        let mut elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= MINUTE {
            debug!(
                requests = self.requests_this_minute,
                tokens = self.tokens_this_minute,
                "Minute window elapsed, resetting counters"
            );
            self.reset_minute(now);
            elapsed = Duration::ZERO;
        }

        if daily_reset == DailyReset::Rolling
            && now.saturating_duration_since(self.day_start) >= DAY
        {
            debug!(requests = self.requests_today, "Day window elapsed, resetting counter");
            self.requests_today = 0;
            self.day_start = now;
        }

        elapsed
    }

    fn decide(&self, elapsed: Duration, limits: &QuotaLimits) -> AdmitDecision {
        if self.requests_today >= limits.rpd {
            AdmitDecision::Deny
        } else if self.requests_this_minute >= limits.rpm {
            AdmitDecision::WaitThenAdmit(MINUTE.saturating_sub(elapsed))
        } else {
            AdmitDecision::Admit
        }
    }
}

/// Tracks request and token consumption and admits, delays or denies calls.
///
/// State sits behind an async mutex that is held across the minute-window
/// wait, so concurrent callers cannot both slip into a full window.
///
/// # Example
///
/// ```
/// use parley_rate_limit::{AdmitDecision, QuotaLimits, QuotaTracker};
///
/// # #[tokio::main]
/// # async fn main() {
/// let tracker = QuotaTracker::new(QuotaLimits::new(2, 50, 32_000));
/// assert_eq!(tracker.check_and_admit().await, AdmitDecision::Admit);
/// tracker.record_usage(120).await;
/// assert_eq!(*tracker.snapshot().await.requests_today(), 1);
/// # }
/// ```
#[derive(Debug)]
pub struct QuotaTracker {
    limits: QuotaLimits,
    daily_reset: DailyReset,
    state: Mutex<QuotaState>,
}

impl QuotaTracker {
    /// Create a tracker whose windows open now.
    pub fn new(limits: QuotaLimits) -> Self {
        Self {
            limits,
            daily_reset: DailyReset::default(),
            state: Mutex::new(QuotaState::new(Instant::now())),
        }
    }

    /// Choose when the daily counter starts over.
    pub fn with_daily_reset(mut self, daily_reset: DailyReset) -> Self {
        self.daily_reset = daily_reset;
        self
    }

    /// The limits being enforced.
    pub fn limits(&self) -> &QuotaLimits {
        &self.limits
    }

    /// The daily reset policy.
    pub fn daily_reset(&self) -> DailyReset {
        self.daily_reset
    }

    /// Decide whether a call could go ahead right now, without waiting.
    ///
    /// Expired windows are reset as a side effect.
    #[instrument(skip(self))]
    pub async fn assess(&self) -> AdmitDecision {
        let mut state = self.state.lock().await;
        let elapsed = state.roll_windows(Instant::now(), self.daily_reset);
        state.decide(elapsed, &self.limits)
    }

    /// Admit a call, sleeping first if the minute window is full.
    ///
    /// Returns [`AdmitDecision::Deny`] once the daily cap is spent,
    /// [`AdmitDecision::WaitThenAdmit`] after serving a minute-window wait, and
    /// [`AdmitDecision::Admit`] otherwise.
    pub async fn check_and_admit(&self) -> AdmitDecision {
        self.check_and_admit_with(|_| {}).await
    }

    /// Like [`check_and_admit`](Self::check_and_admit), calling `on_wait`
    /// with the wait length before sleeping.
    #[instrument(skip(self, on_wait))]
    pub async fn check_and_admit_with<F>(&self, on_wait: F) -> AdmitDecision
    where
        F: FnOnce(Duration),
    {
        let mut state = self.state.lock().await;
        let elapsed = state.roll_windows(Instant::now(), self.daily_reset);
        let decision = state.decide(elapsed, &self.limits);

        match decision {
            AdmitDecision::Deny => {
                warn!(
                    requests_today = state.requests_today,
                    rpd = self.limits.rpd,
                    "Daily request limit reached"
                );
            }
            AdmitDecision::WaitThenAdmit(wait) => {
                info!(
                    requests_this_minute = state.requests_this_minute,
                    rpm = self.limits.rpm,
                    wait_ms = wait.as_millis() as u64,
                    "Minute request limit reached, waiting for the window to roll over"
                );
                on_wait(wait);
                tokio::time::sleep(wait).await;
                state.reset_minute(Instant::now());
            }
            AdmitDecision::Admit => {
                debug!(
                    requests_this_minute = state.requests_this_minute,
                    requests_today = state.requests_today,
                    "Call admitted"
                );
            }
        }

        decision
    }

    /// Count one successful call and the tokens it consumed.
    ///
    /// Call exactly once per successful call and never for failed attempts.
    #[instrument(skip(self))]
    pub async fn record_usage(&self, tokens_used: u64) {
        let mut state = self.state.lock().await;
        state.requests_this_minute = state.requests_this_minute.saturating_add(1);
        state.requests_today = state.requests_today.saturating_add(1);
        state.tokens_this_minute = state.tokens_this_minute.saturating_add(tokens_used);
        debug!(
            requests_this_minute = state.requests_this_minute,
            requests_today = state.requests_today,
            tokens_this_minute = state.tokens_this_minute,
            "Recorded usage"
        );
    }

    /// Copy of the current counters.
    pub async fn snapshot(&self) -> QuotaState {
        *self.state.lock().await
    }
}
