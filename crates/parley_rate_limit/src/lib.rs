//! Rate limiting, retry governance and usage reporting.
//!
//! This crate is the part of Parley that decides whether a prompt may be sent,
//! when, and how often to try again:
//!
//! - [`QuotaTracker`] keeps rolling per-minute and per-day request counters and
//!   a per-minute token counter, and admits, delays or denies each attempt.
//! - [`RetryGovernor`] wraps one logical call: it consults the tracker before
//!   every attempt, invokes the session adapter, classifies failures and
//!   retries recoverable ones with linear backoff.
//! - [`UsageReporter`] prints context-window and quota usage after each
//!   successful call and warns when the context window is nearly full.
//!
//! Limits come from a [`Tier`], usually a [`TierConfig`] loaded through
//! [`ParleyConfig`].

mod backoff;
mod config;
mod quota;
mod report;
mod retry;
mod tier;
pub mod tiers;

pub use backoff::LinearBackoff;
pub use config::{
    ContextConfig, ModelConfig, ParleyConfig, ProviderConfig, QuotaConfig, RetryConfig, TierConfig,
};
pub use quota::{AdmitDecision, DailyReset, QuotaLimits, QuotaState, QuotaTracker};
pub use report::{UsageReport, UsageReporter};
pub use retry::RetryGovernor;
pub use tier::Tier;
