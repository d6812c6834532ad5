//! Configuration structures for quotas, retries and the model.
//!
//! This module provides TOML-based configuration. The configuration system
//! supports:
//! - Bundled defaults (include_str! from parley.toml)
//! - User overrides (./parley.toml or ~/.config/parley/parley.toml)
//! - An explicit file given on the command line
//! - Automatic merging with user values taking precedence

use crate::tiers::GeminiTier;
use crate::{DailyReset, LinearBackoff, QuotaLimits, Tier};
use config::{Config, File, FileFormat};
use parley_error::{ConfigError, ParleyError, ParleyResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

// Bundled default configuration
const DEFAULT_CONFIG: &str = include_str!("../../../parley.toml");

/// Which model to talk to and how to instruct it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Model identifier
    pub name: String,
    /// Fixed system instruction sent with every request
    pub system_instruction: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "gemini-1.5-pro".to_string(),
            system_instruction: "You are helpful assistant".to_string(),
        }
    }
}

/// Retry bound and backoff base.
///
/// ```toml
/// [retry]
/// max_attempts = 3
/// base_delay_ms = 1000
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per call, including the first
    pub max_attempts: usize,
    /// Delay before the second attempt; the k-th retry waits `k` times this
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Backoff base as a duration.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Delays to sleep after each failed attempt: `base * 1` up to
    /// `base * max_attempts`, the last one served before giving up.
    pub fn delays(&self) -> std::iter::Take<LinearBackoff> {
        LinearBackoff::new(self.base_delay()).take(self.max_attempts)
    }

    /// Delay served after the `attempt`-th failure.
    pub fn delay_after(&self, attempt: usize) -> Duration {
        self.base_delay()
            .saturating_mul(u32::try_from(attempt).unwrap_or(u32::MAX))
    }
}

/// Context-window size and warning level.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Context window size in tokens
    pub max_tokens: u64,
    /// Fraction of the window above which a warning is printed
    pub warning_threshold: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_tokens: 8192,
            warning_threshold: 0.8,
        }
    }
}

/// Quota window behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// When the daily request counter starts over
    pub daily_reset: DailyReset,
}

/// Configuration for a specific API tier.
///
/// All limits are optional, where `None` indicates unlimited.
///
/// ```toml
/// [providers.gemini.tiers.free]
/// name = "Free"
/// rpm = 2
/// rpd = 50
/// tpm = 32_000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Pay-as-you-go")
    pub name: String,

    /// Requests per minute limit
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Requests per day limit
    #[serde(default)]
    pub rpd: Option<u32>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn rpd(&self) -> Option<u32> {
        self.rpd
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Configuration for a specific provider.
///
/// Contains the default tier name and a map of tier configurations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    #[serde(default)]
    pub tiers: HashMap<String, TierConfig>,
}

/// Top-level Parley configuration.
///
/// # Example
///
/// ```no_run
/// use parley_rate_limit::ParleyConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ParleyConfig::load()?;
/// let limits = config.quota_limits("gemini", None)?;
/// println!("RPM: {}", limits.rpm());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ParleyConfig {
    /// Model selection
    pub model: ModelConfig,
    /// Retry policy
    pub retry: RetryConfig,
    /// Context-window reporting
    pub context: ContextConfig,
    /// Quota window behaviour
    pub quota: QuotaConfig,
    /// Map of provider name to provider configuration
    pub providers: HashMap<String, ProviderConfig>,
}

impl ParleyConfig {
    /// Load configuration from a specific file path, without bundled defaults.
    ///
    /// Sections missing from the file take their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ParleyResult<Self> {
        debug!("Loading configuration from file");

        let builder = Config::builder().add_source(File::from(path.as_ref()));
        Self::build(builder)
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (parley.toml shipped with the binary)
    /// 2. User config in home directory (~/.config/parley/parley.toml)
    /// 3. User config in current directory (./parley.toml)
    ///
    /// User config files are optional and will be silently skipped if not found.
    #[instrument]
    pub fn load() -> ParleyResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/parley/parley.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("parley").required(false));

        Self::build(builder)
    }

    /// Load the bundled defaults overlaid with exactly one user file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_from(path: impl AsRef<Path>) -> ParleyResult<Self> {
        debug!("Loading bundled defaults overlaid with explicit file");

        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()));
        Self::build(builder)
    }

    /// Parse the bundled defaults alone.
    pub fn bundled() -> ParleyResult<Self> {
        let builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));
        Self::build(builder)
    }

    fn build(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> ParleyResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                ParleyError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                ParleyError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges the rest of the workspace relies on.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first offending value.
    pub fn validate(&self) -> ParleyResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::new("retry.max_attempts must be at least 1").into());
        }
        if self.context.max_tokens == 0 {
            return Err(ConfigError::new("context.max_tokens must be positive").into());
        }
        if !(self.context.warning_threshold > 0.0 && self.context.warning_threshold <= 1.0) {
            return Err(ConfigError::new(format!(
                "context.warning_threshold must be in (0.0, 1.0], got {}",
                self.context.warning_threshold
            ))
            .into());
        }
        for (provider, provider_config) in &self.providers {
            for (tier_name, tier) in &provider_config.tiers {
                if tier.rpm == Some(0) || tier.rpd == Some(0) {
                    return Err(ConfigError::new(format!(
                        "providers.{}.tiers.{}: rpm and rpd must be positive",
                        provider, tier_name
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Get tier configuration for a provider.
    ///
    /// Uses the provider's default tier when `tier_name` is `None`.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }

    /// Resolve the limits to enforce.
    ///
    /// Falls back to [`GeminiTier::Free`] when nothing is configured for the
    /// provider and no tier was asked for.
    ///
    /// # Errors
    ///
    /// Returns an error if `tier_name` names a tier that is not configured.
    pub fn quota_limits(&self, provider: &str, tier_name: Option<&str>) -> ParleyResult<QuotaLimits> {
        match (self.get_tier(provider, tier_name), tier_name) {
            (Some(tier), _) => Ok(QuotaLimits::from_tier(&tier)),
            (None, Some(name)) => Err(ConfigError::new(format!(
                "No tier named '{}' configured for provider '{}'",
                name, provider
            ))
            .into()),
            (None, None) => {
                debug!(provider, "No tier configured, using built-in free tier");
                Ok(QuotaLimits::from_tier(&GeminiTier::Free))
            }
        }
    }
}
