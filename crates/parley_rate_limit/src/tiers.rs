//! Built-in Gemini tiers.
//!
//! These mirror the `[providers.gemini.tiers.*]` tables in the bundled
//! `parley.toml` and are used when no configuration names a tier.

use crate::Tier;

/// Gemini API usage tiers for `gemini-1.5-pro`.
///
/// Based on [Gemini API pricing](https://ai.google.dev/pricing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GeminiTier {
    /// Free tier: 2 RPM, 32K TPM, 50 RPD
    #[default]
    Free,
    /// Pay-as-you-go: 1000 RPM, 4M TPM, no daily limit
    PayAsYouGo,
}

impl Tier for GeminiTier {
    fn rpm(&self) -> Option<u32> {
        match self {
            GeminiTier::Free => Some(2),
            GeminiTier::PayAsYouGo => Some(1000),
        }
    }

    fn tpm(&self) -> Option<u64> {
        match self {
            GeminiTier::Free => Some(32_000),
            GeminiTier::PayAsYouGo => Some(4_000_000),
        }
    }

    fn rpd(&self) -> Option<u32> {
        match self {
            GeminiTier::Free => Some(50),
            GeminiTier::PayAsYouGo => None,
        }
    }

    fn name(&self) -> &str {
        match self {
            GeminiTier::Free => "Free",
            GeminiTier::PayAsYouGo => "Pay-as-you-go",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_tier_matches_bundled_defaults() {
        let tier = GeminiTier::Free;
        assert_eq!(tier.rpm(), Some(2));
        assert_eq!(tier.rpd(), Some(50));
        assert_eq!(tier.tpm(), Some(32_000));
        assert_eq!(tier.name(), "Free");
    }

    #[test]
    fn paid_tier_has_no_daily_cap() {
        assert_eq!(GeminiTier::PayAsYouGo.rpd(), None);
    }
}
