//! Tests for the configuration system.

use anyhow::Context;
use parley_rate_limit::{DailyReset, ParleyConfig, QuotaLimits, Tier, TierConfig};
use std::io::Write;
use tempfile::Builder;

#[test]
fn test_load_bundled_defaults() -> anyhow::Result<()> {
    let config = ParleyConfig::bundled()?;

    assert_eq!(config.model.name, "gemini-1.5-pro");
    assert_eq!(config.model.system_instruction, "You are helpful assistant");
    assert_eq!(config.retry.max_attempts, 3);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.context.max_tokens, 8192);
    assert_eq!(config.quota.daily_reset, DailyReset::Never);

    let free_tier = &config.providers["gemini"].tiers["free"];
    assert_eq!(free_tier.name, "Free");
    assert_eq!(free_tier.rpm, Some(2));
    assert_eq!(free_tier.rpd, Some(50));
    assert_eq!(free_tier.tpm, Some(32_000));
    Ok(())
}

#[test]
fn test_tier_config_implements_tier_trait() {
    let tier_config = TierConfig {
        name: "Test Tier".to_string(),
        rpm: Some(100),
        tpm: Some(500_000),
        rpd: None,
    };

    assert_eq!(tier_config.rpm(), Some(100));
    assert_eq!(tier_config.tpm(), Some(500_000));
    assert_eq!(tier_config.rpd(), None);
    assert_eq!(tier_config.name(), "Test Tier");
}

#[test]
fn test_get_tier_with_default() -> anyhow::Result<()> {
    let config = ParleyConfig::bundled()?;
    let tier = config.get_tier("gemini", None).context("default tier missing")?;
    assert_eq!(tier.name, "Free");
    Ok(())
}

#[test]
fn test_get_tier_with_specific_name() -> anyhow::Result<()> {
    let config = ParleyConfig::bundled()?;
    let tier = config
        .get_tier("gemini", Some("payasyougo"))
        .context("payasyougo tier missing")?;
    assert_eq!(tier.name, "Pay-as-you-go");
    assert_eq!(tier.rpd, None);
    Ok(())
}

#[test]
fn test_quota_limits_resolution() -> anyhow::Result<()> {
    let config = ParleyConfig::bundled()?;

    let free = config.quota_limits("gemini", None)?;
    assert_eq!(free, QuotaLimits::new(2, 50, 32_000));

    let paid = config.quota_limits("gemini", Some("payasyougo"))?;
    assert_eq!(*paid.rpd(), u32::MAX);

    assert!(config.quota_limits("gemini", Some("enterprise")).is_err());
    assert_eq!(config.quota_limits("unknown", None)?, QuotaLimits::default());
    Ok(())
}

#[test]
fn test_config_from_file() -> anyhow::Result<()> {
    let mut temp_file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        temp_file,
        r#"
[providers.test]
default_tier = "custom"

[providers.test.tiers.custom]
name = "Custom Tier"
rpm = 42
tpm = 999_000
"#
    )?;

    let config = ParleyConfig::from_file(temp_file.path())?;

    assert!(config.providers.contains_key("test"));
    let tier = config
        .get_tier("test", Some("custom"))
        .context("custom tier missing")?;
    assert_eq!(tier.name, "Custom Tier");
    assert_eq!(tier.rpm, Some(42));
    assert_eq!(tier.tpm, Some(999_000));

    // Sections absent from the file keep their defaults
    assert_eq!(config.retry.max_attempts, 3);
    Ok(())
}

#[test]
fn test_load_from_overlays_bundled_defaults() -> anyhow::Result<()> {
    let mut temp_file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        temp_file,
        r#"
[model]
name = "gemini-1.5-flash"

[retry]
max_attempts = 5

[quota]
daily_reset = "rolling"
"#
    )?;

    let config = ParleyConfig::load_from(temp_file.path())?;

    assert_eq!(config.model.name, "gemini-1.5-flash");
    assert_eq!(config.model.system_instruction, "You are helpful assistant");
    assert_eq!(config.retry.max_attempts, 5);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.quota.daily_reset, DailyReset::Rolling);
    assert!(config.providers["gemini"].tiers.contains_key("free"));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() -> anyhow::Result<()> {
    let mut temp_file = Builder::new().suffix(".toml").tempfile()?;
    writeln!(
        temp_file,
        r#"
[context]
warning_threshold = 2.0
"#
    )?;

    let err = ParleyConfig::load_from(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("warning_threshold"));
    Ok(())
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    assert!(ParleyConfig::load_from("/nonexistent/parley.toml").is_err());
}
