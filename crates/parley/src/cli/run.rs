//! Startup wiring: configuration, quota tracker, governor, backend and loop.

use super::Cli;
use parley::{
    GeminiBackend, ParleyConfig, ParleyResult, QuotaTracker, RetryGovernor, Session, Terminal,
    UsageReporter, count_tokens, run_loop,
};
use std::io;
use std::sync::Arc;
use tracing::{info, instrument};

const PROVIDER: &str = "gemini";

/// Load configuration and apply command-line overrides.
fn resolve_config(cli: &Cli) -> ParleyResult<ParleyConfig> {
    let mut config = match &cli.config {
        Some(path) => ParleyConfig::load_from(path)?,
        None => ParleyConfig::load()?,
    };

    if let Some(model) = &cli.model {
        config.model.name = model.clone();
    }
    if let Some(instruction) = &cli.system_instruction {
        config.model.system_instruction = instruction.clone();
    }
    if let Some(max_retries) = cli.max_retries {
        config.retry.max_attempts = max_retries;
    }

    config.validate()?;
    Ok(config)
}

/// Run the interactive session on stdin and stdout.
#[instrument(skip(cli))]
pub async fn run_interactive(cli: Cli) -> ParleyResult<()> {
    let config = resolve_config(&cli)?;
    let limits = config.quota_limits(PROVIDER, cli.tier.as_deref())?;

    info!(
        model = %config.model.name,
        rpm = limits.rpm(),
        rpd = limits.rpd(),
        max_attempts = config.retry.max_attempts,
        "Starting parley"
    );

    let tracker = Arc::new(QuotaTracker::new(limits).with_daily_reset(config.quota.daily_reset));
    let instruction_tokens = count_tokens(&config.model.system_instruction)?;
    let reporter = UsageReporter::new(instruction_tokens, config.context, limits);
    let governor = RetryGovernor::new(tracker, config.retry, reporter);

    let backend = GeminiBackend::from_env(&config.model.name, &config.model.system_instruction)?;

    let stdin = io::stdin();
    let mut terminal = Terminal::new(stdin.lock(), io::stdout());

    let mode = match cli.mode {
        Some(mode) => mode,
        None => match terminal.select_mode()? {
            Some(mode) => mode,
            None => return Ok(()),
        },
    };

    let session = Session::new(mode, backend);
    let sent = run_loop(&mut terminal, &governor, &session).await?;
    info!(prompts = sent, "Session ended");
    Ok(())
}
