//! Parley CLI binary.
//!
//! Reads prompts from the terminal and sends them to Gemini, waiting out the
//! per-minute request limit, refusing once the daily limit is spent and
//! retrying transient failures.

use clap::Parser;
use parley::{LoggingConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, run_interactive};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Pick up GEMINI_API_KEY from a .env file if there is one
    let _ = dotenvy::dotenv();

    let logging = LoggingConfig::new()
        .with_log_level(if cli.verbose { "debug" } else { "warn" })
        .with_json_logs(cli.json_logs);
    init_logging(&logging)?;

    run_interactive(cli).await?;

    Ok(())
}
