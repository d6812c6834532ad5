//! CLI argument definitions.

use clap::Parser;
use parley::Mode;
use std::path::PathBuf;

/// Parley - chat with Gemini from the terminal without tripping its rate limits
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Chat with Gemini from the terminal without tripping its rate limits", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Interaction mode (chat or text); asked interactively when omitted
    #[arg(long)]
    pub mode: Option<Mode>,

    /// Model name, e.g. gemini-1.5-flash
    #[arg(long)]
    pub model: Option<String>,

    /// Rate-limit tier from the configuration (e.g. free, payasyougo)
    #[arg(long)]
    pub tier: Option<String>,

    /// System instruction sent with every request
    #[arg(long)]
    pub system_instruction: Option<String>,

    /// Configuration file to load over the bundled defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Attempts per prompt, including the first
    #[arg(long)]
    pub max_retries: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_flags() {
        let cli = Cli::try_parse_from([
            "parley",
            "--mode",
            "CHAT",
            "--model",
            "gemini-1.5-flash",
            "--tier",
            "payasyougo",
            "--max-retries",
            "5",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.mode, Some(Mode::Chat));
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(cli.tier.as_deref(), Some("payasyougo"));
        assert_eq!(cli.max_retries, Some(5));
        assert!(cli.verbose);
        assert!(!cli.json_logs);
    }

    #[test]
    fn rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["parley", "--mode", "banana"]).is_err());
    }

    #[test]
    fn everything_is_optional() {
        let cli = Cli::try_parse_from(["parley"]).unwrap();
        assert!(cli.mode.is_none());
        assert!(cli.config.is_none());
    }
}
