//! Interactive loop tests with in-memory input and a counting invoker.

use async_trait::async_trait;
use parley::{
    ContextConfig, GeminiError, GeminiErrorKind, Invoker, Mode, ParleyResult, QuotaLimits,
    QuotaTracker, Reply, RetryConfig, RetryGovernor, Terminal, UsageReporter, run_loop,
};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Invoker that answers every prompt, or fails with an unclassified error
/// when the prompt is "boom".
#[derive(Default)]
struct CountingInvoker {
    calls: AtomicUsize,
}

impl CountingInvoker {
    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Invoker for CountingInvoker {
    async fn invoke(&self, prompt: &str) -> ParleyResult<Reply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt == "boom" {
            return Err(GeminiError::new(GeminiErrorKind::HttpError {
                status_code: 400,
                message: "Invalid argument".to_string(),
            })
            .into());
        }
        Ok(Reply::new(format!("echo: {}", prompt), 10))
    }

    fn mode(&self) -> Mode {
        Mode::Text
    }
}

fn governor() -> RetryGovernor {
    let limits = QuotaLimits::new(100, 50, 32_000);
    RetryGovernor::new(
        Arc::new(QuotaTracker::new(limits)),
        RetryConfig::default(),
        UsageReporter::new(5, ContextConfig::default(), limits),
    )
}

fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
    Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[test]
fn test_invalid_mode_is_rejected_once_then_accepted() {
    let mut term = terminal("banana\nchat\n");

    let mode = term.select_mode().unwrap();

    assert_eq!(mode, Some(Mode::Chat));
    let output = String::from_utf8(term.into_writer()).unwrap();
    assert_eq!(
        output
            .matches("Invalid input! Please enter 'chat' or 'text'.")
            .count(),
        1
    );
    assert_eq!(output.matches("Select mode (chat/text): ").count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_exit_token_stops_before_any_call() -> anyhow::Result<()> {
    for exit in ["q\n", "Q\n", "  q  \n"] {
        let mut term = terminal(exit);
        let invoker = CountingInvoker::default();

        let sent = run_loop(&mut term, &governor(), &invoker).await?;

        assert_eq!(sent, 0);
        assert_eq!(invoker.call_count(), 0);
        let output = String::from_utf8(term.into_writer())?;
        assert!(output.contains("Exiting..."));
    }
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_prompts_after_exit_token_are_ignored() -> anyhow::Result<()> {
    let mut term = terminal("first\nQ\nsecond\n");
    let invoker = CountingInvoker::default();

    let sent = run_loop(&mut term, &governor(), &invoker).await?;

    assert_eq!(sent, 1);
    assert_eq!(invoker.call_count(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_unclassified_error_does_not_end_loop() -> anyhow::Result<()> {
    let mut term = terminal("boom\nstill here\nq\n");
    let invoker = CountingInvoker::default();
    let governor = governor();

    let sent = run_loop(&mut term, &governor, &invoker).await?;

    assert_eq!(sent, 2);
    assert_eq!(invoker.call_count(), 2);
    let output = String::from_utf8(term.into_writer())?;
    assert!(output.contains("Error: HTTP 400 error: Invalid argument"));
    assert!(!output.contains(" at line "));
    assert!(!output.contains("Parley Error"));
    assert_eq!(*governor.tracker().snapshot().await.requests_today(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_end_of_input_ends_loop() -> anyhow::Result<()> {
    let mut term = terminal("only prompt\n");
    let invoker = CountingInvoker::default();

    let sent = run_loop(&mut term, &governor(), &invoker).await?;

    assert_eq!(sent, 1);
    assert_eq!(invoker.call_count(), 1);
    Ok(())
}
