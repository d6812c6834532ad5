//! The interactive prompt loop.
//!
//! Generic over [`BufRead`] and [`Write`] so it runs against the real
//! terminal in the binary and against in-memory buffers in tests.

use parley_core::Mode;
use parley_error::{ParleyResult, TerminalError};
use parley_interface::Invoker;
use parley_rate_limit::RetryGovernor;
use std::io::{BufRead, Write};
use std::str::FromStr;
use tracing::{debug, error, instrument};

const MODE_PROMPT: &str = "Select mode (chat/text): ";
const INVALID_MODE: &str = "Invalid input! Please enter 'chat' or 'text'.";
const QUESTION_PROMPT: &str = "Enter your question (Press 'q' to exit): ";
const EXIT_TOKEN: &str = "q";

/// Line-oriented terminal over any reader and writer.
#[derive(Debug)]
pub struct Terminal<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> Terminal<R, W> {
    /// Create a terminal.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Consume the terminal, returning the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Print a line.
    pub fn say(&mut self, line: impl std::fmt::Display) -> ParleyResult<()> {
        writeln!(self.writer, "{}", line).map_err(TerminalError::from)?;
        Ok(())
    }

    /// Show `prompt` and read one line, without its line ending.
    ///
    /// Returns `None` at end of input.
    fn ask(&mut self, prompt: &str) -> ParleyResult<Option<String>> {
        write!(self.writer, "{}", prompt).map_err(TerminalError::from)?;
        self.writer.flush().map_err(TerminalError::from)?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(TerminalError::from)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Ask for the mode until a valid one is entered.
    ///
    /// Returns `None` if input ends first.
    #[instrument(skip(self))]
    pub fn select_mode(&mut self) -> ParleyResult<Option<Mode>> {
        loop {
            let Some(answer) = self.ask(MODE_PROMPT)? else {
                return Ok(None);
            };
            match Mode::from_str(answer.trim()) {
                Ok(mode) => {
                    debug!(%mode, "Mode selected");
                    return Ok(Some(mode));
                }
                Err(_) => self.say(INVALID_MODE)?,
            }
        }
    }

    /// Read the next prompt.
    ///
    /// Returns `None` when the user enters `q` (any case) or input ends.
    /// Blank lines are skipped.
    pub fn next_prompt(&mut self) -> ParleyResult<Option<String>> {
        loop {
            let Some(line) = self.ask(QUESTION_PROMPT)? else {
                self.say("")?;
                self.say("Exiting...")?;
                return Ok(None);
            };
            if line.trim().eq_ignore_ascii_case(EXIT_TOKEN) {
                self.say("Exiting...")?;
                return Ok(None);
            }
            if !line.trim().is_empty() {
                return Ok(Some(line));
            }
        }
    }
}

/// Read prompts and send each through the governor until the user quits.
///
/// Errors from a single call are printed and the loop moves on to the next
/// prompt. Only terminal I/O failures end the loop early.
///
/// Returns the number of prompts sent.
pub async fn run_loop<R, W, I>(
    terminal: &mut Terminal<R, W>,
    governor: &RetryGovernor,
    invoker: &I,
) -> ParleyResult<usize>
where
    R: BufRead,
    W: Write,
    I: Invoker + ?Sized,
{
    let mut sent = 0;
    while let Some(prompt) = terminal.next_prompt()? {
        sent += 1;
        if let Err(err) = governor.execute(invoker, &prompt).await {
            error!(error = %err, "Call failed");
            terminal.say(format!("Error: {}", err.message()))?;
        }
    }
    Ok(sent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(terminal: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(terminal.into_writer()).unwrap()
    }

    #[test]
    fn mode_is_case_insensitive() {
        let mut term = terminal("  TEXT \n");
        assert_eq!(term.select_mode().unwrap(), Some(Mode::Text));
    }

    #[test]
    fn eof_during_mode_selection() {
        let mut term = terminal("");
        assert_eq!(term.select_mode().unwrap(), None);
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut term = terminal("\n   \nhello\n");
        assert_eq!(term.next_prompt().unwrap().as_deref(), Some("hello"));
    }

    #[test]
    fn eof_exits_like_q() {
        let mut term = terminal("");
        assert_eq!(term.next_prompt().unwrap(), None);
        assert!(output(term).contains("Exiting..."));
    }

    #[test]
    fn prompt_keeps_inner_whitespace() {
        let mut term = terminal("what is  rust?\r\n");
        assert_eq!(
            term.next_prompt().unwrap().as_deref(),
            Some("what is  rust?")
        );
    }
}
