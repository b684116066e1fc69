//! Line-oriented terminal front-end over a [`CalculatorSession`].

use std::io::Write;

use anyhow::Context;
use calculator::{CalculatorSession, HistoryRecord, InputEvent, InputState, format_result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const PROMPT_HELP: &str =
    "keys: 0-9 . + - * / % ^ = c | empty line: = | commands: history, clear-history, quit";

/// Feed every key of `keys` through the session and return the final state.
///
/// Whitespace is skipped; other unmapped keys are logged and ignored.
///
/// # Errors
/// Fails if the session rejects an event.
pub async fn feed_keys(session: &CalculatorSession, keys: &str) -> anyhow::Result<InputState> {
    for key in keys.chars().filter(|c| !c.is_whitespace()) {
        match InputEvent::from_key(key) {
            Some(event) => {
                session.dispatch(event).await?;
            }
            None => tracing::debug!(%key, "ignoring unmapped key"),
        }
    }
    Ok(session.snapshot().await)
}

/// One history row: `<timestamp>  <a> <op> <b> = <result>`.
#[must_use]
pub fn format_history_record(record: &HistoryRecord) -> String {
    format!(
        "{}  {} {} {} = {}",
        record.created_at.format("%Y-%m-%d %H:%M:%S"),
        format_result(record.operand_a),
        record.operator,
        format_result(record.operand_b),
        format_result(record.result),
    )
}

/// Print stored history, newest first.
///
/// # Errors
/// Repository or output failures.
pub async fn print_history<W: Write>(session: &CalculatorSession, out: &mut W) -> anyhow::Result<()> {
    let records = session.history().await?;
    if records.is_empty() {
        writeln!(out, "(no history)")?;
    }
    for record in &records {
        writeln!(out, "{}", format_history_record(record))?;
    }
    Ok(())
}

fn render<W: Write>(state: &InputState, out: &mut W) -> std::io::Result<()> {
    writeln!(out, "{}", state.display)?;
    if let Some(message) = &state.error_message {
        writeln!(out, "Error: {message}")?;
    }
    Ok(())
}

/// Read lines from `input` until EOF or `quit`.
///
/// # Errors
/// I/O failures on either side, or a failing history repository.
pub async fn run_repl<R, W>(session: &CalculatorSession, input: R, out: &mut W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{PROMPT_HELP}")?;
    render(&session.snapshot().await, out)?;
    out.flush()?;

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("failed to read input")? {
        match line.trim() {
            "quit" | "exit" => break,
            "history" => print_history(session, out).await?,
            "clear-history" => {
                let removed = session.clear_history().await?;
                writeln!(out, "cleared {removed} record(s)")?;
            }
            "" => {
                let state = session.dispatch(InputEvent::Equals).await?;
                render(&state, out)?;
            }
            keys => {
                let state = feed_keys(session, keys).await?;
                render(&state, out)?;
            }
        }
        out.flush()?;
    }
    Ok(())
}
