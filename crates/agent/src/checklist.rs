//! Interactive checklist prompt.
//!
//! Asks about each item the guard has not ticked yet, one line per item,
//! and toggles the ones answered with `y`. Generic over the reader and
//! writer so tests can drive it from memory.

use guardpost_core::session::{CheckInSession, SessionError, SessionState};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// How one pass over the checklist ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Every item is done.
    Complete,
    /// Items still not done, in checklist order.
    Incomplete(Vec<String>),
    /// The guard typed `q` or closed the input.
    Quit,
}

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Session(#[from] SessionError),
}

enum Answer {
    Yes,
    No,
    Quit,
}

fn parse_answer(line: &str) -> Answer {
    match line.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" => Answer::Yes,
        "q" | "quit" => Answer::Quit,
        _ => Answer::No,
    }
}

/// Run one pass over the unchecked items of the session's form.
///
/// The session must be in `ReadyToFill`.
pub async fn prompt_checklist<R, W>(
    session: &mut CheckInSession,
    input: &mut R,
    output: &mut W,
) -> Result<PromptOutcome, PromptError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let (pending, total) = match session.state() {
        SessionState::ReadyToFill { form } => (
            form.unchecked_items()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>(),
            form.checklist.len(),
        ),
        other => {
            return Err(SessionError::InvalidTransition {
                action: "fill in the checklist",
                state: other.name(),
            }
            .into())
        }
    };

    let mut line = String::new();
    for (index, item) in pending.iter().enumerate() {
        output
            .write_all(format!("[{}/{}] {item}? [y/N/q] ", index + 1, pending.len()).as_bytes())
            .await?;
        output.flush().await?;

        line.clear();
        if input.read_line(&mut line).await? == 0 {
            return Ok(PromptOutcome::Quit);
        }
        match parse_answer(&line) {
            Answer::Yes => {
                session.toggle_item(item)?;
            }
            Answer::No => {}
            Answer::Quit => return Ok(PromptOutcome::Quit),
        }
    }

    let SessionState::ReadyToFill { form } = session.state() else {
        return Ok(PromptOutcome::Quit);
    };
    let remaining: Vec<String> = form
        .unchecked_items()
        .into_iter()
        .map(str::to_string)
        .collect();
    tracing::debug!(total, remaining = remaining.len(), "Checklist pass finished");

    if remaining.is_empty() {
        Ok(PromptOutcome::Complete)
    } else {
        Ok(PromptOutcome::Incomplete(remaining))
    }
}

/// Ask a yes/no question; anything but `y`/`yes` (or EOF) is no.
pub async fn confirm<R, W>(question: &str, input: &mut R, output: &mut W) -> std::io::Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("{question} [y/N] ").as_bytes()).await?;
    output.flush().await?;
    let mut line = String::new();
    if input.read_line(&mut line).await? == 0 {
        return Ok(false);
    }
    Ok(matches!(parse_answer(&line), Answer::Yes))
}
