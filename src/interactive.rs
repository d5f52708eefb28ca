//! Interactive question loop
//!
//! `surveyor --interactive` keeps one [`Session`] open and reads one question
//! per line, printing each sanitized answer fragment as it arrives. Lines
//! starting with `:` are commands:
//!
//! - `:again` shows the current answer again without a new request
//! - `:clear` forgets the current answer or error
//! - `:quit` ends the loop, as does end of input

use log::debug;
use serde_json::Value;
use std::io::{BufRead, Write};

use crate::error::Result;
use crate::session::{Session, ViewState};

const PROMPT: &str = "surveyor> ";

// ─────────────────────────────────────────────────────────────────────────────
// Input Lines
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line<'a> {
    Question(&'a str),
    Again,
    Clear,
    Quit,
    Unknown(&'a str),
}

fn parse_line(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    match trimmed.strip_prefix(':') {
        Some("again") => Line::Again,
        Some("clear") => Line::Clear,
        Some("quit") | Some("q") => Line::Quit,
        Some(_) => Line::Unknown(trimmed),
        None => Line::Question(line),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Loop
// ─────────────────────────────────────────────────────────────────────────────

/// Read questions from `input` until `:quit` or end of input.
///
/// `ask` performs the request for one question. A failed request is shown
/// and the loop carries on; only I/O errors on `input`/`out` end it early.
pub fn run_loop<R, W, F>(
    input: R,
    out: &mut W,
    session: &mut Session,
    provider: &str,
    mut ask: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<Value>,
{
    prompt(out)?;

    for line in input.lines() {
        let line = line?;
        match parse_line(&line) {
            Line::Quit => break,
            Line::Again => {
                session.refresh();
                debug!("Pipeline runs so far: {}", session.render_count());
                show(session, out)?;
            }
            Line::Clear => session.clear(),
            Line::Unknown(command) => writeln!(out, "Unknown command: {}", command)?,
            Line::Question(question) => {
                // A blank question is refused by the session and shown below
                if let Ok(ticket) = session.begin(question, provider) {
                    if session.is_loading() {
                        writeln!(out, "Generating...")?;
                        out.flush()?;
                    }
                    if let Err(err) = session.finish(ticket, ask(question)) {
                        debug!("Request failed: {}", err);
                    }
                }
                show(session, out)?;
            }
        }
        prompt(out)?;
    }

    writeln!(out)?;
    Ok(())
}

fn prompt<W: Write>(out: &mut W) -> Result<()> {
    write!(out, "{}", PROMPT)?;
    out.flush()?;
    Ok(())
}

fn show<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    match session.state() {
        ViewState::Answered(answer) => writeln!(out, "{}", answer.html.trim_end())?,
        ViewState::Failed(message) => writeln!(out, "Error: {}", message)?,
        ViewState::Empty | ViewState::Loading => {}
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
