//! Question/answer session state
//!
//! A session moves between four view states: nothing asked yet, a request in
//! flight, a visible error, or a rendered answer. Every request is stamped
//! with a [`Ticket`]; a result is only shown if its ticket is the most recent
//! one, so a late answer to a superseded question never replaces a fresher
//! one.

use log::{debug, info};
use serde_json::Value;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::pipeline::AnswerCache;

// ─────────────────────────────────────────────────────────────────────────────
// Types
// ─────────────────────────────────────────────────────────────────────────────

/// Identifies one submitted question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// A rendered answer together with what was asked.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// The question as sent (trimmed)
    pub question: String,
    /// Where the answer came from, e.g. `cloud (gemini)`
    pub provider: String,
    /// Raw payload returned by the service
    pub payload: Arc<Value>,
    /// Extracted plain text
    pub text: String,
    /// Sanitized HTML fragment
    pub html: String,
}

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    /// Nothing asked yet, or cleared
    #[default]
    Empty,
    /// A request is in flight
    Loading,
    /// The last request failed; the message is shown instead of an answer
    Failed(String),
    /// The last request succeeded
    Answered(Answer),
}

/// Request waiting for its result.
#[derive(Debug, Clone)]
struct Pending {
    ticket: Ticket,
    question: String,
    provider: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks the latest question and decides which result is displayed.
#[derive(Debug, Default)]
pub struct Session {
    state: ViewState,
    pending: Option<Pending>,
    next_ticket: u64,
    cache: AnswerCache,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current view state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// The displayed answer, if any.
    pub fn answer(&self) -> Option<&Answer> {
        match &self.state {
            ViewState::Answered(answer) => Some(answer),
            _ => None,
        }
    }

    /// The displayed error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Number of times the rendering pipeline actually ran.
    pub fn render_count(&self) -> usize {
        self.cache.render_count()
    }

    /// Submit a question.
    ///
    /// Clears any previous answer or error and enters `Loading`. A blank
    /// question is rejected and shown as an error instead.
    pub fn begin(&mut self, question: &str, provider: impl Into<String>) -> Result<Ticket> {
        let question = question.trim();
        if question.is_empty() {
            self.pending = None;
            self.state = ViewState::Failed(Error::EmptyQuestion.to_string());
            return Err(Error::EmptyQuestion);
        }

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.pending = Some(Pending {
            ticket,
            question: question.to_string(),
            provider: provider.into(),
        });
        self.state = ViewState::Loading;

        debug!("Issued ticket {:?} for question", ticket);
        Ok(ticket)
    }

    /// Deliver the result of a request.
    ///
    /// Returns `false` and changes nothing when `ticket` is not the most
    /// recently issued one.
    pub fn complete(&mut self, ticket: Ticket, result: Result<Value>) -> bool {
        let Some(pending) = self.take_pending(ticket) else {
            return false;
        };

        self.state = match result {
            Ok(payload) => {
                let payload = Arc::new(payload);
                let rendered = self.cache.render(&payload);
                info!(
                    "Answer rendered ({} byte(s) of HTML)",
                    rendered.html.len()
                );
                ViewState::Answered(Answer {
                    question: pending.question,
                    provider: pending.provider,
                    text: rendered.text.clone(),
                    html: rendered.html.clone(),
                    payload,
                })
            }
            Err(err) => ViewState::Failed(err.to_string()),
        };
        true
    }

    /// Report a failed request without giving up the error.
    ///
    /// Same staleness rule as [`Session::complete`].
    pub fn fail(&mut self, ticket: Ticket, err: &Error) -> bool {
        if self.take_pending(ticket).is_none() {
            return false;
        }
        self.state = ViewState::Failed(err.to_string());
        true
    }

    /// [`Session::complete`] on success, [`Session::fail`] on error; the
    /// error is handed back either way.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Value>) -> Result<()> {
        match result {
            Ok(payload) => {
                self.complete(ticket, Ok(payload));
                Ok(())
            }
            Err(err) => {
                self.fail(ticket, &err);
                Err(err)
            }
        }
    }

    fn take_pending(&mut self, ticket: Ticket) -> Option<Pending> {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => Some(pending),
            other => {
                debug!("Discarding result for superseded ticket {:?}", ticket);
                self.pending = other;
                None
            }
        }
    }

    /// Show the current answer again.
    ///
    /// The pipeline does not rerun for a payload that has already been
    /// rendered.
    pub fn refresh(&mut self) {
        if let ViewState::Answered(answer) = &mut self.state {
            let rendered = self.cache.render(&answer.payload);
            answer.text = rendered.text.clone();
            answer.html = rendered.html.clone();
        }
    }

    /// Forget everything and return to `Empty`.
    pub fn clear(&mut self) {
        self.state = ViewState::Empty;
        self.pending = None;
        self.cache.clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert_eq!(session.state(), &ViewState::Empty);
        assert!(!session.is_loading());
        assert!(session.answer().is_none());
    }

    #[test]
    fn test_blank_question_is_rejected() {
        let mut session = Session::new();
        let result = session.begin("   ", "local");
        assert!(matches!(result, Err(Error::EmptyQuestion)));
        assert_eq!(session.error_message(), Some("Please enter a question"));
    }

    #[test]
    fn test_begin_enters_loading_and_clears_previous() {
        let mut session = Session::new();
        let ticket = session.begin("first", "local").unwrap();
        session.complete(ticket, Ok(json!({ "answer": "one" })));
        assert!(session.answer().is_some());

        session.begin("second", "local").unwrap();
        assert!(session.is_loading());
        assert!(session.answer().is_none());
        assert!(session.error_message().is_none());
    }

    #[test]
    fn test_complete_renders_answer() {
        let mut session = Session::new();
        let ticket = session.begin("  What is $x$?  ", "cloud (gemini)").unwrap();
        assert!(session.complete(ticket, Ok(json!({ "answer": "**bold**" }))));

        let answer = session.answer().unwrap();
        assert_eq!(answer.question, "What is $x$?");
        assert_eq!(answer.provider, "cloud (gemini)");
        assert_eq!(answer.text, "**bold**");
        assert!(answer.html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_complete_with_error_shows_message() {
        let mut session = Session::new();
        let ticket = session.begin("Why?", "local").unwrap();
        let err = Error::Http {
            status: 502,
            message: "bad gateway".to_string(),
        };
        assert!(session.complete(ticket, Err(err)));

        assert_eq!(session.error_message(), Some("HTTP error! status: 502"));
        assert!(session.answer().is_none());
    }

    #[test]
    fn test_fail_keeps_error_for_caller() {
        let mut session = Session::new();
        let old = session.begin("first", "local").unwrap();
        let fresh = session.begin("second", "local").unwrap();

        assert!(!session.fail(old, &Error::EmptyQuestion));
        assert!(session.is_loading());

        assert!(session.fail(fresh, &Error::EmptyQuestion));
        assert_eq!(session.error_message(), Some("Please enter a question"));
    }

    #[test]
    fn test_finish_shows_and_returns_error() {
        let mut session = Session::new();
        let ticket = session.begin("Why?", "local").unwrap();
        let result = session.finish(
            ticket,
            Err(Error::Response {
                message: "not json".to_string(),
            }),
        );

        assert!(matches!(result, Err(Error::Response { .. })));
        assert!(session.error_message().unwrap().contains("not json"));
    }

    #[test]
    fn test_finish_with_payload_answers() {
        let mut session = Session::new();
        let ticket = session.begin("Why?", "local").unwrap();
        assert!(session.finish(ticket, Ok(json!({ "answer": "because" }))).is_ok());
        assert_eq!(session.answer().unwrap().text, "because");
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = Session::new();
        let old = session.begin("old question", "local").unwrap();
        let fresh = session.begin("new question", "local").unwrap();
        assert!(old < fresh);

        assert!(!session.complete(old, Ok(json!({ "answer": "stale" }))));
        assert!(session.is_loading());

        assert!(session.complete(fresh, Ok(json!({ "answer": "fresh" }))));
        assert_eq!(session.answer().unwrap().text, "fresh");

        // A late result after the fresh one must not overwrite it either
        assert!(!session.complete(old, Ok(json!({ "answer": "stale" }))));
        assert_eq!(session.answer().unwrap().text, "fresh");
    }

    #[test]
    fn test_refresh_does_not_rerender() {
        let mut session = Session::new();
        let ticket = session.begin("q", "local").unwrap();
        session.complete(ticket, Ok(json!({ "answer": "hello" })));
        assert_eq!(session.render_count(), 1);

        session.refresh();
        session.refresh();
        assert_eq!(session.render_count(), 1);
        assert_eq!(session.answer().unwrap().text, "hello");
    }

    #[test]
    fn test_clear_resets_state() {
        let mut session = Session::new();
        let ticket = session.begin("q", "local").unwrap();
        session.clear();

        assert_eq!(session.state(), &ViewState::Empty);
        assert!(!session.complete(ticket, Ok(json!({ "answer": "late" }))));
        assert_eq!(session.state(), &ViewState::Empty);
    }
}
