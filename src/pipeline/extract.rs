//! Content extraction from answer payloads
//!
//! The generation service does not promise a schema. Depending on the
//! provider and backend version the answer arrives as a plain string, as a
//! list of paragraphs, or as some other JSON structure. This module resolves
//! that once, into [`AnswerBody`], so every later stage works on a `String`.

use log::debug;
use serde_json::Value;

/// Payload keys that may carry the answer, in order of preference.
pub const ANSWER_FIELDS: &[&str] = &["answer", "data", "summary", "text"];

/// Separator placed between sequence elements so each one becomes its own
/// Markdown block.
const BLOCK_SEPARATOR: &str = "\n\n";

// ─────────────────────────────────────────────────────────────────────────────
// Answer Body
// ─────────────────────────────────────────────────────────────────────────────

/// The renderable part of a payload, resolved to one of three shapes.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerBody {
    /// A single string, used verbatim
    Text(String),
    /// An ordered list of strings (paragraphs or sections)
    Sequence(Vec<String>),
    /// Anything else; shown pretty-printed so it can at least be inspected
    Other(Value),
}

impl AnswerBody {
    /// Select the answer out of a payload.
    ///
    /// Returns `None` when there is no payload, or the payload is an object
    /// with no non-null answer field.
    pub fn from_payload(payload: Option<&Value>) -> Option<Self> {
        let value = match payload? {
            Value::Null => return None,
            Value::Object(map) => ANSWER_FIELDS
                .iter()
                .find_map(|key| map.get(*key).filter(|value| !value.is_null()))?,
            // A bare string or list is the answer itself
            other => other,
        };
        Some(Self::classify(value))
    }

    fn classify(value: &Value) -> Self {
        match value {
            Value::String(text) => AnswerBody::Text(text.clone()),
            Value::Array(items) => {
                let strings: Option<Vec<String>> = items
                    .iter()
                    .map(|item| item.as_str().map(str::to_owned))
                    .collect();
                match strings {
                    Some(strings) => AnswerBody::Sequence(strings),
                    None => AnswerBody::Other(value.clone()),
                }
            }
            other => AnswerBody::Other(other.clone()),
        }
    }

    /// Whether this body has nothing to show. Whitespace counts as nothing.
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerBody::Text(text) => text.trim().is_empty(),
            AnswerBody::Sequence(parts) => parts.iter().all(|part| part.trim().is_empty()),
            AnswerBody::Other(Value::Object(map)) => map.is_empty(),
            AnswerBody::Other(Value::Array(items)) => items.is_empty(),
            AnswerBody::Other(_) => false,
        }
    }

    /// Flatten into a single text blob.
    pub fn into_text(self) -> String {
        if self.is_empty() {
            return String::new();
        }
        match self {
            AnswerBody::Text(text) => text,
            AnswerBody::Sequence(parts) => parts.join(BLOCK_SEPARATOR),
            AnswerBody::Other(value) => {
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Extract a single renderable string from a payload.
///
/// Never fails: a missing or unusable payload yields the empty string.
pub fn extract_text(payload: Option<&Value>) -> String {
    match AnswerBody::from_payload(payload) {
        Some(body) => {
            debug!("Extracted answer body: {}", body_kind(&body));
            body.into_text()
        }
        None => String::new(),
    }
}

fn body_kind(body: &AnswerBody) -> &'static str {
    match body {
        AnswerBody::Text(_) => "text",
        AnswerBody::Sequence(_) => "sequence",
        AnswerBody::Other(_) => "other",
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
