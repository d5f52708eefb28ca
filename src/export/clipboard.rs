//! Clipboard Operations for Answers
//!
//! Copies a rendered answer to the system clipboard using the arboard
//! crate. Rich targets receive the sanitized HTML fragment; everything else
//! gets the extracted plain text.

use arboard::Clipboard;
use log::info;

use crate::error::{Error, Result};
use crate::session::Answer;

/// Copy HTML with a plain text fallback to the clipboard.
///
/// Apps like email clients and word processors paste the formatted
/// content; plain text editors receive `plain_text`.
pub fn copy_html_to_clipboard(html: &str, plain_text: &str) -> Result<()> {
    if html.is_empty() && plain_text.is_empty() {
        return Err(Error::Clipboard("nothing to copy".to_string()));
    }

    let mut clipboard = Clipboard::new()?;
    clipboard.set_html(html, Some(plain_text))?;
    Ok(())
}

/// Copy a rendered answer.
pub fn copy_answer(answer: &Answer) -> Result<()> {
    copy_html_to_clipboard(&answer.html, &answer.text)?;
    info!("Copied answer to clipboard");
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_answer_is_not_copied() {
        // Fails before a clipboard is opened
        let err = copy_html_to_clipboard("", "").unwrap_err();
        assert!(matches!(err, Error::Clipboard(_)));
        assert_eq!(err.to_string(), "Clipboard error: nothing to copy");
    }

    // Note: Actual clipboard tests require a display/clipboard context
    // which isn't typically available in CI environments.
}
