//! HTML Export Generation
//!
//! This module wraps a rendered answer into a complete HTML page with
//! inlined theme CSS for standalone viewing. The answer body is already
//! sanitized; only the question and metadata are escaped here.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Theme;
use crate::error::{Error, Result};
use crate::session::Answer;

/// Longest file stem derived from a question.
const MAX_FILE_STEM_LEN: usize = 48;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Generate a complete HTML page for an answer.
pub fn generate_answer_document(answer: &Answer, theme: Theme) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Surveyor">
    <title>{title}</title>
    <style>
{base_css}

{theme_css}
    </style>
</head>
<body>
    <header class="answer-header">
        <h1 class="answer-title">{title}</h1>
        <span class="provider-badge">{provider}</span>
    </header>
    <article class="answer-body">
{body}
    </article>
    <footer class="answer-footer">
        <span class="footer-label">Question</span>
        <p class="footer-question">{question}</p>
    </footer>
</body>
</html>"#,
        title = html_escape(&document_title(&answer.question)),
        provider = html_escape(&answer.provider),
        question = html_escape(&answer.question),
        base_css = BASE_CSS,
        theme_css = generate_theme_css(theme),
        body = answer.html,
    )
}

/// Write the page for an answer to `output_path`.
pub fn export_to_file(answer: &Answer, theme: Theme, output_path: &Path) -> Result<()> {
    let html = generate_answer_document(answer, theme);

    fs::write(output_path, html).map_err(|source| Error::FileWrite {
        path: output_path.to_path_buf(),
        source,
    })?;

    info!("Exported answer to {}", output_path.display());
    Ok(())
}

/// Open an exported page with the system's default handler.
pub fn open_exported(path: &Path) -> Result<()> {
    open::that(path).map_err(|e| Error::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Suggest a file name for an answer, derived from its question.
///
/// Placed in `directory` when one is given.
pub fn default_export_path(question: &str, directory: Option<&Path>) -> PathBuf {
    let mut stem = String::new();
    for c in question.chars() {
        if stem.len() >= MAX_FILE_STEM_LEN {
            break;
        }
        if c.is_ascii_alphanumeric() {
            stem.push(c.to_ascii_lowercase());
        } else if !stem.is_empty() && !stem.ends_with('-') {
            stem.push('-');
        }
    }

    let stem = stem.trim_end_matches('-');
    let file_name = if stem.is_empty() {
        "answer.html".to_string()
    } else {
        format!("{}.html", stem)
    };

    match directory {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Page title: the question's first line, shortened.
fn document_title(question: &str) -> String {
    let first_line = question.lines().next().unwrap_or_default().trim();
    if first_line.is_empty() {
        return "Answer".to_string();
    }

    let mut chars = first_line.chars();
    let title: String = chars.by_ref().take(80).collect();
    if chars.next().is_some() {
        format!("{}…", title)
    } else {
        title
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Base CSS for the page (layout, typography, math).
const BASE_CSS: &str = r#"
*, *::before, *::after {
    box-sizing: border-box;
}

body {
    margin: 0 auto;
    max-width: 860px;
    padding: 32px 24px;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}

/* Header */
.answer-header {
    display: flex;
    align-items: baseline;
    justify-content: space-between;
    gap: 16px;
    border-bottom: 1px solid;
    margin-bottom: 24px;
}

.answer-title {
    font-size: 1.6em;
    font-weight: 600;
    margin: 0 0 12px 0;
}

.provider-badge {
    font-size: 0.8em;
    padding: 2px 10px;
    border-radius: 999px;
    white-space: nowrap;
}

/* Answer body */
.answer-body h1, .answer-body h2, .answer-body h3,
.answer-body h4, .answer-body h5, .answer-body h6 {
    margin: 24px 0 12px 0;
    font-weight: 600;
    line-height: 1.25;
}

.answer-body p,
.answer-body ul,
.answer-body ol,
.answer-body blockquote,
.answer-body table,
.answer-body pre {
    margin-top: 0;
    margin-bottom: 16px;
}

.answer-body ul,
.answer-body ol {
    padding-left: 2em;
}

.answer-body a {
    text-decoration: none;
}

.answer-body a:hover {
    text-decoration: underline;
}

.answer-body blockquote {
    padding: 0 1em;
    border-left: 4px solid;
}

.answer-body code {
    font-family: 'JetBrains Mono', 'Fira Code', 'Consolas', monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
}

.answer-body pre {
    padding: 16px;
    overflow: auto;
    border-radius: 6px;
}

.answer-body pre code {
    padding: 0;
    background: transparent;
}

.answer-body table {
    border-collapse: collapse;
}

.answer-body th,
.answer-body td {
    padding: 6px 12px;
    border: 1px solid;
}

/* Math */
.answer-body math {
    font-size: 1.1em;
}

.answer-body math[display="block"] {
    display: block;
    margin: 16px 0;
    overflow-x: auto;
}

/* Footer */
.answer-footer {
    margin-top: 40px;
    padding-top: 12px;
    border-top: 1px solid;
    font-size: 0.9em;
}

.footer-label {
    font-size: 0.8em;
    text-transform: uppercase;
    letter-spacing: 0.05em;
}

.footer-question {
    margin: 4px 0 0 0;
    white-space: pre-wrap;
}
"#;

/// Colors used by one page theme.
struct Palette {
    scheme: &'static str,
    background: &'static str,
    text: &'static str,
    muted: &'static str,
    border: &'static str,
    link: &'static str,
    accent: &'static str,
    accent_text: &'static str,
    code_bg: &'static str,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                scheme: "light",
                background: "#ffffff",
                text: "#1f2328",
                muted: "#656d76",
                border: "#d0d7de",
                link: "#0969da",
                accent: "#ddf4ff",
                accent_text: "#0550ae",
                code_bg: "#f6f8fa",
            },
            Theme::Dark => Self {
                scheme: "dark",
                background: "#0d1117",
                text: "#e6edf3",
                muted: "#8d96a0",
                border: "#30363d",
                link: "#4493f8",
                accent: "#121d2f",
                accent_text: "#79c0ff",
                code_bg: "#161b22",
            },
        }
    }
}

/// Generate theme-specific CSS.
fn generate_theme_css(theme: Theme) -> String {
    let palette = Palette::for_theme(theme);

    format!(
        r#"
/* Theme: {label} */
:root {{
    color-scheme: {scheme};
}}

body {{
    background-color: {background};
    color: {text};
}}

.answer-header,
.answer-footer,
.answer-body th,
.answer-body td {{
    border-color: {border};
}}

.provider-badge {{
    background-color: {accent};
    color: {accent_text};
}}

.answer-body a {{
    color: {link};
}}

.answer-body blockquote,
.footer-label {{
    color: {muted};
    border-left-color: {border};
}}

.answer-body code,
.answer-body pre {{
    background-color: {code_bg};
}}
"#,
        label = theme.label(),
        scheme = palette.scheme,
        background = palette.background,
        text = palette.text,
        muted = palette.muted,
        border = palette.border,
        link = palette.link,
        accent = palette.accent,
        accent_text = palette.accent_text,
        code_bg = palette.code_bg,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Utility Functions
// ─────────────────────────────────────────────────────────────────────────────

/// HTML-escape a string.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn sample_answer(question: &str) -> Answer {
        Answer {
            question: question.to_string(),
            provider: "cloud (gemini)".to_string(),
            payload: Arc::new(json!({ "answer": "**Yes**" })),
            text: "**Yes**".to_string(),
            html: "<p><strong>Yes</strong></p>\n".to_string(),
        }
    }

    #[test]
    fn test_generate_answer_document() {
        let html = generate_answer_document(&sample_answer("Is light a wave?"), Theme::Light);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Is light a wave?</title>"));
        assert!(html.contains("<p><strong>Yes</strong></p>"));
        assert!(html.contains(r#"<span class="provider-badge">cloud (gemini)</span>"#));
        assert!(html.contains("color-scheme: light"));
    }

    #[test]
    fn test_document_escapes_question() {
        let html = generate_answer_document(
            &sample_answer("<script>alert(1)</script>"),
            Theme::Dark,
        );

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(html.contains("color-scheme: dark"));
    }

    #[test]
    fn test_document_title_shortens_long_questions() {
        let question = "x".repeat(200);
        let title = document_title(&question);
        assert_eq!(title.chars().count(), 81);
        assert!(title.ends_with('…'));

        assert_eq!(document_title("first\nsecond"), "first");
        assert_eq!(document_title("   "), "Answer");
    }

    #[test]
    fn test_default_export_path() {
        assert_eq!(
            default_export_path("What is E=mc^2?", None),
            PathBuf::from("what-is-e-mc-2.html")
        );
        assert_eq!(default_export_path("???", None), PathBuf::from("answer.html"));
        assert_eq!(
            default_export_path("Dark matter", Some(Path::new("/tmp/out"))),
            PathBuf::from("/tmp/out/dark-matter.html")
        );

        let long = default_export_path(&"word ".repeat(40), None);
        let stem = long.file_stem().unwrap().to_string_lossy().into_owned();
        assert!(stem.len() <= MAX_FILE_STEM_LEN);
        assert!(!stem.ends_with('-'));
    }

    #[test]
    fn test_export_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("answer.html");

        export_to_file(&sample_answer("Why?"), Theme::Light, &path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("<strong>Yes</strong>"));
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("answer.html");

        let err = export_to_file(&sample_answer("Why?"), Theme::Light, &path).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("Hello"), "Hello");
        assert_eq!(html_escape("<b>"), "&lt;b&gt;");
        assert_eq!(html_escape("a & b"), "a &amp; b");
        assert_eq!(html_escape("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_theme_css_uses_palette() {
        let light = generate_theme_css(Theme::Light);
        let dark = generate_theme_css(Theme::Dark);

        assert!(light.contains("Theme: Light"));
        assert!(light.contains("#ffffff"));
        assert!(dark.contains("Theme: Dark"));
        assert!(dark.contains("#0d1117"));
    }
}
