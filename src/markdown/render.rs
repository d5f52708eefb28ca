//! Markdown to HTML rendering using comrak
//!
//! This module wraps comrak's parser and HTML formatter. Between the two
//! steps the AST is walked once and every math node is swapped for its
//! typeset MathML (or, on failure, for its source text).

use comrak::{
    format_html,
    nodes::{AstNode, NodeValue},
    parse_document, Arena, Options,
};
use log::{debug, warn};

use super::math::math_node_value;

// ─────────────────────────────────────────────────────────────────────────────
// Options
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration options for answer rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkdownOptions {
    /// Enable GitHub Flavored Markdown tables
    pub tables: bool,
    /// Enable strikethrough syntax (~~text~~)
    pub strikethrough: bool,
    /// Enable autolink URLs and emails
    pub autolink: bool,
    /// Render single newlines as `<br>`
    pub hard_breaks: bool,
    /// Parse `$..$` and `$$..$$` spans and typeset them
    pub math: bool,
    /// Generate heading IDs with this prefix
    pub header_ids: Option<String>,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            autolink: true,
            hard_breaks: true,
            math: true,
            header_ids: None,
        }
    }
}

impl MarkdownOptions {
    /// Convert to comrak Options.
    fn to_comrak_options(&self) -> Options {
        let mut options = Options::default();

        // Extension options
        options.extension.strikethrough = self.strikethrough;
        options.extension.table = self.tables;
        options.extension.autolink = self.autolink;
        options.extension.math_dollars = self.math;
        options.extension.header_ids = self.header_ids.clone();

        // Render options
        options.render.hardbreaks = self.hard_breaks;
        // Raw HTML is passed through here and filtered by the sanitizer;
        // typeset math reaches the output the same way.
        options.render.unsafe_ = true;

        options
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public API Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Render markdown text to HTML with the default answer options.
///
/// The output is NOT safe to display until it has been sanitized.
pub fn render_markdown(markdown: &str) -> String {
    render_markdown_with_options(markdown, &MarkdownOptions::default())
}

/// Render markdown text to HTML with custom options.
pub fn render_markdown_with_options(markdown: &str, options: &MarkdownOptions) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let arena = Arena::new();
    let comrak_options = options.to_comrak_options();
    let root = parse_document(&arena, markdown, &comrak_options);

    if options.math {
        let count = typeset_math_nodes(root);
        debug!("Replaced {} math node(s)", count);
    }

    let mut html = Vec::with_capacity(markdown.len() * 2);
    if let Err(err) = format_html(root, &comrak_options, &mut html) {
        // Writing into a Vec only fails if formatting itself breaks
        warn!("HTML formatting failed: {}", err);
        return String::new();
    }

    match String::from_utf8(html) {
        Ok(html) => html,
        Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Swap every math node under `root` for its rendered replacement.
fn typeset_math_nodes<'a>(root: &'a AstNode<'a>) -> usize {
    let mut count = 0;

    for node in root.descendants() {
        let mut ast = node.data.borrow_mut();
        let replacement = match &ast.value {
            NodeValue::Math(math) => Some(math_node_value(&math.literal, math.display_math)),
            _ => None,
        };
        if let Some(value) = replacement {
            ast.value = value;
            count += 1;
        }
    }

    count
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
