//! Math typesetting with KaTeX
//!
//! Expressions found by the Markdown parser are rendered to MathML through
//! the `katex` crate. A failure is contained to the expression that caused
//! it: the caller gets the delimited source back as plain text and the rest
//! of the document renders normally.

use comrak::nodes::NodeValue;
use log::{debug, warn};
use std::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Error Type
// ─────────────────────────────────────────────────────────────────────────────

/// Why an expression could not be typeset.
#[derive(Debug)]
pub enum MathError {
    /// KaTeX options could not be assembled
    Options(String),
    /// KaTeX rejected the expression or its engine failed
    Katex(katex::Error),
}

impl fmt::Display for MathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathError::Options(msg) => write!(f, "Invalid KaTeX options: {}", msg),
            MathError::Katex(err) => write!(f, "KaTeX error: {}", err),
        }
    }
}

impl std::error::Error for MathError {}

impl From<katex::Error> for MathError {
    fn from(err: katex::Error) -> Self {
        MathError::Katex(err)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Typesetting
// ─────────────────────────────────────────────────────────────────────────────

/// Render a TeX expression to MathML.
///
/// `display` selects block layout (`$$ .. $$`) over inline (`$ .. $`).
/// Macros that need `trust` (`\href`, `\includegraphics`, ...) stay disabled.
pub fn typeset(expression: &str, display: bool) -> Result<String, MathError> {
    let opts = katex::Opts::builder()
        .display_mode(display)
        .output_type(katex::OutputType::Mathml)
        .throw_on_error(true)
        .trust(false)
        .build()
        .map_err(|e| MathError::Options(e.to_string()))?;

    let markup = katex::render_with_opts(expression, &opts)?;
    Ok(markup)
}

/// The source of an expression with its dollar delimiters restored.
pub fn delimited_source(expression: &str, display: bool) -> String {
    let fence = if display { "$$" } else { "$" };
    format!("{fence}{expression}{fence}")
}

/// Produce the AST value that replaces a math node.
///
/// Typeset math becomes raw inline HTML; anything KaTeX rejects becomes a
/// text node, which the HTML formatter escapes.
pub(crate) fn math_node_value(expression: &str, display: bool) -> NodeValue {
    match typeset(expression, display) {
        Ok(markup) => {
            debug!("Typeset {} math ({} bytes)", style_name(display), markup.len());
            NodeValue::HtmlInline(markup)
        }
        Err(err) => {
            warn!(
                "Keeping {} math as source, rendering failed: {}",
                style_name(display),
                err
            );
            NodeValue::Text(delimited_source(expression, display))
        }
    }
}

fn style_name(display: bool) -> &'static str {
    if display {
        "display"
    } else {
        "inline"
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
