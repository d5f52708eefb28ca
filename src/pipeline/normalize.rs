//! Math delimiter normalization
//!
//! Models emit math in several notations: `\[ .. \]` for display math,
//! `\( .. \)` for inline math, and the same pairs with the backslash doubled
//! when the text went through one escaping step too many. The Markdown
//! renderer only understands dollar delimiters, so this module rewrites every
//! recognised pair to `$$` blocks and `$` spans.
//!
//! The rewrite is a single scan:
//!
//! 1. Tokenize. A run of one or two backslashes directly followed by one of
//!    `[ ] ( )` is a delimiter token. Longer runs are literal text. A run of
//!    unescaped `$` is a dollar token; it only ever separates.
//! 2. Pair. An opener pairs with the very next token when that token is the
//!    closer of the same kind and the text between them is not blank. Pairs
//!    therefore never nest and never contain another token.
//! 3. Emit. Paired spans are rewritten; every other byte, unpaired tokens
//!    included, is copied as written.
//!
//! A rewritten span starts with a dollar token, so an opener that was left
//! alone still has no closer right after it on a second pass. Running the
//! rewrite again changes nothing.

use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Tokens
// ─────────────────────────────────────────────────────────────────────────────

/// Which kind of math a delimiter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MathKind {
    /// `\[ .. \]`
    Display,
    /// `\( .. \)`
    Inline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Open(MathKind),
    Close(MathKind),
    /// Existing `$` math; never pairs with anything
    Dollar,
}

/// A token occurrence in the source text.
#[derive(Debug, Clone, Copy)]
struct Token {
    role: Role,
    /// Byte offset of the first backslash or dollar
    start: usize,
    /// Byte offset just past the token
    end: usize,
}

impl Token {
    /// The kind of math this token opens and `next` closes, if any.
    fn pairs_with(&self, next: &Token) -> Option<MathKind> {
        match (self.role, next.role) {
            (Role::Open(open), Role::Close(close)) if open == close => Some(open),
            _ => None,
        }
    }
}

fn classify_bracket(byte: u8) -> Option<Role> {
    match byte {
        b'[' => Some(Role::Open(MathKind::Display)),
        b']' => Some(Role::Close(MathKind::Display)),
        b'(' => Some(Role::Open(MathKind::Inline)),
        b')' => Some(Role::Close(MathKind::Inline)),
        _ => None,
    }
}

/// Find every token, left to right.
fn tokenize(text: &str) -> Vec<Token> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'$' => {
                let start = i;
                while i < bytes.len() && bytes[i] == b'$' {
                    i += 1;
                }
                tokens.push(Token {
                    role: Role::Dollar,
                    start,
                    end: i,
                });
            }
            b'\\' => {
                // Take the whole backslash run so a token is never carved out
                // of a longer run.
                let run_start = i;
                while i < bytes.len() && bytes[i] == b'\\' {
                    i += 1;
                }
                if i >= bytes.len() {
                    break;
                }
                if bytes[i] == b'$' {
                    // Escaped dollar, literal text
                    i += 1;
                    continue;
                }
                if i - run_start > 2 {
                    continue;
                }
                if let Some(role) = classify_bracket(bytes[i]) {
                    i += 1;
                    tokens.push(Token {
                        role,
                        start: run_start,
                        end: i,
                    });
                }
            }
            _ => i += 1,
        }
    }

    tokens
}

/// A recognised pair: the tokens at `open` and `open + 1`.
#[derive(Debug, Clone, Copy)]
struct Span {
    kind: MathKind,
    open: usize,
}

fn find_spans(text: &str, tokens: &[Token]) -> Vec<Span> {
    tokens
        .windows(2)
        .enumerate()
        .filter_map(|(open, window)| {
            let kind = window[0].pairs_with(&window[1])?;
            let body = &text[window[0].end..window[1].start];
            (!body.trim().is_empty()).then_some(Span { kind, open })
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Rewriting
// ─────────────────────────────────────────────────────────────────────────────

/// Wrap an expression in the canonical delimiters for its kind.
fn rewrite(kind: MathKind, expression: &str, out: &mut String) {
    let expression = expression.trim();
    match kind {
        // Blank lines on both sides make the block its own paragraph
        MathKind::Display => {
            out.push_str("\n\n$$\n");
            out.push_str(expression);
            out.push_str("\n$$\n\n");
        }
        MathKind::Inline => {
            out.push('$');
            out.push_str(expression);
            out.push('$');
        }
    }
}

/// Rewrite all recognised math delimiters to dollar notation.
///
/// Text without delimiters is returned unchanged, and the function is
/// idempotent: `normalize_math_delimiters(&normalize_math_delimiters(s))`
/// equals `normalize_math_delimiters(s)` for every `s`.
pub fn normalize_math_delimiters(text: &str) -> String {
    let tokens = tokenize(text);
    let spans = find_spans(text, &tokens);
    if spans.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 16 * spans.len());
    let mut cursor = 0;

    for span in &spans {
        let open = &tokens[span.open];
        let close = &tokens[span.open + 1];
        out.push_str(&text[cursor..open.start]);
        rewrite(span.kind, &text[open.end..close.start], &mut out);
        cursor = close.end;
    }
    out.push_str(&text[cursor..]);

    debug!(
        "Normalized math delimiters: {} token(s), {} span(s) rewritten",
        tokens.len(),
        spans.len()
    );
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
