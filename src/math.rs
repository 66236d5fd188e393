//! Math span substitution.
//!
//! Finds `$$ block $$` and ` $inline$` spans in raw markdown and replaces
//! them with typeset markup before the markdown parser runs. The scan is a
//! single pass that records edits and applies them once, so markup produced
//! for one span is never rescanned.

use std::ops::Range;

use crate::error::Diagnostic;

/// Diagnostic code for a span the engine rejected.
pub const MATH_TYPESET_CODE: &str = "math-typeset";

/// Why an expression could not be typeset.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MathError {
    #[error("{0}")]
    Engine(String),

    #[error("math support is not compiled in (enable the `math` feature)")]
    Unavailable,
}

/// Typeset one expression with KaTeX.
#[cfg(feature = "math")]
pub fn typeset(expr: &str, display: bool) -> Result<String, MathError> {
    let opts = katex::Opts::builder()
        .display_mode(display)
        .build()
        .map_err(|e| MathError::Engine(e.to_string()))?;
    katex::render_with_opts(expr, &opts).map_err(|e| MathError::Engine(e.to_string()))
}

#[cfg(not(feature = "math"))]
pub fn typeset(_expr: &str, _display: bool) -> Result<String, MathError> {
    Err(MathError::Unavailable)
}

/// Output of [`mathify`].
#[derive(Debug, Clone)]
pub struct Mathified {
    pub text: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Replace every math span in `markdown` with KaTeX markup.
///
/// A span the engine rejects is left exactly as written.
pub fn mathify(markdown: &str) -> Mathified {
    substitute(markdown, typeset)
}

/// A pending replacement of `range` in the source.
struct Edit {
    range: Range<usize>,
    replacement: String,
}

/// Scan `markdown` once, typesetting spans with `engine`.
pub(crate) fn substitute<F>(markdown: &str, engine: F) -> Mathified
where
    F: Fn(&str, bool) -> Result<String, MathError>,
{
    let bytes = markdown.as_bytes();
    let mut edits: Vec<Edit> = Vec::new();
    let mut diagnostics = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'$' {
            pos += 1;
            continue;
        }

        // Block spans win over inline ones starting at the same `$`.
        let found = match_block(bytes, pos)
            .map(|(end, expr)| (end, expr, true))
            .or_else(|| match_inline(bytes, pos).map(|(end, expr)| (end, expr, false)));

        let Some((end, expr, display)) = found else {
            pos += 1;
            continue;
        };

        let source = &markdown[expr.clone()];
        let source = if display { source.trim() } else { source };
        match engine(source, display) {
            Ok(html) => edits.push(Edit {
                range: pos..end,
                replacement: html,
            }),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    span = ?(pos..end),
                    "math expression failed to typeset; leaving it as text"
                );
                diagnostics.push(Diagnostic::warning(
                    MATH_TYPESET_CODE,
                    format!("Math expression `{source}` failed to typeset: {err}"),
                    Some(pos..end),
                ));
            }
        }
        pos = end;
    }

    Mathified {
        text: apply_edits(markdown, &edits),
        diagnostics,
    }
}

fn apply_edits(source: &str, edits: &[Edit]) -> String {
    if edits.is_empty() {
        return source.to_string();
    }
    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        out.push_str(&source[last..edit.range.start]);
        out.push_str(&edit.replacement);
        last = edit.range.end;
    }
    out.push_str(&source[last..]);
    out
}

fn is_space(b: u8) -> bool {
    b.is_ascii_whitespace()
}

fn is_newline(b: u8) -> bool {
    b == b'\n' || b == b'\r'
}

/// Match `$$`, one whitespace, a one-line expression, one whitespace, `$$`.
///
/// Returns the end of the span and the range of the expression.
fn match_block(bytes: &[u8], start: usize) -> Option<(usize, Range<usize>)> {
    if !bytes[start..].starts_with(b"$$") {
        return None;
    }
    if !is_space(*bytes.get(start + 2)?) {
        return None;
    }
    let expr_start = start + 3;
    if is_newline(*bytes.get(expr_start)?) {
        return None;
    }

    let mut k = expr_start + 1;
    while k < bytes.len() {
        if is_space(bytes[k]) && bytes[k + 1..].starts_with(b"$$") {
            return Some((k + 3, expr_start..k));
        }
        if is_newline(bytes[k]) {
            return None;
        }
        k += 1;
    }
    None
}

/// Match `$expr$` preceded by whitespace, where `expr` sits on one line and
/// starts and ends with a non-whitespace character.
fn match_inline(bytes: &[u8], start: usize) -> Option<(usize, Range<usize>)> {
    if start == 0 || !is_space(bytes[start - 1]) {
        return None;
    }
    let expr_start = start + 1;
    let first = *bytes.get(expr_start)?;
    if first == b'$' || is_space(first) {
        return None;
    }

    let close = expr_start
        + bytes[expr_start..]
            .iter()
            .position(|&b| b == b'$' || is_newline(b))?;
    if bytes[close] != b'$' || is_space(bytes[close - 1]) {
        return None;
    }
    Some((close + 1, expr_start..close))
}
