//! Fenced code block rendering.
//!
//! A fence is rendered one of three ways: as display math (`math` fences when
//! math is enabled), highlighted with a syntect grammar, or escaped as plain
//! text when no grammar matches the language tag.

use std::sync::LazyLock;

use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::error::{Diagnostic, RenderError, Result};
use crate::escape::escape_html;
use crate::math::{self, MATH_TYPESET_CODE};

/// Language tag that marks a fence as display math.
pub const MATH_LANGUAGE: &str = "math";

/// Prefix of every class the highlighter puts on its spans.
pub const HIGHLIGHT_CLASS_PREFIX: &str = "pl-";

const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed {
    prefix: HIGHLIGHT_CLASS_PREFIX,
};

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Parsed fence info string, e.g. `rust, ignore title="main.rs"`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceInfo {
    /// Normalized language tag.
    pub language: Option<String>,
    pub title: Option<String>,
}

impl FenceInfo {
    pub fn parse(info: Option<&str>) -> Self {
        let Some(info) = info.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };
        let (tag, rest) = info.split_once(char::is_whitespace).unwrap_or((info, ""));
        Self {
            language: normalize_language(tag),
            title: parse_title(rest),
        }
    }
}

/// `ts, ignore` → `ts`; `Rust` → `rust`.
pub fn normalize_language(tag: &str) -> Option<String> {
    let tag = tag.split(',').next().unwrap_or_default().trim();
    (!tag.is_empty()).then(|| tag.to_lowercase())
}

fn parse_title(attrs: &str) -> Option<String> {
    let start = attrs.find("title=")? + "title=".len();
    let value = &attrs[start..];
    let title = match value.strip_prefix('"') {
        Some(quoted) => &quoted[..quoted.find('"').unwrap_or(quoted.len())],
        None => value.split(char::is_whitespace).next().unwrap_or_default(),
    };
    (!title.is_empty()).then(|| title.to_string())
}

/// Grammar for a normalized language tag, if syntect knows one.
pub fn find_grammar(language: &str) -> Option<&'static SyntaxReference> {
    SYNTAXES.find_syntax_by_token(language)
}

/// Render one code block.
///
/// Math that fails to typeset falls back to a plain block and leaves a
/// diagnostic in `diagnostics`.
pub fn render_code(
    source: &str,
    info: Option<&str>,
    allow_math: bool,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String> {
    let source = source.strip_suffix('\n').unwrap_or(source);
    let fence = FenceInfo::parse(info);
    let title = fence
        .title
        .as_deref()
        .map(|t| format!("<div class=\"highlight-title\">{}</div>", escape_html(t)))
        .unwrap_or_default();

    let Some(language) = fence.language else {
        return Ok(plain(&title, source));
    };

    if language == MATH_LANGUAGE && allow_math {
        match math::typeset(source, true) {
            Ok(html) => return Ok(html),
            Err(err) => {
                tracing::warn!(error = %err, "math code block failed to typeset; rendering as text");
                diagnostics.push(Diagnostic::warning(
                    MATH_TYPESET_CODE,
                    format!("Math code block failed to typeset: {err}"),
                    None,
                ));
                return Ok(plain(&title, source));
            }
        }
    }

    let Some(grammar) = find_grammar(&language) else {
        tracing::debug!(language, "no grammar for code block; rendering as text");
        return Ok(plain(&title, source));
    };

    let highlighted = highlight(source, grammar).map_err(|source| RenderError::Highlight {
        language: language.clone(),
        source,
    })?;
    Ok(format!(
        "<div class=\"highlight highlight-source-{} notranslate\">{title}<pre>{highlighted}</pre></div>",
        escape_html(&language),
    ))
}

fn plain(title: &str, source: &str) -> String {
    format!(
        "{title}<pre><code class=\"notranslate\">{}</code></pre>",
        escape_html(source)
    )
}

fn highlight(source: &str, grammar: &SyntaxReference) -> Result<String, syntect::Error> {
    let mut generator = ClassedHTMLGenerator::new_with_class_style(grammar, &SYNTAXES, CLASS_STYLE);
    for line in LinesWithEndings::from(source) {
        generator.parse_html_for_line_which_includes_newline(line)?;
    }
    Ok(generator.finalize())
}
