use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Errors that abort a render.
///
/// Per-span problems (a math expression that does not typeset, a fence with
/// an unknown language, a URL that does not resolve) never surface here; they
/// degrade in place and, where useful, leave a [`Diagnostic`] behind.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to highlight `{language}` code block: {source}")]
    Highlight {
        language: String,
        #[source]
        source: syntect::Error,
    },

    #[error("Invalid render options: {0}")]
    Options(#[from] serde_json::Error),
}

pub type Result<T, E = RenderError> = std::result::Result<T, E>;

/// A non-fatal note produced while rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Byte range in the pre-processed markdown the note refers to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Range<usize>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Diagnostic {
    pub(crate) fn warning(code: &str, message: impl Into<String>, span: Option<Range<usize>>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
            code: Some(code.to_string()),
        }
    }
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn diagnostic_serializes_without_empty_fields() {
        let diag = Diagnostic {
            severity: Severity::Warning,
            message: "bad".into(),
            span: None,
            code: None,
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert_eq!(json, r#"{"severity":"warning","message":"bad"}"#);
    }

    #[test]
    fn warning_constructor_sets_code() {
        let diag = Diagnostic::warning("math-typeset", "oops", Some(3..7));
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.as_deref(), Some("math-typeset"));
        assert_eq!(diag.span, Some(3..7));
    }
}
