//! `gfm-render` — GitHub-flavored markdown to sanitized HTML.
//!
//! Markdown goes through emoji and math substitution, is parsed with the
//! GitHub extensions (tables, strikethrough, task lists, footnotes and
//! alerts), rendered by a [`Renderer`] and finally cleaned by a
//! [`SanitizePolicy`] built from the [`RenderOptions`].
//!
//! # Quick start
//!
//! ```
//! use gfm_render::{render, RenderOptions};
//!
//! let html = render("[link](https://example.com)", &RenderOptions::default()).unwrap();
//! assert_eq!(
//!     html,
//!     "<p><a href=\"https://example.com\" rel=\"noopener noreferrer\">link</a></p>\n"
//! );
//! ```

pub mod code;
pub mod document;
pub mod emoji;
pub mod error;
pub mod escape;
pub mod links;
pub mod math;
pub mod options;
pub mod policy;
pub mod renderer;
pub mod slug;
pub mod style;

pub use emoji::emojify;
pub use error::{Diagnostic, RenderError, Result, Severity};
pub use links::{resolve_link, resolve_media};
pub use math::{mathify, Mathified};
pub use options::{NodeKind, RenderOptions};
pub use policy::{ClassPattern, SanitizePolicy};
pub use renderer::{GfmRenderer, RenderContext, Renderer};
pub use slug::{slugify, Slugger};
pub use style::KATEX_CLASSES;

use std::borrow::Cow;

/// Output of [`render_report`].
#[derive(Debug, Clone)]
pub struct Rendered {
    pub html: String,
    /// Non-fatal notes, such as math spans that failed to typeset.
    pub diagnostics: Vec<Diagnostic>,
}

/// Render `markdown` to sanitized HTML.
pub fn render(markdown: &str, options: &RenderOptions) -> Result<String> {
    render_report(markdown, options).map(|rendered| rendered.html)
}

/// Render `markdown`, also returning the diagnostics collected on the way.
pub fn render_report(markdown: &str, options: &RenderOptions) -> Result<Rendered> {
    let mut diagnostics = Vec::new();

    let mut text = emojify(markdown);
    if options.allow_math {
        let mathified = mathify(&text);
        diagnostics.extend(mathified.diagnostics);
        text = Cow::Owned(mathified.text);
    }

    let nodes = document::parse(&text);

    let stock = GfmRenderer;
    let renderer: &dyn Renderer = options.renderer.as_deref().unwrap_or(&stock);
    let mut cx = RenderContext::new(options);
    let html = renderer::render_document(renderer, &mut cx, &nodes)?;
    diagnostics.append(&mut cx.diagnostics);

    let html = if options.disable_html_sanitization {
        tracing::debug!("html sanitization disabled; returning renderer output as is");
        html
    } else {
        SanitizePolicy::build(options).sanitize(&html, options.media_base())
    };

    Ok(Rendered { html, diagnostics })
}
