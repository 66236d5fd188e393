//! Per-node HTML callbacks.
//!
//! [`Renderer`] has one method per node type. Each method's default calls
//! the matching function in [`defaults`], so an override can post-process
//! the stock markup instead of rebuilding it:
//!
//! ```
//! use gfm_render::renderer::{defaults, RenderContext, Renderer};
//! use gfm_render::{render, RenderOptions};
//!
//! struct ShoutingHeadings;
//!
//! impl Renderer for ShoutingHeadings {
//!     fn heading(&self, cx: &mut RenderContext<'_>, text: &str, level: u8, raw: &str) -> String {
//!         defaults::heading(cx, &text.to_uppercase(), level, raw)
//!     }
//! }
//!
//! let options = RenderOptions::default().with_renderer(ShoutingHeadings);
//! let html = render("# quiet", &options).unwrap();
//! assert!(html.ends_with("QUIET</h1>"));
//! ```

use std::collections::HashMap;

use crate::document::{AlertKind, Align};
use crate::error::{Diagnostic, Result};
use crate::options::{NodeKind, RenderOptions};
use crate::slug::Slugger;

pub mod defaults;
mod walk;

pub(crate) use walk::render_document;

/// HTML callbacks, one per node type.
///
/// Container callbacks receive their children already rendered. `text`
/// and `codespan` receive raw text and are responsible for escaping it.
///
/// One instance may serve concurrent renders, so implementations keep
/// per-document state in the [`RenderContext`] rather than in `self`.
pub trait Renderer: Send + Sync {
    /// `raw` is the heading's plain text, used for its anchor slug.
    fn heading(&self, cx: &mut RenderContext<'_>, text: &str, level: u8, raw: &str) -> String {
        defaults::heading(cx, text, level, raw)
    }

    fn paragraph(&self, cx: &mut RenderContext<'_>, text: &str) -> String {
        defaults::paragraph(cx, text)
    }

    /// Indented (`info: None`) or fenced code block.
    fn code(&self, cx: &mut RenderContext<'_>, source: &str, info: Option<&str>) -> Result<String> {
        defaults::code(cx, source, info)
    }

    fn codespan(&self, cx: &mut RenderContext<'_>, code: &str) -> String {
        defaults::codespan(cx, code)
    }

    fn blockquote(&self, cx: &mut RenderContext<'_>, body: &str) -> String {
        defaults::blockquote(cx, body)
    }

    /// `> [!NOTE]` style block quotes.
    fn alert(&self, cx: &mut RenderContext<'_>, kind: AlertKind, body: &str) -> String {
        defaults::alert(cx, kind, body)
    }

    fn html(&self, cx: &mut RenderContext<'_>, html: &str) -> String {
        defaults::html(cx, html)
    }

    fn hr(&self, cx: &mut RenderContext<'_>) -> String {
        defaults::hr(cx)
    }

    fn list(&self, cx: &mut RenderContext<'_>, body: &str, ordered: bool, start: Option<u64>) -> String {
        defaults::list(cx, body, ordered, start)
    }

    /// `task` is the checkbox state for task list items.
    fn listitem(&self, cx: &mut RenderContext<'_>, body: &str, task: Option<bool>) -> String {
        defaults::listitem(cx, body, task)
    }

    fn checkbox(&self, cx: &mut RenderContext<'_>, checked: bool) -> String {
        defaults::checkbox(cx, checked)
    }

    fn table(&self, cx: &mut RenderContext<'_>, header: &str, body: &str) -> String {
        defaults::table(cx, header, body)
    }

    fn tablerow(&self, cx: &mut RenderContext<'_>, content: &str) -> String {
        defaults::tablerow(cx, content)
    }

    fn tablecell(&self, cx: &mut RenderContext<'_>, content: &str, header: bool, align: Align) -> String {
        defaults::tablecell(cx, content, header, align)
    }

    fn strong(&self, cx: &mut RenderContext<'_>, text: &str) -> String {
        defaults::strong(cx, text)
    }

    fn em(&self, cx: &mut RenderContext<'_>, text: &str) -> String {
        defaults::em(cx, text)
    }

    fn del(&self, cx: &mut RenderContext<'_>, text: &str) -> String {
        defaults::del(cx, text)
    }

    fn br(&self, cx: &mut RenderContext<'_>) -> String {
        defaults::br(cx)
    }

    fn link(&self, cx: &mut RenderContext<'_>, href: &str, title: Option<&str>, text: &str) -> String {
        defaults::link(cx, href, title, text)
    }

    fn image(&self, cx: &mut RenderContext<'_>, src: &str, title: Option<&str>, alt: &str) -> String {
        defaults::image(cx, src, title, alt)
    }

    fn text(&self, cx: &mut RenderContext<'_>, text: &str) -> String {
        defaults::text(cx, text)
    }

    fn footnote_reference(&self, cx: &mut RenderContext<'_>, label: &str, number: usize) -> String {
        defaults::footnote_reference(cx, label, number)
    }

    fn footnote_definition(
        &self,
        cx: &mut RenderContext<'_>,
        label: &str,
        number: usize,
        body: &str,
    ) -> String {
        defaults::footnote_definition(cx, label, number, body)
    }

    /// Wraps the rendered definitions at the end of the document.
    fn footnotes(&self, cx: &mut RenderContext<'_>, items: &str) -> String {
        defaults::footnotes(cx, items)
    }
}

/// The stock GitHub-style renderer. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct GfmRenderer;

impl Renderer for GfmRenderer {}

/// State for one render call.
pub struct RenderContext<'a> {
    pub options: &'a RenderOptions,
    /// Heading anchors issued so far.
    pub slugger: Slugger,
    pub diagnostics: Vec<Diagnostic>,
    footnote_numbers: HashMap<String, usize>,
    footnote_ids: HashMap<String, String>,
    footnote_slugger: Slugger,
    footnote_bodies: Vec<(String, String)>,
}

impl<'a> RenderContext<'a> {
    pub fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            slugger: Slugger::new(),
            diagnostics: Vec::new(),
            footnote_numbers: HashMap::new(),
            footnote_ids: HashMap::new(),
            footnote_slugger: Slugger::new(),
            footnote_bodies: Vec::new(),
        }
    }

    /// Caller classes configured for `kind`.
    pub fn classes(&self, kind: NodeKind) -> &[String] {
        self.options.classes(kind)
    }

    /// Number of the footnote `label`, assigned in order of first reference.
    pub fn footnote_number(&mut self, label: &str) -> usize {
        if let Some(&number) = self.footnote_numbers.get(label) {
            return number;
        }
        let number = self.footnote_numbers.len() + 1;
        let id = self.footnote_slugger.slug(&defaults::footnote_id(label, number));
        self.footnote_numbers.insert(label.to_string(), number);
        self.footnote_ids.insert(label.to_string(), id);
        number
    }

    /// Element id suffix for the footnote `label`, unique within the render.
    ///
    /// Labels that were never referenced fall back to
    /// [`defaults::footnote_id`].
    pub fn footnote_id(&self, label: &str, number: usize) -> String {
        match self.footnote_ids.get(label) {
            Some(id) => id.clone(),
            None => defaults::footnote_id(label, number),
        }
    }

    fn referenced_number(&self, label: &str) -> Option<usize> {
        self.footnote_numbers.get(label).copied()
    }

    fn push_footnote_body(&mut self, label: &str, body: String) {
        self.footnote_bodies.push((label.to_string(), body));
    }

    /// Definitions that were referenced, in reference order.
    fn take_footnotes(&mut self) -> Vec<(String, usize, String)> {
        let bodies = std::mem::take(&mut self.footnote_bodies);
        let mut numbered: Vec<_> = bodies
            .into_iter()
            .filter_map(|(label, body)| {
                let number = self.referenced_number(&label);
                if number.is_none() {
                    tracing::debug!(label, "dropping unreferenced footnote definition");
                }
                number.map(|n| (label, n, body))
            })
            .collect();
        numbered.sort_by_key(|(_, n, _)| *n);
        numbered.dedup_by_key(|(_, n, _)| *n);
        numbered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn footnotes_number_by_first_reference() {
        let options = RenderOptions::default();
        let mut cx = RenderContext::new(&options);
        assert_eq!(cx.footnote_number("b"), 1);
        assert_eq!(cx.footnote_number("a"), 2);
        assert_eq!(cx.footnote_number("b"), 1);
    }

    #[test]
    fn footnote_ids_never_collide() {
        let options = RenderOptions::default();
        let mut cx = RenderContext::new(&options);
        let first = cx.footnote_number("a b");
        let second = cx.footnote_number("a-b");
        let third = cx.footnote_number("!!");
        assert_eq!(cx.footnote_id("a b", first), "a-b");
        assert_eq!(cx.footnote_id("a-b", second), "a-b-1");
        assert_eq!(cx.footnote_id("!!", third), "3");
        cx.footnote_number("a-b");
        assert_eq!(cx.footnote_id("a-b", second), "a-b-1");
    }

    #[test]
    fn unreferenced_footnotes_are_dropped() {
        let options = RenderOptions::default();
        let mut cx = RenderContext::new(&options);
        cx.push_footnote_body("unused", "x".into());
        cx.push_footnote_body("second", "2".into());
        cx.push_footnote_body("first", "1".into());
        cx.footnote_number("first");
        cx.footnote_number("second");
        assert_eq!(
            cx.take_footnotes(),
            vec![
                ("first".to_string(), 1, "1".to_string()),
                ("second".to_string(), 2, "2".to_string()),
            ]
        );
    }
}
