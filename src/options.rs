//! Render configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::renderer::Renderer;

/// Node types that accept caller-supplied CSS classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Heading,
    Paragraph,
    Blockquote,
    List,
    Listitem,
    Table,
    Tablerow,
    Tablecell,
    Link,
    Image,
    Code,
    Codespan,
    Strong,
    Em,
    Del,
    Hr,
}

impl NodeKind {
    /// HTML elements that carry this kind's classes.
    pub fn tags(self) -> &'static [&'static str] {
        match self {
            NodeKind::Heading => &["h1", "h2", "h3", "h4", "h5", "h6"],
            NodeKind::Paragraph => &["p"],
            NodeKind::Blockquote => &["blockquote"],
            NodeKind::List => &["ol", "ul"],
            NodeKind::Listitem => &["li"],
            NodeKind::Table => &["table"],
            NodeKind::Tablerow => &["tr"],
            NodeKind::Tablecell => &["td", "th"],
            NodeKind::Link => &["a"],
            NodeKind::Image => &["img"],
            NodeKind::Code => &["pre"],
            NodeKind::Codespan => &["code"],
            NodeKind::Strong => &["strong"],
            NodeKind::Em => &["em"],
            NodeKind::Del => &["del"],
            NodeKind::Hr => &["hr"],
        }
    }
}

/// Options for one render call.
///
/// Every field has a default, so a JSON document only needs the keys it
/// changes:
///
/// ```
/// use gfm_render::{NodeKind, RenderOptions};
///
/// let options = RenderOptions::from_json(
///     r#"{ "allowMath": true, "customClasses": { "paragraph": ["lead"] } }"#,
/// )
/// .unwrap();
/// assert!(options.allow_math);
/// assert_eq!(options.custom_classes[&NodeKind::Paragraph], ["lead"]);
/// ```
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderOptions {
    /// Base for relative link targets.
    pub base_url: Option<String>,
    /// Base for relative image and video sources. Falls back to `base_url`.
    pub media_base_url: Option<String>,
    /// Render without block-level paragraph wrappers.
    pub inline: bool,
    pub allow_iframes: bool,
    /// Typeset `$...$`, `$$...$$` and `math` fences.
    pub allow_math: bool,
    /// Return the renderer's markup without sanitizing it.
    pub disable_html_sanitization: bool,
    pub custom_classes: BTreeMap<NodeKind, Vec<String>>,
    /// Extra tags allowed through the sanitizer.
    pub allowed_tags: Vec<String>,
    /// Extra attributes per tag.
    pub allowed_attributes: BTreeMap<String, Vec<String>>,
    /// Extra class patterns per tag. A trailing `*` matches any suffix.
    pub allowed_classes: BTreeMap<String, Vec<String>>,
    /// Replacement for the stock renderer.
    #[serde(skip)]
    pub renderer: Option<Arc<dyn Renderer>>,
}

impl RenderOptions {
    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Base URL media sources resolve against.
    pub fn media_base(&self) -> Option<&str> {
        self.media_base_url.as_deref().or(self.base_url.as_deref())
    }

    /// Caller classes configured for `kind`.
    pub fn classes(&self, kind: NodeKind) -> &[String] {
        self.custom_classes.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("base_url", &self.base_url)
            .field("media_base_url", &self.media_base_url)
            .field("inline", &self.inline)
            .field("allow_iframes", &self.allow_iframes)
            .field("allow_math", &self.allow_math)
            .field("disable_html_sanitization", &self.disable_html_sanitization)
            .field("custom_classes", &self.custom_classes)
            .field("allowed_tags", &self.allowed_tags)
            .field("allowed_attributes", &self.allowed_attributes)
            .field("allowed_classes", &self.allowed_classes)
            .field("renderer", &self.renderer.as_ref().map(|_| "dyn Renderer"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::GfmRenderer;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_conservative() {
        let options = RenderOptions::default();
        assert!(!options.inline);
        assert!(!options.allow_iframes);
        assert!(!options.allow_math);
        assert!(!options.disable_html_sanitization);
        assert!(options.renderer.is_none());
        assert_eq!(options.media_base(), None);
    }

    #[test]
    fn media_base_falls_back_to_base_url() {
        let options = RenderOptions {
            base_url: Some("https://example.com/".into()),
            ..Default::default()
        };
        assert_eq!(options.media_base(), Some("https://example.com/"));

        let options = RenderOptions {
            media_base_url: Some("https://cdn.example.com/".into()),
            ..options
        };
        assert_eq!(options.media_base(), Some("https://cdn.example.com/"));
    }

    #[test]
    fn from_json_reads_camel_case() {
        let options = RenderOptions::from_json(
            r#"{
                "baseUrl": "https://example.com/",
                "inline": true,
                "allowIframes": true,
                "disableHtmlSanitization": false,
                "allowedTags": ["abbr"],
                "allowedAttributes": { "abbr": ["title"] },
                "allowedClasses": { "div": ["note-*"] },
                "customClasses": { "heading": ["title"], "tablecell": ["cell"] }
            }"#,
        )
        .unwrap();
        assert_eq!(options.base_url.as_deref(), Some("https://example.com/"));
        assert!(options.inline);
        assert!(options.allow_iframes);
        assert_eq!(options.allowed_tags, ["abbr"]);
        assert_eq!(options.allowed_attributes["abbr"], ["title"]);
        assert_eq!(options.allowed_classes["div"], ["note-*"]);
        assert_eq!(options.classes(NodeKind::Heading), ["title"]);
        assert_eq!(options.classes(NodeKind::Tablecell), ["cell"]);
        assert!(options.classes(NodeKind::Link).is_empty());
    }

    #[test]
    fn from_json_rejects_bad_input() {
        let err = RenderOptions::from_json(r#"{ "inline": "yes" }"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid render options"), "{err}");

        let err = RenderOptions::from_json(r#"{ "customClasses": { "marquee": [] } }"#);
        assert!(err.is_err());
    }

    #[test]
    fn debug_hides_renderer() {
        let options = RenderOptions::default().with_renderer(GfmRenderer);
        let debug = format!("{options:?}");
        assert!(debug.contains(r#"renderer: Some("dyn Renderer")"#), "{debug}");
    }

    #[test]
    fn node_kind_tags() {
        assert_eq!(NodeKind::Tablecell.tags(), ["td", "th"]);
        assert_eq!(NodeKind::Heading.tags().len(), 6);
    }
}
