//! Sanitization policy.
//!
//! The policy is rebuilt for every render from [`RenderOptions`]: a fixed
//! core of tags and attributes that covers everything the stock renderer
//! emits, widened by the options. Classes are checked token by token against
//! exact names and `prefix-*` wildcards.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use ammonia::Builder;

use crate::links::{is_protocol_relative, resolve_media};
use crate::options::RenderOptions;
use crate::style::KATEX_CLASSES;

const BASE_TAGS: &[&str] = &[
    // sections
    "address", "article", "aside", "footer", "header", "h1", "h2", "h3", "h4", "h5", "h6",
    "hgroup", "main", "nav", "section",
    // text blocks
    "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "hr", "li", "ol", "p", "pre",
    "ul",
    // inline
    "a", "abbr", "b", "bdi", "bdo", "br", "cite", "code", "data", "dfn", "em", "i", "kbd",
    "mark", "q", "rb", "rp", "rt", "rtc", "ruby", "s", "samp", "small", "span", "strong", "sub",
    "sup", "time", "u", "var", "wbr",
    // tables
    "caption", "col", "colgroup", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

const EXTRA_TAGS: &[&str] = &[
    "img", "video", "svg", "path", "circle", "figure", "figcaption", "del", "details", "summary",
    "input",
];

const MATH_TAGS: &[&str] = &[
    "math", "maction", "annotation", "annotation-xml", "menclose", "merror", "mfenced", "mfrac",
    "mi", "mmultiscripts", "mn", "mo", "mover", "mpadded", "mphantom", "mprescripts", "mroot",
    "mrow", "ms", "semantics", "mspace", "msqrt", "mstyle", "msub", "msup", "msubsup", "mtable",
    "mtd", "mtext", "mtr",
];

const BASE_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("img", &["src", "alt", "title", "height", "width", "align"]),
    (
        "video",
        &[
            "src", "alt", "height", "width", "autoplay", "muted", "loop", "playsinline", "poster",
            "controls",
        ],
    ),
    ("a", &["id", "aria-hidden", "href", "tabindex", "rel", "target", "title"]),
    // html5ever keeps the SVG spelling; `viewbox` covers markup parsed as plain HTML.
    ("svg", &["viewBox", "viewbox", "width", "height", "aria-hidden", "background"]),
    ("path", &["fill-rule", "d"]),
    ("circle", &["cx", "cy", "r", "stroke", "stroke-width", "fill", "alpha"]),
    ("h1", &["id"]),
    ("h2", &["id"]),
    ("h3", &["id"]),
    ("h4", &["id"]),
    ("h5", &["id"]),
    ("h6", &["id"]),
    ("td", &["colspan", "rowspan", "align"]),
    ("th", &["colspan", "rowspan", "align"]),
    ("ol", &["start"]),
    ("li", &["id"]),
    ("input", &["type", "checked", "disabled"]),
];

const BASE_CLASSES: &[(&str, &[&str])] = &[
    (
        "div",
        &[
            "highlight",
            "highlight-source-*",
            "notranslate",
            "highlight-title",
            "markdown-alert",
            "markdown-alert-*",
        ],
    ),
    ("p", &["markdown-alert-title"]),
    ("code", &["notranslate"]),
    ("span", &["pl-*"]),
    ("a", &["anchor", "footnote-backref"]),
    ("svg", &["octicon", "octicon-link"]),
    ("section", &["footnotes"]),
    ("sup", &["footnote-ref"]),
    ("li", &["task-list-item"]),
];

const URL_SCHEMES: &[&str] = &["http", "https", "ftp", "mailto", "tel"];

/// Tags whose content is dropped along with the tag.
const CLEAN_CONTENT_TAGS: &[&str] = &["script", "style"];

/// An allowed class: an exact name, or a prefix written as `prefix-*`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClassPattern {
    Exact(String),
    Prefix(String),
}

impl ClassPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => ClassPattern::Prefix(prefix.to_string()),
            None => ClassPattern::Exact(pattern.to_string()),
        }
    }

    pub fn matches(&self, class: &str) -> bool {
        match self {
            ClassPattern::Exact(name) => name == class,
            ClassPattern::Prefix(prefix) => class.len() > prefix.len() && class.starts_with(prefix.as_str()),
        }
    }
}

/// Allowed tags, attributes and classes for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizePolicy {
    tags: BTreeSet<String>,
    attributes: BTreeMap<String, BTreeSet<String>>,
    classes: BTreeMap<String, BTreeSet<ClassPattern>>,
}

impl SanitizePolicy {
    /// Build the policy for `options`. Options only ever add to the core.
    pub fn build(options: &RenderOptions) -> Self {
        let mut policy = SanitizePolicy {
            tags: BTreeSet::new(),
            attributes: BTreeMap::new(),
            classes: BTreeMap::new(),
        };

        policy.add_tags(BASE_TAGS.iter().chain(EXTRA_TAGS).copied());
        for (tag, attrs) in BASE_ATTRIBUTES {
            policy.add_attributes(tag, attrs.iter().copied());
        }
        for (tag, classes) in BASE_CLASSES {
            policy.add_classes(tag, classes.iter().copied());
        }

        if options.allow_iframes {
            policy.add_tags(["iframe"]);
            policy.add_attributes("iframe", ["src", "width", "height"]);
        }

        if options.allow_math {
            policy.add_tags(MATH_TAGS.iter().copied());
            policy.add_attributes("math", ["xmlns"]);
            policy.add_attributes("annotation", ["encoding"]);
            policy.add_attributes("span", ["aria-hidden", "style"]);
            policy.add_classes("span", KATEX_CLASSES.iter().copied());
        }

        for (kind, classes) in &options.custom_classes {
            for tag in kind.tags() {
                policy.add_classes(tag, classes.iter().map(String::as_str));
            }
        }

        policy.add_tags(options.allowed_tags.iter().map(String::as_str));
        for (tag, attrs) in &options.allowed_attributes {
            policy.add_attributes(tag, attrs.iter().map(String::as_str));
        }
        for (tag, classes) in &options.allowed_classes {
            policy.add_classes(tag, classes.iter().map(String::as_str));
        }

        policy
    }

    fn add_tags<'a>(&mut self, tags: impl IntoIterator<Item = &'a str>) {
        self.tags.extend(tags.into_iter().map(str::to_string));
    }

    fn add_attributes<'a>(&mut self, tag: &str, attrs: impl IntoIterator<Item = &'a str>) {
        self.attributes
            .entry(tag.to_string())
            .or_default()
            .extend(attrs.into_iter().map(str::to_string));
    }

    fn add_classes<'a>(&mut self, tag: &str, classes: impl IntoIterator<Item = &'a str>) {
        self.classes
            .entry(tag.to_string())
            .or_default()
            .extend(classes.into_iter().map(ClassPattern::parse));
    }

    pub fn allows_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        if attribute == "class" {
            return self.classes.contains_key(tag);
        }
        self.attributes
            .get(tag)
            .is_some_and(|attrs| attrs.contains(attribute))
    }

    pub fn allows_class(&self, tag: &str, class: &str) -> bool {
        self.classes
            .get(tag)
            .is_some_and(|patterns| patterns.iter().any(|p| p.matches(class)))
    }

    /// Sanitize `html`, resolving media sources against `media_base`.
    pub fn sanitize(&self, html: &str, media_base: Option<&str>) -> String {
        let tags: HashSet<&str> = self.tags.iter().map(String::as_str).collect();

        let mut tag_attributes: HashMap<&str, HashSet<&str>> = self
            .attributes
            .iter()
            .map(|(tag, attrs)| (tag.as_str(), attrs.iter().map(String::as_str).collect()))
            .collect();
        for tag in self.classes.keys() {
            tag_attributes.entry(tag.as_str()).or_default().insert("class");
        }

        // ammonia rejects a tag that is both allowed and content-cleaned.
        let clean_content: HashSet<&str> = CLEAN_CONTENT_TAGS
            .iter()
            .copied()
            .filter(|tag| !tags.contains(tag))
            .collect();

        let policy = self.clone();
        let media_base = media_base.map(str::to_owned);

        Builder::default()
            .tags(tags)
            .clean_content_tags(clean_content)
            .tag_attributes(tag_attributes)
            .generic_attributes(HashSet::new())
            .url_schemes(URL_SCHEMES.iter().copied().collect())
            .link_rel(None)
            // Only task list checkboxes; a missing type would be a text box.
            .set_tag_attribute_value("input", "type", "checkbox")
            .attribute_filter(move |element, attribute, value| {
                policy.filter_attribute(element, attribute, value, media_base.as_deref())
            })
            .clean(html)
            .to_string()
    }

    fn filter_attribute<'u>(
        &self,
        element: &str,
        attribute: &str,
        value: &'u str,
        media_base: Option<&str>,
    ) -> Option<Cow<'u, str>> {
        match (element, attribute) {
            (_, "class") => {
                let kept: Vec<&str> = value
                    .split_ascii_whitespace()
                    .filter(|class| self.allows_class(element, class))
                    .collect();
                (!kept.is_empty()).then(|| Cow::Owned(kept.join(" ")))
            }
            ("img" | "video", "src") => resolve_media(value, media_base).map(Cow::Owned),
            (_, "href" | "src" | "poster") if is_protocol_relative(value) => None,
            _ => Some(Cow::Borrowed(value)),
        }
    }
}
