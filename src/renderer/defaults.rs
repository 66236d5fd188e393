//! Stock markup for every node type.
//!
//! These back the default methods of [`Renderer`](super::Renderer) and are
//! public so overrides can delegate to them.

use crate::code::render_code;
use crate::document::{AlertKind, Align};
use crate::error::Result;
use crate::escape::escape_html;
use crate::links::{is_anchor, resolve_link, resolve_media, EXTERNAL_REL};
use crate::options::NodeKind;
use crate::slug::slugify;

use super::RenderContext;

const LINK_ICON: &str = concat!(
    r#"<svg class="octicon octicon-link" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true">"#,
    r#"<path fill-rule="evenodd" d="M7.775 3.275a.75.75 0 001.06 1.06l1.25-1.25a2 2 0 112.83 2.83l-2.5 2.5a2 2 0 01-2.83 0 .75.75 0 00-1.06 1.06 3.5 3.5 0 004.95 0l2.5-2.5a3.5 3.5 0 00-4.95-4.95l-1.25 1.25zm-4.69 9.64a2 2 0 010-2.83l2.5-2.5a2 2 0 012.83 0 .75.75 0 001.06-1.06 3.5 3.5 0 00-4.95 0l-2.5 2.5a3.5 3.5 0 004.95 4.95l1.25-1.25a.75.75 0 00-1.06-1.06l-1.25 1.25a2 2 0 01-2.83 0z"></path>"#,
    "</svg>"
);

/// ` class="..."` for `kind`'s caller classes plus `base`, or nothing.
pub fn class_attr(cx: &RenderContext<'_>, kind: NodeKind, base: &[&str]) -> String {
    let classes: Vec<&str> = base
        .iter()
        .copied()
        .chain(cx.classes(kind).iter().map(String::as_str))
        .collect();
    if classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape_html(&classes.join(" ")))
    }
}

pub fn heading(cx: &mut RenderContext<'_>, text: &str, level: u8, raw: &str) -> String {
    let level = level.clamp(1, 6);
    let slug = cx.slugger.slug(raw);
    let class = class_attr(cx, NodeKind::Heading, &[]);
    format!(
        "<h{level} id=\"{slug}\"{class}><a class=\"anchor\" aria-hidden=\"true\" tabindex=\"-1\" href=\"#{slug}\">{LINK_ICON}</a>{text}</h{level}>"
    )
}

pub fn paragraph(cx: &mut RenderContext<'_>, text: &str) -> String {
    format!("<p{}>{text}</p>\n", class_attr(cx, NodeKind::Paragraph, &[]))
}

/// Highlighted, typeset or escaped code block. Caller classes land on `<pre>`.
pub fn code(cx: &mut RenderContext<'_>, source: &str, info: Option<&str>) -> Result<String> {
    let html = render_code(source, info, cx.options.allow_math, &mut cx.diagnostics)?;
    let class = class_attr(cx, NodeKind::Code, &[]);
    if class.is_empty() {
        return Ok(html);
    }
    Ok(html.replacen("<pre>", &format!("<pre{class}>"), 1))
}

pub fn codespan(cx: &mut RenderContext<'_>, code: &str) -> String {
    format!(
        "<code{}>{}</code>",
        class_attr(cx, NodeKind::Codespan, &[]),
        escape_html(code)
    )
}

pub fn blockquote(cx: &mut RenderContext<'_>, body: &str) -> String {
    format!(
        "<blockquote{}>\n{body}</blockquote>\n",
        class_attr(cx, NodeKind::Blockquote, &[])
    )
}

pub fn alert(_cx: &mut RenderContext<'_>, kind: AlertKind, body: &str) -> String {
    format!(
        "<div class=\"markdown-alert markdown-alert-{}\"><p class=\"markdown-alert-title\">{}</p>\n{body}</div>\n",
        kind.as_str(),
        kind.title()
    )
}

/// Raw HTML passes through; the sanitizer decides what survives.
pub fn html(_cx: &mut RenderContext<'_>, html: &str) -> String {
    html.to_string()
}

pub fn hr(cx: &mut RenderContext<'_>) -> String {
    format!("<hr{} />\n", class_attr(cx, NodeKind::Hr, &[]))
}

pub fn list(cx: &mut RenderContext<'_>, body: &str, ordered: bool, start: Option<u64>) -> String {
    let class = class_attr(cx, NodeKind::List, &[]);
    if ordered {
        let start = match start {
            Some(n) if n != 1 => format!(" start=\"{n}\""),
            _ => String::new(),
        };
        format!("<ol{start}{class}>\n{body}</ol>\n")
    } else {
        format!("<ul{class}>\n{body}</ul>\n")
    }
}

pub fn listitem(cx: &mut RenderContext<'_>, body: &str, task: Option<bool>) -> String {
    let base: &[&str] = if task.is_some() { &["task-list-item"] } else { &[] };
    format!("<li{}>{body}</li>\n", class_attr(cx, NodeKind::Listitem, base))
}

pub fn checkbox(_cx: &mut RenderContext<'_>, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!("<input type=\"checkbox\" disabled{checked} /> ")
}

pub fn table(cx: &mut RenderContext<'_>, header: &str, body: &str) -> String {
    let body = if body.is_empty() {
        String::new()
    } else {
        format!("<tbody>\n{body}</tbody>\n")
    };
    format!(
        "<table{}>\n<thead>\n{header}</thead>\n{body}</table>\n",
        class_attr(cx, NodeKind::Table, &[])
    )
}

pub fn tablerow(cx: &mut RenderContext<'_>, content: &str) -> String {
    format!("<tr{}>\n{content}</tr>\n", class_attr(cx, NodeKind::Tablerow, &[]))
}

pub fn tablecell(cx: &mut RenderContext<'_>, content: &str, header: bool, align: Align) -> String {
    let tag = if header { "th" } else { "td" };
    let align = align
        .as_str()
        .map(|a| format!(" align=\"{a}\""))
        .unwrap_or_default();
    let class = class_attr(cx, NodeKind::Tablecell, &[]);
    format!("<{tag}{align}{class}>{content}</{tag}>\n")
}

pub fn strong(cx: &mut RenderContext<'_>, text: &str) -> String {
    format!("<strong{}>{text}</strong>", class_attr(cx, NodeKind::Strong, &[]))
}

pub fn em(cx: &mut RenderContext<'_>, text: &str) -> String {
    format!("<em{}>{text}</em>", class_attr(cx, NodeKind::Em, &[]))
}

pub fn del(cx: &mut RenderContext<'_>, text: &str) -> String {
    format!("<del{}>{text}</del>", class_attr(cx, NodeKind::Del, &[]))
}

pub fn br(_cx: &mut RenderContext<'_>) -> String {
    "<br />\n".to_string()
}

/// In-page anchors are kept as written; everything else is resolved against
/// the base URL and marked `rel="noopener noreferrer"`.
pub fn link(cx: &mut RenderContext<'_>, href: &str, title: Option<&str>, text: &str) -> String {
    let title = title
        .map(|t| format!(" title=\"{}\"", escape_html(t)))
        .unwrap_or_default();
    let class = class_attr(cx, NodeKind::Link, &[]);
    if is_anchor(href) {
        return format!("<a href=\"{}\"{title}{class}>{text}</a>", escape_html(href));
    }
    let href = resolve_link(href, cx.options.base_url.as_deref());
    format!(
        "<a href=\"{}\" rel=\"{EXTERNAL_REL}\"{title}{class}>{text}</a>",
        escape_html(&href)
    )
}

/// `src` is left out when the source cannot be resolved against the media base.
pub fn image(cx: &mut RenderContext<'_>, src: &str, title: Option<&str>, alt: &str) -> String {
    let src = resolve_media(src, cx.options.media_base())
        .map(|s| format!("src=\"{}\" ", escape_html(&s)))
        .unwrap_or_default();
    format!(
        "<img {src}alt=\"{}\" title=\"{}\"{} />",
        escape_html(alt),
        escape_html(title.unwrap_or_default()),
        class_attr(cx, NodeKind::Image, &[])
    )
}

pub fn text(_cx: &mut RenderContext<'_>, text: &str) -> String {
    escape_html(text)
}

/// Base id for a footnote: its slugged label, or its number when the label
/// has no sluggable characters. [`RenderContext::footnote_id`] de-duplicates
/// these within a render.
pub fn footnote_id(label: &str, number: usize) -> String {
    let slug = slugify(label);
    if slug.is_empty() { number.to_string() } else { slug }
}

pub fn footnote_reference(cx: &mut RenderContext<'_>, label: &str, number: usize) -> String {
    let id = cx.footnote_id(label, number);
    format!("<sup class=\"footnote-ref\"><a href=\"#fn-{id}\" id=\"fnref-{id}\">{number}</a></sup>")
}

/// The back-reference goes inside the definition's last paragraph when it
/// ends with one.
pub fn footnote_definition(cx: &mut RenderContext<'_>, label: &str, number: usize, body: &str) -> String {
    let id = cx.footnote_id(label, number);
    let backref = format!("<a href=\"#fnref-{id}\" class=\"footnote-backref\">↩</a>");
    let body = match body.strip_suffix("</p>\n") {
        Some(rest) => format!("{rest} {backref}</p>\n"),
        None => format!("{body}{backref}\n"),
    };
    format!("<li id=\"fn-{id}\">\n{body}</li>\n")
}

pub fn footnotes(_cx: &mut RenderContext<'_>, items: &str) -> String {
    format!("<section class=\"footnotes\">\n<ol>\n{items}</ol>\n</section>\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::RenderOptions;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn with_cx<T>(options: &RenderOptions, f: impl FnOnce(&mut RenderContext<'_>) -> T) -> T {
        let mut cx = RenderContext::new(options);
        f(&mut cx)
    }

    #[test]
    fn heading_has_anchor_and_unique_ids() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            let first = heading(cx, "Hello", 1, "Hello");
            let second = heading(cx, "Hello", 2, "Hello");
            assert!(first.starts_with("<h1 id=\"hello\"><a class=\"anchor\" aria-hidden=\"true\" tabindex=\"-1\" href=\"#hello\"><svg"));
            assert!(first.ends_with("</svg></a>Hello</h1>"));
            assert!(second.starts_with("<h2 id=\"hello-1\">"));
        });
    }

    #[test]
    fn link_gets_rel_unless_anchor() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(
                link(cx, "https://example.com", None, "link"),
                r#"<a href="https://example.com" rel="noopener noreferrer">link</a>"#
            );
            assert_eq!(link(cx, "#top", Some("Top"), "up"), r##"<a href="#top" title="Top">up</a>"##);
        });
    }

    #[test]
    fn link_resolves_against_base() {
        let options = RenderOptions {
            base_url: Some("https://example.com/docs/".into()),
            ..Default::default()
        };
        with_cx(&options, |cx| {
            assert_eq!(
                link(cx, "guide.md", None, "g"),
                r#"<a href="https://example.com/docs/guide.md" rel="noopener noreferrer">g</a>"#
            );
        });
    }

    #[test]
    fn image_always_has_alt_and_title() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(image(cx, "a.png", None, ""), r#"<img src="a.png" alt="" title="" />"#);
        });
    }

    #[test]
    fn image_drops_unresolvable_src() {
        let options = RenderOptions {
            media_base_url: Some("not a base".into()),
            ..Default::default()
        };
        with_cx(&options, |cx| {
            assert_eq!(image(cx, "a.png", Some("T"), "A"), r#"<img alt="A" title="T" />"#);
        });
    }

    #[test]
    fn custom_classes_are_merged() {
        let options = RenderOptions {
            custom_classes: BTreeMap::from([
                (NodeKind::Paragraph, vec!["lead".to_string()]),
                (NodeKind::Listitem, vec!["item".to_string()]),
                (NodeKind::Code, vec!["code-box".to_string()]),
            ]),
            ..Default::default()
        };
        with_cx(&options, |cx| {
            assert_eq!(paragraph(cx, "x"), "<p class=\"lead\">x</p>\n");
            assert_eq!(
                listitem(cx, "y", Some(true)),
                "<li class=\"task-list-item item\">y</li>\n"
            );
            assert_eq!(
                code(cx, "z\n", None).unwrap(),
                "<pre class=\"code-box\"><code class=\"notranslate\">z</code></pre>"
            );
        });
    }

    #[test]
    fn ordered_list_start() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(list(cx, "", true, Some(1)), "<ol>\n</ol>\n");
            assert_eq!(list(cx, "", true, Some(4)), "<ol start=\"4\">\n</ol>\n");
            assert_eq!(list(cx, "", false, None), "<ul>\n</ul>\n");
        });
    }

    #[test]
    fn alert_markup() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(
                alert(cx, AlertKind::Tip, "<p>x</p>\n"),
                "<div class=\"markdown-alert markdown-alert-tip\"><p class=\"markdown-alert-title\">Tip</p>\n<p>x</p>\n</div>\n"
            );
        });
    }

    #[test]
    fn footnote_markup() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(
                footnote_reference(cx, "Note A", 1),
                "<sup class=\"footnote-ref\"><a href=\"#fn-note-a\" id=\"fnref-note-a\">1</a></sup>"
            );
            assert_eq!(
                footnote_definition(cx, "Note A", 1, "<p>Body</p>\n"),
                "<li id=\"fn-note-a\">\n<p>Body <a href=\"#fnref-note-a\" class=\"footnote-backref\">↩</a></p>\n</li>\n"
            );
        });
        assert_eq!(footnote_id("***", 3), "3");
    }

    #[test]
    fn table_without_body_rows() {
        let options = RenderOptions::default();
        with_cx(&options, |cx| {
            assert_eq!(table(cx, "<tr>\n</tr>\n", ""), "<table>\n<thead>\n<tr>\n</tr>\n</thead>\n</table>\n");
            assert_eq!(tablecell(cx, "a", true, Align::Center), "<th align=\"center\">a</th>\n");
            assert_eq!(tablecell(cx, "b", false, Align::None), "<td>b</td>\n");
        });
    }
}
