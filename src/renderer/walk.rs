//! Tree walk that feeds document nodes through a [`Renderer`].

use crate::document::{Align, Node};
use crate::error::Result;

use super::{RenderContext, Renderer};

/// Render a parsed document, footnotes included.
///
/// In inline mode no block markup is produced: block syntax comes back as
/// its literal markers around the rendered inline content, one block per
/// line, and footnotes stay as written.
pub(crate) fn render_document(
    renderer: &dyn Renderer,
    cx: &mut RenderContext<'_>,
    nodes: &[Node],
) -> Result<String> {
    let inline = cx.options.inline;
    let mut walker = Walker { renderer, cx, inline };

    if inline {
        return walker.flatten_all(nodes);
    }

    let mut out = walker.render_all(nodes)?;
    let footnotes = walker.cx.take_footnotes();
    if !footnotes.is_empty() {
        let mut items = String::new();
        for (label, number, body) in footnotes {
            items.push_str(&renderer.footnote_definition(walker.cx, &label, number, &body));
        }
        out.push_str(&renderer.footnotes(walker.cx, &items));
    }
    Ok(out)
}

struct Walker<'r, 'c, 'o> {
    renderer: &'r dyn Renderer,
    cx: &'c mut RenderContext<'o>,
    inline: bool,
}

impl Walker<'_, '_, '_> {
    fn render_all(&mut self, nodes: &[Node]) -> Result<String> {
        let mut out = String::new();
        for node in nodes {
            out.push_str(&self.render(node)?);
        }
        Ok(out)
    }

    fn render(&mut self, node: &Node) -> Result<String> {
        let r = self.renderer;
        let html = match node {
            Node::Heading { level, children } => {
                let text = self.render_all(children)?;
                let raw = Node::plain_text(children);
                r.heading(self.cx, &text, *level, &raw)
            }
            Node::Paragraph(children) => {
                let text = self.render_all(children)?;
                r.paragraph(self.cx, &text)
            }
            Node::CodeBlock { info, source } => r.code(self.cx, source, info.as_deref())?,
            Node::BlockQuote { kind, children } => {
                let body = self.render_all(children)?;
                match kind {
                    Some(kind) => r.alert(self.cx, *kind, &body),
                    None => r.blockquote(self.cx, &body),
                }
            }
            Node::List {
                ordered,
                start,
                items,
            } => {
                let body = self.render_all(items)?;
                r.list(self.cx, &body, *ordered, *start)
            }
            Node::ListItem(children) => {
                let body = self.render_all(children)?;
                r.listitem(self.cx, &body, task_state(children))
            }
            Node::TaskMarker(checked) => r.checkbox(self.cx, *checked),
            Node::Table {
                alignments,
                head,
                rows,
            } => {
                let head_cells = self.render_cells(head, alignments, true)?;
                let header = r.tablerow(self.cx, &head_cells);
                let mut body = String::new();
                for row in rows {
                    let cells = match row {
                        Node::TableRow(cells) => cells.as_slice(),
                        other => std::slice::from_ref(other),
                    };
                    let content = self.render_cells(cells, alignments, false)?;
                    body.push_str(&r.tablerow(self.cx, &content));
                }
                r.table(self.cx, &header, &body)
            }
            // Rows and cells only appear inside tables, handled above.
            Node::TableRow(children) | Node::TableCell(children) => self.render_all(children)?,
            Node::ThematicBreak => r.hr(self.cx),
            Node::Html(html) => r.html(self.cx, html),
            Node::Emphasis(children) => {
                let text = self.render_all(children)?;
                r.em(self.cx, &text)
            }
            Node::Strong(children) => {
                let text = self.render_all(children)?;
                r.strong(self.cx, &text)
            }
            Node::Strikethrough(children) => {
                let text = self.render_all(children)?;
                r.del(self.cx, &text)
            }
            Node::Link {
                href,
                title,
                children,
            } => {
                let text = self.render_all(children)?;
                r.link(self.cx, href, title.as_deref(), &text)
            }
            Node::Image { src, title, alt } => r.image(self.cx, src, title.as_deref(), alt),
            Node::Code(code) => r.codespan(self.cx, code),
            Node::Text(text) => r.text(self.cx, text),
            Node::SoftBreak => "\n".to_string(),
            Node::HardBreak => r.br(self.cx),
            Node::FootnoteReference(label) if self.inline => r.text(self.cx, &format!("[^{label}]")),
            Node::FootnoteReference(label) => {
                let number = self.cx.footnote_number(label);
                r.footnote_reference(self.cx, label, number)
            }
            Node::FootnoteDefinition { label, children } => {
                let body = self.render_all(children)?;
                self.cx.push_footnote_body(label, body);
                String::new()
            }
        };
        Ok(html)
    }

    fn render_cells(&mut self, cells: &[Node], alignments: &[Align], header: bool) -> Result<String> {
        let mut out = String::new();
        for (i, cell) in cells.iter().enumerate() {
            let content = match cell {
                Node::TableCell(children) => self.render_all(children)?,
                other => self.render(other)?,
            };
            let align = alignments.get(i).copied().unwrap_or(Align::None);
            out.push_str(&self.renderer.tablecell(self.cx, &content, header, align));
        }
        Ok(out)
    }

    /// Inline rendering of mixed content: runs of inline nodes are kept
    /// together and every block starts a new line.
    fn flatten_all(&mut self, nodes: &[Node]) -> Result<String> {
        let mut lines = Vec::new();
        let mut run = String::new();
        for node in nodes {
            if node.is_block() {
                if !run.is_empty() {
                    lines.push(std::mem::take(&mut run));
                }
                lines.push(self.flatten(node)?);
            } else {
                run.push_str(&self.flatten(node)?);
            }
        }
        if !run.is_empty() {
            lines.push(run);
        }
        Ok(lines.join("\n"))
    }

    fn flatten(&mut self, node: &Node) -> Result<String> {
        let r = self.renderer;
        let text = match node {
            Node::Paragraph(children) | Node::ListItem(children) | Node::TableCell(children) => {
                self.flatten_all(children)?
            }
            Node::Heading { level, children } => {
                format!("{} {}", "#".repeat(usize::from(*level)), self.flatten_all(children)?)
            }
            Node::BlockQuote { kind, children } => {
                let mut body = self.flatten_all(children)?;
                if let Some(kind) = kind {
                    body = format!("[!{}]\n{body}", kind.as_str().to_uppercase());
                }
                prefix_lines(&body, "&gt; ")
            }
            Node::List {
                ordered,
                start,
                items,
            } => {
                let first = start.unwrap_or(1);
                let mut lines = Vec::with_capacity(items.len());
                for (n, item) in (first..).zip(items) {
                    let marker = if *ordered { format!("{n}. ") } else { "- ".to_string() };
                    lines.push(format!("{marker}{}", self.flatten(item)?));
                }
                lines.join("\n")
            }
            Node::TaskMarker(checked) => {
                let marker = if *checked { "[x] " } else { "[ ] " };
                marker.to_string()
            }
            Node::CodeBlock { source, .. } => r.codespan(self.cx, source.trim_end_matches('\n')),
            Node::Table { head, rows, .. } => {
                let mut lines = vec![self.flatten_row(head)?];
                for row in rows {
                    lines.push(self.flatten(row)?);
                }
                lines.join("\n")
            }
            Node::TableRow(cells) => self.flatten_row(cells)?,
            Node::ThematicBreak => "---".to_string(),
            Node::FootnoteDefinition { label, children } => {
                let body = self.flatten_all(children)?;
                format!("{}{body}", r.text(self.cx, &format!("[^{label}]: ")))
            }
            other => self.render(other)?,
        };
        Ok(text)
    }

    fn flatten_row(&mut self, cells: &[Node]) -> Result<String> {
        let mut out = Vec::with_capacity(cells.len());
        for cell in cells {
            out.push(self.flatten(cell)?);
        }
        Ok(out.join(" | "))
    }
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Checkbox state of a task list item. Loose items carry the marker inside
/// their first paragraph.
fn task_state(children: &[Node]) -> Option<bool> {
    match children.first()? {
        Node::TaskMarker(checked) => Some(*checked),
        Node::Paragraph(inner) => match inner.first()? {
            Node::TaskMarker(checked) => Some(*checked),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse;
    use crate::options::RenderOptions;
    use crate::renderer::GfmRenderer;
    use pretty_assertions::assert_eq;

    fn walk(markdown: &str, options: &RenderOptions) -> String {
        let mut cx = RenderContext::new(options);
        render_document(&GfmRenderer, &mut cx, &parse(markdown)).unwrap()
    }

    #[test]
    fn paragraph_with_inline_markup() {
        assert_eq!(
            walk("a **b** _c_ ~~d~~ `e<`", &RenderOptions::default()),
            "<p>a <strong>b</strong> <em>c</em> <del>d</del> <code>e&lt;</code></p>\n"
        );
    }

    #[test]
    fn inline_mode_unwraps_paragraphs() {
        let options = RenderOptions {
            inline: true,
            ..Default::default()
        };
        assert_eq!(walk("**bold**", &options), "<strong>bold</strong>");
        assert_eq!(walk("one\n\ntwo", &options), "one\ntwo");
    }

    #[test]
    fn inline_mode_keeps_block_syntax_literal() {
        let options = RenderOptions {
            inline: true,
            ..Default::default()
        };
        assert_eq!(walk("# Title *x*", &options), "# Title <em>x</em>");
        assert_eq!(walk("- one\n- [x] two", &options), "- one\n- [x] two");
        assert_eq!(walk("3. a\n4. b", &options), "3. a\n4. b");
        assert_eq!(walk("> quoted\n\n---", &options), "&gt; quoted\n---");
        assert_eq!(walk("```rust\nfn x() {}\n```", &options), "<code>fn x() {}</code>");
        assert_eq!(walk("See[^n].\n\n[^n]: Note.", &options), "See[^n].\n[^n]: Note.");
    }

    #[test]
    fn task_list() {
        assert_eq!(
            walk("- [x] done\n- [ ] todo\n", &RenderOptions::default()),
            "<ul>\n<li class=\"task-list-item\"><input type=\"checkbox\" disabled checked /> done</li>\n\
             <li class=\"task-list-item\"><input type=\"checkbox\" disabled /> todo</li>\n</ul>\n"
        );
    }

    #[test]
    fn table_cells_carry_alignment() {
        assert_eq!(
            walk("| a | b |\n|:-:|---|\n| 1 | 2 |\n", &RenderOptions::default()),
            "<table>\n<thead>\n<tr>\n<th align=\"center\">a</th>\n<th>b</th>\n</tr>\n</thead>\n\
             <tbody>\n<tr>\n<td align=\"center\">1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
        );
    }

    #[test]
    fn alert_block() {
        let html = walk("> [!NOTE]\n> Heads up.\n", &RenderOptions::default());
        assert_eq!(
            html,
            "<div class=\"markdown-alert markdown-alert-note\"><p class=\"markdown-alert-title\">Note</p>\n<p>Heads up.</p>\n</div>\n"
        );
    }

    #[test]
    fn footnotes_collect_at_end() {
        let html = walk("Text[^n].\n\n[^n]: The note.\n", &RenderOptions::default());
        assert_eq!(
            html,
            "<p>Text<sup class=\"footnote-ref\"><a href=\"#fn-n\" id=\"fnref-n\">1</a></sup>.</p>\n\
             <section class=\"footnotes\">\n<ol>\n<li id=\"fn-n\">\n\
             <p>The note. <a href=\"#fnref-n\" class=\"footnote-backref\">↩</a></p>\n</li>\n</ol>\n</section>\n"
        );
    }

    #[test]
    fn soft_and_hard_breaks() {
        assert_eq!(
            walk("a\nb  \nc", &RenderOptions::default()),
            "<p>a\nb<br />\nc</p>\n"
        );
    }
}
