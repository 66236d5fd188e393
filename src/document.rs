//! Document tree built from the parser's event stream.
//!
//! `pulldown-cmark` yields a flat stream of start/end events. The renderer
//! callbacks want finished children (a heading gets its rendered text and
//! its plain text), so the stream is folded into a small tree first.

use pulldown_cmark::{Alignment, BlockQuoteKind, CodeBlockKind, Event, Options, Parser, Tag};

/// Parser extensions that make up GitHub-flavored markdown.
pub fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_GFM);
    options
}

/// Column alignment of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            Align::None => None,
            Align::Left => Some("left"),
            Align::Center => Some("center"),
            Align::Right => Some("right"),
        }
    }
}

impl From<Alignment> for Align {
    fn from(alignment: Alignment) -> Self {
        match alignment {
            Alignment::None => Align::None,
            Alignment::Left => Align::Left,
            Alignment::Center => Align::Center,
            Alignment::Right => Align::Right,
        }
    }
}

/// GitHub alert kinds (`> [!NOTE]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// Lower-case name used in class names.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Note => "note",
            AlertKind::Tip => "tip",
            AlertKind::Important => "important",
            AlertKind::Warning => "warning",
            AlertKind::Caution => "caution",
        }
    }

    /// Title shown above the alert body.
    pub fn title(self) -> &'static str {
        match self {
            AlertKind::Note => "Note",
            AlertKind::Tip => "Tip",
            AlertKind::Important => "Important",
            AlertKind::Warning => "Warning",
            AlertKind::Caution => "Caution",
        }
    }
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => AlertKind::Note,
            BlockQuoteKind::Tip => AlertKind::Tip,
            BlockQuoteKind::Important => AlertKind::Important,
            BlockQuoteKind::Warning => AlertKind::Warning,
            BlockQuoteKind::Caution => AlertKind::Caution,
        }
    }
}

/// One node of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    /// Indented (`info: None`) or fenced code block.
    CodeBlock { info: Option<String>, source: String },
    BlockQuote { kind: Option<AlertKind>, children: Vec<Node> },
    List { ordered: bool, start: Option<u64>, items: Vec<Node> },
    ListItem(Vec<Node>),
    TaskMarker(bool),
    Table { alignments: Vec<Align>, head: Vec<Node>, rows: Vec<Node> },
    TableRow(Vec<Node>),
    TableCell(Vec<Node>),
    ThematicBreak,
    Html(String),
    Emphasis(Vec<Node>),
    Strong(Vec<Node>),
    Strikethrough(Vec<Node>),
    Link { href: String, title: Option<String>, children: Vec<Node> },
    Image { src: String, title: Option<String>, alt: String },
    Code(String),
    Text(String),
    SoftBreak,
    HardBreak,
    FootnoteReference(String),
    FootnoteDefinition { label: String, children: Vec<Node> },
}

impl Node {
    /// Concatenated text content, without markup.
    pub fn plain_text(nodes: &[Node]) -> String {
        let mut out = String::new();
        collect_text(nodes, &mut out);
        out
    }

    /// Whether the node is block structure rather than inline content.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Heading { .. }
                | Node::Paragraph(_)
                | Node::CodeBlock { .. }
                | Node::BlockQuote { .. }
                | Node::List { .. }
                | Node::ListItem(_)
                | Node::Table { .. }
                | Node::TableRow(_)
                | Node::TableCell(_)
                | Node::ThematicBreak
                | Node::FootnoteDefinition { .. }
        )
    }
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) | Node::Code(text) => out.push_str(text),
            Node::SoftBreak | Node::HardBreak => out.push(' '),
            Node::Image { alt, .. } => out.push_str(alt),
            Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::BlockQuote { children, .. }
            | Node::ListItem(children)
            | Node::TableRow(children)
            | Node::TableCell(children)
            | Node::Emphasis(children)
            | Node::Strong(children)
            | Node::Strikethrough(children)
            | Node::Link { children, .. }
            | Node::FootnoteDefinition { children, .. } => collect_text(children, out),
            Node::List { items, .. } => collect_text(items, out),
            Node::Table { head, rows, .. } => {
                collect_text(head, out);
                collect_text(rows, out);
            }
            Node::CodeBlock { source, .. } => out.push_str(source),
            Node::TaskMarker(_)
            | Node::ThematicBreak
            | Node::Html(_)
            | Node::FootnoteReference(_) => {}
        }
    }
}

/// An open container waiting for its end event.
enum Frame {
    Root,
    Heading(u8),
    Paragraph,
    CodeBlock(Option<String>),
    BlockQuote(Option<AlertKind>),
    List(Option<u64>),
    Item,
    Table(Vec<Align>),
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: Option<String> },
    Image { src: String, title: Option<String> },
    FootnoteDefinition(String),
    /// Containers without a dedicated node; children are spliced into the parent.
    Transparent,
}

/// Parse `markdown` into a list of top-level nodes.
pub fn parse(markdown: &str) -> Vec<Node> {
    let mut stack: Vec<(Frame, Vec<Node>)> = vec![(Frame::Root, Vec::new())];

    for event in Parser::new_ext(markdown, parser_options()) {
        match event {
            Event::Start(tag) => stack.push((open_frame(tag), Vec::new())),
            Event::End(_) => {
                if stack.len() < 2 {
                    continue;
                }
                if let Some((frame, children)) = stack.pop() {
                    if let Some((_, parent)) = stack.last_mut() {
                        close_frame(frame, children, parent);
                    }
                }
            }
            Event::Text(text) => push(&mut stack, Node::Text(text.into_string())),
            Event::Code(code) => push(&mut stack, Node::Code(code.into_string())),
            Event::Html(html) | Event::InlineHtml(html) => push_html(&mut stack, &html),
            Event::FootnoteReference(label) => {
                push(&mut stack, Node::FootnoteReference(label.into_string()))
            }
            Event::SoftBreak => push(&mut stack, Node::SoftBreak),
            Event::HardBreak => push(&mut stack, Node::HardBreak),
            Event::Rule => push(&mut stack, Node::ThematicBreak),
            Event::TaskListMarker(checked) => push(&mut stack, Node::TaskMarker(checked)),
            // Math events are only produced with `ENABLE_MATH`, which stays off.
            _ => {}
        }
    }

    // Unbalanced input cannot come out of the parser, but fold any leftovers.
    while stack.len() > 1 {
        if let Some((frame, children)) = stack.pop() {
            if let Some((_, parent)) = stack.last_mut() {
                close_frame(frame, children, parent);
            }
        }
    }
    stack.pop().map(|(_, nodes)| nodes).unwrap_or_default()
}

fn push(stack: &mut [(Frame, Vec<Node>)], node: Node) {
    if let Some((_, children)) = stack.last_mut() {
        children.push(node);
    }
}

/// Adjacent HTML chunks (one per line of an HTML block) are merged.
fn push_html(stack: &mut [(Frame, Vec<Node>)], html: &str) {
    if let Some((_, children)) = stack.last_mut() {
        if let Some(Node::Html(prev)) = children.last_mut() {
            prev.push_str(html);
            return;
        }
        children.push(Node::Html(html.to_string()));
    }
}

fn open_frame(tag: Tag<'_>) -> Frame {
    match tag {
        Tag::Paragraph => Frame::Paragraph,
        Tag::Heading { level, .. } => Frame::Heading(level as u8),
        Tag::BlockQuote(kind) => Frame::BlockQuote(kind.map(AlertKind::from)),
        Tag::CodeBlock(CodeBlockKind::Indented) => Frame::CodeBlock(None),
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => {
            let info = info.trim();
            Frame::CodeBlock((!info.is_empty()).then(|| info.to_string()))
        }
        Tag::List(start) => Frame::List(start),
        Tag::Item => Frame::Item,
        Tag::Table(alignments) => Frame::Table(alignments.into_iter().map(Align::from).collect()),
        Tag::TableHead => Frame::TableHead,
        Tag::TableRow => Frame::TableRow,
        Tag::TableCell => Frame::TableCell,
        Tag::Emphasis => Frame::Emphasis,
        Tag::Strong => Frame::Strong,
        Tag::Strikethrough => Frame::Strikethrough,
        Tag::Link {
            dest_url, title, ..
        } => Frame::Link {
            href: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        Tag::Image {
            dest_url, title, ..
        } => Frame::Image {
            src: dest_url.into_string(),
            title: non_empty(title.into_string()),
        },
        Tag::FootnoteDefinition(label) => Frame::FootnoteDefinition(label.into_string()),
        _ => Frame::Transparent,
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

fn close_frame(frame: Frame, children: Vec<Node>, parent: &mut Vec<Node>) {
    let node = match frame {
        Frame::Root | Frame::Transparent => {
            parent.extend(children);
            return;
        }
        Frame::Heading(level) => Node::Heading { level, children },
        Frame::Paragraph => Node::Paragraph(children),
        Frame::CodeBlock(info) => {
            let source = children
                .into_iter()
                .filter_map(|node| match node {
                    Node::Text(text) => Some(text),
                    _ => None,
                })
                .collect();
            Node::CodeBlock { info, source }
        }
        Frame::BlockQuote(kind) => Node::BlockQuote { kind, children },
        Frame::List(start) => Node::List {
            ordered: start.is_some(),
            start,
            items: children,
        },
        Frame::Item => Node::ListItem(children),
        Frame::Table(alignments) => {
            let mut head = Vec::new();
            let mut rows = Vec::new();
            for child in children {
                match child {
                    // The head arrives as a row of cells in its own container.
                    Node::TableRow(cells) if head.is_empty() && rows.is_empty() => head = cells,
                    row => rows.push(row),
                }
            }
            Node::Table {
                alignments,
                head,
                rows,
            }
        }
        Frame::TableHead | Frame::TableRow => Node::TableRow(children),
        Frame::TableCell => Node::TableCell(children),
        Frame::Emphasis => Node::Emphasis(children),
        Frame::Strong => Node::Strong(children),
        Frame::Strikethrough => Node::Strikethrough(children),
        Frame::Link { href, title } => Node::Link {
            href,
            title,
            children,
        },
        Frame::Image { src, title } => Node::Image {
            src,
            title,
            alt: Node::plain_text(&children),
        },
        Frame::FootnoteDefinition(label) => Node::FootnoteDefinition { label, children },
    };
    parent.push(node);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn heading_and_paragraph() {
        let nodes = parse("# Hello *there*\n\nBody text.\n");
        assert_eq!(
            nodes,
            vec![
                Node::Heading {
                    level: 1,
                    children: vec![text("Hello "), Node::Emphasis(vec![text("there")])],
                },
                Node::Paragraph(vec![text("Body text.")]),
            ]
        );
        assert_eq!(Node::plain_text(&nodes[..1]), "Hello there");
    }

    #[test]
    fn fenced_code_keeps_info_and_source() {
        let nodes = parse("```ts, ignore\nlet a = 1;\n```\n");
        assert_eq!(
            nodes,
            vec![Node::CodeBlock {
                info: Some("ts, ignore".into()),
                source: "let a = 1;\n".into(),
            }]
        );
    }

    #[test]
    fn indented_code_has_no_info() {
        let nodes = parse("    plain\n");
        assert!(matches!(&nodes[0], Node::CodeBlock { info: None, source } if source == "plain\n"));
    }

    #[test]
    fn image_alt_is_flattened() {
        let nodes = parse("![an *alt* text](a.png \"T\")");
        assert_eq!(
            nodes,
            vec![Node::Paragraph(vec![Node::Image {
                src: "a.png".into(),
                title: Some("T".into()),
                alt: "an alt text".into(),
            }])]
        );
    }

    #[test]
    fn table_head_and_rows() {
        let nodes = parse("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let Node::Table {
            alignments,
            head,
            rows,
        } = &nodes[0]
        else {
            panic!("expected table, got {nodes:?}");
        };
        assert_eq!(alignments, &vec![Align::Left, Align::Right]);
        assert_eq!(head.len(), 2);
        assert_eq!(rows.len(), 1);
        assert!(matches!(&rows[0], Node::TableRow(cells) if cells.len() == 2));
    }

    #[test]
    fn ordered_list_start() {
        let nodes = parse("3. three\n4. four\n");
        assert!(matches!(
            &nodes[0],
            Node::List { ordered: true, start: Some(3), items } if items.len() == 2
        ));
    }

    #[test]
    fn task_markers() {
        let nodes = parse("- [x] done\n- [ ] todo\n");
        let Node::List { items, .. } = &nodes[0] else {
            panic!("expected list");
        };
        assert!(matches!(&items[0], Node::ListItem(c) if c[0] == Node::TaskMarker(true)));
        assert!(matches!(&items[1], Node::ListItem(c) if c[0] == Node::TaskMarker(false)));
    }

    #[test]
    fn alert_blockquote() {
        let nodes = parse("> [!WARNING]\n> Careful.\n");
        assert!(matches!(
            &nodes[0],
            Node::BlockQuote { kind: Some(AlertKind::Warning), .. }
        ));
    }

    #[test]
    fn html_block_lines_merge() {
        let nodes = parse("<div>\nhi\n</div>\n");
        assert_eq!(nodes, vec![Node::Html("<div>\nhi\n</div>\n".into())]);
    }

    #[test]
    fn footnotes() {
        let nodes = parse("Text[^a].\n\n[^a]: Note.\n");
        assert!(matches!(&nodes[0], Node::Paragraph(c) if c.contains(&Node::FootnoteReference("a".into()))));
        assert!(matches!(&nodes[1], Node::FootnoteDefinition { label, .. } if label == "a"));
    }
}
