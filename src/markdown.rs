//! Markdown body compilation.
//!
//! Turns the body of a content file into a [`Node`] tree once, at collect
//! time. Along the way it assigns heading anchors, builds the table of
//! contents, and counts words for the reading-time estimate.
//!
//! ## Heading Anchors
//!
//! Anchors follow the GitHub convention: lowercase, punctuation dropped,
//! spaces turned into dashes, and repeats suffixed `-1`, `-2`, … in document
//! order. An explicit `{#custom-id}` on the heading line wins.
//!
//! ## Supported Syntax
//!
//! CommonMark plus tables, strikethrough, task lists, footnote references
//! and heading attributes. Raw HTML (including MDX-style component tags)
//! is carried through untouched as [`Node::Html`]; nothing is evaluated.

use crate::types::{Component, Node, TocEntry};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use std::collections::{BTreeMap, HashMap};

/// A compiled body with its derived metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Compiled {
    pub body: Vec<Node>,
    pub toc: Vec<TocEntry>,
    pub word_count: usize,
    pub reading_time: u32,
}

/// Knobs that affect compilation.
#[derive(Debug, Clone, Copy)]
pub struct CompileOptions {
    pub toc_max_depth: u8,
    pub words_per_minute: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            toc_max_depth: 6,
            words_per_minute: 300,
        }
    }
}

impl From<&crate::config::ContentConfig> for CompileOptions {
    fn from(config: &crate::config::ContentConfig) -> Self {
        Self {
            toc_max_depth: config.toc_max_depth,
            words_per_minute: config.words_per_minute,
        }
    }
}

/// Compile a Markdown body (frontmatter already removed).
pub fn compile(source: &str, options: CompileOptions) -> Compiled {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(source, parser_options()) {
        builder.push_event(event);
    }
    let TreeBuilder {
        stack,
        headings,
        plain,
        ..
    } = builder;
    let body = stack.into_iter().next().map(|f| f.children).unwrap_or_default();

    let visible: Vec<Heading> = headings
        .into_iter()
        .filter(|h| h.level <= options.toc_max_depth)
        .collect();
    let word_count = plain.split_whitespace().count();

    Compiled {
        body,
        toc: nest_headings(&visible),
        word_count,
        reading_time: reading_time(word_count, options.words_per_minute),
    }
}

fn parser_options() -> Options {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    options
}

/// Minutes to read `words` at `per_minute`, rounded up. Zero only for empty bodies.
pub fn reading_time(words: usize, per_minute: u32) -> u32 {
    if words == 0 {
        return 0;
    }
    let per_minute = per_minute.max(1) as usize;
    words.div_ceil(per_minute).try_into().unwrap_or(u32::MAX)
}

// ============================================================================
// Tree building
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Heading {
    level: u8,
    title: String,
    id: String,
}

enum FrameKind {
    Root,
    Element(Component),
    Heading { level: u8, id: Option<String> },
    Image,
    /// Container whose children are spliced into the parent.
    Fragment,
}

struct Frame {
    kind: FrameKind,
    attrs: BTreeMap<String, String>,
    children: Vec<Node>,
}

impl Frame {
    fn new(kind: FrameKind) -> Self {
        Self {
            kind,
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }
}

struct TreeBuilder {
    stack: Vec<Frame>,
    headings: Vec<Heading>,
    slugger: Slugger,
    in_table_head: bool,
    /// Visible text, with a space at every block boundary.
    plain: String,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            stack: vec![Frame::new(FrameKind::Root)],
            headings: Vec::new(),
            slugger: Slugger::default(),
            in_table_head: false,
            plain: String::new(),
        }
    }
}

impl TreeBuilder {
    fn push_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => {
                if !is_inline(&tag) {
                    self.plain.push(' ');
                }
                self.open(tag);
            }
            Event::End(tag) => {
                if !is_inline_end(tag) {
                    self.plain.push(' ');
                }
                self.close();
            }
            Event::Text(text) => {
                self.plain.push_str(&text);
                self.append(Node::text(text.as_ref()));
            }
            Event::Code(code) => {
                self.plain.push_str(&code);
                self.append(Node::element(
                    Component::InlineCode,
                    vec![Node::text(code.as_ref())],
                ));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.append(Node::Html {
                value: html.to_string(),
            }),
            Event::SoftBreak => {
                self.plain.push(' ');
                self.append(Node::text("\n"));
            }
            Event::HardBreak => {
                self.plain.push(' ');
                self.append(Node::element(Component::LineBreak, Vec::new()));
            }
            Event::Rule => self.append(Node::element(Component::Rule, Vec::new())),
            Event::FootnoteReference(label) => self.append(Node::text(format!("[{label}]"))),
            Event::TaskListMarker(checked) => self.append(Node::Html {
                value: if checked {
                    r#"<input type="checkbox" disabled checked>"#.to_string()
                } else {
                    r#"<input type="checkbox" disabled>"#.to_string()
                },
            }),
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => Frame::new(FrameKind::Element(Component::Paragraph)),
            Tag::Heading { level, id, .. } => Frame::new(FrameKind::Heading {
                level: heading_level(level),
                id: id.map(|s| s.to_string()),
            }),
            Tag::BlockQuote(_) => Frame::new(FrameKind::Element(Component::Blockquote)),
            Tag::CodeBlock(kind) => {
                let mut frame = Frame::new(FrameKind::Element(Component::CodeBlock));
                if let CodeBlockKind::Fenced(info) = kind
                    && let Some(lang) = info.split_whitespace().next()
                {
                    frame.attrs.insert("language".to_string(), lang.to_string());
                }
                frame
            }
            Tag::List(Some(start)) => {
                let mut frame = Frame::new(FrameKind::Element(Component::OrderedList));
                if start != 1 {
                    frame.attrs.insert("start".to_string(), start.to_string());
                }
                frame
            }
            Tag::List(None) => Frame::new(FrameKind::Element(Component::UnorderedList)),
            Tag::Item => Frame::new(FrameKind::Element(Component::ListItem)),
            Tag::Table(_) => Frame::new(FrameKind::Element(Component::Table)),
            Tag::TableHead => {
                self.in_table_head = true;
                Frame::new(FrameKind::Element(Component::TableHead))
            }
            Tag::TableRow => Frame::new(FrameKind::Element(Component::TableRow)),
            Tag::TableCell => Frame::new(FrameKind::Element(if self.in_table_head {
                Component::TableHeader
            } else {
                Component::TableCell
            })),
            Tag::Emphasis => Frame::new(FrameKind::Element(Component::Emphasis)),
            Tag::Strong => Frame::new(FrameKind::Element(Component::Strong)),
            Tag::Strikethrough => Frame::new(FrameKind::Element(Component::Strikethrough)),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut frame = Frame::new(FrameKind::Element(Component::Link));
                frame.attrs.insert("href".to_string(), dest_url.to_string());
                if !title.is_empty() {
                    frame.attrs.insert("title".to_string(), title.to_string());
                }
                frame
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut frame = Frame::new(FrameKind::Image);
                frame.attrs.insert("src".to_string(), dest_url.to_string());
                if !title.is_empty() {
                    frame.attrs.insert("title".to_string(), title.to_string());
                }
                frame
            }
            _ => Frame::new(FrameKind::Fragment),
        };
        self.stack.push(frame);
    }

    fn close(&mut self) {
        // The root frame is never closed by an End event.
        if self.stack.len() < 2 {
            return;
        }
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame.kind {
            FrameKind::Root => {}
            FrameKind::Fragment => {
                for child in frame.children {
                    self.append(child);
                }
            }
            FrameKind::Element(component) => {
                if component == Component::TableHead {
                    self.in_table_head = false;
                }
                self.append(Node::Element {
                    component,
                    attrs: frame.attrs,
                    children: frame.children,
                });
            }
            FrameKind::Heading { level, id } => {
                let title: String = frame.children.iter().map(Node::plain_text).collect();
                let title = title.trim().to_string();
                let id = match id {
                    Some(explicit) => self.slugger.claim(&explicit),
                    None => self.slugger.slug(&title),
                };
                self.headings.push(Heading {
                    level,
                    title,
                    id: id.clone(),
                });
                let mut attrs = frame.attrs;
                attrs.insert("id".to_string(), id);
                self.append(Node::Element {
                    component: Component::heading(level),
                    attrs,
                    children: frame.children,
                });
            }
            FrameKind::Image => {
                let alt: String = frame.children.iter().map(Node::plain_text).collect();
                let mut attrs = frame.attrs;
                attrs.insert("alt".to_string(), alt);
                self.append(Node::Element {
                    component: Component::Image,
                    attrs,
                    children: Vec::new(),
                });
            }
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(frame) = self.stack.last_mut() {
            frame.children.push(node);
        }
    }
}

// Text events inside these tags belong to the surrounding word run.
fn is_inline(tag: &Tag<'_>) -> bool {
    matches!(
        tag,
        Tag::Emphasis | Tag::Strong | Tag::Strikethrough | Tag::Link { .. }
    )
}

fn is_inline_end(tag: TagEnd) -> bool {
    matches!(
        tag,
        TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link
    )
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Nest a flat heading list: each heading owns the deeper headings that follow it.
fn nest_headings(headings: &[Heading]) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    let mut i = 0;
    while i < headings.len() {
        let head = &headings[i];
        let mut end = i + 1;
        while end < headings.len() && headings[end].level > head.level {
            end += 1;
        }
        entries.push(TocEntry {
            title: head.title.clone(),
            url: format!("#{}", head.id),
            items: nest_headings(&headings[i + 1..end]),
        });
        i = end;
    }
    entries
}

// ============================================================================
// Anchor slugs
// ============================================================================

/// GitHub-style anchor generator with per-document de-duplication.
#[derive(Debug, Default)]
pub struct Slugger {
    occurrences: HashMap<String, usize>,
}

impl Slugger {
    /// Slug `value`, suffixing `-N` if an earlier heading already took it.
    pub fn slug(&mut self, value: &str) -> String {
        self.claim(&anchor_slug(value))
    }

    /// Reserve an already-formed slug, suffixing `-N` on collision.
    pub fn claim(&mut self, original: &str) -> String {
        let mut result = original.to_string();
        while self.occurrences.contains_key(&result) {
            let count = self.occurrences.entry(original.to_string()).or_insert(0);
            *count += 1;
            result = format!("{original}-{count}");
        }
        self.occurrences.insert(result.clone(), 0);
        result
    }
}

/// Lowercase, keep letters/digits/`-`/`_`, spaces become dashes.
pub fn anchor_slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | ' '))
        .map(|c| if c == ' ' { '-' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_default(source: &str) -> Compiled {
        compile(source, CompileOptions::default())
    }

    fn find_component(nodes: &[Node], wanted: Component) -> Option<&Node> {
        for node in nodes {
            if let Node::Element {
                component,
                children,
                ..
            } = node
            {
                if *component == wanted {
                    return Some(node);
                }
                if let Some(found) = find_component(children, wanted) {
                    return Some(found);
                }
            }
        }
        None
    }

    fn attr<'a>(node: &'a Node, key: &str) -> Option<&'a str> {
        match node {
            Node::Element { attrs, .. } => attrs.get(key).map(String::as_str),
            _ => None,
        }
    }

    #[test]
    fn paragraph_with_inline_markup() {
        let compiled = compile_default("Hello **bold** and `code`.");
        assert_eq!(compiled.body.len(), 1);
        let p = &compiled.body[0];
        assert!(matches!(
            p,
            Node::Element {
                component: Component::Paragraph,
                ..
            }
        ));
        assert_eq!(p.plain_text(), "Hello bold and code.");
        assert!(find_component(&compiled.body, Component::Strong).is_some());
        assert!(find_component(&compiled.body, Component::InlineCode).is_some());
    }

    #[test]
    fn headings_get_anchor_ids() {
        let compiled = compile_default("## Why Rust?\n\ntext\n\n## Why Rust?\n");
        let ids: Vec<&str> = compiled
            .body
            .iter()
            .filter_map(|n| attr(n, "id"))
            .collect();
        assert_eq!(ids, vec!["why-rust", "why-rust-1"]);
    }

    #[test]
    fn explicit_heading_id_wins() {
        let compiled = compile_default("## Setup {#getting-started}\n");
        assert_eq!(attr(&compiled.body[0], "id"), Some("getting-started"));
        assert_eq!(compiled.toc[0].url, "#getting-started");
        assert_eq!(compiled.toc[0].title, "Setup");
    }

    #[test]
    fn toc_nests_by_level() {
        let source = "# Title\n\n## One\n\n### One A\n\n### One B\n\n## Two\n";
        let toc = compile_default(source).toc;
        assert_eq!(toc.len(), 1);
        assert_eq!(toc[0].title, "Title");
        let second: Vec<&str> = toc[0].items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(second, vec!["One", "Two"]);
        assert_eq!(toc[0].items[0].items.len(), 2);
        assert_eq!(toc[0].items[0].items[1].url, "#one-b");
    }

    #[test]
    fn toc_handles_skipped_levels_and_siblings() {
        let toc = compile_default("### Deep\n\n## Shallow\n\n#### Deeper\n").toc;
        let titles: Vec<&str> = toc.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Deep", "Shallow"]);
        assert_eq!(toc[1].items[0].title, "Deeper");
    }

    #[test]
    fn toc_respects_max_depth() {
        let options = CompileOptions {
            toc_max_depth: 2,
            ..CompileOptions::default()
        };
        let toc = compile("## Kept\n\n### Dropped\n", options).toc;
        assert_eq!(toc.len(), 1);
        assert!(toc[0].items.is_empty());
    }

    #[test]
    fn fenced_code_keeps_language() {
        let compiled = compile_default("```rust\nfn main() {}\n```\n");
        let code = find_component(&compiled.body, Component::CodeBlock).unwrap();
        assert_eq!(attr(code, "language"), Some("rust"));
        assert_eq!(code.plain_text(), "fn main() {}\n");
    }

    #[test]
    fn table_head_cells_are_headers() {
        let compiled = compile_default("| a | b |\n|---|---|\n| 1 | 2 |\n");
        let head = find_component(&compiled.body, Component::TableHead).unwrap();
        assert!(find_component(std::slice::from_ref(head), Component::TableHeader).is_some());
        let row = find_component(&compiled.body, Component::TableRow).unwrap();
        assert!(find_component(std::slice::from_ref(row), Component::TableCell).is_some());
        assert!(find_component(std::slice::from_ref(row), Component::TableHeader).is_none());
    }

    #[test]
    fn image_alt_from_children() {
        let compiled = compile_default("![A *quiet* lake](/static/lake.png)");
        let img = find_component(&compiled.body, Component::Image).unwrap();
        assert_eq!(attr(img, "src"), Some("/static/lake.png"));
        assert_eq!(attr(img, "alt"), Some("A quiet lake"));
    }

    #[test]
    fn raw_html_passes_through() {
        let compiled = compile_default("<Callout>Heads up</Callout>\n");
        assert!(
            compiled
                .body
                .iter()
                .any(|n| matches!(n, Node::Html { value } if value.contains("<Callout>")))
        );
    }

    #[test]
    fn word_count_and_reading_time() {
        let words = vec!["word"; 601].join(" ");
        let compiled = compile_default(&words);
        assert_eq!(compiled.word_count, 601);
        assert_eq!(compiled.reading_time, 3);
    }

    #[test]
    fn word_count_ignores_unmatched_markup_characters() {
        let compiled = compile_default("use snake_case_name and foo[bar] here");
        assert_eq!(compiled.word_count, 5);
    }

    #[test]
    fn word_count_splits_at_block_boundaries() {
        let compiled = compile_default("# Title\nfirst *line*\n\n- one\n- two\n\n`a b`\n");
        assert_eq!(compiled.word_count, 7);
    }

    #[test]
    fn reading_time_edges() {
        assert_eq!(reading_time(0, 300), 0);
        assert_eq!(reading_time(1, 300), 1);
        assert_eq!(reading_time(300, 300), 1);
        assert_eq!(reading_time(301, 300), 2);
    }

    #[test]
    fn anchor_slug_rules() {
        assert_eq!(anchor_slug("Hello, World!"), "hello-world");
        assert_eq!(anchor_slug("snake_case & kebab-case"), "snake_case--kebab-case");
        assert_eq!(anchor_slug("Café crème"), "café-crème");
    }
}
