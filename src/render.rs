//! Component registry: compiled bodies to HTML.
//!
//! Every [`Component`] has exactly one rendering here. Attributes a body may
//! carry are limited to what the compiler puts there (`id`, `href`, `title`,
//! `src`, `alt`, `language`, `start`); anything else is ignored.
//!
//! Author-written raw HTML is emitted verbatim.

use crate::types::{Component, Node, TocEntry};
use maud::{Markup, PreEscaped, html};
use std::collections::BTreeMap;

/// Default intrinsic size for body images.
pub const IMAGE_WIDTH: u32 = 620;
pub const IMAGE_HEIGHT: u32 = 310;

/// Render a compiled body.
pub fn render_body(nodes: &[Node]) -> Markup {
    html! {
        @for node in nodes {
            (render_node(node))
        }
    }
}

fn render_node(node: &Node) -> Markup {
    match node {
        Node::Text { value } => html! { (value) },
        Node::Html { value } => PreEscaped(value.clone()),
        Node::Element {
            component,
            attrs,
            children,
        } => render_element(*component, attrs, children),
    }
}

fn render_element(component: Component, attrs: &BTreeMap<String, String>, children: &[Node]) -> Markup {
    let attr = |key: &str| attrs.get(key).map(String::as_str);
    let inner = render_body(children);

    if let Some(level) = component.heading_level() {
        return render_heading(level, attr("id"), inner);
    }

    match component {
        Component::Paragraph => html! { p { (inner) } },
        Component::Link => render_link(attr("href").unwrap_or("#"), attr("title"), inner),
        Component::UnorderedList => html! { ul { (inner) } },
        Component::OrderedList => html! { ol start=[attr("start")] { (inner) } },
        Component::ListItem => html! { li { (inner) } },
        Component::CodeBlock => {
            let class = attr("language").map(|lang| format!("language-{lang}"));
            html! { pre { code class=[class] { (inner) } } }
        }
        Component::InlineCode => html! { code.inline-code { (inner) } },
        Component::Blockquote => html! { blockquote { (inner) } },
        Component::Rule => html! { hr; },
        Component::Image => html! {
            img src=(attr("src").unwrap_or_default())
                alt=(attr("alt").unwrap_or_default())
                title=[attr("title")]
                width=(IMAGE_WIDTH)
                height=(IMAGE_HEIGHT)
                loading="lazy";
        },
        Component::Table => render_table(children),
        Component::TableHead => html! { thead { tr { (inner) } } },
        Component::TableRow => html! { tr { (inner) } },
        Component::TableHeader => html! { th { (inner) } },
        Component::TableCell => html! { td { (inner) } },
        Component::Emphasis => html! { em { (inner) } },
        Component::Strong => html! { strong { (inner) } },
        Component::Strikethrough => html! { del { (inner) } },
        Component::LineBreak => html! { br; },
        Component::H1
        | Component::H2
        | Component::H3
        | Component::H4
        | Component::H5
        | Component::H6 => inner,
    }
}

fn render_heading(level: u8, id: Option<&str>, inner: Markup) -> Markup {
    let anchor = html! {
        @if let Some(id) = id {
            a.subheading-anchor href={ "#" (id) } aria-label="Link to section" { "#" }
        }
    };
    match level {
        1 => html! { h1 id=[id] { (anchor) (inner) } },
        2 => html! { h2 id=[id] { (anchor) (inner) } },
        3 => html! { h3 id=[id] { (anchor) (inner) } },
        4 => html! { h4 id=[id] { (anchor) (inner) } },
        5 => html! { h5 id=[id] { (anchor) (inner) } },
        _ => html! { h6 id=[id] { (anchor) (inner) } },
    }
}

/// External links (`http…`) open in a new tab without an opener.
fn render_link(href: &str, title: Option<&str>, inner: Markup) -> Markup {
    if href.starts_with("http") {
        html! {
            a href=(href) title=[title] target="_blank" rel="noopener noreferrer" { (inner) }
        }
    } else {
        html! { a href=(href) title=[title] { (inner) } }
    }
}

/// Tables scroll horizontally inside a wrapper; body rows are grouped in `tbody`.
fn render_table(children: &[Node]) -> Markup {
    let (head, rows): (Vec<&Node>, Vec<&Node>) = children.iter().partition(|n| {
        matches!(
            n,
            Node::Element {
                component: Component::TableHead,
                ..
            }
        )
    });
    html! {
        div.table-scroll {
            table {
                @for node in head {
                    (render_node(node))
                }
                @if !rows.is_empty() {
                    tbody {
                        @for node in rows {
                            (render_node(node))
                        }
                    }
                }
            }
        }
    }
}

/// Render a nested table of contents; nothing for an empty list.
pub fn render_toc(entries: &[TocEntry], heading: &str) -> Markup {
    html! {
        @if !entries.is_empty() {
            nav.toc aria-label=(heading) {
                p.toc-heading { (heading) }
                (render_toc_items(entries, 0))
            }
        }
    }
}

fn render_toc_items(entries: &[TocEntry], depth: usize) -> Markup {
    html! {
        ul.toc-list.nested[depth > 0] {
            @for entry in entries {
                li {
                    a href=(entry.url) { (entry.title) }
                    @if !entry.items.is_empty() {
                        (render_toc_items(&entry.items, depth + 1))
                    }
                }
            }
        }
    }
}
