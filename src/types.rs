//! Shared types used across pipeline stages.
//!
//! The collect stage produces these records and serializes them to
//! `content.json`; the generate stage and the preview server read them
//! back. Records are immutable once collected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the collect stage produced, plus the config it ran with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Content {
    pub authors: Vec<Author>,
    pub posts: Vec<Post>,
    pub souls: Vec<Soul>,
    /// Per-locale message overrides from `locales/{locale}.json`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub messages: BTreeMap<String, BTreeMap<String, String>>,
    pub config: crate::config::SiteConfig,
}

/// A blog post from `blog/{locale}/{name}.mdx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Path-like slug, e.g. `blog/en/hello-world`.
    pub slug: String,
    pub title: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub published: bool,
    /// `slug_as_params` of the soul document this post was written with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soul: Option<String>,
    /// Author slugs (`slug_as_params` of records under `authors/`).
    pub authors: Vec<String>,
    pub locale: String,
    pub slug_as_params: String,
    /// Locale-less path, `/blog/{slug_as_params}`.
    pub permalink: String,
    /// Estimated minutes to read.
    pub reading_time: u32,
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    pub body: Vec<Node>,
    /// Source body with frontmatter stripped, served as plain text.
    pub markdown: String,
    /// Source file relative to the content root.
    pub source_path: String,
}

/// A person credited on posts, from `authors/{name}.mdx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    pub slug_as_params: String,
    pub body: Vec<Node>,
}

/// A versioned persona document from `soul/{locale}/{name}.mdx`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soul {
    pub slug: String,
    pub name: String,
    /// Short handle shown on soul cards.
    pub alias: String,
    pub version: String,
    pub last_reflection: DateTime<Utc>,
    pub published: bool,
    pub brief: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub toc: Vec<TocEntry>,
    pub body: Vec<Node>,
    pub locale: String,
    pub slug_as_params: String,
}

/// One heading in a table of contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TocEntry {
    pub title: String,
    /// Fragment link, `#anchor`.
    pub url: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<TocEntry>,
}

/// A node of a compiled body.
///
/// Bodies are compiled once at collect time; rendering walks this tree and
/// resolves each [`Component`] against the fixed registry in
/// [`render`](crate::render).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Element {
        component: Component,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        attrs: BTreeMap<String, String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        children: Vec<Node>,
    },
    Text {
        value: String,
    },
    /// Author-written HTML, emitted verbatim.
    Html {
        value: String,
    },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn element(component: Component, children: Vec<Node>) -> Self {
        Node::Element {
            component,
            attrs: BTreeMap::new(),
            children,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain_text(&mut out);
        out
    }

    fn push_plain_text(&self, out: &mut String) {
        match self {
            Node::Text { value } => out.push_str(value),
            Node::Html { .. } => {}
            Node::Element {
                component: Component::LineBreak,
                ..
            } => out.push(' '),
            Node::Element { children, .. } => {
                for child in children {
                    child.push_plain_text(out);
                }
            }
        }
    }
}

/// The closed set of elements a compiled body may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Paragraph,
    Link,
    UnorderedList,
    OrderedList,
    ListItem,
    /// Fenced or indented code block; `language` attr when known.
    CodeBlock,
    InlineCode,
    Blockquote,
    Rule,
    Image,
    Table,
    TableHead,
    TableRow,
    TableHeader,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    LineBreak,
}

impl Component {
    pub fn heading(level: u8) -> Self {
        match level {
            1 => Component::H1,
            2 => Component::H2,
            3 => Component::H3,
            4 => Component::H4,
            5 => Component::H5,
            _ => Component::H6,
        }
    }

    pub fn heading_level(self) -> Option<u8> {
        match self {
            Component::H1 => Some(1),
            Component::H2 => Some(2),
            Component::H3 => Some(3),
            Component::H4 => Some(4),
            Component::H5 => Some(5),
            Component::H6 => Some(6),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_flattens_children() {
        let node = Node::element(
            Component::Paragraph,
            vec![
                Node::text("Hello "),
                Node::element(Component::Strong, vec![Node::text("world")]),
                Node::Html {
                    value: "<br>".to_string(),
                },
            ],
        );
        assert_eq!(node.plain_text(), "Hello world");
    }

    #[test]
    fn node_serializes_with_type_tag() {
        let node = Node::element(Component::H2, vec![Node::text("Intro")]);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["component"], "h2");
        assert_eq!(json["children"][0]["value"], "Intro");
        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(Component::heading(3), Component::H3);
        assert_eq!(Component::H3.heading_level(), Some(3));
        assert_eq!(Component::Paragraph.heading_level(), None);
    }
}
