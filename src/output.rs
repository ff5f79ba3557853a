//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every record (post, soul, author) is its semantic identity, title and
//! positional index, with filesystem paths shown as secondary context via
//! indented `Source:` lines. The output reads as a content inventory while
//! still letting users trace records back to specific files.
//!
//! # Output Format
//!
//! ## Collect
//!
//! ```text
//! Posts
//!     en
//!         001 Building with a soul (4 min read)
//!             Source: blog/en/building-with-a-soul.mdx
//!             Soul: mosca
//!         002 Notes on drafts (draft)
//!             Source: blog/en/notes-on-drafts.mdx
//!
//! Souls
//!     en
//!         001 Mosca v1.2
//!             Source: soul/en/mosca
//!
//! Authors
//!     001 Andoni
//!         Source: authors/andoni
//!
//! Config
//!     config.toml
//!     assets/
//!     locales/es.json
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home
//!     001 index.html
//!     002 es/index.html
//! Posts
//!     001 blog/building-with-a-soul/index.html
//! ...
//! Generated 14 files (3 posts, 1 soul), copied 1 asset
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O beyond checking which config files exist.

use crate::generate::GenerateReport;
use crate::types::{Content, Post, Soul};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// ```text
/// 001 Building with a soul (4 min read)
/// 001 Andoni
/// ```
fn entity_header(index: usize, title: &str, detail: Option<&str>) -> String {
    match detail {
        Some(d) => format!("{} {} ({})", format_index(index), title, d),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Plural-aware count: `1 post`, `3 posts`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

fn post_detail(post: &Post) -> String {
    if post.published {
        format!("{} min read", post.reading_time)
    } else {
        "draft".to_string()
    }
}

fn soul_title(soul: &Soul) -> String {
    format!("{} v{}", soul.name, soul.version)
}

/// Locales to list: configured ones first, then any others records use.
fn locales_in_use<'a>(content: &'a Content) -> Vec<&'a str> {
    let mut locales: Vec<&str> = content.config.i18n.locales.iter().map(String::as_str).collect();
    let used = content
        .posts
        .iter()
        .map(|p| p.locale.as_str())
        .chain(content.souls.iter().map(|s| s.locale.as_str()));
    for locale in used {
        if !locales.contains(&locale) {
            locales.push(locale);
        }
    }
    locales
}

// ============================================================================
// Stage 1: Collect output
// ============================================================================

/// Format collect stage output: every record grouped by kind and locale.
pub fn format_collect_output(content: &Content, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let locales = locales_in_use(content);

    lines.push("Posts".to_string());
    for locale in &locales {
        let posts: Vec<&Post> = content.posts.iter().filter(|p| p.locale == *locale).collect();
        if posts.is_empty() {
            continue;
        }
        lines.push(format!("{}{}", indent(1), locale));
        for (i, post) in posts.iter().enumerate() {
            let detail = post_detail(post);
            lines.push(format!(
                "{}{}",
                indent(2),
                entity_header(i + 1, &post.title, Some(detail.as_str()))
            ));
            lines.push(format!("{}Source: {}", indent(3), post.source_path));
            let desc = truncate_desc(post.description.trim(), 60);
            if !desc.is_empty() {
                lines.push(format!("{}{}", indent(3), desc));
            }
            if let Some(soul) = &post.soul {
                lines.push(format!("{}Soul: {}", indent(3), soul));
            }
        }
    }

    if !content.souls.is_empty() {
        lines.push(String::new());
        lines.push("Souls".to_string());
        for locale in &locales {
            let souls: Vec<&Soul> = content.souls.iter().filter(|s| s.locale == *locale).collect();
            if souls.is_empty() {
                continue;
            }
            lines.push(format!("{}{}", indent(1), locale));
            for (i, soul) in souls.iter().enumerate() {
                let detail = (!soul.published).then_some("draft");
                lines.push(format!(
                    "{}{}",
                    indent(2),
                    entity_header(i + 1, &soul_title(soul), detail)
                ));
                lines.push(format!("{}Source: {}", indent(3), soul.slug));
            }
        }
    }

    if !content.authors.is_empty() {
        lines.push(String::new());
        lines.push("Authors".to_string());
        for (i, author) in content.authors.iter().enumerate() {
            lines.push(format!("{}{}", indent(1), entity_header(i + 1, &author.name, None)));
            lines.push(format!("{}Source: {}", indent(2), author.slug));
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    }
    let assets_dir = &content.config.content.assets_dir;
    if source_root.join(assets_dir).is_dir() {
        lines.push(format!("{}{}/", indent(1), assets_dir));
    }
    for locale in content.messages.keys() {
        lines.push(format!("{}locales/{}.json", indent(1), locale));
    }

    lines
}

/// Print collect output to stdout.
pub fn print_collect_output(content: &Content, source_root: &Path) {
    for line in format_collect_output(content, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Section headings for route kinds, in display order.
const SECTIONS: &[(&str, &str)] = &[
    ("home", "Home"),
    ("post", "Posts"),
    ("markdown", "Markdown views"),
    ("text", "Plain text"),
    ("soul", "Souls"),
    ("not-found", "Not found"),
    ("llms", "llms.txt"),
    ("stylesheet", "Stylesheet"),
];

/// Format generate stage output: written files grouped by route kind,
/// followed by a one-line summary.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();

    for (kind, heading) in SECTIONS {
        let files: Vec<_> = report.files.iter().filter(|f| f.kind == *kind).collect();
        if files.is_empty() {
            continue;
        }
        lines.push(heading.to_string());
        for (i, file) in files.iter().enumerate() {
            lines.push(format!(
                "{}{} {}",
                indent(1),
                format_index(i + 1),
                file.path.display()
            ));
        }
    }

    lines.push(format!(
        "Generated {} ({}, {}), copied {}",
        count(report.files.len(), "file"),
        count(report.count("post"), "post"),
        count(report.count("soul"), "soul"),
        count(report.assets, "asset"),
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the `check` summary: record counts and how many files a build
/// would write.
pub fn format_check_output(content: &Content, planned_files: usize) -> Vec<String> {
    let published = content.posts.iter().filter(|p| p.published).count();
    let drafts = content.posts.len() - published;
    vec![
        format!(
            "{} ({} published, {} draft)",
            count(content.posts.len(), "post"),
            published,
            drafts
        ),
        count(content.souls.len(), "soul"),
        count(content.authors.len(), "author"),
        format!("Content OK, build would write {}", count(planned_files, "file")),
    ]
}

/// Print check output to stdout.
pub fn print_check_output(content: &Content, planned_files: usize) {
    for line in format_check_output(content, planned_files) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
