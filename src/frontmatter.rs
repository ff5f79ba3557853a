//! Frontmatter splitting.
//!
//! A content file may open with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2024-01-15
//! ---
//!
//! Body starts here.
//! ```
//!
//! The fence must be the very first line. Both `\n` and `\r\n` line endings
//! are accepted. The closing fence may be the last line of the file.

use regex::Regex;
use std::sync::LazyLock;

static FRONTMATTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\A---\r?\n(?s:(.*?))\r?\n---(?:\r?\n|\z)").expect("frontmatter pattern is valid")
});

/// Split a raw file into its YAML frontmatter and the body that follows.
///
/// Returns `None` when the file does not open with a fenced block.
pub fn split_frontmatter(raw: &str) -> Option<(&str, &str)> {
    let caps = FRONTMATTER.captures(raw)?;
    let whole = caps.get(0)?;
    let yaml = caps.get(1).map_or("", |m| m.as_str());
    Some((yaml, &raw[whole.end()..]))
}

/// Return the body of a raw file with any leading frontmatter removed, trimmed.
///
/// A file without frontmatter comes back whole, trimmed.
pub fn strip_frontmatter(raw: &str) -> &str {
    match split_frontmatter(raw) {
        Some((_, body)) => body.trim(),
        None => raw.trim(),
    }
}
