//! Slug derivation from content paths.
//!
//! Every record's slug is its path relative to the content root, with the
//! extension removed and `/` as the separator:
//!
//! - `blog/en/hello-world.mdx` → `blog/en/hello-world`
//! - `blog/en/hello-world/index.mdx` → `blog/en/hello-world`
//! - `authors/andoni.mdx` → `authors/andoni`
//!
//! ## Positional Segments
//!
//! Localized collections (posts, souls) read the locale from the second
//! segment and use everything after it as the URL parameter:
//!
//! ```text
//! blog / en / deep/dive
//!  ^     ^    ^^^^^^^^^
//!  |     |    slug_as_params
//!  |     locale
//!  collection
//! ```
//!
//! Authors are not localized: their parameter is everything after the
//! collection segment.

use std::path::{Component, Path};

/// Locale and URL parameter parsed from a localized slug.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalizedSlug {
    pub locale: String,
    pub slug_as_params: String,
}

/// Build a slug from a content-relative path.
///
/// Returns `None` for paths that cannot produce a slug (non-UTF-8
/// components, parent-directory references, or an empty result).
pub fn slug_from_path(rel: &Path) -> Option<String> {
    let stem_path = rel.with_extension("");
    let mut segments = Vec::new();
    for component in stem_path.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_str()?.to_string()),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if segments.len() > 1 && segments.last().is_some_and(|s| s == "index") {
        segments.pop();
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Split `collection/locale/rest…` into locale and parameter.
///
/// Returns `None` when the slug has no segment after the locale.
pub fn split_localized(slug: &str) -> Option<LocalizedSlug> {
    let parts: Vec<&str> = slug.split('/').collect();
    if parts.len() < 3 {
        return None;
    }
    Some(LocalizedSlug {
        locale: parts[1].to_string(),
        slug_as_params: parts[2..].join("/"),
    })
}

/// Everything after the collection segment (`authors/andoni` → `andoni`).
pub fn slug_as_params(slug: &str) -> String {
    slug.split('/').skip(1).collect::<Vec<_>>().join("/")
}

/// Whether every segment of a slug is safe to use verbatim in a URL path.
///
/// Allowed: ASCII letters, digits, `-`, `_`, `.`, `~`. Segments must be
/// non-empty and may not be `.` or `..`.
pub fn is_url_safe(slug: &str) -> bool {
    slug.split('/').all(|segment| {
        !segment.is_empty()
            && segment != "."
            && segment != ".."
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~'))
    })
}

/// Whether a full slug (`blog/en/notes.md`) would be read back as a
/// different URL than the page it names.
///
/// Posts own `/blog/<slug>/md` and `/blog/<slug>.md`, so a post's last
/// segment may not be `md` or end in `.md`. No collection may end in
/// `index.html`, which the router strips.
pub fn clashes_with_route(slug: &str) -> bool {
    let mut segments = slug.split('/');
    let collection = segments.next().unwrap_or_default();
    let last = segments.next_back().unwrap_or_default();
    if last == "index.html" {
        return true;
    }
    collection == "blog" && (last == "md" || last.ends_with(".md"))
}
