//! Shared test utilities for the soulpress test suite.
//!
//! Lookups panic with the list of what is available, so a renamed fixture
//! shows up as a readable failure instead of an `unwrap` on `None`.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let content = collect(tmp.path()).unwrap();
//! let post = find_post(&content, "building-with-a-soul");
//! assert_eq!(post.soul.as_deref(), Some("mosca"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Author, Content, Post, Soul};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write `contents` to `rel` under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

// =========================================================================
// Content lookups: panic with a clear message on miss
// =========================================================================

/// Find a post by `slug_as_params` in the default locale. Panics if not found.
pub fn find_post<'a>(content: &'a Content, slug_as_params: &str) -> &'a Post {
    let locale = &content.config.i18n.default_locale;
    content
        .posts
        .iter()
        .find(|p| p.slug_as_params == slug_as_params && &p.locale == locale)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = content.posts.iter().map(|p| p.slug.as_str()).collect();
            panic!("post '{slug_as_params}' not found in '{locale}'. Available: {slugs:?}")
        })
}

/// Find an author by `slug_as_params`. Panics if not found.
pub fn find_author<'a>(content: &'a Content, slug_as_params: &str) -> &'a Author {
    content
        .authors
        .iter()
        .find(|a| a.slug_as_params == slug_as_params)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = content
                .authors
                .iter()
                .map(|a| a.slug_as_params.as_str())
                .collect();
            panic!("author '{slug_as_params}' not found. Available: {slugs:?}")
        })
}

/// Find a soul by `slug_as_params` in the default locale. Panics if not found.
pub fn find_soul<'a>(content: &'a Content, slug_as_params: &str) -> &'a Soul {
    let locale = &content.config.i18n.default_locale;
    content
        .souls
        .iter()
        .find(|s| s.slug_as_params == slug_as_params && &s.locale == locale)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = content.souls.iter().map(|s| s.slug.as_str()).collect();
            panic!("soul '{slug_as_params}' not found in '{locale}'. Available: {slugs:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// Titles of a locale's posts, in collected order.
pub fn post_titles<'a>(content: &'a Content, locale: &str) -> Vec<&'a str> {
    content
        .posts
        .iter()
        .filter(|p| p.locale == locale)
        .map(|p| p.title.as_str())
        .collect()
}
