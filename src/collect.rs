//! Content collection.
//!
//! Stage 1 of the soulpress build pipeline. Walks the content root, validates
//! each file's frontmatter against its collection schema, compiles bodies,
//! and produces a [`Content`] record set that later stages consume.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Site configuration (optional)
//! ├── assets/                      # Copied verbatim to the output root
//! ├── locales/
//! │   └── es.json                  # Message overrides for one locale
//! ├── authors/
//! │   └── andoni.mdx               # Author (not localized)
//! ├── blog/
//! │   ├── en/
//! │   │   ├── hello-world.mdx      # Post, locale "en"
//! │   │   └── deep-dive/index.mdx  # Same as deep-dive.mdx
//! │   └── es/
//! │       └── hello-world.mdx
//! └── soul/
//!     └── en/
//!         └── mosca.mdx            # Soul document, locale "en"
//! ```
//!
//! Both `.mdx` and `.md` are read. Hidden files and directories are skipped.
//!
//! ## Validation
//!
//! The collector enforces these rules and fails the build if any is broken:
//! - Every file opens with a frontmatter block that satisfies its schema
//! - Posts and souls live under a locale directory
//! - Slugs are URL-safe and unique within a collection
//!
//! Schema problems across all files are gathered before failing, so one run
//! shows everything that needs fixing. Content in a locale that is not
//! configured, author references that do not resolve, and soul references
//! that do not resolve are logged as warnings.

use crate::config::{self, SiteConfig};
use crate::frontmatter::{split_frontmatter, strip_frontmatter};
use crate::markdown::{self, CompileOptions};
use crate::naming;
use crate::schema::{self, SchemaIssue};
use crate::types::{Author, Content, Post, Soul};
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid message catalog {path}: {source}")]
    Messages {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} content issue(s):\n{}", .0.len(), format_issues(.0))]
    Schema(Vec<SchemaIssue>),
    #[error("Duplicate slug {slug}: {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

fn format_issues(issues: &[SchemaIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

const CONTENT_EXTENSIONS: &[&str] = &["mdx", "md"];

/// A content file read from disk, not yet validated.
#[derive(Debug)]
struct SourceFile {
    /// Content-relative path with `/` separators.
    rel_path: String,
    slug: String,
    raw: String,
}

/// Collect every author, post and soul under `root`.
pub fn collect(root: &Path) -> Result<Content, CollectError> {
    let config = config::load_config(root)?;
    let messages = load_messages(root)?;
    let options = CompileOptions::from(&config.content);

    let mut issues = Vec::new();
    let author_files = read_collection(root, "authors", &mut issues)?;
    let post_files = read_collection(root, "blog", &mut issues)?;
    let soul_files = read_collection(root, "soul", &mut issues)?;

    let authors = gather(
        author_files.par_iter().map(build_author).collect(),
        &mut issues,
    );
    let posts = gather(
        post_files
            .par_iter()
            .map(|f| build_post(f, &config, options))
            .collect(),
        &mut issues,
    );
    let souls = gather(
        soul_files
            .par_iter()
            .map(|f| build_soul(f, options))
            .collect(),
        &mut issues,
    );

    if !issues.is_empty() {
        return Err(CollectError::Schema(issues));
    }

    check_unique(&author_files)?;
    check_unique(&post_files)?;
    check_unique(&soul_files)?;

    let content = Content {
        authors,
        posts,
        souls,
        messages,
        config,
    };
    warn_on_dangling(&content);
    Ok(content)
}

/// Read every content file of one collection, in path order.
fn read_collection(
    root: &Path,
    collection: &str,
    issues: &mut Vec<SchemaIssue>,
) -> Result<Vec<SourceFile>, CollectError> {
    let dir = root.join(collection);
    if !dir.is_dir() {
        debug!(collection, "collection directory missing, skipping");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(&dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || !is_content_file(entry.path()) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        let rel_path = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let Some(slug) = naming::slug_from_path(rel).filter(|s| naming::is_url_safe(s)) else {
            issues.push(SchemaIssue {
                path: rel_path,
                field: "path".to_string(),
                message: "file name must use only letters, digits, '-', '_', '.' or '~'"
                    .to_string(),
            });
            continue;
        };
        if naming::clashes_with_route(&slug) {
            issues.push(SchemaIssue {
                path: rel_path,
                field: "path".to_string(),
                message: "file name clashes with a reserved URL ('md', '*.md' or 'index.html')"
                    .to_string(),
            });
            continue;
        }
        let raw = fs::read_to_string(entry.path())?;
        files.push(SourceFile {
            rel_path,
            slug,
            raw,
        });
    }
    debug!(collection, count = files.len(), "read collection");
    Ok(files)
}

fn is_content_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| CONTENT_EXTENSIONS.contains(&ext.as_str()))
}

/// Split results into records and issues. Records come back in slug order.
fn gather<T: Slugged>(
    results: Vec<Result<T, Vec<SchemaIssue>>>,
    issues: &mut Vec<SchemaIssue>,
) -> Vec<T> {
    let mut records = Vec::new();
    for result in results {
        match result {
            Ok(record) => records.push(record),
            Err(mut found) => issues.append(&mut found),
        }
    }
    records.sort_by(|a, b| a.slug().cmp(b.slug()));
    records
}

trait Slugged {
    fn slug(&self) -> &str;
}

impl Slugged for Author {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for Post {
    fn slug(&self) -> &str {
        &self.slug
    }
}

impl Slugged for Soul {
    fn slug(&self) -> &str {
        &self.slug
    }
}

/// Frontmatter and body of a file, or an issue when the block is missing.
fn split(file: &SourceFile) -> Result<(&str, &str), Vec<SchemaIssue>> {
    split_frontmatter(&file.raw).ok_or_else(|| {
        vec![SchemaIssue {
            path: file.rel_path.clone(),
            field: "frontmatter".to_string(),
            message: "missing leading '---' frontmatter block".to_string(),
        }]
    })
}

fn localized(file: &SourceFile) -> Result<naming::LocalizedSlug, Vec<SchemaIssue>> {
    naming::split_localized(&file.slug).ok_or_else(|| {
        vec![SchemaIssue {
            path: file.rel_path.clone(),
            field: "path".to_string(),
            message: "expected <collection>/<locale>/<name>".to_string(),
        }]
    })
}

fn build_author(file: &SourceFile) -> Result<Author, Vec<SchemaIssue>> {
    let (yaml, body) = split(file)?;
    let meta = schema::author_meta(yaml, &file.rel_path)?;
    let compiled = markdown::compile(body, CompileOptions::default());
    Ok(Author {
        slug: file.slug.clone(),
        name: meta.name,
        twitter: meta.twitter,
        slug_as_params: naming::slug_as_params(&file.slug),
        body: compiled.body,
    })
}

fn build_post(
    file: &SourceFile,
    config: &SiteConfig,
    options: CompileOptions,
) -> Result<Post, Vec<SchemaIssue>> {
    let (yaml, body) = split(file)?;
    let location = localized(file);
    let meta = schema::post_meta(yaml, &file.rel_path, &config.site.default_authors);
    let (location, meta) = combine(location, meta)?;

    let compiled = markdown::compile(body, options);
    Ok(Post {
        slug: file.slug.clone(),
        title: meta.title,
        date: meta.date,
        updated: meta.updated,
        description: meta.description,
        image: meta.image,
        published: meta.published,
        soul: meta.soul,
        authors: meta.authors,
        permalink: format!("/blog/{}", location.slug_as_params),
        locale: location.locale,
        slug_as_params: location.slug_as_params,
        reading_time: compiled.reading_time,
        word_count: compiled.word_count,
        toc: compiled.toc,
        body: compiled.body,
        markdown: strip_frontmatter(&file.raw).to_string(),
        source_path: file.rel_path.clone(),
    })
}

fn build_soul(file: &SourceFile, options: CompileOptions) -> Result<Soul, Vec<SchemaIssue>> {
    let (yaml, body) = split(file)?;
    let (location, meta) = combine(localized(file), schema::soul_meta(yaml, &file.rel_path))?;

    let compiled = markdown::compile(body, options);
    Ok(Soul {
        slug: file.slug.clone(),
        name: meta.name,
        alias: meta.alias,
        version: meta.version,
        last_reflection: meta.last_reflection,
        published: meta.published,
        brief: meta.brief,
        model: meta.model,
        toc: compiled.toc,
        body: compiled.body,
        locale: location.locale,
        slug_as_params: location.slug_as_params,
    })
}

/// Join two fallible results, keeping the issues of both.
fn combine<A, B>(
    a: Result<A, Vec<SchemaIssue>>,
    b: Result<B, Vec<SchemaIssue>>,
) -> Result<(A, B), Vec<SchemaIssue>> {
    match (a, b) {
        (Ok(a), Ok(b)) => Ok((a, b)),
        (Err(mut x), Err(mut y)) => {
            x.append(&mut y);
            Err(x)
        }
        (Err(x), _) | (_, Err(x)) => Err(x),
    }
}

fn check_unique(files: &[SourceFile]) -> Result<(), CollectError> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for file in files {
        if let Some(first) = seen.insert(&file.slug, &file.rel_path) {
            return Err(CollectError::DuplicateSlug {
                slug: file.slug.clone(),
                first: first.to_string(),
                second: file.rel_path.clone(),
            });
        }
    }
    Ok(())
}

fn warn_on_dangling(content: &Content) {
    let locales = &content.config.i18n.locales;
    for post in &content.posts {
        if !locales.contains(&post.locale) {
            warn!(path = %post.source_path, locale = %post.locale, "post locale is not configured; it will not be generated");
        }
        for author in &post.authors {
            if !content.authors.iter().any(|a| &a.slug_as_params == author) {
                warn!(path = %post.source_path, author = %author, "unknown author");
            }
        }
        if let Some(soul) = &post.soul
            && !content
                .souls
                .iter()
                .any(|s| &s.slug_as_params == soul && s.locale == post.locale)
        {
            warn!(path = %post.source_path, soul = %soul, "soul not found in post locale");
        }
    }
    for soul in &content.souls {
        if !locales.contains(&soul.locale) {
            warn!(slug = %soul.slug, locale = %soul.locale, "soul locale is not configured; it will not be generated");
        }
    }
}

/// Load `locales/*.json` message overrides, keyed by file stem.
fn load_messages(root: &Path) -> Result<BTreeMap<String, BTreeMap<String, String>>, CollectError> {
    let dir = root.join("locales");
    let mut messages = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(messages);
    }
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|e| e == "json"))
        .collect();
    paths.sort();

    for path in paths {
        let Some(locale) = path.file_stem().map(|s| s.to_string_lossy().to_string()) else {
            continue;
        };
        let raw = fs::read_to_string(&path)?;
        let catalog: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| CollectError::Messages {
                path: path.clone(),
                source,
            })?;
        messages.insert(locale, catalog);
    }
    Ok(messages)
}
