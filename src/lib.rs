//! # Soulpress
//!
//! A localized personal blog built from a directory of MDX files. Posts,
//! authors and "soul" documents (versioned persona descriptions a post can
//! credit) are plain files with YAML frontmatter; the site is plain HTML with
//! SEO metadata, JSON-LD, a table of contents per post, and an `llms.txt`
//! index that links each post's Markdown source.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Collect   content/      →  content.json   (files → validated records)
//! 2. Generate  content.json  →  dist/          (records → HTML + text)
//! ```
//!
//! `serve` skips the intermediate file: it collects once and answers every
//! request through the same route table `generate` writes from, so the
//! preview and the static output cannot drift apart.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`collect`] | Stage 1: walks `authors/`, `blog/`, `soul/`, validates frontmatter, compiles bodies |
//! | [`generate`] | Stage 2: writes every static route under the output directory |
//! | [`serve`] | Preview server on `tiny_http`, same routes as the static build |
//! | [`config`] | `config.toml` loading, validation, merging, and color CSS |
//! | [`types`] | Records shared between stages (`Post`, `Author`, `Soul`, `Node`) |
//! | [`frontmatter`] | Splitting the YAML block off a source file |
//! | [`schema`] | Per-collection frontmatter validation with aggregated issues |
//! | [`markdown`] | Markdown to component tree, heading ids, TOC, reading time |
//! | [`naming`] | File path to slug, locale and URL-safe slug checks |
//! | [`query`] | Filtering and lookup over collected records |
//! | [`i18n`] | Locale prefixes, localized paths, message catalogs, date display |
//! | [`seo`] | Per-page metadata and the `<head>` tags built from it |
//! | [`structured_data`] | JSON-LD for the site, the person behind it, and articles |
//! | [`render`] | Component registry: compiled body and TOC to HTML |
//! | [`pages`] | Routes, page templates, `llms.txt`, and HTTP-shaped responses |
//! | [`output`] | CLI output formatting for pipeline results |
//! | [`logging`] | `tracing` subscriber setup for diagnostics on stderr |
//!
//! # Design Decisions
//!
//! ## Compile Once, Render Many
//!
//! Bodies are compiled to a [`types::Node`] tree at collect time and stored in
//! `content.json`. Rendering is a pure walk over that tree, so the generate
//! stage needs no Markdown parser and a body's HTML is the same in every
//! place it appears.
//!
//! ## Maud for Templates
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Malformed markup
//! is a build error and every interpolation is escaped; the only unescaped
//! output is raw HTML an author wrote into a body.
//!
//! ## Validation Fails the Build
//!
//! Any frontmatter problem in any file stops the collect stage, and every
//! problem found is reported at once. References that merely dangle (a post
//! naming an author or soul that does not exist) are logged as warnings and
//! dropped from the rendered page.

pub mod collect;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod i18n;
pub mod logging;
pub mod markdown;
pub mod naming;
pub mod output;
pub mod pages;
pub mod query;
pub mod render;
pub mod schema;
pub mod seo;
pub mod serve;
pub mod structured_data;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
