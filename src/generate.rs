//! Static site generation.
//!
//! Stage 2 of the soulpress build pipeline. Reads the `content.json` written
//! by the collect stage, renders every static route through
//! [`pages`](crate::pages), and writes the results under the output root.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Home, default locale
//! ├── page/2/index.html          # Further home pages
//! ├── 404.html
//! ├── llms.txt
//! ├── style.css
//! ├── blog/
//! │   ├── hello-world/
//! │   │   ├── index.html         # Post page
//! │   │   └── md/index.html      # Markdown source view
//! │   └── hello-world.md         # Markdown source, plain text
//! ├── soul/
//! │   └── mosca/index.html
//! ├── es/                        # Other locales, same layout
//! │   └── ...
//! └── favicon.ico                # From content/assets/
//! ```
//!
//! Only published records in configured locales are written.

use crate::pages::{self, Route};
use crate::types::Content;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One file the build wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct WrittenFile {
    /// Route label (`post`, `soul`, …).
    pub kind: &'static str,
    /// Path relative to the output root.
    pub path: PathBuf,
}

/// Summary of a generate run, for CLI output.
#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub files: Vec<WrittenFile>,
    /// Files copied from the assets directory.
    pub assets: usize,
}

impl GenerateReport {
    pub fn count(&self, kind: &str) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }
}

/// Read the collect stage's `content.json`.
pub fn load_content(content_path: &Path) -> Result<Content, GenerateError> {
    let raw = fs::read_to_string(content_path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Generate the site from a `content.json` file.
pub fn generate(
    content_path: &Path,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let content = load_content(content_path)?;
    write_site(&content, source_dir, output_dir)
}

/// Render every static route of `content` into `output_dir`.
pub fn write_site(
    content: &Content,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    let i18n = &content.config.i18n;
    fs::create_dir_all(output_dir)?;

    let mut report = GenerateReport::default();
    for route in pages::static_routes(content) {
        let Some(rel) = route.output_file(i18n) else {
            continue;
        };
        let response = pages::respond(content, &route);
        let dest = output_dir.join(&rel);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, response.body)?;
        debug!(path = %rel.display(), status = response.status, "wrote page");
        report.files.push(WrittenFile {
            kind: route.kind(),
            path: rel,
        });
    }

    let assets_dir = source_dir.join(&content.config.content.assets_dir);
    if assets_dir.is_dir() {
        report.assets = copy_dir_recursive(&assets_dir, output_dir)?;
    }

    Ok(report)
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<usize> {
    let mut copied = 0;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copied += copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Route label paired with its output path, for routes that write files.
pub fn planned_files(content: &Content) -> Vec<(Route, PathBuf)> {
    pages::static_routes(content)
        .into_iter()
        .filter_map(|r| r.output_file(&content.config.i18n).map(|p| (r, p)))
        .collect()
}
