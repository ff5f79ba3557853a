//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives in
//! the content root and is sparse: stock defaults are the base layer and the
//! user file only overrides what it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "soulpress"
//! url = "https://example.com"    # Overridden by the SITE_URL env var
//! description = ""
//! heading = "thoughts"
//! byline = ""
//! default_authors = []           # Author slugs for posts that name none
//!
//! [[site.social]]                # Repeatable, shown on the home page
//! label = "GitHub"
//! url = "https://github.com/example"
//!
//! [i18n]
//! locales = ["en"]
//! default_locale = "en"          # Served without a locale prefix
//!
//! [content]
//! words_per_minute = 300
//! toc_max_depth = 6
//! assets_dir = "assets"          # Copied verbatim to the output root
//!
//! [pagination]
//! per_page = 10
//!
//! [llms]
//! summary = ""                   # Blockquote under the title in llms.txt
//! process = ""                   # Optional "Process" section
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"
//! border = "#e0e0e0"
//! link = "#333333"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! link_hover = "#ffffff"
//!
//! [processing]
//! max_processes = 4              # Max parallel parse workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Environment variable that overrides `site.url` (deploy previews, CI).
pub const SITE_URL_ENV: &str = "SITE_URL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Identity of the site: name, canonical URL, home page copy.
    pub site: SiteInfo,
    /// Locales and the default (prefix-less) locale.
    pub i18n: I18nConfig,
    /// Content pipeline knobs.
    pub content: ContentConfig,
    /// Home page pagination.
    pub pagination: PaginationConfig,
    /// Copy for the `llms.txt` endpoint.
    pub llms: LlmsConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .i18n
            .locales
            .iter()
            .find(|l| l.is_empty() || l.contains('/'))
        {
            return Err(ConfigError::Validation(format!(
                "i18n.locales contains an invalid locale: {bad:?}"
            )));
        }
        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale {:?} is not listed in i18n.locales",
                self.i18n.default_locale
            )));
        }
        if !(self.site.url.starts_with("http://") || self.site.url.starts_with("https://")) {
            return Err(ConfigError::Validation(
                "site.url must start with http:// or https://".into(),
            ));
        }
        if self.pagination.per_page == 0 {
            return Err(ConfigError::Validation(
                "pagination.per_page must be non-zero".into(),
            ));
        }
        if self.content.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "content.words_per_minute must be non-zero".into(),
            ));
        }
        if !(1..=6).contains(&self.content.toc_max_depth) {
            return Err(ConfigError::Validation(
                "content.toc_max_depth must be 1-6".into(),
            ));
        }
        Ok(())
    }

    /// Replace `site.url` with an override (normally `$SITE_URL`) when set.
    ///
    /// Trailing slashes are dropped so paths can be appended directly.
    pub fn apply_site_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.filter(|u| !u.trim().is_empty()) {
            self.site.url = url.trim().to_string();
        }
        while self.site.url.ends_with('/') {
            self.site.url.pop();
        }
    }
}

/// Identity of the site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site name; also the publisher in structured data and the title suffix.
    pub name: String,
    /// Absolute base URL, no trailing slash.
    pub url: String,
    /// Default meta description.
    pub description: String,
    /// Home page heading.
    pub heading: String,
    /// Line under the home page heading.
    pub byline: String,
    /// Author slugs assigned to posts whose frontmatter lists none.
    pub default_authors: Vec<String>,
    /// Links shown on the home page.
    pub social: Vec<SocialLink>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            name: "soulpress".to_string(),
            url: "https://example.com".to_string(),
            description: String::new(),
            heading: "thoughts".to_string(),
            byline: String::new(),
            default_authors: Vec::new(),
            social: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// Locale settings. The default locale is served without a path prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    pub locales: Vec<String>,
    pub default_locale: String,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string()],
            default_locale: "en".to_string(),
        }
    }
}

/// Content pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContentConfig {
    /// Reading speed used for the reading-time estimate.
    pub words_per_minute: u32,
    /// Deepest heading level that appears in a table of contents.
    pub toc_max_depth: u8,
    /// Directory under the content root copied verbatim to the output root.
    pub assets_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 300,
            toc_max_depth: 6,
            assets_dir: "assets".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    pub per_page: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self { per_page: 10 }
    }
}

/// Copy for the `llms.txt` endpoint. Empty strings omit their block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LlmsConfig {
    pub summary: String,
    pub process: String,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel content parsing workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    pub light: ColorScheme,
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text: dates, bylines, captions.
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let mut config: SiteConfig = merged.try_into()?;
    config.apply_site_url_override(None);
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
///
/// Merges user values on top of stock defaults, applies `$SITE_URL`,
/// rejects unknown keys, and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    let mut config = resolve_config(base, overlay)?;
    config.apply_site_url_override(std::env::var(SITE_URL_ENV).ok());
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# soulpress configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
name = "soulpress"

# Absolute base URL used for canonical links, JSON-LD and llms.txt.
# The SITE_URL environment variable takes precedence.
url = "https://example.com"

description = ""

# Home page heading and the line under it.
heading = "thoughts"
byline = ""

# Author slugs (files under content/authors/) for posts that list none.
default_authors = []

# Links shown on the home page. Repeat the block for more.
# [[site.social]]
# label = "GitHub"
# url = "https://github.com/example"

# ---------------------------------------------------------------------------
# Locales
# ---------------------------------------------------------------------------
[i18n]
# Content lives under blog/<locale>/ and soul/<locale>/.
locales = ["en"]

# Served without a /<locale> prefix.
default_locale = "en"

# ---------------------------------------------------------------------------
# Content pipeline
# ---------------------------------------------------------------------------
[content]
# Reading speed for the "N min read" estimate.
words_per_minute = 300

# Deepest heading level (1-6) listed in a table of contents.
toc_max_depth = 6

# Copied verbatim to the output root (favicons, images, fonts).
assets_dir = "assets"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[pagination]
per_page = 10

# ---------------------------------------------------------------------------
# llms.txt
# ---------------------------------------------------------------------------
[llms]
# One-paragraph summary, rendered as a blockquote under the title.
summary = ""

# Optional "Process" section at the end.
process = ""

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Dates, bylines, captions
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel content parsing workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-fg: {light_text};
    --color-fg-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-fg: {dark_text};
        --color-fg-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}
