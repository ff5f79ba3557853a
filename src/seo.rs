//! Page metadata and the `<head>` tags it produces.
//!
//! Each page builds a [`PageMeta`] and the layout renders it with
//! [`head_tags`]. Titles follow the `%s — {site}` template; the home page
//! uses the bare site name.

use crate::config::SiteConfig;
use crate::i18n::{self, iso_date};
use crate::types::{Author, Post, Soul};
use maud::{Markup, html};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageMeta {
    /// Page title before templating. `None` renders the site name alone.
    pub title: Option<String>,
    pub description: String,
    pub canonical: Option<String>,
    /// `(hreflang, url)` pairs, `x-default` last.
    pub alternates: Vec<(String, String)>,
    pub noindex: bool,
    pub article: Option<ArticleMeta>,
}

/// Open Graph / Twitter card data for article pages.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleMeta {
    pub published_time: String,
    pub modified_time: Option<String>,
    pub authors: Vec<String>,
    /// Absolute image URLs.
    pub images: Vec<String>,
}

impl PageMeta {
    pub fn full_title(&self, site_name: &str) -> String {
        match &self.title {
            Some(title) => format!("{title} — {site_name}"),
            None => site_name.to_string(),
        }
    }
}

/// Alternate links for `path` in every configured locale, plus `x-default`.
pub fn alternates(config: &SiteConfig, path: &str) -> Vec<(String, String)> {
    let url = &config.site.url;
    let mut links: Vec<(String, String)> = config
        .i18n
        .locales
        .iter()
        .map(|l| (l.clone(), i18n::locale_path(url, &config.i18n, l, path)))
        .collect();
    links.push((
        "x-default".to_string(),
        i18n::locale_path(url, &config.i18n, &config.i18n.default_locale, path),
    ));
    links
}

fn localized(config: &SiteConfig, locale: &str, path: &str) -> (Option<String>, Vec<(String, String)>) {
    (
        Some(i18n::locale_path(&config.site.url, &config.i18n, locale, path)),
        alternates(config, path),
    )
}

/// Resolve a site-relative image path against the site URL.
pub fn absolute_url(config: &SiteConfig, src: &str) -> String {
    if src.starts_with('/') {
        format!("{}{src}", config.site.url)
    } else {
        src.to_string()
    }
}

pub fn home_meta(config: &SiteConfig, locale: &str) -> PageMeta {
    let (canonical, alternates) = localized(config, locale, "");
    PageMeta {
        title: None,
        description: config.site.description.clone(),
        canonical,
        alternates,
        ..PageMeta::default()
    }
}

pub fn post_meta(config: &SiteConfig, post: &Post, authors: &[&Author], locale: &str) -> PageMeta {
    let (canonical, alternates) =
        localized(config, locale, &format!("/blog/{}", post.slug_as_params));
    PageMeta {
        title: Some(post.title.clone()),
        description: post.description.clone(),
        canonical,
        alternates,
        noindex: false,
        article: Some(ArticleMeta {
            published_time: iso_date(&post.date),
            modified_time: post.updated.as_ref().map(iso_date),
            authors: authors.iter().map(|a| a.name.clone()).collect(),
            images: post
                .image
                .iter()
                .map(|src| absolute_url(config, src))
                .collect(),
        }),
    }
}

/// Metadata for the HTML view of a post's Markdown source.
pub fn markdown_meta(post: &Post) -> PageMeta {
    PageMeta {
        title: Some(format!("{} (Markdown)", post.title)),
        noindex: true,
        ..PageMeta::default()
    }
}

pub fn soul_meta(config: &SiteConfig, soul: &Soul, locale: &str) -> PageMeta {
    let (canonical, alternates) =
        localized(config, locale, &format!("/soul/{}", soul.slug_as_params));
    PageMeta {
        title: Some(soul.name.clone()),
        description: soul.brief.clone(),
        canonical,
        alternates,
        ..PageMeta::default()
    }
}

/// What a not-found page was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
    Post,
    Soul,
    Page,
}

pub fn not_found_meta(missing: Missing) -> PageMeta {
    let title = match missing {
        Missing::Post => "Post Not Found",
        Missing::Soul => "Soul Not Found",
        Missing::Page => "Not Found",
    };
    PageMeta {
        title: Some(title.to_string()),
        noindex: true,
        ..PageMeta::default()
    }
}

/// Render the metadata tags for a page head.
pub fn head_tags(meta: &PageMeta, config: &SiteConfig) -> Markup {
    let title = meta.full_title(&config.site.name);
    let description = if meta.description.is_empty() {
        config.site.description.as_str()
    } else {
        meta.description.as_str()
    };
    html! {
        title { (title) }
        @if !description.is_empty() {
            meta name="description" content=(description);
        }
        @if meta.noindex {
            meta name="robots" content="noindex";
        }
        @if let Some(canonical) = &meta.canonical {
            link rel="canonical" href=(canonical);
        }
        @for (lang, href) in &meta.alternates {
            link rel="alternate" hreflang=(lang) href=(href);
        }
        @if let Some(article) = &meta.article {
            @let page_title = meta.title.as_deref().unwrap_or(&config.site.name);
            meta property="og:title" content=(page_title);
            meta property="og:description" content=(description);
            meta property="og:type" content="article";
            @if let Some(canonical) = &meta.canonical {
                meta property="og:url" content=(canonical);
            }
            meta property="og:site_name" content=(config.site.name);
            meta property="article:published_time" content=(article.published_time);
            @if let Some(modified) = &article.modified_time {
                meta property="article:modified_time" content=(modified);
            }
            @for author in &article.authors {
                meta property="article:author" content=(author);
            }
            @for image in &article.images {
                meta property="og:image" content=(image);
            }
            meta name="twitter:card" content="summary_large_image";
            meta name="twitter:title" content=(page_title);
            meta name="twitter:description" content=(description);
            @for image in &article.images {
                meta name="twitter:image" content=(image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_date;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.name = "andoni".into();
        config.site.url = "https://andoni.dev".into();
        config.site.description = "Building with a soul".into();
        config.i18n.locales = vec!["en".into(), "es".into()];
        config
    }

    fn post() -> Post {
        Post {
            slug: "blog/en/hello".into(),
            title: "Hello".into(),
            date: parse_date("2024-01-15").unwrap(),
            updated: parse_date("2024-01-20"),
            description: "First".into(),
            image: Some("/static/hello.png".into()),
            published: true,
            soul: None,
            authors: vec!["andoni".into()],
            locale: "en".into(),
            slug_as_params: "hello".into(),
            permalink: "/blog/hello".into(),
            reading_time: 1,
            word_count: 3,
            toc: Vec::new(),
            body: Vec::new(),
            markdown: String::new(),
            source_path: "blog/en/hello.mdx".into(),
        }
    }

    #[test]
    fn title_template() {
        let meta = PageMeta {
            title: Some("Hello".into()),
            ..PageMeta::default()
        };
        assert_eq!(meta.full_title("andoni"), "Hello — andoni");
        assert_eq!(PageMeta::default().full_title("andoni"), "andoni");
    }

    #[test]
    fn alternates_cover_locales_and_default() {
        let links = alternates(&config(), "/blog/hello");
        assert_eq!(
            links,
            vec![
                ("en".to_string(), "https://andoni.dev/blog/hello".to_string()),
                ("es".to_string(), "https://andoni.dev/es/blog/hello".to_string()),
                (
                    "x-default".to_string(),
                    "https://andoni.dev/blog/hello".to_string()
                ),
            ]
        );
    }

    #[test]
    fn post_meta_builds_article_data() {
        let meta = post_meta(&config(), &post(), &[], "es");
        assert_eq!(
            meta.canonical.as_deref(),
            Some("https://andoni.dev/es/blog/hello")
        );
        let article = meta.article.unwrap();
        assert_eq!(article.published_time, "2024-01-15T00:00:00.000Z");
        assert_eq!(
            article.modified_time.as_deref(),
            Some("2024-01-20T00:00:00.000Z")
        );
        assert_eq!(article.images, vec!["https://andoni.dev/static/hello.png"]);
    }

    #[test]
    fn head_tags_render_article_cards() {
        let config = config();
        let html = head_tags(&post_meta(&config, &post(), &[], "en"), &config).into_string();
        assert!(html.contains("<title>Hello — andoni</title>"));
        assert!(html.contains(r#"<link rel="canonical" href="https://andoni.dev/blog/hello">"#));
        assert!(html.contains(r#"hreflang="x-default""#));
        assert!(html.contains(r#"<meta property="og:type" content="article">"#));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains("article:modified_time"));
        assert!(!html.contains("noindex"));
    }

    #[test]
    fn markdown_view_is_noindex() {
        let config = config();
        let html = head_tags(&markdown_meta(&post()), &config).into_string();
        assert!(html.contains("<title>Hello (Markdown) — andoni</title>"));
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(!html.contains("og:type"));
    }

    #[test]
    fn not_found_titles() {
        assert_eq!(
            not_found_meta(Missing::Post).title.as_deref(),
            Some("Post Not Found")
        );
        assert_eq!(
            not_found_meta(Missing::Soul).title.as_deref(),
            Some("Soul Not Found")
        );
    }

    #[test]
    fn description_falls_back_to_site() {
        let config = config();
        let html = head_tags(&home_meta(&config, "en"), &config).into_string();
        assert!(html.contains(r#"<meta name="description" content="Building with a soul">"#));
        assert!(html.contains("<title>andoni</title>"));
    }
}
