//! Route table and page renderers.
//!
//! Every URL the site answers is a [`Route`]. The static build enumerates
//! routes with [`static_routes`] and writes each [`Response`] to
//! [`Route::output_file`]; the preview server parses request paths with
//! [`Route::parse`] and sends the same responses over HTTP.
//!
//! ## Routes
//!
//! Locale prefix omitted for the default locale (`/es/blog/x`, `/blog/x`):
//!
//! | Path | Output file | Response |
//! |---|---|---|
//! | `/`, `/page/{n}` | `index.html`, `page/{n}/index.html` | paginated post list |
//! | `/blog/{slug}` | `blog/{slug}/index.html` | post page |
//! | `/blog/{slug}/md` | `blog/{slug}/md/index.html` | post source, HTML view |
//! | `/blog/{slug}.md` | `blog/{slug}.md` | post source, plain text |
//! | `/soul/{slug}` | `soul/{slug}/index.html` | soul document |
//! | `/llms.txt` | `llms.txt` | listing for language models |
//! | `/style.css` | `style.css` | stylesheet |
//! | anything else | `404.html` | not found, status 404 |
//!
//! A path that spells out the default locale (`/en/blog/x`) redirects to
//! its unprefixed form.

use crate::config::{self, I18nConfig, SiteConfig};
use crate::i18n::{self, Messages, Msg, display_date, iso_date, local_href};
use crate::query;
use crate::render::{render_body, render_toc};
use crate::seo::{self, Missing, PageMeta};
use crate::structured_data::{self, to_script_json};
use crate::types::{Content, Post, Soul};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde_json::Value;
use std::path::PathBuf;

const CSS_STATIC: &str = include_str!("../static/style.css");

pub const HTML: &str = "text/html; charset=utf-8";
pub const TEXT: &str = "text/plain; charset=utf-8";
pub const CSS: &str = "text/css; charset=utf-8";

/// A resolved URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Home page `page` (1-based) of the post list.
    Home { locale: String, page: usize },
    Post { locale: String, slug: String },
    /// HTML page showing a post's Markdown source.
    PostMarkdown { locale: String, slug: String },
    /// A post's Markdown source as plain text.
    PostText { locale: String, slug: String },
    Soul { locale: String, slug: String },
    LlmsTxt,
    Stylesheet,
    NotFound { locale: String },
    Redirect { location: String },
}

impl Route {
    /// Resolve a decoded request path (no query string).
    pub fn parse(path: &str, i18n: &I18nConfig) -> Route {
        let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.last() == Some(&"index.html") {
            segments.pop();
        }

        let mut locale = i18n.default_locale.clone();
        if let Some(first) = segments.first()
            && i18n.locales.iter().any(|l| l.as_str() == *first)
        {
            if *first == i18n.default_locale {
                let rest = segments[1..].join("/");
                return Route::Redirect {
                    location: format!("/{rest}"),
                };
            }
            locale = first.to_string();
            segments.remove(0);
        }
        let prefixed = locale != i18n.default_locale;
        let not_found = || Route::NotFound {
            locale: locale.clone(),
        };

        match segments.as_slice() {
            [] => Route::Home {
                locale: locale.clone(),
                page: 1,
            },
            ["page", n] => match n.parse::<usize>() {
                Ok(1) => Route::Redirect {
                    location: local_href(i18n, &locale, ""),
                },
                Ok(page) if page > 1 => Route::Home {
                    locale: locale.clone(),
                    page,
                },
                _ => not_found(),
            },
            ["blog", rest @ ..] if !rest.is_empty() => {
                let last = rest[rest.len() - 1];
                if let Some(stem) = last.strip_suffix(".md")
                    && !stem.is_empty()
                {
                    let mut parts = rest[..rest.len() - 1].to_vec();
                    parts.push(stem);
                    Route::PostText {
                        locale: locale.clone(),
                        slug: parts.join("/"),
                    }
                } else if last == "md" && rest.len() > 1 {
                    Route::PostMarkdown {
                        locale: locale.clone(),
                        slug: rest[..rest.len() - 1].join("/"),
                    }
                } else {
                    Route::Post {
                        locale: locale.clone(),
                        slug: rest.join("/"),
                    }
                }
            }
            ["soul", rest @ ..] if !rest.is_empty() => Route::Soul {
                locale: locale.clone(),
                slug: rest.join("/"),
            },
            ["llms.txt"] if !prefixed => Route::LlmsTxt,
            ["style.css"] if !prefixed => Route::Stylesheet,
            _ => not_found(),
        }
    }

    /// Canonical site-relative URL path.
    pub fn path(&self, i18n: &I18nConfig) -> String {
        match self {
            Route::Home { locale, page } => local_href(i18n, locale, &page_path(*page)),
            Route::Post { locale, slug } => local_href(i18n, locale, &format!("/blog/{slug}")),
            Route::PostMarkdown { locale, slug } => {
                local_href(i18n, locale, &format!("/blog/{slug}/md"))
            }
            Route::PostText { locale, slug } => {
                local_href(i18n, locale, &format!("/blog/{slug}.md"))
            }
            Route::Soul { locale, slug } => local_href(i18n, locale, &format!("/soul/{slug}")),
            Route::LlmsTxt => "/llms.txt".to_string(),
            Route::Stylesheet => "/style.css".to_string(),
            Route::NotFound { locale } => local_href(i18n, locale, "/404.html"),
            Route::Redirect { location } => location.clone(),
        }
    }

    /// File the static build writes this route to, relative to the output root.
    ///
    /// Redirects have no file.
    pub fn output_file(&self, i18n: &I18nConfig) -> Option<PathBuf> {
        let in_locale = |locale: &str, rel: String| {
            let prefix = i18n::locale_prefix(i18n, locale);
            PathBuf::from(format!("{}{rel}", prefix.trim_start_matches('/'))
                .trim_start_matches('/')
                .to_string())
        };
        let file = match self {
            Route::Home { locale, page } => {
                in_locale(locale, format!("{}/index.html", page_path(*page)))
            }
            Route::Post { locale, slug } => in_locale(locale, format!("/blog/{slug}/index.html")),
            Route::PostMarkdown { locale, slug } => {
                in_locale(locale, format!("/blog/{slug}/md/index.html"))
            }
            Route::PostText { locale, slug } => in_locale(locale, format!("/blog/{slug}.md")),
            Route::Soul { locale, slug } => in_locale(locale, format!("/soul/{slug}/index.html")),
            Route::LlmsTxt => PathBuf::from("llms.txt"),
            Route::Stylesheet => PathBuf::from("style.css"),
            Route::NotFound { locale } => in_locale(locale, "/404.html".to_string()),
            Route::Redirect { .. } => return None,
        };
        Some(file)
    }

    /// Short label for build output.
    pub fn kind(&self) -> &'static str {
        match self {
            Route::Home { .. } => "home",
            Route::Post { .. } => "post",
            Route::PostMarkdown { .. } => "markdown",
            Route::PostText { .. } => "text",
            Route::Soul { .. } => "soul",
            Route::LlmsTxt => "llms",
            Route::Stylesheet => "stylesheet",
            Route::NotFound { .. } => "not-found",
            Route::Redirect { .. } => "redirect",
        }
    }
}

/// Path of a home page within a locale: empty for page 1.
fn page_path(page: usize) -> String {
    if page <= 1 {
        String::new()
    } else {
        format!("/page/{page}")
    }
}

/// Every route the static build writes, in a stable order.
pub fn static_routes(content: &Content) -> Vec<Route> {
    let config = &content.config;
    let mut routes = Vec::new();
    for locale in &config.i18n.locales {
        let posts = query::posts_by_locale(&content.posts, locale);
        let pages = Pagination::total_pages(posts.len(), config.pagination.per_page);
        for page in 1..=pages {
            routes.push(Route::Home {
                locale: locale.clone(),
                page,
            });
        }
        for post in posts {
            let slug = post.slug_as_params.clone();
            routes.push(Route::Post {
                locale: locale.clone(),
                slug: slug.clone(),
            });
            routes.push(Route::PostMarkdown {
                locale: locale.clone(),
                slug: slug.clone(),
            });
            routes.push(Route::PostText {
                locale: locale.clone(),
                slug,
            });
        }
        for soul in query::souls_by_locale(&content.souls, locale) {
            routes.push(Route::Soul {
                locale: locale.clone(),
                slug: soul.slug_as_params.clone(),
            });
        }
        routes.push(Route::NotFound {
            locale: locale.clone(),
        });
    }
    routes.push(Route::LlmsTxt);
    routes.push(Route::Stylesheet);
    routes
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: &'static str,
    /// Extra headers beyond `Content-Type`.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Response {
    fn html(status: u16, markup: Markup) -> Self {
        Self {
            status,
            content_type: HTML,
            headers: Vec::new(),
            body: markup.into_string(),
        }
    }

    fn text(status: u16, body: String) -> Self {
        Self {
            status,
            content_type: TEXT,
            headers: Vec::new(),
            body,
        }
    }

    fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Render the response for `route`.
pub fn respond(content: &Content, route: &Route) -> Response {
    let config = &content.config;
    match route {
        Route::Home { locale, page } => render_home(content, locale, *page)
            .unwrap_or_else(|| not_found(content, locale, Missing::Page)),
        Route::Post { locale, slug } => match query::post_by_slug(&content.posts, slug, locale) {
            Some(post) => Response::html(200, render_post(content, post, locale)),
            None => not_found(content, locale, Missing::Post),
        },
        Route::PostMarkdown { locale, slug } => {
            match query::post_by_slug(&content.posts, slug, locale) {
                Some(post) => Response::html(200, render_markdown_view(content, post, locale)),
                None => not_found(content, locale, Missing::Post),
            }
        }
        Route::PostText { locale, slug } => {
            match query::post_by_slug(&content.posts, slug, locale) {
                Some(post) => Response::text(200, post.markdown.clone())
                    .with_header("X-Robots-Tag", "noindex"),
                None => Response::text(404, "Not found".to_string()),
            }
        }
        Route::Soul { locale, slug } => match query::soul_by_slug(&content.souls, slug, locale) {
            Some(soul) => Response::html(200, render_soul(content, soul, locale)),
            None => not_found(content, locale, Missing::Soul),
        },
        Route::LlmsTxt => Response::text(200, render_llms_txt(content)),
        Route::Stylesheet => Response {
            status: 200,
            content_type: CSS,
            headers: Vec::new(),
            body: stylesheet(config),
        },
        Route::NotFound { locale } => not_found(content, locale, Missing::Page),
        Route::Redirect { location } => Response {
            status: 308,
            content_type: TEXT,
            headers: vec![("Location".to_string(), location.clone())],
            body: String::new(),
        },
    }
}

fn not_found(content: &Content, locale: &str, missing: Missing) -> Response {
    Response::html(404, render_not_found(content, locale, missing))
}

pub fn stylesheet(config: &SiteConfig) -> String {
    format!("{}\n\n{}", config::generate_color_css(&config.colors), CSS_STATIC)
}

// ============================================================================
// Layout
// ============================================================================

fn layout(
    content: &Content,
    locale: &str,
    meta: &PageMeta,
    structured: &[Value],
    body: Markup,
) -> Markup {
    let config = &content.config;
    let website = structured_data::website(config, locale);
    html! {
        (DOCTYPE)
        html lang=(locale) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                (seo::head_tags(meta, config))
                link rel="stylesheet" href="/style.css";
                script type="application/ld+json" { (PreEscaped(to_script_json(&website))) }
                @for data in structured {
                    script type="application/ld+json" { (PreEscaped(to_script_json(data))) }
                }
            }
            body {
                main.container {
                    (body)
                }
            }
        }
    }
}

fn back_link(href: &str, label: &str) -> Markup {
    html! { a.back-link href=(href) { (label) } }
}

// ============================================================================
// Home
// ============================================================================

/// Position within a paginated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: usize,
    pub total: usize,
}

impl Pagination {
    /// Number of pages for `items`; an empty list still has one page.
    pub fn total_pages(items: usize, per_page: usize) -> usize {
        items.div_ceil(per_page.max(1)).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }
}

/// `None` when `page` is past the last page.
fn render_home(content: &Content, locale: &str, page: usize) -> Option<Response> {
    let config = &content.config;
    let t = Messages::for_locale(&content.messages, locale);
    let posts = query::posts_by_locale(&content.posts, locale);
    let per_page = config.pagination.per_page.max(1);
    let pagination = Pagination {
        current: page,
        total: Pagination::total_pages(posts.len(), per_page),
    };
    if page == 0 || page > pagination.total {
        return None;
    }
    let start = (page - 1) * per_page;
    let shown: Vec<&Post> = posts.into_iter().skip(start).take(per_page).collect();
    let href = |n: usize| local_href(&config.i18n, locale, &page_path(n));

    let body = html! {
        header.home-header {
            div {
                h1 { (config.site.heading) }
                @if !config.site.byline.is_empty() {
                    p.byline { (config.site.byline) }
                }
            }
            @if !config.site.social.is_empty() {
                nav.social {
                    @for link in &config.site.social {
                        a href=(link.url) target="_blank" rel="noopener noreferrer" { (link.label) }
                    }
                }
            }
        }
        section.post-list {
            @if shown.is_empty() {
                p.empty { (t.get(Msg::NoPostsFound)) }
            }
            @for post in &shown {
                article.post-item {
                    a href=(local_href(&config.i18n, locale, &post.permalink)) {
                        span.post-title { (post.title) }
                        time datetime=(iso_date(&post.date)) { (display_date(&post.date)) }
                    }
                }
            }
        }
        @if pagination.total > 1 {
            nav.pagination {
                @if pagination.has_previous() {
                    a href=(href(page - 1)) { (t.get(Msg::Previous)) }
                } @else {
                    span {}
                }
                @let current = pagination.current.to_string();
                @let total = pagination.total.to_string();
                span.page-of {
                    (t.format(Msg::PageOf, &[("current", current.as_str()), ("total", total.as_str())]))
                }
                @if pagination.has_next() {
                    a href=(href(page + 1)) { (t.get(Msg::Next)) }
                } @else {
                    span {}
                }
            }
        }
    };
    let meta = seo::home_meta(config, locale);
    Some(Response::html(200, layout(content, locale, &meta, &[], body)))
}

// ============================================================================
// Posts
// ============================================================================

fn render_post(content: &Content, post: &Post, locale: &str) -> Markup {
    let config = &content.config;
    let t = Messages::for_locale(&content.messages, locale);
    let authors = query::post_authors(&content.authors, post);
    let soul = query::post_soul(&content.souls, post);
    let author_names: Vec<&str> = authors.iter().map(|a| a.name.as_str()).collect();

    let body = html! {
        (back_link(&local_href(&config.i18n, locale, ""), t.get(Msg::BackToBlog)))
        header.page-header {
            h1 { (post.title) }
            p.description { (post.description) }
            div.page-meta {
                time datetime=(iso_date(&post.date)) { (display_date(&post.date)) }
                @if let Some(updated) = &post.updated {
                    span { "(" (t.get(Msg::Updated)) " " (display_date(updated)) ")" }
                }
                span { (post.reading_time) " " (t.get(Msg::MinRead)) }
                @if !author_names.is_empty() {
                    span { "·" }
                    span.authors { (author_names.join(", ")) }
                }
                a.source-link href=(local_href(&config.i18n, locale, &format!("{}/md", post.permalink))) {
                    (t.get(Msg::ViewMarkdown))
                }
            }
        }
        div.page-layout {
            article.prose {
                (render_body(&post.body))
                @if let Some(soul) = soul {
                    (soul_card(content, soul, locale))
                }
            }
            @if !post.toc.is_empty() {
                aside.toc-aside {
                    (render_toc(&post.toc, t.get(Msg::OnThisPage)))
                }
            }
        }
    };
    let meta = seo::post_meta(config, post, &authors, locale);
    let article = structured_data::article(config, post, &authors, locale);
    layout(content, locale, &meta, &[article], body)
}

/// Credit for the soul document a post was written with.
fn soul_card(content: &Content, soul: &Soul, locale: &str) -> Markup {
    let t = Messages::for_locale(&content.messages, locale);
    html! {
        aside.soul-card {
            p.soul-credit {
                (t.get(Msg::WrittenWith)) " "
                strong { (soul.alias) } " "
                (t.format(Msg::Version, &[("version", soul.version.as_str())]))
                @if let Some(model) = &soul.model {
                    " · " (model)
                }
            }
            p.soul-brief { (soul.brief) }
            @if soul.published {
                a href=(local_href(&content.config.i18n, locale, &format!("/soul/{}", soul.slug_as_params))) {
                    (t.get(Msg::ReadMore))
                }
            }
        }
    }
}

fn render_markdown_view(content: &Content, post: &Post, locale: &str) -> Markup {
    let config = &content.config;
    let t = Messages::for_locale(&content.messages, locale);
    let body = html! {
        (back_link(&local_href(&config.i18n, locale, &post.permalink), t.get(Msg::BackToBlog)))
        h1 { (post.title) }
        pre.markdown-source { (post.markdown) }
    };
    layout(content, locale, &seo::markdown_meta(post), &[], body)
}

// ============================================================================
// Souls
// ============================================================================

fn render_soul(content: &Content, soul: &Soul, locale: &str) -> Markup {
    let config = &content.config;
    let t = Messages::for_locale(&content.messages, locale);
    let body = html! {
        (back_link(&local_href(&config.i18n, locale, ""), t.get(Msg::BackToBlog)))
        header.page-header {
            h1 { (soul.name) }
            p.description { (soul.brief) }
            div.page-meta {
                span { (soul.alias) }
                span { "·" }
                span { (t.format(Msg::Version, &[("version", soul.version.as_str())])) }
                span { "·" }
                time datetime=(iso_date(&soul.last_reflection)) { (display_date(&soul.last_reflection)) }
            }
        }
        div.page-layout {
            article.prose {
                (render_body(&soul.body))
            }
            @if !soul.toc.is_empty() {
                aside.toc-aside {
                    (render_toc(&soul.toc, t.get(Msg::OnThisPage)))
                }
            }
        }
    };
    layout(content, locale, &seo::soul_meta(config, soul, locale), &[], body)
}

// ============================================================================
// Not found
// ============================================================================

fn render_not_found(content: &Content, locale: &str, missing: Missing) -> Markup {
    let t = Messages::for_locale(&content.messages, locale);
    let body = html! {
        (back_link(&local_href(&content.config.i18n, locale, ""), t.get(Msg::BackToBlog)))
        h1 { (t.get(Msg::NotFound)) }
        p.description { (t.get(Msg::NotFoundBody)) }
    };
    layout(content, locale, &seo::not_found_meta(missing), &[], body)
}

// ============================================================================
// llms.txt
// ============================================================================

/// Plain-text listing of the default locale's posts and soul documents.
pub fn render_llms_txt(content: &Content) -> String {
    let config = &content.config;
    let locale = &config.i18n.default_locale;
    let url = &config.site.url;

    let mut lines = vec![format!("# {}", config.site.name), String::new()];
    if !config.llms.summary.is_empty() {
        lines.push(format!("> {}", config.llms.summary));
        lines.push(String::new());
    }
    lines.push("## Blog Posts".to_string());
    lines.push(String::new());
    for post in query::posts_by_locale(&content.posts, locale) {
        lines.push(format!(
            "- [{}]({url}/blog/{}.md): {}",
            post.title, post.slug_as_params, post.description
        ));
    }
    lines.push(String::new());
    lines.push("## Soul Documents".to_string());
    lines.push(String::new());
    for soul in query::souls_by_locale(&content.souls, locale) {
        lines.push(format!(
            "- [{}]({url}/soul/{}): {}",
            soul.name, soul.slug_as_params, soul.brief
        ));
    }
    if !config.llms.process.is_empty() {
        lines.push(String::new());
        lines.push("## Process".to_string());
        lines.push(String::new());
        lines.push(config.llms.process.clone());
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::collect;
    use crate::test_helpers::*;

    fn i18n() -> I18nConfig {
        I18nConfig {
            locales: vec!["en".into(), "es".into()],
            default_locale: "en".into(),
        }
    }

    fn fixture_content() -> Content {
        let tmp = setup_fixtures();
        collect(tmp.path()).unwrap()
    }

    // =========================================================================
    // Route parsing
    // =========================================================================

    #[test]
    fn parse_home_and_pages() {
        let i = i18n();
        assert_eq!(
            Route::parse("/", &i),
            Route::Home {
                locale: "en".into(),
                page: 1
            }
        );
        assert_eq!(
            Route::parse("/es/page/3/", &i),
            Route::Home {
                locale: "es".into(),
                page: 3
            }
        );
        assert_eq!(
            Route::parse("/page/1", &i),
            Route::Redirect {
                location: "/".into()
            }
        );
        assert!(matches!(
            Route::parse("/page/zero", &i),
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn parse_post_variants() {
        let i = i18n();
        assert_eq!(
            Route::parse("/blog/hello/", &i),
            Route::Post {
                locale: "en".into(),
                slug: "hello".into()
            }
        );
        assert_eq!(
            Route::parse("/es/blog/hola/md", &i),
            Route::PostMarkdown {
                locale: "es".into(),
                slug: "hola".into()
            }
        );
        assert_eq!(
            Route::parse("/blog/series/part-one.md", &i),
            Route::PostText {
                locale: "en".into(),
                slug: "series/part-one".into()
            }
        );
        assert_eq!(
            Route::parse("/blog/hello/index.html", &i),
            Route::Post {
                locale: "en".into(),
                slug: "hello".into()
            }
        );
    }

    #[test]
    fn parse_default_locale_prefix_redirects() {
        assert_eq!(
            Route::parse("/en/blog/hello", &i18n()),
            Route::Redirect {
                location: "/blog/hello".into()
            }
        );
        assert_eq!(
            Route::parse("/en", &i18n()),
            Route::Redirect {
                location: "/".into()
            }
        );
    }

    #[test]
    fn parse_unknown_paths() {
        let i = i18n();
        assert_eq!(
            Route::parse("/nope", &i),
            Route::NotFound {
                locale: "en".into()
            }
        );
        assert_eq!(
            Route::parse("/es/llms.txt", &i),
            Route::NotFound {
                locale: "es".into()
            }
        );
        assert!(matches!(Route::parse("/blog", &i), Route::NotFound { .. }));
        assert_eq!(
            Route::parse("/fr/blog/x", &i),
            Route::NotFound {
                locale: "en".into()
            }
        );
    }

    #[test]
    fn static_routes_roundtrip_through_parse() {
        let content = fixture_content();
        let i = &content.config.i18n;
        for route in static_routes(&content) {
            if matches!(route, Route::NotFound { .. }) {
                continue;
            }
            assert_eq!(Route::parse(&route.path(i), i), route, "{}", route.path(i));
        }
    }

    #[test]
    fn nested_slugs_roundtrip_and_write_distinct_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let post = "---\ntitle: T\ndate: 2024-01-15\ndescription: d\n---\n\nbody\n";
        for rel in [
            "blog/en/series.mdx",
            "blog/en/series/part-1.mdx",
            "blog/en/md-tips.mdx",
            "blog/en/notes.v2.mdx",
        ] {
            write_file(tmp.path(), rel, post);
        }
        let content = collect(tmp.path()).unwrap();
        let i = &content.config.i18n;

        let routes = static_routes(&content);
        let mut files = std::collections::HashSet::new();
        for route in &routes {
            if let Some(file) = route.output_file(i) {
                assert!(files.insert(file.clone()), "{} written twice", file.display());
            }
            if !matches!(route, Route::NotFound { .. }) {
                assert_eq!(&Route::parse(&route.path(i), i), route, "{}", route.path(i));
            }
        }
        assert!(routes.contains(&Route::PostText {
            locale: "en".into(),
            slug: "notes.v2".into()
        }));
    }

    #[test]
    fn output_files() {
        let i = i18n();
        let file = |r: Route| r.output_file(&i).unwrap();
        assert_eq!(
            file(Route::Home {
                locale: "en".into(),
                page: 1
            }),
            PathBuf::from("index.html")
        );
        assert_eq!(
            file(Route::Home {
                locale: "es".into(),
                page: 2
            }),
            PathBuf::from("es/page/2/index.html")
        );
        assert_eq!(
            file(Route::PostText {
                locale: "en".into(),
                slug: "hello".into()
            }),
            PathBuf::from("blog/hello.md")
        );
        assert_eq!(
            file(Route::NotFound {
                locale: "en".into()
            }),
            PathBuf::from("404.html")
        );
        assert_eq!(
            Route::Redirect {
                location: "/".into()
            }
            .output_file(&i),
            None
        );
    }

    // =========================================================================
    // Responses
    // =========================================================================

    #[test]
    fn post_page_renders_header_body_and_soul_card() {
        let content = fixture_content();
        let post = find_post(&content, "building-with-a-soul");
        let response = respond(
            &content,
            &Route::Post {
                locale: "en".into(),
                slug: post.slug_as_params.clone(),
            },
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type, HTML);
        let html = &response.body;
        assert!(html.contains(&format!("<h1>{}</h1>", post.title)));
        assert!(html.contains("min read"));
        assert!(html.contains(r#"class="soul-card""#));
        assert!(html.contains(r#""@type":"Article""#));
        assert!(html.contains(r#""@type":"WebSite""#));
        assert!(html.contains(r#"class="toc-aside""#));
    }

    #[test]
    fn unpublished_post_is_not_found() {
        let content = fixture_content();
        let draft = content.posts.iter().find(|p| !p.published).unwrap();
        let response = respond(
            &content,
            &Route::Post {
                locale: draft.locale.clone(),
                slug: draft.slug_as_params.clone(),
            },
        );
        assert_eq!(response.status, 404);
        assert!(response.body.contains("Post Not Found"));
    }

    #[test]
    fn unknown_slug_is_not_found_everywhere() {
        let content = fixture_content();
        let locale = "en".to_string();
        let slug = "does-not-exist".to_string();
        for route in [
            Route::Post {
                locale: locale.clone(),
                slug: slug.clone(),
            },
            Route::PostMarkdown {
                locale: locale.clone(),
                slug: slug.clone(),
            },
            Route::PostText {
                locale: locale.clone(),
                slug: slug.clone(),
            },
            Route::Soul {
                locale: locale.clone(),
                slug: slug.clone(),
            },
        ] {
            assert_eq!(respond(&content, &route).status, 404, "{route:?}");
        }
        assert!(respond(&content, &Route::Soul { locale, slug }).body.contains("Soul Not Found"));
    }

    #[test]
    fn text_endpoint_strips_frontmatter() {
        let content = fixture_content();
        let post = find_post(&content, "building-with-a-soul");
        let response = respond(
            &content,
            &Route::PostText {
                locale: "en".into(),
                slug: post.slug_as_params.clone(),
            },
        );
        assert_eq!(response.content_type, TEXT);
        assert!(!response.body.starts_with("---"));
        assert!(!response.body.contains("description:"));
        assert_eq!(response.body, response.body.trim());
        assert!(
            response
                .headers
                .contains(&("X-Robots-Tag".to_string(), "noindex".to_string()))
        );
    }

    #[test]
    fn markdown_view_is_noindex_pre() {
        let content = fixture_content();
        let post = find_post(&content, "building-with-a-soul");
        let response = respond(
            &content,
            &Route::PostMarkdown {
                locale: "en".into(),
                slug: post.slug_as_params.clone(),
            },
        );
        assert!(response.body.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(response.body.contains(r#"<pre class="markdown-source">"#));
        assert!(response.body.contains("(Markdown)"));
    }

    #[test]
    fn home_lists_published_posts_newest_first() {
        let content = fixture_content();
        let response = respond(
            &content,
            &Route::Home {
                locale: "en".into(),
                page: 1,
            },
        );
        assert_eq!(response.status, 200);
        let published = query::posts_by_locale(&content.posts, "en");
        let positions: Vec<usize> = published
            .iter()
            .map(|p| response.body.find(&p.title).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        for draft in content.posts.iter().filter(|p| !p.published) {
            assert!(!response.body.contains(&draft.title));
        }
    }

    #[test]
    fn home_page_past_end_is_not_found() {
        let content = fixture_content();
        let response = respond(
            &content,
            &Route::Home {
                locale: "en".into(),
                page: 99,
            },
        );
        assert_eq!(response.status, 404);
    }

    #[test]
    fn home_paginates() {
        let mut content = fixture_content();
        content.config.pagination.per_page = 1;
        let total = query::posts_by_locale(&content.posts, "en").len();
        assert!(total > 1);
        let first = respond(
            &content,
            &Route::Home {
                locale: "en".into(),
                page: 1,
            },
        );
        assert!(first.body.contains(&format!("page 1 of {total}")));
        assert!(first.body.contains(r#"href="/page/2""#));
        let routes = static_routes(&content);
        let homes = routes
            .iter()
            .filter(|r| matches!(r, Route::Home { locale, .. } if locale == "en"))
            .count();
        assert_eq!(homes, total);
    }

    #[test]
    fn empty_locale_home_says_no_posts() {
        let mut content = fixture_content();
        content.posts.clear();
        let response = respond(
            &content,
            &Route::Home {
                locale: "en".into(),
                page: 1,
            },
        );
        assert_eq!(response.status, 200);
        assert!(response.body.contains("No posts yet."));
    }

    #[test]
    fn llms_txt_lists_posts_and_souls() {
        let content = fixture_content();
        let text = render_llms_txt(&content);
        let url = &content.config.site.url;
        assert!(text.starts_with(&format!("# {}\n", content.config.site.name)));
        assert!(text.contains("## Blog Posts"));
        assert!(text.contains("## Soul Documents"));
        let post = find_post(&content, "building-with-a-soul");
        assert!(text.contains(&format!(
            "- [{}]({url}/blog/{}.md): {}",
            post.title, post.slug_as_params, post.description
        )));
        for soul in content.souls.iter().filter(|s| !s.published) {
            assert!(!text.contains(&soul.name));
        }
    }

    #[test]
    fn pagination_math() {
        assert_eq!(Pagination::total_pages(0, 10), 1);
        assert_eq!(Pagination::total_pages(10, 10), 1);
        assert_eq!(Pagination::total_pages(11, 10), 2);
        let p = Pagination {
            current: 1,
            total: 2,
        };
        assert!(!p.has_previous());
        assert!(p.has_next());
    }

    #[test]
    fn stylesheet_includes_colors() {
        let content = fixture_content();
        let response = respond(&content, &Route::Stylesheet);
        assert_eq!(response.content_type, CSS);
        assert!(response.body.contains("--color-bg"));
    }

    #[test]
    fn redirect_response() {
        let content = fixture_content();
        let response = respond(
            &content,
            &Route::Redirect {
                location: "/blog/x".into(),
            },
        );
        assert_eq!(response.status, 308);
        assert_eq!(
            response.headers,
            vec![("Location".to_string(), "/blog/x".to_string())]
        );
    }
}
