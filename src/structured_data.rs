//! schema.org JSON-LD for page heads.
//!
//! Builders return [`serde_json::Value`]s; [`to_script_json`] serializes one
//! for embedding in a `<script type="application/ld+json">` element.

use crate::config::SiteConfig;
use crate::i18n::{self, iso_date};
use crate::types::{Author, Post};
use serde_json::{Value, json};

/// The site owner as a schema.org `Person`, used as publisher.
pub fn site_person(config: &SiteConfig) -> Value {
    json!({
        "@type": "Person",
        "name": config.site.name,
        "url": config.site.url,
    })
}

/// `WebSite` data for every page in `locale`.
pub fn website(config: &SiteConfig, locale: &str) -> Value {
    json!({
        "@context": "https://schema.org",
        "@type": "WebSite",
        "name": config.site.name,
        "description": config.site.description,
        "url": i18n::locale_path(&config.site.url, &config.i18n, locale, ""),
        "inLanguage": locale,
        "publisher": site_person(config),
    })
}

/// `Article` data for a post page.
///
/// With no resolvable authors the site owner is credited instead.
pub fn article(config: &SiteConfig, post: &Post, authors: &[&Author], locale: &str) -> Value {
    let url = i18n::locale_path(
        &config.site.url,
        &config.i18n,
        locale,
        &format!("/blog/{}", post.slug_as_params),
    );
    let published = iso_date(&post.date);
    let modified = post.updated.as_ref().map_or_else(|| published.clone(), iso_date);

    let author: Vec<Value> = if authors.is_empty() {
        vec![site_person(config)]
    } else {
        authors.iter().map(|a| author_person(a)).collect()
    };

    let mut data = json!({
        "@context": "https://schema.org",
        "@type": "Article",
        "headline": post.title,
        "description": post.description,
        "url": url,
        "datePublished": published,
        "dateModified": modified,
        "inLanguage": locale,
        "author": author,
        "publisher": site_person(config),
        "mainEntityOfPage": {
            "@type": "WebPage",
            "@id": url,
        },
    });
    if let (Some(image), Some(map)) = (&post.image, data.as_object_mut()) {
        map.insert("image".to_string(), Value::String(image.clone()));
    }
    data
}

fn author_person(author: &Author) -> Value {
    let mut person = json!({
        "@type": "Person",
        "name": author.name,
    });
    let handle = author
        .twitter
        .as_deref()
        .map(|h| h.trim_start_matches('@'))
        .filter(|h| !h.is_empty());
    if let (Some(handle), Some(map)) = (handle, person.as_object_mut()) {
        map.insert(
            "sameAs".to_string(),
            json!([format!("https://twitter.com/{handle}")]),
        );
    }
    person
}

/// Serialize for a script element; `</` is escaped so the payload cannot close it.
pub fn to_script_json(value: &Value) -> String {
    value.to_string().replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_date;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.site.name = "andoni".into();
        config.site.url = "https://andoni.dev".into();
        config.i18n.locales = vec!["en".into(), "es".into()];
        config
    }

    fn post() -> Post {
        Post {
            slug: "blog/es/hola".into(),
            title: "Hola".into(),
            date: parse_date("2024-01-15").unwrap(),
            updated: None,
            description: "Primer post".into(),
            image: None,
            published: true,
            soul: None,
            authors: vec!["andoni".into()],
            locale: "es".into(),
            slug_as_params: "hola".into(),
            permalink: "/blog/hola".into(),
            reading_time: 1,
            word_count: 3,
            toc: Vec::new(),
            body: Vec::new(),
            markdown: String::new(),
            source_path: "blog/es/hola.mdx".into(),
        }
    }

    fn author(twitter: Option<&str>) -> Author {
        Author {
            slug: "authors/andoni".into(),
            name: "Andoni".into(),
            twitter: twitter.map(str::to_string),
            slug_as_params: "andoni".into(),
            body: Vec::new(),
        }
    }

    #[test]
    fn website_uses_locale_url() {
        let data = website(&config(), "es");
        assert_eq!(data["@type"], "WebSite");
        assert_eq!(data["url"], "https://andoni.dev/es");
        assert_eq!(data["inLanguage"], "es");
        assert_eq!(website(&config(), "en")["url"], "https://andoni.dev");
    }

    #[test]
    fn article_fields() {
        let a = author(Some("@andonienri"));
        let data = article(&config(), &post(), &[&a], "es");
        assert_eq!(data["headline"], "Hola");
        assert_eq!(data["url"], "https://andoni.dev/es/blog/hola");
        assert_eq!(data["datePublished"], "2024-01-15T00:00:00.000Z");
        assert_eq!(data["dateModified"], data["datePublished"]);
        assert_eq!(data["mainEntityOfPage"]["@id"], data["url"]);
        assert_eq!(data["author"][0]["name"], "Andoni");
        assert_eq!(
            data["author"][0]["sameAs"][0],
            "https://twitter.com/andonienri"
        );
        assert!(data.get("image").is_none());
    }

    #[test]
    fn article_modified_and_image() {
        let mut p = post();
        p.updated = parse_date("2024-02-01");
        p.image = Some("/static/hola.png".into());
        let data = article(&config(), &p, &[], "es");
        assert_eq!(data["dateModified"], "2024-02-01T00:00:00.000Z");
        assert_eq!(data["image"], "/static/hola.png");
    }

    #[test]
    fn article_without_authors_credits_site() {
        let data = article(&config(), &post(), &[], "es");
        assert_eq!(data["author"][0]["name"], "andoni");
        assert_eq!(data["author"][0]["url"], "https://andoni.dev");
    }

    #[test]
    fn author_without_handle_has_no_same_as() {
        let a = author(None);
        let data = article(&config(), &post(), &[&a], "es");
        assert!(data["author"][0].get("sameAs").is_none());
    }

    #[test]
    fn script_json_cannot_close_tag() {
        let mut p = post();
        p.title = "</script><script>alert(1)</script>".into();
        let out = to_script_json(&article(&config(), &p, &[], "es"));
        assert!(!out.contains("</script>"));
        assert!(out.contains("<\\/script>"));
    }
}
