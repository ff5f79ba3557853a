//! Lookups over collected content.
//!
//! Pure functions over the record slices in [`Content`](crate::types::Content).
//! Public listings and lookups only ever see published records; a missing
//! record is `None` (or an empty list), never an error.

use crate::types::{Author, Post, Soul};

/// Published posts in `locale`, newest first.
///
/// Posts sharing a date keep slug order.
pub fn posts_by_locale<'a>(posts: &'a [Post], locale: &str) -> Vec<&'a Post> {
    let mut found: Vec<&Post> = posts
        .iter()
        .filter(|p| p.published && p.locale == locale)
        .collect();
    found.sort_by(|a, b| b.date.cmp(&a.date));
    found
}

/// The published post with this `slug_as_params` in `locale`.
pub fn post_by_slug<'a>(posts: &'a [Post], slug: &str, locale: &str) -> Option<&'a Post> {
    posts
        .iter()
        .find(|p| p.slug_as_params == slug && p.locale == locale && p.published)
}

/// Authors credited on `post`, in the order the post lists them.
///
/// Slugs that match no author are skipped.
pub fn post_authors<'a>(authors: &'a [Author], post: &Post) -> Vec<&'a Author> {
    post.authors
        .iter()
        .filter_map(|slug| authors.iter().find(|a| &a.slug_as_params == slug))
        .collect()
}

/// The published soul with this `slug_as_params` in `locale`.
pub fn soul_by_slug<'a>(souls: &'a [Soul], slug: &str, locale: &str) -> Option<&'a Soul> {
    souls
        .iter()
        .find(|s| s.slug_as_params == slug && s.locale == locale && s.published)
}

/// The soul `post` was written with, looked up in the post's locale.
///
/// Unpublished souls are returned too: a post may credit a soul whose
/// document is not public yet.
pub fn post_soul<'a>(souls: &'a [Soul], post: &Post) -> Option<&'a Soul> {
    let slug = post.soul.as_deref()?;
    souls
        .iter()
        .find(|s| s.slug_as_params == slug && s.locale == post.locale)
}

/// Published souls in `locale`, in collection order.
pub fn souls_by_locale<'a>(souls: &'a [Soul], locale: &str) -> Vec<&'a Soul> {
    souls
        .iter()
        .filter(|s| s.published && s.locale == locale)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::parse_date;

    fn post(slug_as_params: &str, locale: &str, date: &str, published: bool) -> Post {
        Post {
            slug: format!("blog/{locale}/{slug_as_params}"),
            title: slug_as_params.to_string(),
            date: parse_date(date).unwrap(),
            updated: None,
            description: String::new(),
            image: None,
            published,
            soul: None,
            authors: Vec::new(),
            locale: locale.to_string(),
            slug_as_params: slug_as_params.to_string(),
            permalink: format!("/blog/{slug_as_params}"),
            reading_time: 1,
            word_count: 10,
            toc: Vec::new(),
            body: Vec::new(),
            markdown: String::new(),
            source_path: format!("blog/{locale}/{slug_as_params}.mdx"),
        }
    }

    fn author(name: &str) -> Author {
        Author {
            slug: format!("authors/{name}"),
            name: name.to_uppercase(),
            twitter: None,
            slug_as_params: name.to_string(),
            body: Vec::new(),
        }
    }

    fn soul(slug_as_params: &str, locale: &str, published: bool) -> Soul {
        Soul {
            slug: format!("soul/{locale}/{slug_as_params}"),
            name: slug_as_params.to_string(),
            alias: slug_as_params.to_string(),
            version: "1.0".to_string(),
            last_reflection: parse_date("2024-01-01").unwrap(),
            published,
            brief: String::new(),
            model: None,
            toc: Vec::new(),
            body: Vec::new(),
            locale: locale.to_string(),
            slug_as_params: slug_as_params.to_string(),
        }
    }

    fn sample_posts() -> Vec<Post> {
        vec![
            post("old", "en", "2023-05-01", true),
            post("new", "en", "2024-02-01", true),
            post("draft", "en", "2024-06-01", false),
            post("nuevo", "es", "2024-03-01", true),
            post("middle", "en", "2023-11-20", true),
        ]
    }

    #[test]
    fn posts_by_locale_filters_and_sorts() {
        let posts = sample_posts();
        let en = posts_by_locale(&posts, "en");
        let slugs: Vec<&str> = en.iter().map(|p| p.slug_as_params.as_str()).collect();
        assert_eq!(slugs, vec!["new", "middle", "old"]);
        assert!(en.iter().all(|p| p.locale == "en"));
        assert!(en.windows(2).all(|w| w[0].date >= w[1].date));
    }

    #[test]
    fn posts_by_unknown_locale_is_empty() {
        assert!(posts_by_locale(&sample_posts(), "fr").is_empty());
    }

    #[test]
    fn post_by_slug_matches_locale_and_published() {
        let posts = sample_posts();
        assert!(post_by_slug(&posts, "new", "en").is_some());
        assert!(post_by_slug(&posts, "new", "es").is_none());
        assert!(post_by_slug(&posts, "draft", "en").is_none());
        assert!(post_by_slug(&posts, "missing", "en").is_none());
    }

    #[test]
    fn post_authors_keeps_declared_order_and_skips_unknown() {
        let authors = vec![author("andoni"), author("guest")];
        let mut p = post("new", "en", "2024-02-01", true);
        p.authors = vec!["guest".into(), "ghost".into(), "andoni".into()];
        let names: Vec<&str> = post_authors(&authors, &p)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["GUEST", "ANDONI"]);
    }

    #[test]
    fn soul_by_slug_requires_published() {
        let souls = vec![soul("mosca", "en", true), soul("secret", "en", false)];
        assert!(soul_by_slug(&souls, "mosca", "en").is_some());
        assert!(soul_by_slug(&souls, "mosca", "es").is_none());
        assert!(soul_by_slug(&souls, "secret", "en").is_none());
    }

    #[test]
    fn post_soul_uses_post_locale_and_ignores_published() {
        let souls = vec![
            soul("mosca", "es", true),
            soul("secret", "en", false),
            soul("mosca", "en", true),
        ];
        let mut p = post("new", "en", "2024-02-01", true);
        assert!(post_soul(&souls, &p).is_none());

        p.soul = Some("mosca".into());
        assert_eq!(post_soul(&souls, &p).unwrap().slug, "soul/en/mosca");

        p.soul = Some("secret".into());
        assert!(post_soul(&souls, &p).is_some());

        p.soul = Some("missing".into());
        assert!(post_soul(&souls, &p).is_none());
    }

    #[test]
    fn souls_by_locale_lists_published_only() {
        let souls = vec![
            soul("mosca", "en", true),
            soul("secret", "en", false),
            soul("mosca", "es", true),
        ];
        let en = souls_by_locale(&souls, "en");
        assert_eq!(en.len(), 1);
        assert_eq!(en[0].slug, "soul/en/mosca");
    }
}
