//! Locale-aware paths, messages and dates.
//!
//! The default locale is served at the site root; every other locale lives
//! under a `/{locale}` prefix ("as-needed" prefixing). Interface strings come
//! from a built-in English catalog, overridden key by key by
//! `content/locales/{locale}.json`.

use crate::config::I18nConfig;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;

/// Path prefix for `locale`: empty for the default locale, `/{locale}` otherwise.
pub fn locale_prefix(i18n: &I18nConfig, locale: &str) -> String {
    if locale == i18n.default_locale {
        String::new()
    } else {
        format!("/{locale}")
    }
}

/// Site-relative href for `path` in `locale`. Never empty: the home page is `/`.
pub fn local_href(i18n: &I18nConfig, locale: &str, path: &str) -> String {
    let href = format!("{}{}", locale_prefix(i18n, locale), path);
    if href.is_empty() {
        "/".to_string()
    } else {
        href
    }
}

/// Absolute URL for `path` in `locale`.
///
/// `locale_path(url, i18n, "en", "/blog/x")` → `https://site/blog/x` when
/// `en` is the default; `https://site/es/blog/x` for `es`.
pub fn locale_path(site_url: &str, i18n: &I18nConfig, locale: &str, path: &str) -> String {
    format!("{site_url}{}{path}", locale_prefix(i18n, locale))
}

/// Date as shown to readers, e.g. `Jan 15, 2024`.
pub fn display_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Date in ISO 8601 form for `datetime` attributes, meta tags and JSON-LD.
pub fn iso_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Keys of the interface message catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    BackToBlog,
    Updated,
    MinRead,
    OnThisPage,
    NoPostsFound,
    Previous,
    Next,
    /// Takes `{current}` and `{total}`.
    PageOf,
    /// Takes `{version}`.
    Version,
    WrittenWith,
    ReadMore,
    NotFound,
    NotFoundBody,
    ViewMarkdown,
}

impl Msg {
    pub const ALL: [Msg; 14] = [
        Msg::BackToBlog,
        Msg::Updated,
        Msg::MinRead,
        Msg::OnThisPage,
        Msg::NoPostsFound,
        Msg::Previous,
        Msg::Next,
        Msg::PageOf,
        Msg::Version,
        Msg::WrittenWith,
        Msg::ReadMore,
        Msg::NotFound,
        Msg::NotFoundBody,
        Msg::ViewMarkdown,
    ];

    /// Key used in `locales/{locale}.json`.
    pub fn key(self) -> &'static str {
        match self {
            Msg::BackToBlog => "backToBlog",
            Msg::Updated => "updated",
            Msg::MinRead => "minRead",
            Msg::OnThisPage => "onThisPage",
            Msg::NoPostsFound => "noPostsFound",
            Msg::Previous => "previous",
            Msg::Next => "next",
            Msg::PageOf => "pageOf",
            Msg::Version => "version",
            Msg::WrittenWith => "writtenWith",
            Msg::ReadMore => "readMore",
            Msg::NotFound => "notFound",
            Msg::NotFoundBody => "notFoundBody",
            Msg::ViewMarkdown => "viewMarkdown",
        }
    }

    fn english(self) -> &'static str {
        match self {
            Msg::BackToBlog => "← back",
            Msg::Updated => "updated",
            Msg::MinRead => "min read",
            Msg::OnThisPage => "On this page",
            Msg::NoPostsFound => "No posts yet.",
            Msg::Previous => "← previous",
            Msg::Next => "next →",
            Msg::PageOf => "page {current} of {total}",
            Msg::Version => "v{version}",
            Msg::WrittenWith => "Written with",
            Msg::ReadMore => "read the soul document →",
            Msg::NotFound => "Not found",
            Msg::NotFoundBody => "Nothing lives at this address.",
            Msg::ViewMarkdown => "markdown",
        }
    }
}

/// Messages for one locale.
#[derive(Debug, Clone, Copy)]
pub struct Messages<'a> {
    overrides: Option<&'a BTreeMap<String, String>>,
}

impl<'a> Messages<'a> {
    /// Messages for `locale`, layered over English.
    pub fn for_locale(catalogs: &'a BTreeMap<String, BTreeMap<String, String>>, locale: &str) -> Self {
        Self {
            overrides: catalogs.get(locale),
        }
    }

    /// Built-in English messages only.
    pub fn english() -> Self {
        Self { overrides: None }
    }

    pub fn get(&self, msg: Msg) -> &'a str {
        self.overrides
            .and_then(|o| o.get(msg.key()))
            .map(String::as_str)
            .unwrap_or_else(|| msg.english())
    }

    /// Message with `{name}` placeholders filled from `args`.
    pub fn format(&self, msg: Msg, args: &[(&str, &str)]) -> String {
        let mut text = self.get(msg).to_string();
        for (name, value) in args {
            text = text.replace(&format!("{{{name}}}"), value);
        }
        text
    }
}
