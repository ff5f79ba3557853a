//! Frontmatter schemas for the three collections.
//!
//! Each schema reads a YAML mapping and either produces a typed metadata
//! record or every problem it found. Checking does not stop at the first
//! bad field, so one build run reports all issues in a file.
//!
//! | Collection | Required | Optional (default) |
//! |---|---|---|
//! | post | `title` ≤100, `date`, `description` ≤300 | `updated`, `image` ≤200, `published` (true), `soul` ≤50, `authors` (site default) |
//! | author | `name` ≤100 | `twitter` ≤100 |
//! | soul | `name` ≤100, `alias` ≤50, `version` ≤20, `lastReflection`, `brief` ≤500 | `published` (false), `model` ≤50 |
//!
//! Dates accept `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (read as UTC) or full
//! RFC 3339. Keys not listed are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// One problem with one field of one file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    /// Content-relative source path.
    pub path: String,
    pub field: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.path, self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostMeta {
    pub title: String,
    pub date: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub description: String,
    pub image: Option<String>,
    pub published: bool,
    pub soul: Option<String>,
    pub authors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthorMeta {
    pub name: String,
    pub twitter: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoulMeta {
    pub name: String,
    pub alias: String,
    pub version: String,
    pub last_reflection: DateTime<Utc>,
    pub published: bool,
    pub brief: String,
    pub model: Option<String>,
}

pub fn post_meta(
    yaml: &str,
    path: &str,
    default_authors: &[String],
) -> Result<PostMeta, Vec<SchemaIssue>> {
    let mut fields = Fields::parse(yaml, path)?;
    let title = fields.required_string("title", 100);
    let date = fields.required_date("date");
    let updated = fields.optional_date("updated");
    let description = fields.required_string("description", 300);
    let image = fields.optional_string("image", 200);
    let published = fields.bool_or("published", true);
    let soul = fields.optional_string("soul", 50);
    let authors = fields.string_list_or("authors", default_authors);
    fields.finish()?;

    match (title, date, description) {
        (Some(title), Some(date), Some(description)) => Ok(PostMeta {
            title,
            date,
            updated,
            description,
            image,
            published,
            soul,
            authors,
        }),
        _ => Err(fields.issues),
    }
}

pub fn author_meta(yaml: &str, path: &str) -> Result<AuthorMeta, Vec<SchemaIssue>> {
    let mut fields = Fields::parse(yaml, path)?;
    let name = fields.required_string("name", 100);
    let twitter = fields.optional_string("twitter", 100);
    fields.finish()?;

    match name {
        Some(name) => Ok(AuthorMeta { name, twitter }),
        None => Err(fields.issues),
    }
}

pub fn soul_meta(yaml: &str, path: &str) -> Result<SoulMeta, Vec<SchemaIssue>> {
    let mut fields = Fields::parse(yaml, path)?;
    let name = fields.required_string("name", 100);
    let alias = fields.required_string("alias", 50);
    let version = fields.required_string("version", 20);
    let last_reflection = fields.required_date("lastReflection");
    let published = fields.bool_or("published", false);
    let brief = fields.required_string("brief", 500);
    let model = fields.optional_string("model", 50);
    fields.finish()?;

    match (name, alias, version, last_reflection, brief) {
        (Some(name), Some(alias), Some(version), Some(last_reflection), Some(brief)) => {
            Ok(SoulMeta {
                name,
                alias,
                version,
                last_reflection,
                published,
                brief,
                model,
            })
        }
        _ => Err(fields.issues),
    }
}

/// Parse a frontmatter date value.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Field extraction
// ============================================================================

struct Fields<'a> {
    map: Mapping,
    path: &'a str,
    issues: Vec<SchemaIssue>,
}

impl<'a> Fields<'a> {
    fn parse(yaml: &str, path: &'a str) -> Result<Self, Vec<SchemaIssue>> {
        let issue = |message: String| {
            vec![SchemaIssue {
                path: path.to_string(),
                field: "frontmatter".to_string(),
                message,
            }]
        };
        let value: Value = serde_yaml::from_str(yaml).map_err(|e| issue(e.to_string()))?;
        let map = match value {
            Value::Mapping(map) => map,
            Value::Null => Mapping::new(),
            _ => return Err(issue("expected a mapping of fields".to_string())),
        };
        Ok(Self {
            map,
            path,
            issues: Vec::new(),
        })
    }

    fn issue(&mut self, field: &str, message: impl Into<String>) {
        self.issues.push(SchemaIssue {
            path: self.path.to_string(),
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn get(&self, field: &str) -> Option<&Value> {
        self.map.get(field).filter(|v| !v.is_null())
    }

    fn string(&mut self, field: &str, max: usize) -> Option<String> {
        let value = self.get(field)?;
        let Some(s) = value.as_str().map(str::to_string) else {
            self.issue(field, "expected a string");
            return None;
        };
        let len = s.chars().count();
        if len > max {
            self.issue(
                field,
                format!("must be at most {max} characters (got {len})"),
            );
            return None;
        }
        Some(s)
    }

    fn required_string(&mut self, field: &str, max: usize) -> Option<String> {
        if self.get(field).is_none() {
            self.issue(field, "required");
            return None;
        }
        self.string(field, max)
    }

    fn optional_string(&mut self, field: &str, max: usize) -> Option<String> {
        self.string(field, max)
    }

    fn date(&mut self, field: &str) -> Option<DateTime<Utc>> {
        let value = self.get(field)?;
        let Some(raw) = value.as_str().map(str::to_string) else {
            self.issue(field, "expected a date string");
            return None;
        };
        let parsed = parse_date(&raw);
        if parsed.is_none() {
            self.issue(field, format!("invalid date {raw:?}"));
        }
        parsed
    }

    fn required_date(&mut self, field: &str) -> Option<DateTime<Utc>> {
        if self.get(field).is_none() {
            self.issue(field, "required");
            return None;
        }
        self.date(field)
    }

    fn optional_date(&mut self, field: &str) -> Option<DateTime<Utc>> {
        self.date(field)
    }

    fn bool_or(&mut self, field: &str, default: bool) -> bool {
        match self.get(field) {
            None => default,
            Some(Value::Bool(b)) => *b,
            Some(_) => {
                self.issue(field, "expected true or false");
                default
            }
        }
    }

    fn string_list_or(&mut self, field: &str, default: &[String]) -> Vec<String> {
        let Some(value) = self.get(field) else {
            return default.to_vec();
        };
        let Some(items) = value.as_sequence() else {
            self.issue(field, "expected a list of strings");
            return default.to_vec();
        };
        let strings: Option<Vec<String>> = items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect();
        match strings {
            Some(list) => list,
            None => {
                self.issue(field, "expected a list of strings");
                default.to_vec()
            }
        }
    }

    fn finish(&self) -> Result<(), Vec<SchemaIssue>> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(self.issues.clone())
        }
    }
}
