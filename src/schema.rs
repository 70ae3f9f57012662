//! The `posts` frontmatter schema.
//!
//! [`validate_post`] turns an untyped frontmatter mapping into a [`Post`],
//! applying defaults and coercions. It never stops at the first problem: every
//! field is checked and all issues are returned together so an author can fix
//! a file in one go.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::fmt;

use crate::frontmatter::type_name;
use crate::models::Post;

/// Keys the schema knows about. Anything else is stripped.
pub const KNOWN_KEYS: &[&str] = &["title", "published", "description", "author", "tags", "toc"];

/// Largest distance from the epoch, in milliseconds, a coerced date may have.
const MAX_TIMESTAMP_MS: f64 = 8.64e15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path of the offending value, e.g. `title` or `tags.2`.
    pub path: String,
    pub kind: IssueKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Required,
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },
    InvalidDate,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Required => write!(f, "{}: Required", self.path),
            IssueKind::InvalidType { expected, received } => {
                write!(f, "{}: Expected {expected}, received {received}", self.path)
            }
            IssueKind::InvalidDate => write!(f, "{}: Invalid date", self.path),
        }
    }
}

impl FieldIssue {
    fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        FieldIssue { path: path.into(), kind }
    }

    fn invalid_type(path: impl Into<String>, expected: &'static str, received: &Value) -> Self {
        FieldIssue::new(
            path,
            IssueKind::InvalidType { expected, received: type_name(received) },
        )
    }
}

/// Validates one frontmatter mapping against the post schema.
pub fn validate_post(data: &Map<String, Value>) -> Result<Post, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let title = required_string(data, "title", &mut issues);
    let published = published(data, &mut issues);
    let description = optional_string(data, "description", &mut issues);
    let author = optional_string(data, "author", &mut issues);
    let tags = tags(data, &mut issues);
    let toc = match data.get("toc") {
        None => Some(true),
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            issues.push(FieldIssue::invalid_type("toc", "boolean", other));
            None
        }
    };

    match (title, published, description, author, tags, toc) {
        (Some(title), Some(published), Some(description), Some(author), Some(tags), Some(toc)) => {
            Ok(Post { title, published, description, author, tags, toc })
        }
        _ => Err(issues),
    }
}

/// Checks the optional `slug` override used for the entry id.
pub fn validate_slug(data: &Map<String, Value>) -> Result<Option<&str>, FieldIssue> {
    match data.get("slug") {
        None => Ok(None),
        Some(Value::String(slug)) => Ok(Some(slug.as_str())),
        Some(other) => Err(FieldIssue::invalid_type("slug", "string", other)),
    }
}

fn required_string(
    data: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match data.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        None => {
            issues.push(FieldIssue::new(key, IssueKind::Required));
            None
        }
        Some(other) => {
            issues.push(FieldIssue::invalid_type(key, "string", other));
            None
        }
    }
}

/// `Some(None)` when the key is absent, `None` when it is present but wrong.
fn optional_string(
    data: &Map<String, Value>,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<Option<String>> {
    match data.get(key) {
        None => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(other) => {
            issues.push(FieldIssue::invalid_type(key, "string", other));
            None
        }
    }
}

fn published(data: &Map<String, Value>, issues: &mut Vec<FieldIssue>) -> Option<DateTime<Utc>> {
    let value = match data.get("published") {
        Some(value) => value,
        None => {
            issues.push(FieldIssue::new("published", IssueKind::Required));
            return None;
        }
    };
    match value {
        Value::String(_) | Value::Number(_) => {
            let date = coerce_date(value);
            if date.is_none() {
                issues.push(FieldIssue::new("published", IssueKind::InvalidDate));
            }
            date
        }
        other => {
            issues.push(FieldIssue::invalid_type("published", "date", other));
            None
        }
    }
}

fn tags(data: &Map<String, Value>, issues: &mut Vec<FieldIssue>) -> Option<Vec<String>> {
    let items = match data.get("tags") {
        None => return Some(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(other) => {
            issues.push(FieldIssue::invalid_type("tags", "array", other));
            return None;
        }
    };

    let mut tags = Vec::with_capacity(items.len());
    let mut ok = true;
    for (i, item) in items.iter().enumerate() {
        match item {
            Value::String(s) => tags.push(s.clone()),
            other => {
                issues.push(FieldIssue::invalid_type(format!("tags.{i}"), "string", other));
                ok = false;
            }
        }
    }
    ok.then_some(tags)
}

/// Coerces a date-like value into a UTC timestamp.
///
/// Strings may be a plain date (`2024-01-01`, `2024/01/01`, `January 1, 2024`,
/// `Jan 1 2024`; midnight UTC), RFC 3339 or ISO 8601 with a numeric offset,
/// a date and time without offset (read as UTC) or RFC 2822. Numbers are
/// milliseconds since the Unix epoch.
pub fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date(s.trim()),
        Value::Number(n) => {
            if let Some(ms) = n.as_i64() {
                if (ms as f64).abs() > MAX_TIMESTAMP_MS {
                    return None;
                }
                return DateTime::from_timestamp_millis(ms);
            }
            let ms = n.as_f64()?;
            if !ms.is_finite() || ms.abs() > MAX_TIMESTAMP_MS {
                return None;
            }
            DateTime::from_timestamp_millis(ms.trunc() as i64)
        }
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    const DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%B %d, %Y",
        "%B %d %Y",
        "%b %d %Y",
        "%d %B %Y",
    ];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];
    for format in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
