//! Front-matter parsing and the blog content schema
//!
//! Front matter is untrusted input. It is split off the markdown body,
//! parsed as YAML and checked field by field against the blog schema:
//!
//! | key           | type             | required |
//! |---------------|------------------|----------|
//! | `title`       | string           | yes      |
//! | `description` | string           | no       |
//! | `publishDate` | date             | yes      |
//! | `draft`       | boolean          | no       |
//! | `tags`        | list of strings  | yes      |
//! | `slug`        | string           | no       |
//!
//! Unknown keys are ignored. Every violation is collected so that a single
//! [`SchemaError`] reports all of them at once.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::BlogData;

/// A single violated field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub message: String,
}

impl FieldIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Front matter that does not satisfy the blog schema
#[derive(Debug, Error)]
#[error("invalid front matter in {}: {}", file.display(), join_issues(issues))]
pub struct SchemaError {
    pub file: PathBuf,
    pub issues: Vec<FieldIssue>,
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validated front matter
#[derive(Debug, Clone, PartialEq)]
pub struct FrontMatter {
    pub data: BlogData,
    /// Explicit slug override
    pub slug: Option<String>,
}

impl FrontMatter {
    /// Split and validate the front matter of `content`.
    ///
    /// Returns the validated front matter and the remaining markdown body.
    pub fn parse<'a>(content: &'a str, file: &Path) -> Result<(Self, &'a str), SchemaError> {
        let (yaml, body) = split(content);

        let mapping = match yaml {
            Some(yaml) => match serde_yaml::from_str::<Value>(yaml) {
                Ok(Value::Mapping(mapping)) => mapping,
                Ok(Value::Null) => Mapping::new(),
                Ok(other) => {
                    return Err(SchemaError {
                        file: file.to_path_buf(),
                        issues: vec![FieldIssue::new(
                            "(front matter)",
                            format!("Expected object, received {}", type_name(&other)),
                        )],
                    })
                }
                Err(e) => {
                    return Err(SchemaError {
                        file: file.to_path_buf(),
                        issues: vec![FieldIssue::new("(front matter)", e.to_string())],
                    })
                }
            },
            None => Mapping::new(),
        };

        let front_matter = validate(&mapping).map_err(|issues| SchemaError {
            file: file.to_path_buf(),
            issues,
        })?;

        Ok((front_matter, body))
    }
}

/// Split a `---` fenced YAML block off the top of `content`
fn split(content: &str) -> (Option<&str>, &str) {
    let trimmed = content.trim_start_matches('\u{feff}');
    let Some(rest) = trimmed.strip_prefix("---") else {
        return (None, content);
    };
    // The opening fence must be on a line of its own
    let Some(rest) = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
    else {
        return (None, content);
    };

    if let Some(yaml) = rest.strip_prefix("---") {
        // Empty front matter: "---\n---"
        return (Some(""), yaml.trim_start_matches(['\n', '\r']));
    }

    match rest.find("\n---") {
        Some(end_pos) => {
            let yaml = &rest[..end_pos];
            let remaining = &rest[end_pos + 4..];
            (Some(yaml), remaining.trim_start_matches(['\n', '\r']))
        }
        None => (None, content),
    }
}

fn validate(mapping: &Mapping) -> Result<FrontMatter, Vec<FieldIssue>> {
    let mut issues = Vec::new();

    let title = required_string(mapping, "title", &mut issues);
    let description = optional_string(mapping, "description", &mut issues);
    let publish_date = required_date(mapping, "publishDate", &mut issues);
    let draft = optional_bool(mapping, "draft", &mut issues);
    let tags = required_strings(mapping, "tags", &mut issues);
    let slug = optional_string(mapping, "slug", &mut issues);

    if let Some(slug) = &slug {
        if let Err(message) = check_slug(slug) {
            issues.push(FieldIssue::new("slug", message));
        }
    }

    match (title, publish_date, tags) {
        (Some(title), Some(publish_date), Some(tags)) if issues.is_empty() => Ok(FrontMatter {
            data: BlogData {
                title,
                description,
                publish_date,
                draft,
                tags,
            },
            slug,
        }),
        _ => Err(issues),
    }
}

/// A slug override becomes a path under `blog/`, so it is held to the
/// shape `slug_from_id` produces: `/`-separated segments of `[a-z0-9-]`.
fn check_slug(slug: &str) -> Result<(), &'static str> {
    if slug.is_empty() {
        return Err("Must not be empty");
    }
    let valid_segment = |segment: &str| {
        !segment.is_empty()
            && segment
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    };
    if slug.split('/').all(valid_segment) {
        Ok(())
    } else {
        Err("Invalid slug: expected lowercase letters, digits and '-' in '/'-separated segments")
    }
}

fn required_string(mapping: &Mapping, key: &str, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match mapping.get(key) {
        None => {
            issues.push(FieldIssue::new(key, "Required"));
            None
        }
        Some(value) => expect_string(key, value, issues),
    }
}

fn optional_string(mapping: &Mapping, key: &str, issues: &mut Vec<FieldIssue>) -> Option<String> {
    mapping
        .get(key)
        .and_then(|value| expect_string(key, value, issues))
}

fn expect_string(key: &str, value: &Value, issues: &mut Vec<FieldIssue>) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        other => {
            issues.push(FieldIssue::new(
                key,
                format!("Expected string, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn optional_bool(mapping: &Mapping, key: &str, issues: &mut Vec<FieldIssue>) -> Option<bool> {
    match mapping.get(key)? {
        Value::Bool(b) => Some(*b),
        other => {
            issues.push(FieldIssue::new(
                key,
                format!("Expected boolean, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn required_date(
    mapping: &Mapping,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<DateTime<Utc>> {
    match mapping.get(key) {
        None => {
            issues.push(FieldIssue::new(key, "Required"));
            None
        }
        Some(Value::String(s)) => {
            let parsed = parse_date_string(s);
            if parsed.is_none() {
                issues.push(FieldIssue::new(key, format!("Invalid date {:?}", s)));
            }
            parsed
        }
        Some(other) => {
            issues.push(FieldIssue::new(
                key,
                format!("Expected date, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn required_strings(
    mapping: &Mapping,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<Vec<String>> {
    match mapping.get(key) {
        None => {
            issues.push(FieldIssue::new(key, "Required"));
            None
        }
        Some(Value::Sequence(items)) => {
            let before = issues.len();
            let mut strings = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let field = format!("{}[{}]", key, i);
                if let Some(s) = expect_string(&field, item, issues) {
                    strings.push(s);
                }
            }
            (issues.len() == before).then_some(strings)
        }
        Some(other) => {
            issues.push(FieldIssue::new(
                key,
                format!("Expected array, received {}", type_name(other)),
            ));
            None
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

/// Parse a date string in various formats.
///
/// Values without an offset are taken as UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    let offset_formats = ["%Y-%m-%d %H:%M:%S%z", "%Y-%m-%d %H:%M:%S %z"];
    for fmt in offset_formats {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
