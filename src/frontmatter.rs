use serde_json::{Map, Value};

/// Which fence opened the metadata block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// `---` fenced YAML.
    Yaml,
    /// `+++` fenced TOML.
    Toml,
}

impl Format {
    fn fence(self) -> &'static str {
        match self {
            Format::Yaml => "---",
            Format::Toml => "+++",
        }
    }
}

/// A document split into its untyped metadata and its body.
#[derive(Debug, Clone, PartialEq)]
pub struct Frontmatter<'a> {
    /// `None` when the document has no metadata block at all.
    pub format: Option<Format>,
    pub data: Map<String, Value>,
    pub body: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrontmatterError {
    #[error("opening `{0}` has no matching closing fence")]
    Unterminated(&'static str),
    #[error("metadata block must be a mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("invalid YAML: {0}")]
    Yaml(String),
    #[error("invalid TOML: {0}")]
    Toml(String),
}

/// Splits `raw` into frontmatter and body and parses the metadata block.
///
/// The opening fence has to be the very first line (after an optional BOM) and
/// the closing fence a line of its own; a `---` further down the body is a
/// thematic break, not a fence.
pub fn parse(raw: &str) -> Result<Frontmatter<'_>, FrontmatterError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);

    let (first, rest) = split_line(raw);
    let format = match first.trim_end() {
        "---" => Format::Yaml,
        "+++" => Format::Toml,
        _ => {
            return Ok(Frontmatter { format: None, data: Map::new(), body: raw });
        }
    };

    let mut block_len = 0;
    let mut remaining = rest;
    let body = loop {
        if remaining.is_empty() {
            return Err(FrontmatterError::Unterminated(format.fence()));
        }
        let (line, next) = split_line(remaining);
        if line.trim_end() == format.fence() {
            break next;
        }
        block_len += remaining.len() - next.len();
        remaining = next;
    };
    let block = &rest[..block_len];

    let data = match format {
        Format::Yaml => parse_yaml(block)?,
        Format::Toml => parse_toml(block)?,
    };

    Ok(Frontmatter { format: Some(format), data, body })
}

/// Returns the first line (without its terminator) and everything after it.
fn split_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (s[..i].trim_end_matches('\r'), &s[i + 1..]),
        None => (s, ""),
    }
}

fn parse_yaml(block: &str) -> Result<Map<String, Value>, FrontmatterError> {
    if block.trim().is_empty() {
        return Ok(Map::new());
    }
    let value: Value =
        serde_yaml::from_str(block).map_err(|e| FrontmatterError::Yaml(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        other => Err(FrontmatterError::NotAMapping(type_name(&other))),
    }
}

fn parse_toml(block: &str) -> Result<Map<String, Value>, FrontmatterError> {
    let table: toml::Table =
        toml::from_str(block).map_err(|e| FrontmatterError::Toml(e.to_string()))?;
    Ok(table
        .into_iter()
        .map(|(k, v)| (k, toml_to_json(v)))
        .collect())
}

/// TOML datetimes have no JSON counterpart; they are kept as their RFC 3339
/// text and coerced later like any other date string.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// The name used for a JSON value's type in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
