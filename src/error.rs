//! Error types shared by the configuration loader and the content validator.
//!
//! Both kinds of failure are fatal for a build: a bad `site.toml` surfaces as
//! [`Error::Config`] / [`Error::ConfigParse`], a content tree with invalid
//! frontmatter as [`Error::Collection`] listing every offending file.

use std::fmt;
use std::path::PathBuf;

use crate::schema::FieldIssue;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a valid site configuration: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid glob pattern in {patterns:?}: {source}")]
    Pattern {
        patterns: Vec<String>,
        #[source]
        source: regex::Error,
    },

    #[error("{name} → {}", DisplayFailures(.failures))]
    Collection {
        name: String,
        failures: Vec<EntryError>,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

/// Invariants of the site configuration that serde alone cannot express.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("themes.include must list at least one theme")]
    NoThemes,

    #[error("themes.include lists `{0}` more than once")]
    DuplicateTheme(String),

    #[error("themes.include lists `{0}`, which is not a bundled theme")]
    UnknownTheme(String),

    #[error("themes.default `{0}` is not listed in themes.include")]
    DefaultNotIncluded(String),

    #[error("themes.default may only be `auto` in light-dark-auto mode")]
    AutoOutsideLightDarkAuto,

    #[error("themes.default `{0}` must be `auto` or one of the first two included themes in light-dark-auto mode")]
    DefaultOutsidePair(String),

    #[error("light-dark-auto mode needs a light and a dark theme in themes.include, found {0}")]
    LightDarkNeedsPair(usize),

    #[error("light-dark-auto mode expects `{theme}` at position {position} to be a {expected} theme")]
    LightDarkOrder {
        theme: String,
        position: usize,
        expected: &'static str,
    },

    #[error("`{field}` must not be empty")]
    Empty { field: &'static str },

    #[error("site tags list `{0}` more than once")]
    DuplicateTag(String),
}

/// A single content file that did not produce a record.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryError {
    pub path: PathBuf,
    pub kind: EntryErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EntryErrorKind {
    Read(String),
    Frontmatter(String),
    Schema(Vec<FieldIssue>),
}

impl fmt::Display for EntryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EntryErrorKind::Read(msg) => write!(f, "{}: could not be read: {}", self.path.display(), msg),
            EntryErrorKind::Frontmatter(msg) => {
                write!(f, "{}: malformed frontmatter: {}", self.path.display(), msg)
            }
            EntryErrorKind::Schema(issues) => {
                write!(f, "{}: frontmatter does not match collection schema", self.path.display())?;
                for issue in issues {
                    write!(f, "\n    {issue}")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for EntryError {}

struct DisplayFailures<'a>(&'a [EntryError]);

impl fmt::Display for DisplayFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.0.len() == 1 { "entry" } else { "entries" };
        write!(f, "{} {noun} failed validation", self.0.len())?;
        for failure in self.0 {
            write!(f, "\n  {failure}")?;
        }
        Ok(())
    }
}
