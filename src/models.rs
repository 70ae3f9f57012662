use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use crate::toc;

/// The validated frontmatter of one post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Post {
    pub title: String,
    pub published: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub toc: bool,
}

/// One content file of a collection, ready for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    pub id: String,
    pub collection: String,
    /// Path of the source file relative to the collection base.
    pub file_path: PathBuf,
    /// Markdown after the frontmatter block, untouched.
    pub body: String,
    pub data: Post,
}

impl Entry {
    /// Headings for the table of contents, empty when the post opts out.
    pub fn headings(&self) -> Vec<Heading> {
        if self.data.toc {
            toc::headings(&self.body)
        } else {
            Vec::new()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    pub depth: u8,
    pub slug: String,
    pub text: String,
}
