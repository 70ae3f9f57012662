//! Content collections: a named set of entries loaded from a directory.
//!
//! Loading is all-or-nothing. Every matched file is read, split and validated;
//! if any of them fails, [`load`] returns [`Error::Collection`] listing all the
//! failures and no entries at all.

use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{EntryError, EntryErrorKind, Error, Result};
use crate::frontmatter;
use crate::glob::GlobSet;
use crate::models::Entry;
use crate::schema::{self, KNOWN_KEYS};
use crate::slug::slugify;

/// Name of the blog posts collection.
pub const POSTS: &str = "posts";

/// Where posts live unless told otherwise.
pub const DEFAULT_POSTS_DIR: &str = "./src/content/posts";

/// Which files make up a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionDef {
    pub name: String,
    pub base: PathBuf,
    pub patterns: Vec<String>,
}

impl CollectionDef {
    /// The `posts` collection: every `.md` and `.mdx` file under `base`.
    pub fn posts(base: impl Into<PathBuf>) -> Self {
        CollectionDef {
            name: POSTS.to_string(),
            base: base.into(),
            patterns: vec!["**/*.md".to_string(), "**/*.mdx".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    name: String,
    entries: Vec<Entry>,
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in walk order (sorted by path).
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Newest first; ties keep walk order.
    pub fn sorted_by_published(&self) -> Vec<&Entry> {
        let mut sorted: Vec<&Entry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.data.published.cmp(&a.data.published));
        sorted
    }

    /// Groups entries by tag, each group newest first.
    pub fn tags(&self) -> BTreeMap<&str, Vec<&Entry>> {
        let mut taxonomies: BTreeMap<&str, Vec<&Entry>> = BTreeMap::new();
        for entry in self.sorted_by_published() {
            let tags: BTreeSet<&str> = entry.data.tags.iter().map(String::as_str).collect();
            for tag in tags {
                taxonomies.entry(tag).or_default().push(entry);
            }
        }
        taxonomies
    }
}

/// Loads and validates every file of `def`.
///
/// A missing base directory yields an empty collection with a warning.
pub fn load(def: &CollectionDef) -> Result<Collection> {
    let globs = GlobSet::new(&def.patterns).map_err(|source| Error::Pattern {
        patterns: def.patterns.clone(),
        source,
    })?;

    if !def.base.is_dir() {
        tracing::warn!(
            collection = %def.name,
            base = %def.base.display(),
            "base directory does not exist, collection is empty"
        );
        return Ok(Collection { name: def.name.clone(), entries: Vec::new() });
    }

    let files = matched_files(&def.base, &globs)?;
    tracing::debug!(collection = %def.name, files = files.len(), "matched content files");

    let results: Vec<std::result::Result<Entry, EntryError>> = files
        .into_par_iter()
        .map(|(abs, rel)| load_entry(&def.name, &abs, &rel))
        .collect();

    let mut entries: Vec<Entry> = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for result in results {
        match result {
            Ok(entry) => match seen.get(&entry.id).copied() {
                Some(idx) => {
                    tracing::warn!(
                        collection = %def.name,
                        id = %entry.id,
                        replaced = %entries[idx].file_path.display(),
                        by = %entry.file_path.display(),
                        "duplicate entry id, the later file wins"
                    );
                    entries[idx] = entry;
                }
                None => {
                    seen.insert(entry.id.clone(), entries.len());
                    entries.push(entry);
                }
            },
            Err(failure) => failures.push(failure),
        }
    }

    if !failures.is_empty() {
        return Err(Error::Collection { name: def.name.clone(), failures });
    }

    tracing::info!(collection = %def.name, entries = entries.len(), "collection loaded");
    Ok(Collection { name: def.name.clone(), entries })
}

/// Walks `base` and returns `(absolute, relative)` paths of matching files.
///
/// Hidden entries and files starting with `_` are skipped.
fn matched_files(base: &Path, globs: &GlobSet) -> Result<Vec<(PathBuf, String)>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(base)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(base).to_path_buf();
            Error::io(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('_') {
            continue;
        }

        let Ok(rel) = entry.path().strip_prefix(base) else {
            continue;
        };
        let rel = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if globs.is_match(&rel) {
            files.push((entry.path().to_path_buf(), rel));
        }
    }
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

fn load_entry(collection: &str, abs: &Path, rel: &str) -> std::result::Result<Entry, EntryError> {
    let fail = |kind| EntryError { path: abs.to_path_buf(), kind };

    let raw = fs::read_to_string(abs).map_err(|e| fail(EntryErrorKind::Read(e.to_string())))?;
    let fm = frontmatter::parse(&raw)
        .map_err(|e| fail(EntryErrorKind::Frontmatter(e.to_string())))?;
    let (data, slug) = match (schema::validate_post(&fm.data), schema::validate_slug(&fm.data)) {
        (Ok(data), Ok(slug)) => (data, slug),
        (post, slug) => {
            let mut issues = post.err().unwrap_or_default();
            issues.extend(slug.err());
            return Err(fail(EntryErrorKind::Schema(issues)));
        }
    };

    let stripped: Vec<&str> = fm
        .data
        .keys()
        .map(String::as_str)
        .filter(|k| *k != "slug" && !KNOWN_KEYS.contains(k))
        .collect();
    if !stripped.is_empty() {
        tracing::debug!(path = %abs.display(), keys = ?stripped, "ignoring unknown frontmatter keys");
    }

    let id = entry_id(rel, slug);
    tracing::debug!(path = %abs.display(), id = %id, "validated entry");

    Ok(Entry {
        id,
        collection: collection.to_string(),
        file_path: PathBuf::from(rel),
        body: fm.body.to_string(),
        data,
    })
}

/// The frontmatter `slug` if set, otherwise the slugified relative path
/// without extension and without a trailing `/index`.
pub fn entry_id(rel: &str, slug: Option<&str>) -> String {
    if let Some(slug) = slug {
        return slug.to_string();
    }

    let without_ext = match rel.rfind('.') {
        Some(dot) if !rel[dot..].contains('/') => &rel[..dot],
        _ => rel,
    };
    let id = without_ext
        .split('/')
        .map(slugify)
        .collect::<Vec<_>>()
        .join("/");

    match id.strip_suffix("/index") {
        Some(parent) => parent.to_string(),
        None => id,
    }
}
