//! Content layer for a static blog.
//!
//! quire does two things and hands the results to whatever renders the site:
//!
//! 1. Loads `site.toml` into a [`SiteConfig`] that is validated as it is
//!    built ([`config`], [`themes`]).
//! 2. Loads the `posts` collection: every markdown/MDX file under the content
//!    directory, with frontmatter checked against the post schema
//!    ([`collection`], [`frontmatter`], [`schema`]).
//!
//! ```no_run
//! use std::path::Path;
//!
//! let site = quire::Site::load(Path::new("site.toml"), Path::new("src/content/posts"))?;
//! for entry in site.posts().sorted_by_published() {
//!     println!("{} {}", entry.data.published.format("%Y-%m-%d"), entry.data.title);
//! }
//! # Ok::<(), quire::Error>(())
//! ```

pub mod collection;
pub mod config;
pub mod error;
pub mod frontmatter;
pub mod glob;
pub mod manifest;
pub mod models;
pub mod schema;
pub mod slug;
pub mod themes;
pub mod toc;

use std::path::Path;

pub use collection::{Collection, CollectionDef};
pub use config::SiteConfig;
pub use error::{ConfigError, EntryError, Error, Result};
pub use manifest::Manifest;
pub use models::{Entry, Heading, Post};
pub use themes::{DefaultTheme, ThemeMode, Themes};

/// Everything the renderer needs, loaded once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Site {
    config: SiteConfig,
    collections: Vec<Collection>,
}

impl Site {
    /// Loads the configuration first, then the `posts` collection from
    /// `posts_dir`. A bad configuration fails before any content is read.
    pub fn load(config_path: &Path, posts_dir: &Path) -> Result<Self> {
        let config = config::load(config_path)?;
        let posts = collection::load(&CollectionDef::posts(posts_dir))?;
        Ok(Site { config, collections: vec![posts] })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    /// The `posts` collection; [`Site::load`] always puts it first.
    pub fn posts(&self) -> &Collection {
        &self.collections[0]
    }

    pub fn manifest(&self) -> Manifest<'_> {
        Manifest::new(&self.config, &self.collections)
    }
}
