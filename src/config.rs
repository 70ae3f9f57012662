//! Site configuration for a quire project.
//!
//! This module handles the deserialization of `site.toml` into a
//! [`SiteConfig`]. The record is checked while it is built: a URL that does not
//! parse, a zero page size or an invalid theme selection never produces a
//! value. Once loaded the configuration is read-only for the rest of the build.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::num::NonZeroUsize;
use std::path::Path;
use url::Url;

use crate::error::{ConfigError, Error, Result};
use crate::themes::{RawThemes, Themes};

/// The root configuration schema for a quire site.
///
/// Keys follow the camelCase names used in `site.toml`
/// (`pageSize`, `trailingSlashes`, `socialLinks`). Fields are private so every
/// value goes through the same checks as a loaded file:
///
/// ```compile_fail
/// fn blank(config: &mut quire::SiteConfig) {
///     config.title = String::new();
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSiteConfig", into = "RawSiteConfig")]
pub struct SiteConfig {
    // --- Identity ---

    /// Absolute URL to the root of the published site, used for links and sitemaps.
    site: Url,

    /// The name of the site, used in the title and for SEO.
    title: String,

    /// Short description for meta tags and the RSS feed.
    description: String,

    /// Site author, shown in the footer and feed metadata.
    author: String,

    /// Keywords for the meta tags, in declaration order.
    tags: Vec<String>,

    /// The single bundled font used across the site.
    font: String,

    // --- Listing & routing ---

    /// Number of posts per listing page.
    page_size: NonZeroUsize,

    /// Whether generated links end with a `/`.
    trailing_slashes: bool,

    // --- Presentation ---

    themes: Themes,

    /// Platform name to profile URL. Any platform name is accepted.
    social_links: BTreeMap<String, Url>,
}

/// Wire shape of `site.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RawSiteConfig {
    pub site: Url,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub font: String,
    #[serde(default = "default_page_size")]
    pub page_size: NonZeroUsize,
    #[serde(default = "default_bool_false")]
    pub trailing_slashes: bool,
    pub themes: RawThemes,
    #[serde(default)]
    pub social_links: BTreeMap<String, Url>,
}

impl TryFrom<RawSiteConfig> for SiteConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSiteConfig) -> Result<Self, Self::Error> {
        if raw.title.trim().is_empty() {
            return Err(ConfigError::Empty { field: "title" });
        }
        if raw.font.trim().is_empty() {
            return Err(ConfigError::Empty { field: "font" });
        }

        let mut seen = HashSet::new();
        for tag in &raw.tags {
            if !seen.insert(tag.as_str()) {
                return Err(ConfigError::DuplicateTag(tag.clone()));
            }
        }

        Ok(SiteConfig {
            site: raw.site,
            title: raw.title,
            description: raw.description,
            author: raw.author,
            tags: raw.tags,
            font: raw.font,
            page_size: raw.page_size,
            trailing_slashes: raw.trailing_slashes,
            themes: Themes::try_from(raw.themes)?,
            social_links: raw.social_links,
        })
    }
}

impl From<SiteConfig> for RawSiteConfig {
    fn from(config: SiteConfig) -> Self {
        RawSiteConfig {
            site: config.site,
            title: config.title,
            description: config.description,
            author: config.author,
            tags: config.tags,
            font: config.font,
            page_size: config.page_size,
            trailing_slashes: config.trailing_slashes,
            themes: config.themes.into(),
            social_links: config.social_links,
        }
    }
}

impl SiteConfig {
    pub fn site(&self) -> &Url {
        &self.site
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn font(&self) -> &str {
        &self.font
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    pub fn trailing_slashes(&self) -> bool {
        self.trailing_slashes
    }

    pub fn themes(&self) -> &Themes {
        &self.themes
    }

    pub fn social_links(&self) -> &BTreeMap<String, Url> {
        &self.social_links
    }

    /// Parses and validates a configuration from TOML source.
    ///
    /// `origin` only labels parse errors.
    pub fn from_toml(src: &str, origin: &Path) -> Result<Self> {
        let raw: RawSiteConfig = toml::from_str(src).map_err(|source| Error::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(SiteConfig::try_from(raw)?)
    }

    /// Number of posts in the homepage's "Latest Posts" section.
    pub fn home_page_size(&self) -> usize {
        (self.page_size.get() / 2).max(1)
    }

    /// Builds an absolute link to `path` under the site root, following the
    /// `trailing_slashes` setting. Paths ending in a file name with an
    /// extension are left alone.
    pub fn href(&self, path: &str) -> String {
        let mut base = self.site.as_str().trim_end_matches('/').to_string();
        let path = path.trim_matches('/');

        if path.is_empty() {
            base.push('/');
            return base;
        }

        base.push('/');
        base.push_str(path);

        let is_file = path
            .rsplit('/')
            .next()
            .is_some_and(|segment| segment.contains('.'));
        if self.trailing_slashes && !is_file {
            base.push('/');
        }
        base
    }
}

/// Reads and validates `site.toml` (or whichever path is given).
pub fn load(path: &Path) -> Result<SiteConfig> {
    let src = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let config = SiteConfig::from_toml(&src, path)?;
    tracing::debug!(
        path = %path.display(),
        mode = %config.themes().mode(),
        page_size = config.page_size().get(),
        "loaded site configuration"
    );
    Ok(config)
}

// --- Default value providers ---

fn default_page_size() -> NonZeroUsize { NonZeroUsize::new(10).unwrap_or(NonZeroUsize::MIN) }
fn default_bool_false() -> bool { false }

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::{DefaultTheme, ThemeMode};
    use std::path::PathBuf;

    const SITE_TOML: &str = r#"
site = "https://twistezo.github.io/blog"
title = "twistezo"
description = "this and that about programming"
author = "Lukasz Kolko"
tags = ["twistezo", "programming", "blog"]
font = "JetBrains Mono Variable"
pageSize = 15
trailingSlashes = false

[themes]
mode = "select"
default = "catppuccin-macchiato"
include = ["catppuccin-latte", "catppuccin-macchiato", "dracula", "github-dark", "github-light"]

[socialLinks]
github = "https://github.com/twistezo"
linkedin = "https://www.linkedin.com/in/lukaszkolko/"
"#;

    fn parse(src: &str) -> Result<SiteConfig> {
        SiteConfig::from_toml(src, &PathBuf::from("site.toml"))
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse(SITE_TOML).unwrap();
        assert_eq!(config.title(), "twistezo");
        assert_eq!(config.page_size().get(), 15);
        assert!(!config.trailing_slashes());
        assert_eq!(config.tags(), vec!["twistezo", "programming", "blog"]);
        assert_eq!(config.themes().mode(), ThemeMode::Select);
        assert_eq!(
            config.themes().default_theme(),
            DefaultTheme::Named("catppuccin-macchiato")
        );
        assert_eq!(config.social_links().len(), 2);
        assert_eq!(
            config.social_links()["github"].as_str(),
            "https://github.com/twistezo"
        );
    }

    #[test]
    fn test_defaults_for_optional_keys() {
        let config = parse(
            r#"
site = "https://example.com"
title = "t"
font = "Inter"
[themes]
mode = "single"
default = "nord"
include = ["nord"]
"#,
        )
        .unwrap();
        assert_eq!(config.page_size().get(), 10);
        assert!(config.social_links().is_empty());
        assert!(config.tags().is_empty());
        assert_eq!(config.description(), "");
    }

    #[test]
    fn test_default_theme_not_included_is_rejected() {
        let src = SITE_TOML.replace(
            "default = \"catppuccin-macchiato\"",
            "default = \"nord\"",
        );
        let err = parse(&src).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::DefaultNotIncluded(ref t)) if t == "nord"
        ));
    }

    #[test]
    fn test_zero_page_size_is_a_parse_error() {
        let src = SITE_TOML.replace("pageSize = 15", "pageSize = 0");
        assert!(matches!(parse(&src), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_relative_site_url_is_a_parse_error() {
        let src = SITE_TOML.replace("https://twistezo.github.io/blog", "/blog");
        assert!(matches!(parse(&src), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let src = format!("themeMode = \"select\"\n{SITE_TOML}");
        assert!(matches!(parse(&src), Err(Error::ConfigParse { .. })));
    }

    #[test]
    fn test_unknown_themes_key_is_rejected() {
        let src = SITE_TOML.replace("[themes]\n", "[themes]\nswitcher = true\n");
        let err = parse(&src).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { .. }));
        assert!(err.to_string().contains("unknown field `switcher`"), "{err}");
    }

    #[test]
    fn test_duplicate_site_tag() {
        let src = SITE_TOML.replace("\"blog\"]", "\"blog\", \"blog\"]");
        assert!(matches!(
            parse(&src),
            Err(Error::Config(ConfigError::DuplicateTag(_)))
        ));
    }

    #[test]
    fn test_empty_font() {
        let src = SITE_TOML.replace("JetBrains Mono Variable", " ");
        assert!(matches!(
            parse(&src),
            Err(Error::Config(ConfigError::Empty { field: "font" }))
        ));
    }

    #[test]
    fn test_home_page_size() {
        let config = parse(SITE_TOML).unwrap();
        assert_eq!(config.home_page_size(), 7);

        let tiny = parse(&SITE_TOML.replace("pageSize = 15", "pageSize = 1")).unwrap();
        assert_eq!(tiny.home_page_size(), 1);
    }

    #[test]
    fn test_href_without_trailing_slashes() {
        let config = parse(SITE_TOML).unwrap();
        assert_eq!(config.href("/"), "https://twistezo.github.io/blog/");
        assert_eq!(
            config.href("/posts/hello/"),
            "https://twistezo.github.io/blog/posts/hello"
        );
        assert_eq!(
            config.href("rss.xml"),
            "https://twistezo.github.io/blog/rss.xml"
        );
    }

    #[test]
    fn test_href_with_trailing_slashes() {
        let config = parse(&SITE_TOML.replace("trailingSlashes = false", "trailingSlashes = true"))
            .unwrap();
        assert_eq!(
            config.href("posts/hello"),
            "https://twistezo.github.io/blog/posts/hello/"
        );
        assert_eq!(
            config.href("/rss.xml"),
            "https://twistezo.github.io/blog/rss.xml"
        );
    }

    #[test]
    fn test_serialize_back_to_camel_case() {
        let config = parse(SITE_TOML).unwrap();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["pageSize"], 15);
        assert_eq!(json["themes"]["mode"], "select");
        assert_eq!(json["socialLinks"]["github"], "https://github.com/twistezo");
    }
}
