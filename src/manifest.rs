//! JSON hand-off to the external renderer.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::collection::Collection;
use crate::config::SiteConfig;
use crate::models::{Entry, Heading};

#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub site: &'a SiteConfig,
    pub collections: BTreeMap<&'a str, Vec<ManifestEntry<'a>>>,
}

#[derive(Debug, Serialize)]
pub struct ManifestEntry<'a> {
    #[serde(flatten)]
    pub entry: &'a Entry,
    pub headings: Vec<Heading>,
}

impl<'a> Manifest<'a> {
    pub fn new(site: &'a SiteConfig, collections: &'a [Collection]) -> Self {
        let collections = collections
            .iter()
            .map(|c| {
                let entries = c
                    .entries()
                    .iter()
                    .map(|entry| ManifestEntry { entry, headings: entry.headings() })
                    .collect();
                (c.name(), entries)
            })
            .collect();
        Manifest { site, collections }
    }

    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
