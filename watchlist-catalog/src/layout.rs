//! On-disk layout of the data root.
//!
//! ```text
//! <root>/
//!   franchises/<franchise>/entries/<entry>/sources/anilist_raw.json
//!   franchises/<franchise>/entries/<entry>/sources/jikan_raw.json
//!   franchises/<franchise>/extracted_entities/{characters,creators,companies}.json
//!   characters/<slug>/character.json
//!   characters/<slug>/sources/<source>.json
//!   characters/_index.json
//!   creators/...  companies/...
//!   image_manifest.json
//! ```

use std::path::{Path, PathBuf};

use crate::types::{EntityClass, SourceKind};

pub const ANILIST_RAW: &str = "anilist_raw.json";
pub const JIKAN_RAW: &str = "jikan_raw.json";
pub const INDEX_FILE: &str = "_index.json";
pub const MANIFEST_FILE: &str = "image_manifest.json";

/// Paths under one data root.
#[derive(Debug, Clone)]
pub struct DataLayout {
    root: PathBuf,
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn franchises_dir(&self) -> PathBuf {
        self.root.join("franchises")
    }

    pub fn franchise_dir(&self, franchise: &str) -> PathBuf {
        self.franchises_dir().join(franchise)
    }

    pub fn entries_dir(&self, franchise: &str) -> PathBuf {
        self.franchise_dir(franchise).join("entries")
    }

    pub fn extracted_dir(&self, franchise: &str) -> PathBuf {
        self.franchise_dir(franchise).join("extracted_entities")
    }

    pub fn extracted_file(&self, franchise: &str, class: EntityClass) -> PathBuf {
        self.extracted_dir(franchise)
            .join(format!("{}.json", class.plural()))
    }

    pub fn class_dir(&self, class: EntityClass) -> PathBuf {
        self.root.join(class.plural())
    }

    pub fn entity_dir(&self, class: EntityClass, slug: &str) -> PathBuf {
        self.class_dir(class).join(slug)
    }

    pub fn entity_file(&self, class: EntityClass, slug: &str) -> PathBuf {
        self.entity_dir(class, slug)
            .join(format!("{}.json", class.as_str()))
    }

    pub fn entity_source_file(&self, class: EntityClass, slug: &str, source: SourceKind) -> PathBuf {
        self.entity_dir(class, slug)
            .join("sources")
            .join(format!("{}.json", source.as_str()))
    }

    pub fn index_file(&self, class: EntityClass) -> PathBuf {
        self.class_dir(class).join(INDEX_FILE)
    }

    pub fn manifest_file(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }
}

/// Raw source documents for one entry.
#[derive(Debug, Clone)]
pub struct EntrySources {
    pub entry_slug: String,
    pub anilist: PathBuf,
    pub jikan: PathBuf,
}

impl EntrySources {
    pub fn in_dir(entry_slug: impl Into<String>, sources_dir: &Path) -> Self {
        Self {
            entry_slug: entry_slug.into(),
            anilist: sources_dir.join(ANILIST_RAW),
            jikan: sources_dir.join(JIKAN_RAW),
        }
    }
}
