//! Filesystem canonical store.
//!
//! Each entity gets a directory holding its merged attributes and one file per
//! source record. A per-class `_index.json` maps `"<source>:<id>"` to slug for
//! downstream loaders.

use std::collections::{BTreeMap, HashSet};
use std::fs;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use watchlist_catalog::json::{JsonError, list_subdirs, load_json, save_json};
use watchlist_catalog::layout::DataLayout;
use watchlist_catalog::types::{CanonicalEntity, EntityClass, SourceKind, SourceRecord};

use crate::populate::CanonicalRegistry;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Json(#[from] JsonError),
    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: String,
        source: std::io::Error,
    },
}

/// `<class>.json` contents: the entity plus its portrait URLs per source.
#[derive(Debug, Serialize, Deserialize)]
pub struct EntityDocument {
    #[serde(flatten)]
    pub entity: CanonicalEntity,
    #[serde(default)]
    pub images: BTreeMap<SourceKind, String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StoreStats {
    pub characters: usize,
    pub creators: usize,
    pub companies: usize,
    pub source_files: usize,
    /// Entity directories removed because their slug is gone.
    pub pruned: usize,
}

impl StoreStats {
    fn count(&mut self, class: EntityClass) {
        match class {
            EntityClass::Character => self.characters += 1,
            EntityClass::Creator => self.creators += 1,
            EntityClass::Company => self.companies += 1,
        }
    }

    pub fn entities(&self) -> usize {
        self.characters + self.creators + self.companies
    }
}

/// Write every entity in the registry to the store.
///
/// The registry is the whole store: entity directories whose slug is not in
/// it are removed afterwards. With `clean`, the class directories are wiped
/// first as well, which also drops stray files.
pub fn write_store(
    layout: &DataLayout,
    registry: &CanonicalRegistry,
    clean: bool,
) -> Result<StoreStats, StoreError> {
    if clean {
        wipe_store(layout)?;
    }

    let mut stats = StoreStats::default();
    let mut indexes: BTreeMap<EntityClass, BTreeMap<String, String>> = EntityClass::ALL
        .into_iter()
        .map(|class| (class, BTreeMap::new()))
        .collect();

    for entity in registry.entities() {
        let class = entity.entity_class;
        let document = EntityDocument {
            images: entity.images(),
            entity: entity.clone(),
        };
        save_json(&layout.entity_file(class, &entity.slug), &document)?;
        stats.count(class);

        for (source, record) in &entity.sources {
            save_json(&layout.entity_source_file(class, &entity.slug, *source), record)?;
            stats.source_files += 1;
        }

        if let Some(index) = indexes.get_mut(&class) {
            for (source, id) in &entity.external_ids {
                index.insert(format!("{source}:{}", id.key()), entity.slug.clone());
            }
        }
    }

    for (class, index) in &indexes {
        save_json(&layout.index_file(*class), index)?;
    }
    stats.pruned = prune_stale(layout, registry)?;

    log::debug!(
        "Wrote {} entities and {} source records to {}",
        stats.entities(),
        stats.source_files,
        layout.root().display()
    );
    Ok(stats)
}

fn prune_stale(layout: &DataLayout, registry: &CanonicalRegistry) -> Result<usize, StoreError> {
    let mut pruned = 0;
    for class in EntityClass::ALL {
        let live: HashSet<&str> = registry.of_class(class).map(|e| e.slug.as_str()).collect();
        for dir in list_subdirs(&layout.class_dir(class))? {
            let stale = dir
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|slug| !live.contains(slug));
            if !stale {
                continue;
            }
            log::debug!("Removing stale {} {}", class, dir.display());
            fs::remove_dir_all(&dir).map_err(|e| StoreError::Remove {
                path: dir.display().to_string(),
                source: e,
            })?;
            pruned += 1;
        }
    }
    Ok(pruned)
}

/// Remove all three class directories. Returns how many existed.
pub fn wipe_store(layout: &DataLayout) -> Result<usize, StoreError> {
    let mut removed = 0;
    for class in EntityClass::ALL {
        let dir = layout.class_dir(class);
        if !dir.exists() {
            continue;
        }
        fs::remove_dir_all(&dir).map_err(|e| StoreError::Remove {
            path: dir.display().to_string(),
            source: e,
        })?;
        removed += 1;
    }
    Ok(removed)
}

/// Read every entity back from the store, with its source records, ordered by
/// class and then slug.
pub fn load_store(layout: &DataLayout) -> Result<Vec<CanonicalEntity>, StoreError> {
    let mut entities = Vec::new();
    for class in EntityClass::ALL {
        for dir in list_subdirs(&layout.class_dir(class))? {
            let Some(slug) = dir.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let path = layout.entity_file(class, slug);
            if !path.is_file() {
                continue;
            }
            let document: EntityDocument = load_json(&path)?;
            let mut entity = document.entity;
            for source in SourceKind::ALL {
                let source_path = layout.entity_source_file(class, slug, source);
                if source_path.is_file() {
                    let record: SourceRecord = load_json(&source_path)?;
                    entity.sources.insert(source, record);
                }
            }
            entities.push(entity);
        }
    }
    Ok(entities)
}

/// Read a class's `_index.json`. A missing index reads as empty.
pub fn load_index(layout: &DataLayout, class: EntityClass) -> Result<BTreeMap<String, String>, StoreError> {
    let path = layout.index_file(class);
    if !path.is_file() {
        return Ok(BTreeMap::new());
    }
    Ok(load_json(&path)?)
}
