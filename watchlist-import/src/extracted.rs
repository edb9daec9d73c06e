//! Per-franchise extracted entity files.
//!
//! One JSON object per class, keyed by a provisional slug. The keys only need
//! to be unique within the file; canonical slugs are assigned later by
//! population.

use std::collections::BTreeMap;

use watchlist_catalog::json::{JsonError, load_json, save_json};
use watchlist_catalog::layout::DataLayout;
use watchlist_catalog::normalize::slugify;
use watchlist_catalog::types::{EntityClass, FranchiseExtraction, QualifyingEntity, SourceKind};

/// Write all three class files for a franchise, replacing earlier ones.
pub fn write_extraction(layout: &DataLayout, extraction: &FranchiseExtraction) -> Result<(), JsonError> {
    for class in EntityClass::ALL {
        let keyed = provisional_keys(extraction.of_class(class));
        save_json(&layout.extracted_file(&extraction.franchise_slug, class), &keyed)?;
    }
    Ok(())
}

/// Read a franchise's extracted files. A missing class file reads as empty.
pub fn read_extraction(layout: &DataLayout, franchise_slug: &str) -> Result<FranchiseExtraction, JsonError> {
    let mut extraction = FranchiseExtraction::new(franchise_slug);
    for class in EntityClass::ALL {
        let path = layout.extracted_file(franchise_slug, class);
        if !path.is_file() {
            continue;
        }
        let keyed: BTreeMap<String, QualifyingEntity> = load_json(&path)?;
        let list = extraction.of_class_mut(class);
        for mut entity in keyed.into_values() {
            // The directory is authoritative if a file was moved between franchises.
            entity.franchise_slug = franchise_slug.to_string();
            entity.entity_class = class;
            list.push(entity);
        }
    }
    Ok(extraction)
}

/// Has this franchise been extracted at all?
pub fn has_extraction(layout: &DataLayout, franchise_slug: &str) -> bool {
    EntityClass::ALL
        .iter()
        .any(|class| layout.extracted_file(franchise_slug, *class).is_file())
}

/// Key each entity by the slug of its name, disambiguated by AniList id and
/// then by a counter.
fn provisional_keys(entities: &[QualifyingEntity]) -> BTreeMap<String, &QualifyingEntity> {
    let mut keyed = BTreeMap::new();
    for entity in entities {
        let mut base = slugify(&entity.canonical_name);
        if base.is_empty() {
            base = entity.entity_class.as_str().to_string();
        }

        let mut key = base.clone();
        if keyed.contains_key(&key) {
            if let Some(record) = entity.sources.get(&SourceKind::Anilist) {
                key = format!("{base}-{}", record.source_id);
            }
        }
        let mut n = 2;
        while keyed.contains_key(&key) {
            key = format!("{base}-{n}");
            n += 1;
        }
        keyed.insert(key, entity);
    }
    keyed
}
