//! Global deduplication of extracted entities into a canonical registry.
//!
//! Extractions are merged in ascending franchise-slug order and slugs are
//! assigned only after every merge, so the registry does not depend on the
//! order franchises were handed in.

use std::collections::{BTreeMap, HashMap, HashSet};

use watchlist_catalog::json::JsonError;
use watchlist_catalog::layout::DataLayout;
use watchlist_catalog::normalize::slugify;
use watchlist_catalog::types::*;

use crate::extract::list_franchises;
use crate::extracted::{has_extraction, read_extraction};
use crate::identity::{IdentityKey, identity_keys};
use crate::merge::{held_id, merge_voice_actors, union_roles};
use crate::progress::ImportProgress;
use crate::report::{RunReport, RunWarning};

/// What [`CanonicalRegistry::merge`] did with an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// No existing entity matched; a new one was created.
    Created,
    /// Merged into an existing entity.
    Merged,
    /// The entity has no identity key at all and was ignored.
    Skipped,
}

/// Counts from one populate run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PopulateStats {
    pub franchises: usize,
    pub created: usize,
    pub merged: usize,
    pub skipped: usize,
}

/// All canonical entities plus the identity index that keeps them unique.
///
/// Every external id of every entity is indexed, so a second entity can never
/// claim an id that is already taken.
#[derive(Debug, Default)]
pub struct CanonicalRegistry {
    entities: Vec<CanonicalEntity>,
    index: HashMap<IdentityKey, usize>,
}

impl CanonicalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entities(&self) -> &[CanonicalEntity] {
        &self.entities
    }

    pub fn into_entities(self) -> Vec<CanonicalEntity> {
        self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn of_class(&self, class: EntityClass) -> impl Iterator<Item = &CanonicalEntity> {
        self.entities.iter().filter(move |e| e.entity_class == class)
    }

    pub fn find_by_external_id(
        &self,
        class: EntityClass,
        source: SourceKind,
        id: &SourceId,
    ) -> Option<&CanonicalEntity> {
        let key = IdentityKey::External {
            class,
            source,
            id: id.key(),
        };
        self.index.get(&key).map(|&i| &self.entities[i])
    }

    pub fn find_by_slug(&self, class: EntityClass, slug: &str) -> Option<&CanonicalEntity> {
        self.of_class(class).find(|e| e.slug == slug)
    }

    /// Merge one qualifying entity into the registry.
    ///
    /// Lookup tries every identity key of the incoming entity, primary first.
    /// On a hit, appearances, roles and voice actors are unioned and source
    /// records replaced per source. Changed stable fields are reported as
    /// [`RunWarning::DataMismatch`]. A source is left out and reported as
    /// [`RunWarning::IdentityConflict`] when its id belongs to a different
    /// entity, or when the matched entity already holds another id for that
    /// source. An entity's external ids are never rewritten.
    pub fn merge(&mut self, entity: &QualifyingEntity, warnings: &mut Vec<RunWarning>) -> MergeOutcome {
        let class = entity.entity_class;
        let keys = identity_keys(class, &entity.external_ids(), &entity.canonical_name);
        if keys.is_empty() {
            log::debug!(
                "Skipping {} '{}' from {}: no identity",
                class,
                entity.canonical_name,
                entity.franchise_slug
            );
            return MergeOutcome::Skipped;
        }

        let Some(idx) = keys.iter().find_map(|k| self.index.get(k).copied()) else {
            let idx = self.entities.len();
            self.entities.push(new_canonical(entity));
            for key in keys {
                self.index.insert(key, idx);
            }
            return MergeOutcome::Created;
        };

        let identity = keys[0].to_string();
        for (source, record) in &entity.sources {
            let key = IdentityKey::External {
                class,
                source: *source,
                id: record.source_id.key(),
            };
            if let Some(&owner) = self.index.get(&key) {
                if owner != idx {
                    log::warn!(
                        "{} {} from {} already belongs to '{}'",
                        class,
                        key,
                        entity.franchise_slug,
                        self.entities[owner].name
                    );
                    warnings.push(RunWarning::IdentityConflict {
                        class,
                        key: key.to_string(),
                        franchise: entity.franchise_slug.clone(),
                    });
                    continue;
                }
            }
            if let Some(held) = held_id(&self.entities[idx].external_ids, *source, &record.source_id) {
                log::warn!(
                    "{} {} from {}: '{}' already has {}:{}",
                    class,
                    key,
                    entity.franchise_slug,
                    self.entities[idx].name,
                    source,
                    held
                );
                warnings.push(RunWarning::IdentityConflict {
                    class,
                    key: key.to_string(),
                    franchise: entity.franchise_slug.clone(),
                });
                continue;
            }

            let existing = &mut self.entities[idx];
            if let Some(previous) = existing.sources.get(source) {
                for field in previous.stable_differences(record) {
                    warnings.push(RunWarning::DataMismatch {
                        class,
                        identity: identity.clone(),
                        source: *source,
                        field,
                        previous: field_value(previous, field),
                        current: field_value(record, field),
                        franchise: entity.franchise_slug.clone(),
                    });
                }
            }
            existing.sources.insert(*source, record.clone());
            existing.external_ids.insert(*source, record.source_id.clone());
            self.index.insert(key, idx);
        }

        let existing = &mut self.entities[idx];
        let appearance = existing
            .appearances
            .entry(entity.franchise_slug.clone())
            .or_default();
        appearance.entries.extend(entity.entries.iter().cloned());
        union_roles(&mut appearance.roles, &entity.roles);
        union_roles(&mut existing.roles, &entity.roles);
        merge_voice_actors(&mut existing.voice_actors, &entity.voice_actors);
        if !entity.canonical_name.is_empty() {
            existing.name = entity.canonical_name.clone();
        }
        if let Some(native) = entity.native_name() {
            existing.native_name = Some(native.to_string());
        }

        MergeOutcome::Merged
    }

    /// Give every entity a slug unique within its class.
    ///
    /// Entities are grouped by the slug of their name. In a group, the entity
    /// with the most appearances (then the smallest identity key) keeps the
    /// bare slug; the rest get their first franchise appended, or a counter
    /// if that is taken too.
    pub fn assign_slugs(&mut self) {
        for class in EntityClass::ALL {
            let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
            for (i, entity) in self.entities.iter().enumerate() {
                if entity.entity_class == class {
                    groups.entry(base_slug(entity)).or_default().push(i);
                }
            }

            for members in groups.values_mut() {
                members.sort_by_cached_key(|&i| {
                    let e = &self.entities[i];
                    (std::cmp::Reverse(e.appearances.len()), sort_key(e))
                });
            }

            let mut taken: HashSet<String> = groups.keys().cloned().collect();
            for (base, members) in &groups {
                self.entities[members[0]].slug = base.clone();
                for &i in &members[1..] {
                    let slug = self.entities[i]
                        .appearances
                        .keys()
                        .next()
                        .map(|f| format!("{base}-{f}"))
                        .filter(|s| !taken.contains(s))
                        .unwrap_or_else(|| {
                            (2..)
                                .map(|n| format!("{base}-{n}"))
                                .find(|s| !taken.contains(s))
                                .unwrap_or_default()
                        });
                    taken.insert(slug.clone());
                    self.entities[i].slug = slug;
                }
            }
        }
    }
}

fn new_canonical(entity: &QualifyingEntity) -> CanonicalEntity {
    CanonicalEntity {
        slug: String::new(),
        entity_class: entity.entity_class,
        name: entity.canonical_name.clone(),
        native_name: entity.native_name().map(str::to_string),
        external_ids: entity.external_ids(),
        appearances: BTreeMap::from([(entity.franchise_slug.clone(), entity.appearance())]),
        roles: entity.roles.clone(),
        voice_actors: entity.voice_actors.clone(),
        sources: entity.sources.clone(),
    }
}

fn field_value(record: &SourceRecord, field: &str) -> String {
    match field {
        "source_id" => record.source_id.to_string(),
        "raw_name" => record.raw_name.clone(),
        "native_name" => record.native_name.clone().unwrap_or_default(),
        "image" => record.image.clone().unwrap_or_default(),
        _ => String::new(),
    }
}

fn sort_key(entity: &CanonicalEntity) -> String {
    identity_keys(entity.entity_class, &entity.external_ids, &entity.name)
        .first()
        .map(|k| k.to_string())
        .unwrap_or_default()
}

fn base_slug(entity: &CanonicalEntity) -> String {
    let slug = slugify(&entity.name);
    if !slug.is_empty() {
        return slug;
    }
    let id = entity
        .external_ids
        .values()
        .next()
        .map(SourceId::key)
        .unwrap_or_else(|| slugify(&sort_key(entity)));
    format!("{}-{}", entity.entity_class, id)
}

/// Merge a set of franchise extractions into a fresh registry.
pub fn populate(
    extractions: &[FranchiseExtraction],
    warnings: &mut Vec<RunWarning>,
) -> (CanonicalRegistry, PopulateStats) {
    let mut ordered: Vec<&FranchiseExtraction> = extractions.iter().collect();
    ordered.sort_by(|a, b| a.franchise_slug.cmp(&b.franchise_slug));

    let mut registry = CanonicalRegistry::new();
    let mut stats = PopulateStats {
        franchises: ordered.len(),
        ..PopulateStats::default()
    };

    for extraction in ordered {
        for class in EntityClass::ALL {
            for entity in extraction.of_class(class) {
                match registry.merge(entity, warnings) {
                    MergeOutcome::Created => stats.created += 1,
                    MergeOutcome::Merged => stats.merged += 1,
                    MergeOutcome::Skipped => stats.skipped += 1,
                }
            }
        }
    }

    registry.assign_slugs();
    (registry, stats)
}

/// Read every franchise's extracted files from the data root and populate.
///
/// A franchise whose files cannot be read is recorded as failed and left out.
/// Franchises that were never extracted are ignored.
pub fn populate_from_layout(
    layout: &DataLayout,
    progress: Option<&dyn ImportProgress>,
) -> Result<(CanonicalRegistry, RunReport, PopulateStats), JsonError> {
    let franchises: Vec<String> = list_franchises(layout)?
        .into_iter()
        .filter(|slug| has_extraction(layout, slug))
        .collect();
    let mut report = RunReport::new();

    if let Some(p) = progress {
        p.on_phase(&format!(
            "Loading extracted entities from {} franchise(s)",
            franchises.len()
        ));
    }

    let mut extractions = Vec::with_capacity(franchises.len());
    for (i, slug) in franchises.iter().enumerate() {
        match read_extraction(layout, slug) {
            Ok(extraction) => {
                report.record_success(&extraction);
                extractions.push(extraction);
            }
            Err(e) => {
                log::warn!("{}: cannot read extracted entities: {}", slug, e);
                report.record_failure(slug, e);
            }
        }
        if let Some(p) = progress {
            p.on_franchise(i + 1, franchises.len(), slug);
        }
    }

    let mut warnings = Vec::new();
    let (registry, stats) = populate(&extractions, &mut warnings);
    report.extend_warnings(warnings);

    if let Some(p) = progress {
        p.on_complete(&format!(
            "Merged into {} canonical entities ({} new, {} merged)",
            registry.len(),
            stats.created,
            stats.merged
        ));
    }

    Ok((registry, report, stats))
}
