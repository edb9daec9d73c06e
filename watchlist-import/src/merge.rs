//! Merge helpers shared by the per-franchise fold and the global registry.
//!
//! The same entity can surface several times: in more than one entry of a
//! franchise, and in more than one franchise. These helpers combine the
//! repeated observations without losing roles or voice actors.

use std::collections::BTreeMap;

use watchlist_catalog::types::{MatchedVoiceActor, QualifyingEntity, SourceId, SourceKind};

use crate::identity::{IdentityKey, identity_keys};
use crate::report::RunWarning;

/// Append roles not already present, preserving first-seen order.
pub fn union_roles(existing: &mut Vec<String>, incoming: &[String]) {
    for role in incoming {
        if !role.is_empty() && !existing.contains(role) {
            existing.push(role.clone());
        }
    }
}

/// Merge voice actors by identity. A voice actor seen again replaces the
/// earlier entry in place; new ones are appended.
pub fn merge_voice_actors(existing: &mut Vec<MatchedVoiceActor>, incoming: &[MatchedVoiceActor]) {
    for va in incoming {
        let identity = va.identity();
        match existing
            .iter_mut()
            .find(|e| identity.is_some() && e.identity() == identity)
        {
            Some(slot) => *slot = va.clone(),
            None => existing.push(va.clone()),
        }
    }
}

/// The id `ids` already holds for `source`, if it differs from `incoming`.
///
/// An entity's external ids are fixed once set; a differing id means two
/// records disagree about who the entity is.
pub fn held_id(
    ids: &BTreeMap<SourceKind, SourceId>,
    source: SourceKind,
    incoming: &SourceId,
) -> Option<String> {
    ids.get(&source)
        .map(SourceId::key)
        .filter(|held| *held != incoming.key())
}

/// Fold an entity into a franchise-level list, combining it with an earlier
/// observation of the same identity if there is one.
///
/// Entries and roles are unioned, voice actors merged, and source records
/// replaced by the newer observation. A source record whose id is held by
/// another list item, or which differs from the id already recorded for that
/// source, is reported as [`RunWarning::IdentityConflict`] and dropped.
pub fn fold_entity(
    list: &mut Vec<QualifyingEntity>,
    entity: QualifyingEntity,
    warnings: &mut Vec<RunWarning>,
) {
    let keys = entity_keys(&entity);
    let owners: Vec<usize> = list
        .iter()
        .enumerate()
        .filter(|(_, e)| entity_keys(e).iter().any(|k| keys.contains(k)))
        .map(|(i, _)| i)
        .collect();

    let Some((&i, others)) = owners.split_first() else {
        list.push(entity);
        return;
    };

    let class = entity.entity_class;
    for (source, record) in entity.sources {
        let id = record.source_id.key();
        let claimed = others.iter().any(|&j| {
            list[j]
                .sources
                .get(&source)
                .is_some_and(|r| r.source_id.key() == id)
        });
        let ids = list[i].external_ids();
        if claimed || held_id(&ids, source, &record.source_id).is_some() {
            let key = IdentityKey::External { class, source, id };
            log::warn!(
                "{} {} in {} conflicts with an earlier entry; record dropped",
                class,
                key,
                entity.franchise_slug
            );
            warnings.push(RunWarning::IdentityConflict {
                class,
                key: key.to_string(),
                franchise: entity.franchise_slug.clone(),
            });
            continue;
        }
        list[i].sources.insert(source, record);
    }

    let existing = &mut list[i];
    existing.entries.extend(entity.entries);
    union_roles(&mut existing.roles, &entity.roles);
    merge_voice_actors(&mut existing.voice_actors, &entity.voice_actors);
    existing.canonical_name = entity.canonical_name;
}

fn entity_keys(entity: &QualifyingEntity) -> Vec<IdentityKey> {
    identity_keys(
        entity.entity_class,
        &entity.external_ids(),
        &entity.canonical_name,
    )
}
