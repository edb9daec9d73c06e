//! Identity keys for deduplication.
//!
//! An entity is identified by its external ids, never by its slug. AniList is
//! the primary id when present, then MAL, then TVDB. Creators and companies
//! without any external id fall back to their normalized name.

use std::collections::BTreeMap;
use std::fmt;

use watchlist_catalog::normalize::normalize;
use watchlist_catalog::types::{EntityClass, SourceId, SourceKind};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdentityKey {
    External {
        class: EntityClass,
        source: SourceKind,
        id: String,
    },
    Name {
        class: EntityClass,
        name: String,
    },
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::External { source, id, .. } => write!(f, "{source}:{id}"),
            Self::Name { name, .. } => write!(f, "name:{name}"),
        }
    }
}

/// All identity keys for an entity, primary first.
///
/// External ids come in source order (AniList, MAL, TVDB). The name key is
/// only produced for creators and companies that have no external id at all.
pub fn identity_keys(
    class: EntityClass,
    external_ids: &BTreeMap<SourceKind, SourceId>,
    name: &str,
) -> Vec<IdentityKey> {
    let mut keys: Vec<IdentityKey> = external_ids
        .iter()
        .map(|(source, id)| IdentityKey::External {
            class,
            source: *source,
            id: id.key(),
        })
        .filter(|k| matches!(k, IdentityKey::External { id, .. } if !id.is_empty()))
        .collect();

    if keys.is_empty() && class != EntityClass::Character {
        let normalized = normalize(name);
        if !normalized.is_empty() {
            keys.push(IdentityKey::Name {
                class,
                name: normalized,
            });
        }
    }

    keys
}

/// The primary identity key, if the entity has any.
pub fn primary_key(
    class: EntityClass,
    external_ids: &BTreeMap<SourceKind, SourceId>,
    name: &str,
) -> Option<IdentityKey> {
    identity_keys(class, external_ids, name).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anilist_is_primary() {
        let ids = BTreeMap::from([
            (SourceKind::Mal, SourceId::Int(40)),
            (SourceKind::Anilist, SourceId::Int(95)),
        ]);
        let key = primary_key(EntityClass::Creator, &ids, "Hajime Isayama").unwrap();
        assert_eq!(key.to_string(), "anilist:95");
    }

    #[test]
    fn name_fallback_only_without_ids() {
        let empty = BTreeMap::new();
        let keys = identity_keys(EntityClass::Company, &empty, "Wit Studio");
        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].to_string(), "name:wit studio");

        assert!(identity_keys(EntityClass::Character, &empty, "Eren Yeager").is_empty());
    }
}
