//! Source preference hierarchy for picking display names.
//!
//! Which source's spelling wins is data, not code: each entity class carries
//! an ordered list of sources, and the first one that supplies a non-empty
//! name is used. Adding a source is a matter of adding it to a list.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{EntityClass, SourceKind, SourceRecord};

/// Ordered source lists per entity class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamePreference {
    pub characters: Vec<SourceKind>,
    pub creators: Vec<SourceKind>,
    pub companies: Vec<SourceKind>,
}

impl Default for NamePreference {
    fn default() -> Self {
        let order = vec![SourceKind::Anilist, SourceKind::Mal, SourceKind::Tvdb];
        Self {
            characters: order.clone(),
            creators: order.clone(),
            companies: order,
        }
    }
}

impl NamePreference {
    pub fn order_for(&self, class: EntityClass) -> &[SourceKind] {
        match class {
            EntityClass::Character => &self.characters,
            EntityClass::Creator => &self.creators,
            EntityClass::Company => &self.companies,
        }
    }

    /// Pick the preferred name among the given records.
    ///
    /// Sources missing from the class's list are consulted last, in source
    /// order, so a record is never ignored just because the list is short.
    pub fn pick_name(
        &self,
        class: EntityClass,
        sources: &BTreeMap<SourceKind, SourceRecord>,
    ) -> Option<String> {
        let order = self.order_for(class);
        let listed = order.iter().filter_map(|kind| sources.get(kind));
        let unlisted = sources
            .iter()
            .filter(|(kind, _)| !order.contains(kind))
            .map(|(_, record)| record);

        listed
            .chain(unlisted)
            .map(|record| record.raw_name.trim())
            .find(|name| !name.is_empty())
            .map(str::to_string)
    }
}
