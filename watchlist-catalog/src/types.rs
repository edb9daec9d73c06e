//! Data model types for the entity catalog.
//!
//! These types describe entities as each source reports them (`SourceRecord`),
//! the per-franchise result of cross-referencing two sources
//! (`QualifyingEntity`), and the globally deduplicated form that lands in the
//! canonical store (`CanonicalEntity`).

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

// ── Sources ─────────────────────────────────────────────────────────────────

/// An external metadata source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Anilist,
    Mal,
    Tvdb,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [Self::Anilist, Self::Mal, Self::Tvdb];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anilist => "anilist",
            Self::Mal => "mal",
            Self::Tvdb => "tvdb",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A source-native identifier. AniList and MAL use integers; TVDB mixes both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SourceId {
    Int(i64),
    Str(String),
}

impl SourceId {
    /// Identity form used for comparisons: `12345` and `"12345"` are the same id.
    pub fn key(&self) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::Str(s) => s.clone(),
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for SourceId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

// ── Entity classes ──────────────────────────────────────────────────────────

/// The kinds of entity that are cross-referenced between sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityClass {
    Character,
    Creator,
    Company,
}

impl EntityClass {
    pub const ALL: [EntityClass; 3] = [Self::Character, Self::Creator, Self::Company];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Creator => "creator",
            Self::Company => "company",
        }
    }

    /// Directory and file stem used for collections of this class.
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Character => "characters",
            Self::Creator => "creators",
            Self::Company => "companies",
        }
    }
}

impl fmt::Display for EntityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Source records ──────────────────────────────────────────────────────────

/// One entity as described by a single source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub source: SourceKind,
    pub source_id: SourceId,
    pub raw_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    pub entity_class: EntityClass,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub payload: RecordPayload,
}

impl SourceRecord {
    /// Names of the identity-stable fields that differ between two records of
    /// the same source. Payload fields such as roles legitimately vary by
    /// franchise and are not compared.
    pub fn stable_differences(&self, other: &SourceRecord) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.source_id.key() != other.source_id.key() {
            fields.push("source_id");
        }
        if self.raw_name != other.raw_name {
            fields.push("raw_name");
        }
        if self.native_name != other.native_name {
            fields.push("native_name");
        }
        if self.image != other.image {
            fields.push("image");
        }
        fields
    }

    /// Roles carried by a creator or company payload. Characters have none.
    pub fn roles(&self) -> &[String] {
        match &self.payload {
            RecordPayload::Character(_) => &[],
            RecordPayload::Creator(p) => &p.roles,
            RecordPayload::Company(p) => &p.roles,
        }
    }
}

/// Class-specific data attached to a [`SourceRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordPayload {
    Character(CharacterPayload),
    Creator(CreatorPayload),
    Company(CompanyPayload),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPayload {
    /// Prominence in the work, e.g. `MAIN` or `SUPPORTING`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub voice_actors: Vec<VoiceCredit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorPayload {
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyPayload {
    /// `studio`, `producer`, or an AniList role label.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_animation_studio: Option<bool>,
}

/// A voice acting credit on a character, as listed by one source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceCredit {
    /// Dub language as the source spells it ("Japanese", "JAPANESE", "Korean", ...).
    pub language: String,
    pub person: SourceRecord,
}

impl VoiceCredit {
    pub fn is_japanese(&self) -> bool {
        self.language.eq_ignore_ascii_case("japanese")
    }
}

// ── Per-franchise results ───────────────────────────────────────────────────

/// A voice actor confirmed by both sources for one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedVoiceActor {
    pub name: String,
    pub sources: BTreeMap<SourceKind, SourceRecord>,
}

impl MatchedVoiceActor {
    /// Identity of the voice actor: the first external id in source order.
    pub fn identity(&self) -> Option<(SourceKind, String)> {
        self.sources
            .iter()
            .next()
            .map(|(kind, record)| (*kind, record.source_id.key()))
    }
}

/// An entity confirmed by a cross-source match within one franchise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifyingEntity {
    pub entity_class: EntityClass,
    pub canonical_name: String,
    pub franchise_slug: String,
    /// Entries of the franchise in which the entity was found.
    #[serde(default)]
    pub entries: BTreeSet<String>,
    pub sources: BTreeMap<SourceKind, SourceRecord>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice_actors: Vec<MatchedVoiceActor>,
}

impl QualifyingEntity {
    pub fn external_ids(&self) -> BTreeMap<SourceKind, SourceId> {
        self.sources
            .iter()
            .map(|(kind, record)| (*kind, record.source_id.clone()))
            .collect()
    }

    /// Native-script name from the first source that has one.
    pub fn native_name(&self) -> Option<&str> {
        self.sources
            .values()
            .find_map(|r| r.native_name.as_deref().filter(|n| !n.is_empty()))
    }

    /// This entity's presence in its franchise, as recorded on the canonical
    /// entity.
    pub fn appearance(&self) -> Appearance {
        Appearance {
            entries: self.entries.clone(),
            roles: self.roles.clone(),
        }
    }
}

/// Everything extracted from one franchise, partitioned by entity class.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FranchiseExtraction {
    pub franchise_slug: String,
    pub characters: Vec<QualifyingEntity>,
    pub creators: Vec<QualifyingEntity>,
    pub companies: Vec<QualifyingEntity>,
}

impl FranchiseExtraction {
    pub fn new(franchise_slug: impl Into<String>) -> Self {
        Self {
            franchise_slug: franchise_slug.into(),
            ..Self::default()
        }
    }

    pub fn of_class(&self, class: EntityClass) -> &[QualifyingEntity] {
        match class {
            EntityClass::Character => &self.characters,
            EntityClass::Creator => &self.creators,
            EntityClass::Company => &self.companies,
        }
    }

    pub fn of_class_mut(&mut self, class: EntityClass) -> &mut Vec<QualifyingEntity> {
        match class {
            EntityClass::Character => &mut self.characters,
            EntityClass::Creator => &mut self.creators,
            EntityClass::Company => &mut self.companies,
        }
    }

    pub fn total(&self) -> usize {
        self.characters.len() + self.creators.len() + self.companies.len()
    }
}

// ── Canonical entities ──────────────────────────────────────────────────────

/// The entries an entity appears in within one franchise, and the roles it
/// held there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default)]
    pub entries: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

/// The deduplicated, global form of an entity.
///
/// `external_ids` is the identity; `slug` is only a filesystem/URL handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalEntity {
    pub slug: String,
    pub entity_class: EntityClass,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub native_name: Option<String>,
    pub external_ids: BTreeMap<SourceKind, SourceId>,
    /// Keyed by franchise slug.
    pub appearances: BTreeMap<String, Appearance>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub voice_actors: Vec<MatchedVoiceActor>,
    /// Written to `sources/<source>.json` in the store, not inline.
    #[serde(skip)]
    pub sources: BTreeMap<SourceKind, SourceRecord>,
}

impl CanonicalEntity {
    /// Portrait URL per source, for the entity JSON and the image manifest.
    pub fn images(&self) -> BTreeMap<SourceKind, String> {
        self.sources
            .iter()
            .filter_map(|(kind, r)| r.image.clone().filter(|u| !u.is_empty()).map(|u| (*kind, u)))
            .collect()
    }
}
