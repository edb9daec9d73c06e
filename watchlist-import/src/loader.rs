//! Load raw AniList and Jikan (MAL) documents into source records.
//!
//! The raw documents are whatever the fetch layer saved: an AniList `Media`
//! object (optionally still wrapped in a GraphQL `{"data": {"Media": ...}}`
//! envelope) and a Jikan bundle of `anime`, `characters` and `staff`. Both APIs
//! use `null` liberally, so every field is optional and nulls read as empty.

use std::path::Path;

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;
use watchlist_catalog::json::{JsonError, load_json};
use watchlist_catalog::types::*;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Missing {kind} document: {path}")]
    Missing { kind: SourceKind, path: String },
    #[error(transparent)]
    Json(#[from] JsonError),
}

/// One source's records for a franchise entry, partitioned by class.
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub source: SourceKind,
    pub characters: Vec<SourceRecord>,
    pub creators: Vec<SourceRecord>,
    pub companies: Vec<SourceRecord>,
}

impl LoadedSource {
    fn empty(source: SourceKind) -> Self {
        Self {
            source,
            characters: Vec::new(),
            creators: Vec::new(),
            companies: Vec::new(),
        }
    }

    pub fn of_class(&self, class: EntityClass) -> &[SourceRecord] {
        match class {
            EntityClass::Character => &self.characters,
            EntityClass::Creator => &self.creators,
            EntityClass::Company => &self.companies,
        }
    }
}

/// Read an AniList raw document from disk.
pub fn read_anilist(path: &Path) -> Result<LoadedSource, LoadError> {
    let value = read_document(SourceKind::Anilist, path)?;
    let media: AnilistMedia = from_value(path, unwrap_graphql(value))?;
    Ok(load_anilist(media))
}

/// Read a Jikan raw document from disk.
pub fn read_jikan(path: &Path) -> Result<LoadedSource, LoadError> {
    let value = read_document(SourceKind::Mal, path)?;
    let bundle: JikanBundle = from_value(path, value)?;
    Ok(load_jikan(bundle))
}

fn read_document(kind: SourceKind, path: &Path) -> Result<Value, LoadError> {
    if !path.is_file() {
        return Err(LoadError::Missing {
            kind,
            path: path.display().to_string(),
        });
    }
    Ok(load_json(path)?)
}

fn from_value<T: serde::de::DeserializeOwned>(path: &Path, value: Value) -> Result<T, LoadError> {
    serde_json::from_value(value).map_err(|e| {
        LoadError::Json(JsonError::Parse {
            path: path.display().to_string(),
            source: e,
        })
    })
}

/// Strip a GraphQL response envelope if the fetcher saved one.
fn unwrap_graphql(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => match map.remove("data") {
            Some(Value::Object(mut data)) if data.contains_key("Media") => {
                data.remove("Media").unwrap_or(Value::Null)
            }
            Some(other) => other,
            None => Value::Null,
        },
        other => other,
    }
}

/// Treat an explicit JSON `null` like a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !value.is_empty() && !list.contains(&value) {
        list.push(value);
    }
}

// ── AniList ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistMedia {
    #[serde(deserialize_with = "nullable")]
    pub characters: AnilistEdges<AnilistCharacterEdge>,
    #[serde(deserialize_with = "nullable")]
    pub staff: AnilistEdges<AnilistStaffEdge>,
    #[serde(deserialize_with = "nullable")]
    pub studios: AnilistStudios,
}

#[derive(Debug, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
pub struct AnilistEdges<T> {
    #[serde(deserialize_with = "nullable")]
    pub edges: Vec<T>,
}

impl<T> Default for AnilistEdges<T> {
    fn default() -> Self {
        Self { edges: Vec::new() }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistStudios {
    #[serde(deserialize_with = "nullable")]
    pub nodes: Vec<AnilistStudioNode>,
    #[serde(deserialize_with = "nullable")]
    pub edges: Vec<AnilistStudioEdge>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistName {
    pub full: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistImage {
    pub large: Option<String>,
    pub medium: Option<String>,
}

impl AnilistImage {
    fn url(&self) -> Option<String> {
        non_empty(self.large.clone()).or_else(|| non_empty(self.medium.clone()))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistPerson {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub name: AnilistName,
    #[serde(deserialize_with = "nullable")]
    pub image: AnilistImage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistVoiceActor {
    pub id: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub name: AnilistName,
    #[serde(deserialize_with = "nullable")]
    pub image: AnilistImage,
    #[serde(rename = "languageV2")]
    pub language_v2: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistCharacterEdge {
    pub node: Option<AnilistPerson>,
    pub role: Option<String>,
    #[serde(rename = "voiceActors", deserialize_with = "nullable")]
    pub voice_actors: Vec<AnilistVoiceActor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistStaffEdge {
    pub node: Option<AnilistPerson>,
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistStudioNode {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(rename = "isAnimationStudio")]
    pub is_animation_studio: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AnilistStudioEdge {
    pub node: Option<AnilistStudioNode>,
    #[serde(rename = "isMain")]
    pub is_main: Option<bool>,
}

/// Convert a parsed AniList `Media` object into source records.
///
/// Voice actors without a language field are assumed Japanese: the fetcher's
/// query asks AniList for the Japanese cast only.
pub fn load_anilist(media: AnilistMedia) -> LoadedSource {
    let mut loaded = LoadedSource::empty(SourceKind::Anilist);

    for edge in media.characters.edges {
        let Some(node) = edge.node else { continue };
        let Some(id) = node.id else { continue };

        let voice_actors = edge
            .voice_actors
            .into_iter()
            .filter_map(|va| {
                let language = va
                    .language_v2
                    .clone()
                    .or_else(|| va.language.clone())
                    .unwrap_or_else(|| "Japanese".to_string());
                let person = anilist_person(
                    AnilistPerson {
                        id: va.id,
                        name: va.name,
                        image: va.image,
                    },
                    EntityClass::Creator,
                    RecordPayload::Creator(CreatorPayload {
                        roles: vec!["Voice Actor".to_string()],
                    }),
                )?;
                Some(VoiceCredit { language, person })
            })
            .collect();

        let record = anilist_person(
            node,
            EntityClass::Character,
            RecordPayload::Character(CharacterPayload {
                role: non_empty(edge.role),
                voice_actors,
            }),
        );
        if let Some(record) = record.filter(|_| id > 0) {
            loaded.characters.push(record);
        }
    }

    // Staff appear once per credited role; fold them into one record per id.
    for edge in media.staff.edges {
        let Some(node) = edge.node else { continue };
        let Some(id) = node.id else { continue };
        let role = non_empty(edge.role).unwrap_or_default();

        if let Some(existing) = loaded
            .creators
            .iter_mut()
            .find(|r| r.source_id.key() == id.to_string())
        {
            if let RecordPayload::Creator(p) = &mut existing.payload {
                push_unique(&mut p.roles, role);
            }
            continue;
        }

        let mut roles = Vec::new();
        push_unique(&mut roles, role);
        let record = anilist_person(
            node,
            EntityClass::Creator,
            RecordPayload::Creator(CreatorPayload { roles }),
        );
        if let Some(record) = record.filter(|r| !r.raw_name.is_empty()) {
            loaded.creators.push(record);
        }
    }

    let studio_nodes = media
        .studios
        .nodes
        .into_iter()
        .chain(media.studios.edges.into_iter().filter_map(|e| e.node));
    for node in studio_nodes {
        let (Some(id), Some(name)) = (node.id, non_empty(node.name)) else {
            continue;
        };
        if loaded
            .companies
            .iter()
            .any(|r| r.source_id.key() == id.to_string())
        {
            continue;
        }
        let role = if node.is_animation_studio.unwrap_or(true) {
            "studio"
        } else {
            "producer"
        };
        loaded.companies.push(SourceRecord {
            source: SourceKind::Anilist,
            source_id: SourceId::Int(id),
            raw_name: name,
            native_name: None,
            entity_class: EntityClass::Company,
            image: None,
            payload: RecordPayload::Company(CompanyPayload {
                roles: vec![role.to_string()],
                is_animation_studio: node.is_animation_studio,
            }),
        });
    }

    loaded
}

fn anilist_person(
    person: AnilistPerson,
    class: EntityClass,
    payload: RecordPayload,
) -> Option<SourceRecord> {
    let id = person.id?;
    Some(SourceRecord {
        source: SourceKind::Anilist,
        source_id: SourceId::Int(id),
        raw_name: non_empty(person.name.full).unwrap_or_default(),
        native_name: non_empty(person.name.native),
        entity_class: class,
        image: person.image.url(),
        payload,
    })
}

// ── Jikan (MAL) ─────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanBundle {
    #[serde(deserialize_with = "nullable")]
    pub anime: JikanAnime,
    #[serde(deserialize_with = "nullable")]
    pub characters: Vec<JikanCharacterEntry>,
    #[serde(deserialize_with = "nullable")]
    pub staff: Vec<JikanStaffEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanAnime {
    #[serde(deserialize_with = "nullable")]
    pub studios: Vec<JikanCompany>,
    #[serde(deserialize_with = "nullable")]
    pub producers: Vec<JikanCompany>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanCompany {
    pub mal_id: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanImages {
    #[serde(deserialize_with = "nullable")]
    pub jpg: JikanImageSet,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanPerson {
    pub mal_id: Option<i64>,
    pub name: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub images: JikanImages,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanVoiceActor {
    pub person: Option<JikanPerson>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanCharacterEntry {
    pub character: Option<JikanPerson>,
    pub role: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub voice_actors: Vec<JikanVoiceActor>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct JikanStaffEntry {
    pub person: Option<JikanPerson>,
    #[serde(deserialize_with = "nullable")]
    pub positions: Vec<String>,
}

/// Convert a parsed Jikan bundle into source records.
pub fn load_jikan(bundle: JikanBundle) -> LoadedSource {
    let mut loaded = LoadedSource::empty(SourceKind::Mal);

    for entry in bundle.characters {
        let voice_actors = entry
            .voice_actors
            .into_iter()
            .filter_map(|va| {
                let person = jikan_person(
                    va.person?,
                    EntityClass::Creator,
                    RecordPayload::Creator(CreatorPayload {
                        roles: vec!["Voice Actor".to_string()],
                    }),
                )?;
                Some(VoiceCredit {
                    language: non_empty(va.language).unwrap_or_default(),
                    person,
                })
            })
            .collect();

        let Some(character) = entry.character else {
            continue;
        };
        let record = jikan_person(
            character,
            EntityClass::Character,
            RecordPayload::Character(CharacterPayload {
                role: non_empty(entry.role),
                voice_actors,
            }),
        );
        if let Some(record) = record {
            loaded.characters.push(record);
        }
    }

    for entry in bundle.staff {
        let Some(person) = entry.person else { continue };
        let mut roles = Vec::new();
        for position in entry.positions {
            push_unique(&mut roles, position.trim().to_string());
        }
        let record = jikan_person(
            person,
            EntityClass::Creator,
            RecordPayload::Creator(CreatorPayload { roles }),
        );
        if let Some(record) = record.filter(|r| !r.raw_name.is_empty()) {
            loaded.creators.push(record);
        }
    }

    let studios = bundle.anime.studios.into_iter().map(|c| (c, "studio"));
    let producers = bundle.anime.producers.into_iter().map(|c| (c, "producer"));
    for (company, role) in studios.chain(producers) {
        let (Some(id), Some(name)) = (company.mal_id, non_empty(company.name)) else {
            continue;
        };
        // A studio is often listed as a producer too; keep one record per id.
        if let Some(existing) = loaded
            .companies
            .iter_mut()
            .find(|r| r.source_id.key() == id.to_string())
        {
            if let RecordPayload::Company(p) = &mut existing.payload {
                push_unique(&mut p.roles, role.to_string());
            }
            continue;
        }
        loaded.companies.push(SourceRecord {
            source: SourceKind::Mal,
            source_id: SourceId::Int(id),
            raw_name: name,
            native_name: None,
            entity_class: EntityClass::Company,
            image: None,
            payload: RecordPayload::Company(CompanyPayload {
                roles: vec![role.to_string()],
                is_animation_studio: None,
            }),
        });
    }

    loaded
}

fn jikan_person(
    person: JikanPerson,
    class: EntityClass,
    payload: RecordPayload,
) -> Option<SourceRecord> {
    let id = person.mal_id.filter(|id| *id > 0)?;
    Some(SourceRecord {
        source: SourceKind::Mal,
        source_id: SourceId::Int(id),
        raw_name: non_empty(person.name).unwrap_or_default(),
        native_name: None,
        entity_class: class,
        image: non_empty(person.images.jpg.image_url),
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn graphql_envelope_is_unwrapped() {
        let wrapped = json!({"data": {"Media": {"id": 16498}}});
        assert_eq!(unwrap_graphql(wrapped), json!({"id": 16498}));

        let bare = json!({"id": 16498});
        assert_eq!(unwrap_graphql(bare.clone()), bare);
    }

    #[test]
    fn nulls_read_as_empty() {
        let media: AnilistMedia = serde_json::from_value(json!({
            "characters": null,
            "staff": {"edges": null},
            "studios": {"nodes": [{"id": 858, "name": "Wit Studio", "isAnimationStudio": null}]}
        }))
        .unwrap();
        let loaded = load_anilist(media);
        assert!(loaded.characters.is_empty());
        assert!(loaded.creators.is_empty());
        assert_eq!(loaded.companies.len(), 1);
    }
}
