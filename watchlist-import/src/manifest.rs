//! Image manifest for the canonical store.
//!
//! Lists every portrait URL the store references so a separate downloader can
//! fetch them. Download state from an earlier manifest carries over.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use watchlist_catalog::json::{JsonError, load_json, save_json};
use watchlist_catalog::layout::DataLayout;
use watchlist_catalog::types::{CanonicalEntity, EntityClass, SourceKind};

use crate::store::{StoreError, load_store};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Json(#[from] JsonError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    CharacterPortrait,
    VoiceActorPortrait,
    CreatorPortrait,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub kind: ImageKind,
    pub entity_class: EntityClass,
    pub entity_slug: String,
    pub entity_name: String,
    /// Set for voice actor portraits: the voice actor's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_actor: Option<String>,
    pub source: SourceKind,
    pub url: String,
    #[serde(default)]
    pub local_path: Option<String>,
    #[serde(default)]
    pub downloaded: bool,
}

impl ImageEntry {
    fn state_key(&self) -> (String, EntityClass, String, ImageKind) {
        (self.url.clone(), self.entity_class, self.entity_slug.clone(), self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageManifest {
    pub generated_at: String,
    pub images: Vec<ImageEntry>,
}

impl ImageManifest {
    pub fn pending(&self) -> impl Iterator<Item = &ImageEntry> {
        self.images.iter().filter(|e| !e.downloaded)
    }

    pub fn downloaded(&self) -> impl Iterator<Item = &ImageEntry> {
        self.images.iter().filter(|e| e.downloaded)
    }
}

/// Enumerate the images referenced by a set of canonical entities.
///
/// Characters contribute their own portraits and their voice actors'; creators
/// their portraits. Companies have no images.
pub fn build_manifest(entities: &[CanonicalEntity], previous: Option<&ImageManifest>) -> ImageManifest {
    let prior: HashMap<_, _> = previous
        .map(|m| {
            m.images
                .iter()
                .map(|e| (e.state_key(), (e.local_path.clone(), e.downloaded)))
                .collect()
        })
        .unwrap_or_default();

    let mut images = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |mut entry: ImageEntry| {
        if let Some((local_path, downloaded)) = prior.get(&entry.state_key()) {
            entry.local_path = local_path.clone();
            entry.downloaded = *downloaded;
        }
        let identity = (
            entry.state_key(),
            entry.source,
            entry.voice_actor.clone(),
        );
        if seen.insert(identity) {
            images.push(entry);
        }
    };

    for entity in entities {
        let kind = match entity.entity_class {
            EntityClass::Character => ImageKind::CharacterPortrait,
            EntityClass::Creator => ImageKind::CreatorPortrait,
            EntityClass::Company => continue,
        };

        for (source, url) in entity.images() {
            push(ImageEntry {
                kind,
                entity_class: entity.entity_class,
                entity_slug: entity.slug.clone(),
                entity_name: entity.name.clone(),
                voice_actor: None,
                source,
                url,
                local_path: None,
                downloaded: false,
            });
        }

        for va in &entity.voice_actors {
            for (source, record) in &va.sources {
                let Some(url) = record.image.as_ref().filter(|u| !u.is_empty()) else {
                    continue;
                };
                push(ImageEntry {
                    kind: ImageKind::VoiceActorPortrait,
                    entity_class: entity.entity_class,
                    entity_slug: entity.slug.clone(),
                    entity_name: entity.name.clone(),
                    voice_actor: Some(va.name.clone()),
                    source: *source,
                    url: url.clone(),
                    local_path: None,
                    downloaded: false,
                });
            }
        }
    }

    ImageManifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        images,
    }
}

/// Rebuild `image_manifest.json` from the store, keeping download state.
pub fn refresh_manifest(layout: &DataLayout) -> Result<ImageManifest, ManifestError> {
    let entities = load_store(layout)?;
    let path = layout.manifest_file();
    let previous: Option<ImageManifest> = if path.is_file() {
        Some(load_json(&path)?)
    } else {
        None
    };

    let manifest = build_manifest(&entities, previous.as_ref());
    save_json(&path, &manifest)?;
    log::debug!(
        "Manifest lists {} images ({} pending)",
        manifest.images.len(),
        manifest.pending().count()
    );
    Ok(manifest)
}
