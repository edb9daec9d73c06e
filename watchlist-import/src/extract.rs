//! Per-franchise entity extraction.
//!
//! For each entry of a franchise, the AniList and MAL documents are loaded,
//! every entity class is cross-referenced, and only confirmed matches become
//! [`QualifyingEntity`] values. Records with no counterpart are dropped
//! silently; that is the filter, not a failure.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;
use watchlist_catalog::json::{JsonError, list_subdirs};
use watchlist_catalog::layout::{DataLayout, EntrySources};
use watchlist_catalog::preference::NamePreference;
use watchlist_catalog::settings::Settings;
use watchlist_catalog::types::*;

use crate::extracted::write_extraction;
use crate::loader::{LoadError, LoadedSource, read_anilist, read_jikan};
use crate::matcher::{MatchCandidatePair, match_records, match_voice_actors};
use crate::merge::{fold_entity, union_roles};
use crate::progress::ImportProgress;
use crate::report::{RunReport, RunWarning};
use crate::roles::{is_company_role_blocked, is_creator_role_blocked};

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Franchise {franchise}, entry {entry}: {source}")]
    Load {
        franchise: String,
        entry: String,
        source: LoadError,
    },
    #[error("Franchise not found: {0}")]
    UnknownFranchise(String),
    #[error("No entries with raw sources for franchise {0}")]
    NoEntries(String),
    #[error(transparent)]
    Json(#[from] JsonError),
}

/// Options controlling extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub preference: NamePreference,
    /// Strip blacklisted creator/company roles and drop entities left with none.
    pub filter_blocked_roles: bool,
}

impl ExtractOptions {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            preference: settings.preference.clone(),
            filter_blocked_roles: settings.extract.filter_blocked_roles,
        }
    }
}

/// Extract qualifying entities from one entry's pair of documents.
///
/// Ambiguous matches are pushed onto `warnings`; they never stop extraction.
pub fn extract(
    franchise_slug: &str,
    entry_slug: &str,
    anilist: &LoadedSource,
    mal: &LoadedSource,
    options: &ExtractOptions,
    warnings: &mut Vec<RunWarning>,
) -> FranchiseExtraction {
    let mut extraction = FranchiseExtraction::new(franchise_slug);

    for class in EntityClass::ALL {
        let outcome = match_records(class, anilist.of_class(class), mal.of_class(class));

        for ambiguity in outcome.ambiguities {
            log::warn!(
                "{}/{}: ambiguous {} match for '{}'",
                franchise_slug,
                entry_slug,
                class,
                ambiguity.key
            );
            warnings.push(RunWarning::AmbiguousMatch {
                franchise: franchise_slug.to_string(),
                entry: entry_slug.to_string(),
                context: class.plural().to_string(),
                ambiguity,
            });
        }

        for pair in outcome.pairs {
            let entity = qualify(class, pair, franchise_slug, entry_slug, options, warnings);
            if let Some(entity) = entity {
                extraction.of_class_mut(class).push(entity);
            }
        }
    }

    extraction
}

/// Build a qualifying entity from a confirmed pair.
fn qualify(
    class: EntityClass,
    pair: MatchCandidatePair<'_>,
    franchise_slug: &str,
    entry_slug: &str,
    options: &ExtractOptions,
    warnings: &mut Vec<RunWarning>,
) -> Option<QualifyingEntity> {
    let sources = BTreeMap::from([
        (pair.left.source, pair.left.clone()),
        (pair.right.source, pair.right.clone()),
    ]);
    let canonical_name = options
        .preference
        .pick_name(class, &sources)
        .unwrap_or_default();

    let mut roles = Vec::new();
    union_roles(&mut roles, pair.left.roles());
    union_roles(&mut roles, pair.right.roles());

    if options.filter_blocked_roles && !roles.is_empty() {
        let blocked: fn(&str) -> bool = match class {
            EntityClass::Creator => is_creator_role_blocked,
            EntityClass::Company => is_company_role_blocked,
            EntityClass::Character => |_| false,
        };
        roles.retain(|r| !blocked(r));
        if roles.is_empty() {
            log::debug!("Dropping {} '{}': only blocked roles", class, canonical_name);
            return None;
        }
    }

    let voice_actors = match (&pair.left.payload, &pair.right.payload) {
        (RecordPayload::Character(left), RecordPayload::Character(right)) => {
            let outcome = match_voice_actors(left, right);
            for ambiguity in outcome.ambiguities {
                warnings.push(RunWarning::AmbiguousMatch {
                    franchise: franchise_slug.to_string(),
                    entry: entry_slug.to_string(),
                    context: format!("voice actor of {canonical_name}"),
                    ambiguity,
                });
            }
            outcome
                .pairs
                .into_iter()
                .map(|va| {
                    let sources = BTreeMap::from([
                        (va.left.source, va.left.clone()),
                        (va.right.source, va.right.clone()),
                    ]);
                    MatchedVoiceActor {
                        name: options
                            .preference
                            .pick_name(EntityClass::Creator, &sources)
                            .unwrap_or_default(),
                        sources,
                    }
                })
                .collect()
        }
        _ => Vec::new(),
    };

    Some(QualifyingEntity {
        entity_class: class,
        canonical_name,
        franchise_slug: franchise_slug.to_string(),
        entries: BTreeSet::from([entry_slug.to_string()]),
        sources,
        roles,
        voice_actors,
    })
}

/// Find the raw-source directories of a franchise's entries.
///
/// `entries/<entry>/sources/` for each entry, in name order. A franchise with
/// no `entries/` directory but its own `sources/` is a single entry named
/// after the franchise.
pub fn discover_entries(
    layout: &DataLayout,
    franchise_slug: &str,
) -> Result<Vec<EntrySources>, ExtractError> {
    let franchise_dir = layout.franchise_dir(franchise_slug);
    if !franchise_dir.is_dir() {
        return Err(ExtractError::UnknownFranchise(franchise_slug.to_string()));
    }

    let entries_dir = layout.entries_dir(franchise_slug);
    let entries: Vec<EntrySources> = if entries_dir.is_dir() {
        list_subdirs(&entries_dir)?
            .into_iter()
            .filter_map(|dir| {
                let name = dir.file_name()?.to_str()?.to_string();
                Some(EntrySources::in_dir(name, &dir.join("sources")))
            })
            .collect()
    } else if franchise_dir.join("sources").is_dir() {
        vec![EntrySources::in_dir(
            franchise_slug,
            &franchise_dir.join("sources"),
        )]
    } else {
        Vec::new()
    };

    if entries.is_empty() {
        return Err(ExtractError::NoEntries(franchise_slug.to_string()));
    }
    Ok(entries)
}

/// Extract every entry of a franchise and fold the results together.
///
/// A missing or malformed raw document in any entry fails the franchise.
pub fn extract_franchise(
    layout: &DataLayout,
    franchise_slug: &str,
    options: &ExtractOptions,
    warnings: &mut Vec<RunWarning>,
) -> Result<FranchiseExtraction, ExtractError> {
    let entries = discover_entries(layout, franchise_slug)?;
    let mut combined = FranchiseExtraction::new(franchise_slug);

    for entry in &entries {
        let load_err = |source| ExtractError::Load {
            franchise: franchise_slug.to_string(),
            entry: entry.entry_slug.clone(),
            source,
        };
        let anilist = read_anilist(&entry.anilist).map_err(load_err)?;
        let mal = read_jikan(&entry.jikan).map_err(load_err)?;

        let extraction = extract(
            franchise_slug,
            &entry.entry_slug,
            &anilist,
            &mal,
            options,
            warnings,
        );
        log::debug!(
            "  {}: {} characters, {} creators, {} companies",
            entry.entry_slug,
            extraction.characters.len(),
            extraction.creators.len(),
            extraction.companies.len(),
        );

        for class in EntityClass::ALL {
            for entity in extraction.of_class(class).iter().cloned() {
                fold_entity(combined.of_class_mut(class), entity, warnings);
            }
        }
    }

    Ok(combined)
}

/// Names of all franchises under the data root, sorted.
pub fn list_franchises(layout: &DataLayout) -> Result<Vec<String>, JsonError> {
    Ok(list_subdirs(&layout.franchises_dir())?
        .into_iter()
        .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
        .collect())
}

/// Extract and write every franchise under the data root.
///
/// Failures are recorded per franchise and do not stop the run.
pub fn extract_all(
    layout: &DataLayout,
    options: &ExtractOptions,
    progress: Option<&dyn ImportProgress>,
) -> Result<RunReport, JsonError> {
    let franchises = list_franchises(layout)?;
    let mut report = RunReport::new();

    if let Some(p) = progress {
        p.on_phase(&format!("Extracting {} franchise(s)", franchises.len()));
    }

    for (i, slug) in franchises.iter().enumerate() {
        let mut warnings = Vec::new();
        let result = extract_franchise(layout, slug, options, &mut warnings)
            .and_then(|extraction| {
                write_extraction(layout, &extraction)?;
                Ok(extraction)
            });
        report.extend_warnings(warnings);

        match result {
            Ok(extraction) => report.record_success(&extraction),
            Err(e) => {
                log::warn!("{}: extraction failed: {}", slug, e);
                report.record_failure(slug, e);
            }
        }

        if let Some(p) = progress {
            p.on_franchise(i + 1, franchises.len(), slug);
        }
    }

    if let Some(p) = progress {
        let summary = report.summary();
        p.on_complete(&format!(
            "Extraction finished: {} succeeded, {} failed",
            summary.succeeded, summary.failed
        ));
    }

    Ok(report)
}
