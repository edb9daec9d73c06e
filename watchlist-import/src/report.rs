//! Run report: per-franchise outcomes and accumulated warnings.
//!
//! Nothing in here aborts a run. Fatal input errors are scoped to one
//! franchise and recorded as a failed outcome; matching and merge anomalies
//! are recorded as warnings and shown in the summary.

use std::fmt;

use watchlist_catalog::types::{EntityClass, FranchiseExtraction, SourceKind};

use crate::matcher::AmbiguousMatch;

/// A non-fatal anomaly observed during extraction or population.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunWarning {
    /// Several records normalized to the same key; the first was used.
    AmbiguousMatch {
        franchise: String,
        entry: String,
        context: String,
        ambiguity: AmbiguousMatch,
    },
    /// The same external id carried different values in two franchises.
    /// The later value was kept.
    DataMismatch {
        class: EntityClass,
        identity: String,
        source: SourceKind,
        field: &'static str,
        previous: String,
        current: String,
        franchise: String,
    },
    /// An external id belongs to another entity, or the matched entity
    /// already holds a different id for that source. The incoming record for
    /// that source was not merged.
    IdentityConflict {
        class: EntityClass,
        key: String,
        franchise: String,
    },
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AmbiguousMatch {
                franchise,
                entry,
                context,
                ambiguity,
            } => write!(
                f,
                "{franchise}/{entry}: ambiguous {context} match for '{}' ({} AniList vs {} MAL candidates); first pair kept",
                ambiguity.key, ambiguity.left_candidates, ambiguity.right_candidates,
            ),
            Self::DataMismatch {
                class,
                identity,
                source,
                field,
                previous,
                current,
                franchise,
            } => write!(
                f,
                "{class} {identity}: {source} {field} changed in {franchise}: '{previous}' -> '{current}'",
            ),
            Self::IdentityConflict {
                class,
                key,
                franchise,
            } => write!(
                f,
                "{class} {key} from {franchise} conflicts with an existing identity; record skipped",
            ),
        }
    }
}

/// What happened to one franchise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FranchiseStatus {
    Succeeded {
        characters: usize,
        creators: usize,
        companies: usize,
    },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FranchiseOutcome {
    pub slug: String,
    pub status: FranchiseStatus,
}

/// Counts for the end-of-run summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub ambiguous_matches: usize,
    pub data_mismatches: usize,
    pub identity_conflicts: usize,
}

/// Collects per-franchise outcomes and warnings across a run.
#[derive(Debug, Default)]
pub struct RunReport {
    outcomes: Vec<FranchiseOutcome>,
    warnings: Vec<RunWarning>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&mut self, extraction: &FranchiseExtraction) {
        self.outcomes.push(FranchiseOutcome {
            slug: extraction.franchise_slug.clone(),
            status: FranchiseStatus::Succeeded {
                characters: extraction.characters.len(),
                creators: extraction.creators.len(),
                companies: extraction.companies.len(),
            },
        });
    }

    pub fn record_failure(&mut self, slug: &str, error: impl fmt::Display) {
        self.outcomes.push(FranchiseOutcome {
            slug: slug.to_string(),
            status: FranchiseStatus::Failed(error.to_string()),
        });
    }

    pub fn warn(&mut self, warning: RunWarning) {
        self.warnings.push(warning);
    }

    pub fn extend_warnings(&mut self, warnings: impl IntoIterator<Item = RunWarning>) {
        self.warnings.extend(warnings);
    }

    pub fn outcomes(&self) -> &[FranchiseOutcome] {
        &self.outcomes
    }

    pub fn warnings(&self) -> &[RunWarning] {
        &self.warnings
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            FranchiseStatus::Failed(msg) => Some((o.slug.as_str(), msg.as_str())),
            FranchiseStatus::Succeeded { .. } => None,
        })
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for outcome in &self.outcomes {
            match outcome.status {
                FranchiseStatus::Succeeded { .. } => summary.succeeded += 1,
                FranchiseStatus::Failed(_) => summary.failed += 1,
            }
        }
        for warning in &self.warnings {
            match warning {
                RunWarning::AmbiguousMatch { .. } => summary.ambiguous_matches += 1,
                RunWarning::DataMismatch { .. } => summary.data_mismatches += 1,
                RunWarning::IdentityConflict { .. } => summary.identity_conflicts += 1,
            }
        }
        summary
    }
}
