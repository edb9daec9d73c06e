//! Cross-reference, extract and deduplicate entities from raw source documents.
//!
//! This crate owns all pipeline logic: loading AniList and MAL documents,
//! matching records between them, extracting per-franchise entities, merging
//! them into a canonical registry, and writing the store and image manifest.

pub mod extract;
pub mod extracted;
pub mod identity;
pub mod loader;
pub mod manifest;
pub mod matcher;
pub mod merge;
pub mod populate;
pub mod progress;
pub mod report;
pub mod roles;
pub mod store;

pub use extract::{
    ExtractError, ExtractOptions, discover_entries, extract, extract_all, extract_franchise,
    list_franchises,
};
pub use extracted::{read_extraction, write_extraction};
pub use identity::{IdentityKey, identity_keys, primary_key};
pub use loader::{LoadError, LoadedSource, read_anilist, read_jikan};
pub use manifest::{ImageEntry, ImageKind, ImageManifest, ManifestError, build_manifest, refresh_manifest};
pub use matcher::{AmbiguousMatch, MatchCandidatePair, MatchOutcome, MatchRule, match_records, match_voice_actors};
pub use populate::{CanonicalRegistry, MergeOutcome, PopulateStats, populate, populate_from_layout};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use report::{FranchiseOutcome, FranchiseStatus, RunReport, RunSummary, RunWarning};
pub use store::{EntityDocument, StoreError, StoreStats, load_index, load_store, wipe_store, write_store};
