//! Entity catalog data model, name normalization, and on-disk layout.
//!
//! This crate defines the types shared by every pipeline stage without any
//! matching or merging logic. `watchlist-import` builds on these to extract
//! and deduplicate entities; the CLI only wires the two together.

pub mod json;
pub mod layout;
pub mod normalize;
pub mod preference;
pub mod settings;
pub mod types;

pub use json::{JsonError, list_subdirs, load_json, save_json};
pub use layout::{DataLayout, EntrySources};
pub use normalize::{normalize, reorder_last_first, slugify};
pub use preference::NamePreference;
pub use settings::{Settings, SettingsError, load_settings, resolve_data_root};
pub use types::*;
