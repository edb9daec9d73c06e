//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "watchlist")]
#[command(about = "Cross-reference and deduplicate anime entities from AniList and MAL", long_about = None)]
pub(crate) struct Cli {
    /// Data root containing franchises/ (overrides settings and WATCHLIST_DATA_ROOT)
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Extract cross-referenced entities for one franchise, or all of them
    Extract {
        /// Franchise slug (directory name under franchises/)
        #[arg(required_unless_present = "all", conflicts_with = "all")]
        franchise: Option<String>,

        /// Extract every franchise; failures are reported but do not stop the run
        #[arg(long)]
        all: bool,

        /// Drop blacklisted staff/company roles (overrides settings)
        #[arg(long)]
        filter_roles: bool,
    },

    /// Merge all extracted entities into the canonical store
    Populate {
        /// Remove existing canonical entities before writing
        #[arg(long)]
        clean: bool,
    },

    /// Build or refresh image_manifest.json from the canonical store
    Manifest,

    /// Delete the canonical store (characters/, creators/, companies/)
    Wipe {
        /// Required to actually delete anything
        #[arg(long)]
        confirm: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show the effective settings and data root
    Show,

    /// Print the settings file path
    Path,
}
