pub(crate) mod config;
pub(crate) mod extract;
pub(crate) mod manifest;
pub(crate) mod populate;
pub(crate) mod wipe;

use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_catalog::{DataLayout, Settings, load_settings, resolve_data_root};
use watchlist_import::{RunReport, RunWarning};

use crate::CliError;

/// Settings and data root shared by the pipeline commands.
pub(crate) struct Context {
    pub layout: DataLayout,
    pub settings: Settings,
    pub quiet: bool,
}

impl Context {
    pub(crate) fn load(root: Option<PathBuf>, quiet: bool) -> Result<Self, CliError> {
        let settings = load_settings().map_err(|e| CliError::config(e.to_string()))?;
        let root = resolve_data_root(root, &settings);
        log::debug!("Data root: {}", root.display());
        Ok(Self {
            layout: DataLayout::new(root),
            settings,
            quiet,
        })
    }
}

/// Print warnings and the per-franchise summary of a run.
pub(crate) fn print_report(report: &RunReport) {
    let warnings = report.warnings();
    if !warnings.is_empty() {
        crate::log_blank();
        log::info!(
            "{}",
            "Warnings".if_supports_color(Stdout, |t| t.bold()),
        );
        for warning in warnings {
            log::warn!(
                "  {} {}",
                "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                warning,
            );
        }
    }

    for (slug, message) in report.failures() {
        log::warn!(
            "  {} {}: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            slug.if_supports_color(Stdout, |t| t.bold()),
            message,
        );
    }

    let summary = report.summary();
    crate::log_blank();
    log::info!(
        "{}",
        "Summary".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Franchises succeeded: {:>6}", summary.succeeded);
    log::info!("  Franchises failed:    {:>6}", summary.failed);
    log::info!("  Ambiguous matches:    {:>6}", summary.ambiguous_matches);
    log::info!("  Data mismatches:      {:>6}", summary.data_mismatches);
    if summary.identity_conflicts > 0 {
        log::info!("  Identity conflicts:   {:>6}", summary.identity_conflicts);
    }
}

/// Print warnings collected outside a [`RunReport`].
pub(crate) fn print_warnings(warnings: &[RunWarning]) {
    for warning in warnings {
        log::warn!(
            "  {} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            warning,
        );
    }
}

/// Fail the command if any franchise failed.
pub(crate) fn check_failures(report: &RunReport) -> Result<(), CliError> {
    match report.summary().failed {
        0 => Ok(()),
        n => Err(CliError::FranchiseFailures(n)),
    }
}
