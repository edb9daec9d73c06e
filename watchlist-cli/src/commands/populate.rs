use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_import::{populate_from_layout, write_store};

use crate::CliError;
use crate::progress::CliProgress;

use super::{Context, check_failures, print_report};

/// Merge every franchise's extracted entities and write the canonical store.
pub(crate) fn run_populate(ctx: &Context, clean: bool) -> Result<(), CliError> {
    let progress = CliProgress::new(ctx.quiet);
    let (registry, report, stats) = populate_from_layout(&ctx.layout, Some(&progress))
        .map_err(|e| CliError::store(e.to_string()))?;

    if stats.franchises == 0 {
        log::warn!(
            "No extracted entities found under {}",
            ctx.layout.franchises_dir().display()
        );
        log::info!("Run 'watchlist extract --all' first.");
        return check_failures(&report);
    }

    let written = write_store(&ctx.layout, &registry, clean)
        .map_err(|e| CliError::store(e.to_string()))?;

    crate::log_blank();
    log::info!(
        "{}",
        "Canonical store".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Root:          {}", ctx.layout.root().display());
    log::info!("  Characters:    {:>6}", written.characters);
    log::info!("  Creators:      {:>6}", written.creators);
    log::info!("  Companies:     {:>6}", written.companies);
    log::info!("  Source files:  {:>6}", written.source_files);
    log::info!(
        "  Merged:        {:>6} (across franchises)",
        stats.merged
    );
    if written.pruned > 0 {
        log::info!("  Removed:       {:>6} (no longer in the store)", written.pruned);
    }
    if stats.skipped > 0 {
        log::info!("  Skipped:       {:>6} (no identity)", stats.skipped);
    }
    if clean {
        log::info!(
            "  {}",
            "Previous store removed first".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    print_report(&report);
    check_failures(&report)
}
