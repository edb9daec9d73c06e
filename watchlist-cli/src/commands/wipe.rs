use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_catalog::EntityClass;
use watchlist_import::wipe_store;

use crate::CliError;

use super::Context;

/// Delete the canonical store. Extracted files and raw sources are untouched.
pub(crate) fn run_wipe(ctx: &Context, confirm: bool) -> Result<(), CliError> {
    if !confirm {
        log::warn!("This will permanently delete the canonical store under:");
        for class in EntityClass::ALL {
            log::warn!("  {}", ctx.layout.class_dir(class).display());
        }
        log::info!("Re-run with --confirm to proceed:");
        log::info!("  watchlist wipe --confirm");
        return Ok(());
    }

    let removed = wipe_store(&ctx.layout).map_err(|e| CliError::store(e.to_string()))?;
    if removed == 0 {
        log::info!("No canonical store found at {}", ctx.layout.root().display());
        log::info!("Nothing to wipe.");
        return Ok(());
    }

    log::info!(
        "{}",
        "Canonical store deleted.".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Directories removed: {}", removed);
    crate::log_blank();
    log::info!("Run 'watchlist populate' to rebuild.");
    Ok(())
}
