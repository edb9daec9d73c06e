use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_import::{ImageKind, refresh_manifest};

use crate::CliError;

use super::Context;

/// Rebuild `image_manifest.json` from the canonical store.
pub(crate) fn run_manifest(ctx: &Context) -> Result<(), CliError> {
    let manifest =
        refresh_manifest(&ctx.layout).map_err(|e| CliError::store(e.to_string()))?;

    let count = |kind: ImageKind| manifest.images.iter().filter(|e| e.kind == kind).count();

    log::info!(
        "{}",
        "Image manifest".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Path:                {}", ctx.layout.manifest_file().display());
    log::info!("  Character portraits: {:>6}", count(ImageKind::CharacterPortrait));
    log::info!("  Voice actors:        {:>6}", count(ImageKind::VoiceActorPortrait));
    log::info!("  Creator portraits:   {:>6}", count(ImageKind::CreatorPortrait));
    crate::log_blank();
    log::info!("  Downloaded:          {:>6}", manifest.downloaded().count());
    log::info!(
        "  Pending:             {:>6}",
        manifest
            .pending()
            .count()
            .if_supports_color(Stdout, |t| t.yellow())
    );
    Ok(())
}
