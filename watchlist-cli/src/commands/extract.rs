use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_import::{ExtractOptions, extract_all, extract_franchise, write_extraction};

use crate::CliError;
use crate::progress::CliProgress;

use super::{Context, check_failures, print_report, print_warnings};

fn options(ctx: &Context, filter_roles: bool) -> ExtractOptions {
    let mut options = ExtractOptions::from_settings(&ctx.settings);
    options.filter_blocked_roles |= filter_roles;
    options
}

/// Extract one franchise and write its extracted entity files.
pub(crate) fn run_extract(ctx: &Context, franchise: &str, filter_roles: bool) -> Result<(), CliError> {
    let options = options(ctx, filter_roles);
    let mut warnings = Vec::new();

    let extraction = extract_franchise(&ctx.layout, franchise, &options, &mut warnings)
        .map_err(|e| CliError::extract(e.to_string()))?;
    write_extraction(&ctx.layout, &extraction).map_err(|e| CliError::extract(e.to_string()))?;

    log::info!(
        "{} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        franchise.if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("  Characters: {:>6}", extraction.characters.len());
    log::info!("  Creators:   {:>6}", extraction.creators.len());
    log::info!("  Companies:  {:>6}", extraction.companies.len());
    log::info!(
        "  Output:     {}",
        ctx.layout.extracted_dir(franchise).display()
    );

    if !warnings.is_empty() {
        crate::log_blank();
        print_warnings(&warnings);
    }
    Ok(())
}

/// Extract every franchise under the data root.
pub(crate) fn run_extract_all(ctx: &Context, filter_roles: bool) -> Result<(), CliError> {
    let options = options(ctx, filter_roles);
    let progress = CliProgress::new(ctx.quiet);

    let report = extract_all(&ctx.layout, &options, Some(&progress))
        .map_err(|e| CliError::extract(e.to_string()))?;

    print_report(&report);
    check_failures(&report)
}
