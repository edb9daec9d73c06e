use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_catalog::settings::{
    DATA_ROOT_ENV, load_settings_from, resolve_data_root, settings_path, settings_to_string,
};

use crate::CliError;

/// Show the settings file, the effective data root and every setting.
pub(crate) fn run_config_show(root: Option<PathBuf>) -> Result<(), CliError> {
    let path = settings_path();
    let settings = load_settings_from(&path).map_err(|e| CliError::config(e.to_string()))?;

    log::info!(
        "{}",
        "Watchlist Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    let origin = if root.is_some() {
        "--root"
    } else if std::env::var_os(DATA_ROOT_ENV).is_some_and(|v| !v.is_empty()) {
        DATA_ROOT_ENV
    } else if settings.data.root.is_some() {
        "settings"
    } else {
        "default"
    };
    let data_root = resolve_data_root(root, &settings);
    log::info!(
        "  Data root:     {} {}",
        data_root.display().if_supports_color(Stdout, |t| t.cyan()),
        format!("({origin})").if_supports_color(Stdout, |t| t.dimmed()),
    );
    crate::log_blank();

    match settings_to_string(&settings) {
        Some(rendered) => {
            for line in rendered.lines() {
                log::info!("  {}", line);
            }
        }
        None => log::warn!("Could not render settings"),
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}
