//! watchlist CLI
//!
//! Command-line interface for extracting, deduplicating and storing anime
//! entities cross-referenced between AniList and MyAnimeList.

mod cli_types;
mod commands;
mod error;
mod progress;

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{Cli, Commands, ConfigAction};
use commands::Context;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli) {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(cli.root),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
        Commands::Extract {
            franchise,
            all,
            filter_roles,
        } => {
            let ctx = Context::load(cli.root, cli.quiet)?;
            match franchise {
                Some(slug) if !all => commands::extract::run_extract(&ctx, &slug, filter_roles),
                _ => commands::extract::run_extract_all(&ctx, filter_roles),
            }
        }
        Commands::Populate { clean } => {
            let ctx = Context::load(cli.root, cli.quiet)?;
            commands::populate::run_populate(&ctx, clean)
        }
        Commands::Manifest => {
            let ctx = Context::load(cli.root, cli.quiet)?;
            commands::manifest::run_manifest(&ctx)
        }
        Commands::Wipe { confirm } => {
            let ctx = Context::load(cli.root, cli.quiet)?;
            commands::wipe::run_wipe(&ctx, confirm)
        }
    }
}

/// Log an empty line at info level.
pub(crate) fn log_blank() {
    log::info!("");
}

/// Install the logger.
///
/// Normal output is message-only at info level. `--verbose` adds timestamps,
/// levels and debug messages; `--quiet` keeps warnings and errors only.
fn init_logging(quiet: bool, verbose: bool, logfile: Option<&Path>) -> Result<(), CliError> {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if verbose {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}",
                buf.timestamp(),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    match logfile {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                CliError::other(format!("Cannot create log file {}: {}", path.display(), e))
            })?;
            builder.target(env_logger::Target::Pipe(Box::new(TeeWriter { file })));
        }
        None => {
            builder.target(env_logger::Target::Stdout);
        }
    }

    builder
        .try_init()
        .map_err(|e| CliError::other(e.to_string()))
}

/// Writes log output to stdout unchanged and to a file with ANSI escapes
/// removed.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stdout().write_all(buf)?;
        self.file.write_all(&strip_ansi_escapes::strip(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()?;
        self.file.flush()
    }
}
