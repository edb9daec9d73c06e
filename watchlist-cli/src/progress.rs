//! Progress bar adapter for multi-franchise runs.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use watchlist_import::ImportProgress;

/// Drives an indicatif bar from [`ImportProgress`] callbacks.
///
/// Phase and completion messages are logged with the bar suspended so they
/// do not tear its line.
pub(crate) struct CliProgress {
    bar: ProgressBar,
}

impl CliProgress {
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(0)
        };
        let style = ProgressStyle::with_template("  {bar:30.cyan/blue} {pos:>4}/{len:4} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        Self { bar }
    }
}

impl ImportProgress for CliProgress {
    fn on_franchise(&self, current: usize, total: usize, slug: &str) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
        self.bar.set_message(slug.to_string());
    }

    fn on_phase(&self, message: &str) {
        self.bar.suspend(|| {
            log::info!("{}", message.if_supports_color(Stdout, |t| t.bold()));
        });
    }

    fn on_complete(&self, message: &str) {
        self.bar.finish_and_clear();
        log::info!("{}", message);
    }
}
