//! Progress reporting for extract and populate runs.

/// Receives progress from runs that walk every franchise under the data root.
pub trait ImportProgress {
    /// A franchise was extracted, or its extracted files were loaded.
    fn on_franchise(&self, current: usize, total: usize, slug: &str);

    /// A run moved to a new stage, such as extracting or merging.
    fn on_phase(&self, message: &str);

    /// The run finished; `message` summarizes entity counts.
    fn on_complete(&self, message: &str);
}

/// Discards everything. Used by library callers that only want the report.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_franchise(&self, _current: usize, _total: usize, _slug: &str) {}
    fn on_phase(&self, _message: &str) {}
    fn on_complete(&self, _message: &str) {}
}

/// Writes progress through `log`, one line per 50 franchises.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_franchise(&self, current: usize, total: usize, slug: &str) {
        if current.is_multiple_of(50) || current == total {
            log::info!("  [{}/{}] {}", current, total, slug);
        }
    }

    fn on_phase(&self, message: &str) {
        log::info!("{}", message);
    }

    fn on_complete(&self, message: &str) {
        log::info!("{}", message);
    }
}
