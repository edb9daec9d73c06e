use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// I/O error
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be loaded
    #[error("Config error: {0}")]
    Config(String),

    /// A franchise could not be extracted
    #[error("Extraction error: {0}")]
    Extract(String),

    /// Reading or writing the canonical store failed
    #[error("Store error: {0}")]
    Store(String),

    /// Some franchises failed in a multi-franchise run
    #[error("{0} franchise(s) failed")]
    FranchiseFailures(usize),

    /// Catch-all for other errors
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn extract(msg: impl Into<String>) -> Self {
        Self::Extract(msg.into())
    }

    pub(crate) fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub(crate) fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
