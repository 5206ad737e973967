use thiserror::Error;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// HTTP client could not be set up
    #[error("{0}")]
    Scrape(#[from] legacy_archive_scraper::ScrapeError),

    /// The import run failed
    #[error("Import failed: {0}")]
    Import(#[from] legacy_archive_import::ImportError),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
