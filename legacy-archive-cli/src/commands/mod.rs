pub(crate) mod config;
pub(crate) mod import;
pub(crate) mod manifest;

use std::path::Path;

use legacy_archive_import::ImportConfig;

use crate::error::CliError;

/// Load the import config for `root`, naming the project in any error.
pub(crate) fn load_config(root: &Path) -> Result<ImportConfig, CliError> {
    ImportConfig::load(root)
        .map_err(|e| CliError::config(format!("{} ({})", e, root.display())))
}
