use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use legacy_archive_scraper::Manifest;

use super::load_config;
use crate::error::CliError;

/// Print statistics for the project's asset manifest.
pub(crate) fn run_manifest(root: &Path) -> Result<(), CliError> {
    let config = load_config(root)?;
    let path = &config.manifest_file;

    if !path.exists() {
        log::info!(
            "No manifest at {}",
            path.display().if_supports_color(Stdout, |t| t.cyan())
        );
        return Ok(());
    }

    let manifest = Manifest::load(path);
    log::info!(
        "{}",
        "Asset manifest".if_supports_color(Stdout, |t| t.bold())
    );
    log::info!("  File:             {}", path.display());
    log::info!("  URLs:             {}", manifest.url_to_path.len());
    log::info!("  Unique files:     {}", manifest.unique_files());
    log::info!("  Total downloads:  {}", manifest.total_downloads);

    let aliases = manifest.url_to_path.len().saturating_sub(manifest.unique_files());
    if aliases > 0 {
        log::info!(
            "  {}",
            format!("{aliases} URLs share content with another URL")
                .if_supports_color(Stdout, |t| t.dimmed())
        );
    }
    Ok(())
}
