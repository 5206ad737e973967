use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use legacy_archive_import::{ConfigSource, config_path, config_sources};

use super::load_config;
use crate::error::CliError;

/// Show resolved import paths and their sources.
pub(crate) fn run_config_show(root: &Path) -> Result<(), CliError> {
    let path = config_path(root);

    log::info!(
        "{}",
        "Import Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!("");

    if path.exists() {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Config file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let config = load_config(root)?;
    let sources = config_sources(root);

    let fields: [(&str, String, &ConfigSource); 6] = [
        (
            "asset_dir",
            config.asset_dir.display().to_string(),
            &sources.asset_dir,
        ),
        (
            "public_prefix",
            config.public_prefix.clone(),
            &sources.public_prefix,
        ),
        (
            "content_dir",
            config.content_dir.display().to_string(),
            &sources.content_dir,
        ),
        (
            "videos_file",
            config.videos_file.display().to_string(),
            &sources.videos_file,
        ),
        (
            "manifest_file",
            config.manifest_file.display().to_string(),
            &sources.manifest_file,
        ),
        (
            "report_file",
            config.report_file.display().to_string(),
            &sources.report_file,
        ),
    ];

    for (name, value, source) in &fields {
        log::info!(
            "  {:<14} {} {}",
            name,
            value,
            format!("({})", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    Ok(())
}

/// Print the config file path.
pub(crate) fn run_config_path(root: &Path) {
    println!("{}", config_path(root).display());
}
