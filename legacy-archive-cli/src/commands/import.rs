use std::path::Path;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use legacy_archive_import::{ImportProgress, ImportSummary, Page};
use legacy_archive_scraper::HttpClient;

use super::load_config;
use crate::error::CliError;

/// Spinner showing which page is being imported.
struct SpinnerProgress {
    pb: ProgressBar,
}

impl SpinnerProgress {
    fn new(quiet: bool) -> Self {
        let pb = ProgressBar::new_spinner();
        if quiet {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }
}

impl ImportProgress for SpinnerProgress {
    fn on_page_start(&self, index: usize, total: usize, page: &Page) {
        self.pb
            .set_message(format!("[{}/{}] {} ({})", index, total, page.kind, page.path));
    }

    fn on_page_done(&self, page: &Page) {
        self.pb.suspend(|| {
            log::info!(
                "  {} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                page.kind
            );
        });
    }

    fn on_page_failed(&self, page: &Page, reason: &str) {
        self.pb.suspend(|| {
            log::warn!(
                "{} {}: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                page.kind,
                reason
            );
        });
    }

    fn on_complete(&self, _summary: &ImportSummary) {
        self.pb.finish_and_clear();
    }
}

/// Run the import for the project at `root`.
pub(crate) fn run_import(root: &Path, quiet: bool) -> Result<(), CliError> {
    let config = load_config(root)?;
    log::debug!("Assets: {}", config.asset_dir.display());
    log::debug!("Content: {}", config.content_dir.display());

    let client = HttpClient::new()?;
    let progress = SpinnerProgress::new(quiet);
    let result = legacy_archive_import::run_import(&config, &client, &progress);
    progress.pb.finish_and_clear();
    let summary = result?;

    log::info!("");
    log::info!(
        "{} {} pages imported, {} failed",
        "Done:".if_supports_color(Stdout, |t| t.bold()),
        summary.pages_processed,
        summary.pages_failed,
    );
    for (collection, count) in &summary.records_written {
        log::info!("  {:<14} {}", collection.to_string(), count);
    }
    if let Some(videos) = summary.videos_written {
        log::info!("  {:<14} {}", "videos", videos);
    }
    log::info!(
        "  {} assets downloaded, {} missing",
        summary.assets_downloaded,
        summary.missing_assets,
    );
    log::info!(
        "  Report: {}",
        config
            .report_file
            .display()
            .if_supports_color(Stdout, |t| t.cyan())
    );

    if summary.pages_failed > 0 || summary.missing_assets > 0 {
        log::warn!(
            "Some content could not be fetched; see {}",
            config.report_file.display()
        );
    }
    Ok(())
}
