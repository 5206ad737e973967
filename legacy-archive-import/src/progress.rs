use crate::pipeline::{ImportSummary, Page};

/// Progress callback for an import run.
pub trait ImportProgress {
    /// Called before a page is fetched. `index` is 1-based.
    fn on_page_start(&self, index: usize, total: usize, page: &Page);

    /// Called after a page and its assets have been processed.
    fn on_page_done(&self, page: &Page);

    /// Called when a page could not be fetched; the run continues.
    fn on_page_failed(&self, page: &Page, reason: &str);

    /// Called once the manifest and report have been written.
    fn on_complete(&self, summary: &ImportSummary);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl ImportProgress for SilentProgress {
    fn on_page_start(&self, _index: usize, _total: usize, _page: &Page) {}
    fn on_page_done(&self, _page: &Page) {}
    fn on_page_failed(&self, _page: &Page, _reason: &str) {}
    fn on_complete(&self, _summary: &ImportSummary) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl ImportProgress for LogProgress {
    fn on_page_start(&self, index: usize, total: usize, page: &Page) {
        log::info!("[{}/{}] {} ({})", index, total, page.kind, page.path);
    }

    fn on_page_done(&self, page: &Page) {
        log::debug!("Finished {}", page.kind);
    }

    fn on_page_failed(&self, page: &Page, reason: &str) {
        log::warn!("Page {} failed: {}", page.kind, reason);
    }

    fn on_complete(&self, summary: &ImportSummary) {
        log::info!(
            "Imported {} pages ({} failed), {} records, {} assets downloaded, {} missing",
            summary.pages_processed,
            summary.pages_failed,
            summary.records_total(),
            summary.assets_downloaded,
            summary.missing_assets
        );
    }
}
