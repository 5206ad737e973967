use std::path::Path;

use chrono::{DateTime, Local};

/// A URL that could not be fetched, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedUrl {
    pub url: String,
    pub reason: String,
}

/// Collects what happened during an import run and writes the report file.
///
/// Write-only while the run is in progress; rendered once at the end.
#[derive(Debug, Default)]
pub struct RunReport {
    total_assets_downloaded: usize,
    missing_assets: Vec<FailedUrl>,
    youtube_urls: Vec<String>,
    pages_failed: Vec<FailedUrl>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asset_downloaded(&mut self) {
        self.total_assets_downloaded += 1;
    }

    pub fn missing_asset(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.missing_assets.push(FailedUrl {
            url: url.into(),
            reason: reason.into(),
        });
    }

    pub fn page_failed(&mut self, url: impl Into<String>, reason: impl Into<String>) {
        self.pages_failed.push(FailedUrl {
            url: url.into(),
            reason: reason.into(),
        });
    }

    /// Replace the embedded-video URL list with the one extracted this run.
    pub fn set_youtube_urls(&mut self, urls: Vec<String>) {
        self.youtube_urls = urls;
    }

    pub fn total_assets_downloaded(&self) -> usize {
        self.total_assets_downloaded
    }

    pub fn missing_assets(&self) -> &[FailedUrl] {
        &self.missing_assets
    }

    pub fn youtube_urls(&self) -> &[String] {
        &self.youtube_urls
    }

    pub fn pages_failed(&self) -> &[FailedUrl] {
        &self.pages_failed
    }

    /// Render the Markdown report.
    pub fn render(&self, generated: DateTime<Local>) -> String {
        let mut lines = vec![
            "# Import report".to_string(),
            String::new(),
            format!("Generated: {}", generated.format("%Y-%m-%d %H:%M:%S")),
            String::new(),
            format!("Total assets downloaded: {}", self.total_assets_downloaded),
            String::new(),
            "## YouTube URLs".to_string(),
        ];
        lines.extend(self.youtube_urls.iter().map(|u| format!("- {u}")));

        lines.push(String::new());
        lines.push("## Missing assets".to_string());
        push_failures(&mut lines, &self.missing_assets);

        lines.push(String::new());
        lines.push("## Pages failed".to_string());
        push_failures(&mut lines, &self.pages_failed);

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Write the report to `path`, creating parent directories as needed.
    pub fn write_to_file(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.render(Local::now()))
    }
}

fn push_failures(lines: &mut Vec<String>, failures: &[FailedUrl]) {
    if failures.is_empty() {
        lines.push("- None".to_string());
        return;
    }
    for f in failures {
        lines.push(format!("- {} ({})", f.url, f.reason));
    }
}
