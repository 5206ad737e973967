//! On-disk content collections: one front-matter file per record, plus the
//! videos list as a single JSON file.

use std::fs;
use std::path::{Path, PathBuf};

use legacy_archive_core::{ContentRecord, Document, Video};

use crate::error::ImportError;
use crate::merge::{check_schema, merge_record};

const RECORD_EXTENSION: &str = "md";

/// Reads and writes record files under a content root.
pub struct ContentStore {
    content_dir: PathBuf,
    videos_file: PathBuf,
}

impl ContentStore {
    pub fn new(content_dir: impl Into<PathBuf>, videos_file: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            videos_file: videos_file.into(),
        }
    }

    /// `<content_dir>/<collection>/<slug>.md`
    pub fn record_path<R: ContentRecord>(&self, slug: &str) -> PathBuf {
        self.content_dir
            .join(R::COLLECTION.dir_name())
            .join(format!("{slug}.{RECORD_EXTENSION}"))
    }

    /// Read a stored record. Missing or unreadable files are empty records.
    pub fn read(&self, path: &Path) -> Result<Document, ImportError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Document::parse_lenient(&text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                log::warn!("{} is not valid UTF-8, treating as empty", path.display());
                Ok(Document::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Merge `record` into the stored record for `slug` and write it back.
    ///
    /// Stored fields win over scraped ones; the body is kept as is.
    pub fn merge<R: ContentRecord>(&self, slug: &str, record: &R) -> Result<PathBuf, ImportError> {
        let path = self.record_path::<R>(slug);
        let existing = self.read(&path)?;
        let header = merge_record(&existing.header, record)?;

        if let Err(e) = check_schema::<R>(&header) {
            log::warn!(
                "{}/{} does not match the {} schema: {}",
                R::COLLECTION,
                slug,
                R::COLLECTION,
                e
            );
        }

        let doc = Document::new(header, existing.body);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, doc.render()?)?;
        log::debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Replace the videos file with `videos`.
    pub fn write_videos(&self, videos: &[Video]) -> Result<(), ImportError> {
        if let Some(parent) = self.videos_file.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(videos)?;
        let tmp = self.videos_file.with_extension("json.tmp");
        fs::write(&tmp, format!("{json}\n"))?;
        fs::rename(&tmp, &self.videos_file)?;
        Ok(())
    }

    /// Read the videos file; a missing or unparsable file is an empty list.
    pub fn read_videos(&self) -> Vec<Video> {
        fs::read_to_string(&self.videos_file)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
