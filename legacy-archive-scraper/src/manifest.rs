use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Durable index of everything the asset store has saved.
///
/// `url_to_path` answers "was this URL fetched before", `hash_to_path`
/// answers "were these exact bytes saved before, and under what name". Both
/// map to site-relative public paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub hash_to_path: BTreeMap<String, String>,
    #[serde(default)]
    pub url_to_path: BTreeMap<String, String>,
    /// Files written across all runs.
    #[serde(default)]
    pub total_downloads: u64,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the manifest at `path`.
    ///
    /// A missing, unreadable or corrupt file yields an empty manifest: losing
    /// the history only costs re-downloads, it never breaks a run.
    pub fn load(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("No manifest at {}, starting fresh", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("Could not read manifest {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!("Ignoring corrupt manifest {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Write the manifest as pretty-printed JSON, replacing the file atomically.
    pub fn save(&self, path: &Path) -> Result<(), ScrapeError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    pub fn path_for_url(&self, url: &str) -> Option<&str> {
        self.url_to_path.get(url).map(String::as_str)
    }

    pub fn path_for_hash(&self, hash: &str) -> Option<&str> {
        self.hash_to_path.get(hash).map(String::as_str)
    }

    /// Point `url` at a file that is already on disk.
    pub fn record_alias(&mut self, url: &str, path: &str) {
        self.url_to_path.insert(url.to_string(), path.to_string());
    }

    /// Register a freshly written file.
    pub fn record_download(&mut self, url: &str, hash: &str, path: &str) {
        self.hash_to_path.insert(hash.to_string(), path.to_string());
        self.url_to_path.insert(url.to_string(), path.to_string());
        self.total_downloads += 1;
    }

    /// Number of distinct files the manifest knows about.
    pub fn unique_files(&self) -> usize {
        self.hash_to_path.len()
    }
}
