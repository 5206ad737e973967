//! Content-addressable asset store.
//!
//! Every remote file the importer touches goes through [`AssetStore::acquire`],
//! which guarantees at most one fetch per URL (as long as the manifest
//! survives) and at most one file per distinct byte content.

use std::fs;
use std::path::{Path, PathBuf};

use legacy_archive_core::slugify;
use sha1::Digest;
use url::Url;

use crate::client::Fetch;
use crate::error::ScrapeError;
use crate::manifest::Manifest;
use crate::report::RunReport;

const DEFAULT_EXTENSION: &str = ".bin";
const DEFAULT_STEM: &str = "asset";
const HASH_PREFIX_LEN: usize = 8;

/// Category an asset was found under; decides its subfolder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetContext {
    Books,
    Achievements,
    Press,
    Gallery,
    Icons,
    Css,
    PageAssets,
    Misc,
}

impl AssetContext {
    /// Subfolder name under the asset root.
    pub fn subdir(&self) -> &'static str {
        match self {
            AssetContext::Books => "books",
            AssetContext::Achievements => "achievements",
            AssetContext::Press => "press",
            AssetContext::Gallery => "gallery",
            AssetContext::Icons => "icons",
            AssetContext::Css => "css",
            AssetContext::PageAssets => "page-assets",
            AssetContext::Misc => "misc",
        }
    }
}

/// Resolve a (possibly relative) reference against `base`.
///
/// Returns `None` for empty references and for anything that does not resolve
/// to an http(s) URL, including `data:` URIs.
pub fn resolve_url(raw: &str, base: &Url) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let url = base.join(raw).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

/// Lowercase hex SHA-1 of `bytes`.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut sha = sha1::Sha1::new();
    sha.update(bytes);
    format!("{:x}", sha.finalize())
}

/// Downloads assets into `root/<context>/` and hands back site-relative paths.
pub struct AssetStore {
    root: PathBuf,
    public_prefix: String,
    manifest: Manifest,
}

impl AssetStore {
    /// `root` is where files land on disk; `public_prefix` is how the site
    /// refers to `root` (e.g. `/assets/source/legacy-archive`).
    pub fn new(root: impl Into<PathBuf>, public_prefix: &str, manifest: Manifest) -> Self {
        Self {
            root: root.into(),
            public_prefix: public_prefix.trim_end_matches('/').to_string(),
            manifest,
        }
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Resolve `raw` against `base` and acquire it.
    ///
    /// Unresolvable references and failed fetches yield `Ok(None)`; fetch
    /// failures are recorded in `report`. Only local filesystem errors are
    /// returned as `Err`.
    pub fn acquire(
        &mut self,
        fetcher: &dyn Fetch,
        report: &mut RunReport,
        raw: &str,
        base: &Url,
        context: AssetContext,
    ) -> Result<Option<String>, ScrapeError> {
        match resolve_url(raw, base) {
            Some(url) => self.acquire_url(fetcher, report, &url, context),
            None => {
                log::debug!("Skipping unresolvable asset reference {raw:?}");
                Ok(None)
            }
        }
    }

    /// Acquire an absolute URL. See [`AssetStore::acquire`].
    pub fn acquire_url(
        &mut self,
        fetcher: &dyn Fetch,
        report: &mut RunReport,
        url: &Url,
        context: AssetContext,
    ) -> Result<Option<String>, ScrapeError> {
        if let Some(path) = self.manifest.path_for_url(url.as_str()) {
            return Ok(Some(path.to_string()));
        }

        let bytes = match fetcher.fetch_bytes(url) {
            Ok(b) => b,
            Err(e) => {
                log::warn!("Missing asset {url}: {e}");
                report.missing_asset(url.as_str(), e.to_string());
                return Ok(None);
            }
        };

        self.store(report, url, &bytes, context).map(Some)
    }

    /// Store bytes that were already fetched for `url`.
    ///
    /// Byte-identical content seen under another URL is reused instead of
    /// written again. A name clash with different content gets a hash-prefix
    /// suffix; existing files with different content are never overwritten.
    pub fn store(
        &mut self,
        report: &mut RunReport,
        url: &Url,
        bytes: &[u8],
        context: AssetContext,
    ) -> Result<String, ScrapeError> {
        if let Some(path) = self.manifest.path_for_url(url.as_str()) {
            return Ok(path.to_string());
        }

        let hash = content_hash(bytes);
        if let Some(existing) = self.manifest.path_for_hash(&hash) {
            let existing = existing.to_string();
            log::debug!("{url} duplicates {existing}");
            self.manifest.record_alias(url.as_str(), &existing);
            return Ok(existing);
        }

        let folder = self.root.join(context.subdir());
        fs::create_dir_all(&folder)?;

        let (stem, ext) = file_name_parts(url);
        let candidates = [
            format!("{stem}{ext}"),
            format!("{stem}-{}{ext}", &hash[..HASH_PREFIX_LEN]),
            format!("{stem}-{hash}{ext}"),
        ];
        let mut chosen = None;
        for name in candidates {
            if is_free_or_identical(&folder.join(&name), &hash)? {
                chosen = Some(name);
                break;
            }
        }
        let Some(file_name) = chosen else {
            return Err(ScrapeError::Io(std::io::Error::other(format!(
                "no free file name for {url} in {}",
                folder.display()
            ))));
        };

        fs::write(folder.join(&file_name), bytes)?;

        let public = format!("{}/{}/{}", self.public_prefix, context.subdir(), file_name);
        self.manifest.record_download(url.as_str(), &hash, &public);
        report.asset_downloaded();
        log::debug!("Saved {url} -> {public}");

        Ok(public)
    }

    /// On-disk location of a public path this store handed out.
    pub fn local_path(&self, public: &str) -> Option<PathBuf> {
        let rest = public.strip_prefix(&self.public_prefix)?.strip_prefix('/')?;
        Some(self.root.join(rest))
    }
}

fn is_free_or_identical(path: &Path, hash: &str) -> Result<bool, ScrapeError> {
    if !path.exists() {
        return Ok(true);
    }
    Ok(content_hash(&fs::read(path)?) == hash)
}

/// Slugified stem and extension (with dot) of the URL's last path segment.
fn file_name_parts(url: &Url) -> (String, String) {
    let raw_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or_default();
    let decoded = urlencoding::decode(raw_name);
    let base_name = decoded.as_deref().unwrap_or(raw_name);

    let (stem, ext) = match base_name.rfind('.') {
        Some(pos) if pos > 0 => (&base_name[..pos], &base_name[pos..]),
        _ => (base_name, DEFAULT_EXTENSION),
    };
    // Decoding can yield separators or NUL; only plain extensions reach the filesystem.
    let ext = if is_plain_extension(ext) {
        ext
    } else {
        DEFAULT_EXTENSION
    };

    let stem = slugify(stem);
    let stem = if stem.is_empty() {
        DEFAULT_STEM.to_string()
    } else {
        stem
    };
    (stem, ext.to_string())
}

/// `.` followed by one or more ASCII letters or digits.
fn is_plain_extension(ext: &str) -> bool {
    ext.strip_prefix('.')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
#[path = "tests/assets_tests.rs"]
mod tests;
