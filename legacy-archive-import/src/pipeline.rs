//! The import run.
//!
//! Pages are processed strictly in order, one request at a time. For each page:
//! generic images, stylesheets (and the assets they reference) and icons are
//! acquired, then the page-specific extractor runs, then every image is
//! acquired again under `misc` as a catch-all. A page that cannot be fetched is
//! recorded and skipped; local filesystem failures abort the run.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;

use legacy_archive_core::{
    Achievement, Book, Collection, ContentRecord, Photo, PressItem, Video, positional_slug,
    url_basename,
};
use legacy_archive_scraper::extract::{self, BookEntry, PhotoEntry, PressEntry};
use legacy_archive_scraper::{
    AssetContext, AssetStore, Fetch, Manifest, RunReport, SITE_ROOT, ScrapeError, resolve_url,
};
use scraper::Html;
use url::Url;

use crate::config::ImportConfig;
use crate::error::ImportError;
use crate::progress::ImportProgress;
use crate::store::ContentStore;

/// Which extractor a page gets, beyond the generic asset passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    Poet,
    Books,
    Gallery,
    Press,
    Achievements,
    Contact,
}

impl PageKind {
    pub fn key(&self) -> &'static str {
        match self {
            PageKind::Home => "home",
            PageKind::Poet => "poet",
            PageKind::Books => "books",
            PageKind::Gallery => "gallery",
            PageKind::Press => "press",
            PageKind::Achievements => "achievements",
            PageKind::Contact => "contact",
        }
    }
}

impl std::fmt::Display for PageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// One legacy page, addressed relative to the site root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub kind: PageKind,
    pub path: &'static str,
}

impl Page {
    pub fn url(&self, site_root: &Url) -> Result<Url, ScrapeError> {
        site_root
            .join(self.path)
            .map_err(|e| ScrapeError::invalid_url(format!("{}: {}", self.path, e)))
    }
}

/// The pages imported, in processing order.
pub const PAGES: [Page; 7] = [
    Page {
        kind: PageKind::Home,
        path: "/adver/113288.html",
    },
    Page {
        kind: PageKind::Poet,
        path: "/adver/113288gangeshwar_singh_poet.html",
    },
    Page {
        kind: PageKind::Books,
        path: "/adver/113288books.html",
    },
    Page {
        kind: PageKind::Gallery,
        path: "/adver/113288gallery.html",
    },
    Page {
        kind: PageKind::Press,
        path: "/adver/113288press_review.html",
    },
    Page {
        kind: PageKind::Achievements,
        path: "/adver/113288achievement.html",
    },
    Page {
        kind: PageKind::Contact,
        path: "/adver/113288contact.html",
    },
];

/// What an import run did.
#[derive(Debug, Default, Clone)]
pub struct ImportSummary {
    pub pages_processed: usize,
    pub pages_failed: usize,
    /// Files newly written to the asset tree this run.
    pub assets_downloaded: usize,
    pub missing_assets: usize,
    pub records_written: BTreeMap<Collection, usize>,
    /// Length of the videos list written this run, if the gallery was processed.
    pub videos_written: Option<usize>,
}

impl ImportSummary {
    pub fn records_total(&self) -> usize {
        self.records_written.values().sum()
    }
}

enum PageOutcome {
    Done,
    Failed(String),
}

struct Importer<'a> {
    fetcher: &'a dyn Fetch,
    assets: AssetStore,
    content: ContentStore,
    report: RunReport,
    summary: ImportSummary,
    /// Slugs already written this run, per collection.
    used_slugs: HashMap<Collection, HashSet<String>>,
}

/// Run a full import with `config`, fetching through `fetcher`.
///
/// The manifest and report are written only once every page has been
/// attempted. Page fetch failures are recorded in the report and do not fail
/// the run.
pub fn run_import(
    config: &ImportConfig,
    fetcher: &dyn Fetch,
    progress: &dyn ImportProgress,
) -> Result<ImportSummary, ImportError> {
    fs::create_dir_all(&config.asset_dir)?;
    let manifest = Manifest::load(&config.manifest_file);
    log::debug!(
        "Loaded manifest with {} URLs from {}",
        manifest.url_to_path.len(),
        config.manifest_file.display()
    );

    let site_root = Url::parse(SITE_ROOT)
        .map_err(|e| ScrapeError::invalid_url(format!("{SITE_ROOT}: {e}")))?;

    let mut importer = Importer {
        fetcher,
        assets: AssetStore::new(&config.asset_dir, &config.public_prefix, manifest),
        content: ContentStore::new(&config.content_dir, &config.videos_file),
        report: RunReport::new(),
        summary: ImportSummary::default(),
        used_slugs: HashMap::new(),
    };

    for (i, page) in PAGES.iter().enumerate() {
        progress.on_page_start(i + 1, PAGES.len(), page);
        let url = page.url(&site_root)?;
        match importer.process_page(page, &url)? {
            PageOutcome::Done => {
                importer.summary.pages_processed += 1;
                progress.on_page_done(page);
            }
            PageOutcome::Failed(reason) => {
                importer.summary.pages_failed += 1;
                progress.on_page_failed(page, &reason);
                importer.report.page_failed(url.as_str(), reason);
            }
        }
    }

    let summary = importer.finish(config)?;
    progress.on_complete(&summary);
    Ok(summary)
}

impl Importer<'_> {
    fn process_page(&mut self, page: &Page, url: &Url) -> Result<PageOutcome, ImportError> {
        let fetched = self.fetcher.fetch_text(url);
        self.fetcher.throttle();
        let html = match fetched {
            Ok(html) => html,
            Err(e) => return Ok(PageOutcome::Failed(e.to_string())),
        };
        let doc = Html::parse_document(&html);

        self.acquire_all(&extract::image_sources(&doc), url, AssetContext::PageAssets)?;
        self.import_stylesheets(&doc, url)?;
        self.import_icons(&doc, url)?;

        match page.kind {
            PageKind::Books => self.import_books(extract::extract_books(&doc), url)?,
            PageKind::Achievements => self.import_achievements(&doc, url)?,
            PageKind::Press => self.import_press(extract::extract_press(&doc), url)?,
            PageKind::Gallery => {
                self.import_photos(extract::extract_photos(&doc), url)?;
                self.import_videos(&doc, url)?;
            }
            PageKind::Home | PageKind::Poet | PageKind::Contact => {}
        }

        self.acquire_all(&extract::image_sources(&doc), url, AssetContext::Misc)?;
        Ok(PageOutcome::Done)
    }

    fn acquire(
        &mut self,
        raw: &str,
        base: &Url,
        context: AssetContext,
    ) -> Result<Option<String>, ImportError> {
        Ok(self
            .assets
            .acquire(self.fetcher, &mut self.report, raw, base, context)?)
    }

    fn acquire_all(
        &mut self,
        refs: &[String],
        base: &Url,
        context: AssetContext,
    ) -> Result<(), ImportError> {
        for raw in refs {
            self.acquire(raw, base, context)?;
        }
        Ok(())
    }

    /// Store each linked stylesheet, then every `url(...)` it references,
    /// resolved against the stylesheet's own URL.
    fn import_stylesheets(&mut self, doc: &Html, page_url: &Url) -> Result<(), ImportError> {
        for href in extract::stylesheet_links(doc) {
            let Some(css_url) = resolve_url(&href, page_url) else {
                continue;
            };
            let Some(css) = self.stylesheet_text(&css_url)? else {
                continue;
            };
            for raw in extract::css_urls(&css) {
                self.acquire(&raw, &css_url, AssetContext::Css)?;
            }
        }
        Ok(())
    }

    /// Stylesheet text, from the local copy if the manifest has one. A fresh
    /// fetch is stored byte-for-byte before it is decoded.
    fn stylesheet_text(&mut self, css_url: &Url) -> Result<Option<String>, ImportError> {
        if let Some(public) = self.assets.manifest().path_for_url(css_url.as_str()) {
            let local = self.assets.local_path(public);
            match local.map(fs::read) {
                Some(Ok(bytes)) => return Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
                _ => {
                    log::debug!("No readable local copy of {css_url}, skipping its references");
                    return Ok(None);
                }
            }
        }

        let fetched = self.fetcher.fetch_bytes(css_url);
        self.fetcher.throttle();
        match fetched {
            Ok(bytes) => {
                self.assets
                    .store(&mut self.report, css_url, &bytes, AssetContext::Css)?;
                Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Err(e) => {
                log::warn!("Missing stylesheet {css_url}: {e}");
                self.report.missing_asset(css_url.as_str(), e.to_string());
                Ok(None)
            }
        }
    }

    fn import_icons(&mut self, doc: &Html, page_url: &Url) -> Result<(), ImportError> {
        for href in extract::icon_links(doc) {
            let needs_fetch = resolve_url(&href, page_url)
                .is_some_and(|u| self.assets.manifest().path_for_url(u.as_str()).is_none());
            self.acquire(&href, page_url, AssetContext::Icons)?;
            if needs_fetch {
                self.fetcher.throttle();
            }
        }
        Ok(())
    }

    fn import_books(&mut self, entries: Vec<BookEntry>, page_url: &Url) -> Result<(), ImportError> {
        for (i, entry) in entries.into_iter().enumerate() {
            let slug = self.claim_slug(Collection::Books, positional_slug(&entry.title, "book", i + 1));
            let cover = match entry.image {
                Some(src) => self.acquire(&src, page_url, AssetContext::Books)?,
                None => None,
            };
            let book = Book {
                title: entry.title,
                genre: entry.genre,
                cover,
                ..Default::default()
            };
            self.write_record(&slug, &book)?;
        }
        Ok(())
    }

    fn import_achievements(&mut self, doc: &Html, page_url: &Url) -> Result<(), ImportError> {
        for (i, entry) in extract::extract_achievements(doc).into_iter().enumerate() {
            let n = i + 1;
            let image = self.acquire(&entry.link, page_url, AssetContext::Achievements)?;
            let achievement = Achievement {
                title: format!("Achievement {n}"),
                image,
                ..Default::default()
            };
            self.write_record(&format!("achievement-{n}"), &achievement)?;
        }
        Ok(())
    }

    fn import_press(&mut self, entries: Vec<PressEntry>, page_url: &Url) -> Result<(), ImportError> {
        for (i, entry) in entries.into_iter().enumerate() {
            let source = entry.link.as_deref().or(entry.image.as_deref()).unwrap_or_default();
            let slug = self.claim_slug(
                Collection::Press,
                positional_slug(url_basename(source), "press", i + 1),
            );

            let image = match &entry.image {
                Some(src) => self.acquire(src, page_url, AssetContext::Press)?,
                None => None,
            };
            let file = match &entry.link {
                Some(href) => self.acquire(href, page_url, AssetContext::Press)?,
                None => None,
            };

            let item = PressItem {
                title: slug.replace('-', " "),
                link: file.or_else(|| image.clone()).unwrap_or_default(),
                kind: entry.kind,
                image,
                ..Default::default()
            };
            self.write_record(&slug, &item)?;
        }
        Ok(())
    }

    fn import_photos(&mut self, entries: Vec<PhotoEntry>, page_url: &Url) -> Result<(), ImportError> {
        for (i, entry) in entries.into_iter().enumerate() {
            let n = i + 1;
            let title = if entry.caption.is_empty() {
                format!("Gallery {n}")
            } else {
                entry.caption.clone()
            };
            let slug = self.claim_slug(Collection::Photos, positional_slug(&title, "gallery", n));
            let image = self.acquire(&entry.image, page_url, AssetContext::Gallery)?;

            let photo = Photo {
                title,
                caption: (!entry.caption.is_empty()).then_some(entry.caption),
                image: image.unwrap_or_default(),
                ..Default::default()
            };
            self.write_record(&slug, &photo)?;
        }
        Ok(())
    }

    /// Rebuild the videos list from this page and overwrite the stored one.
    fn import_videos(&mut self, doc: &Html, page_url: &Url) -> Result<(), ImportError> {
        let videos: Vec<Video> = extract::extract_videos(doc, page_url)
            .into_iter()
            .enumerate()
            .map(|(i, entry)| {
                let title = if entry.caption.is_empty() {
                    entry.url.clone()
                } else {
                    entry.caption.clone()
                };
                Video {
                    slug: positional_slug(&title, "video", i + 1),
                    title,
                    youtube_url: entry.url,
                    description: entry.caption,
                }
            })
            .collect();

        self.report
            .set_youtube_urls(videos.iter().map(|v| v.youtube_url.clone()).collect());
        self.content.write_videos(&videos)?;
        log::info!("Wrote {} videos", videos.len());
        self.summary.videos_written = Some(videos.len());
        Ok(())
    }

    /// Make `slug` unique among records written to `collection` this run.
    fn claim_slug(&mut self, collection: Collection, slug: String) -> String {
        let used = self.used_slugs.entry(collection).or_default();
        let mut candidate = slug.clone();
        let mut n = 2;
        while used.contains(&candidate) {
            candidate = format!("{slug}-{n}");
            n += 1;
        }
        if candidate != slug {
            log::debug!("{collection}/{slug} already written this run, using {candidate}");
        }
        used.insert(candidate.clone());
        candidate
    }

    fn write_record<R: ContentRecord>(&mut self, slug: &str, record: &R) -> Result<(), ImportError> {
        self.content.merge(slug, record)?;
        *self.summary.records_written.entry(R::COLLECTION).or_default() += 1;
        Ok(())
    }

    fn finish(self, config: &ImportConfig) -> Result<ImportSummary, ImportError> {
        let Importer {
            assets,
            report,
            mut summary,
            ..
        } = self;

        let manifest = assets.into_manifest();
        manifest.save(&config.manifest_file)?;
        report.write_to_file(&config.report_file)?;
        log::info!("Report written to {}", config.report_file.display());

        summary.assets_downloaded = report.total_assets_downloaded();
        summary.missing_assets = report.missing_assets().len();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_urls() {
        let root = Url::parse(SITE_ROOT).unwrap();
        let urls: Vec<String> = PAGES
            .iter()
            .map(|p| p.url(&root).unwrap().to_string())
            .collect();
        assert_eq!(urls[0], "https://www.calcuttayellowpages.com/adver/113288.html");
        assert_eq!(
            urls[5],
            "https://www.calcuttayellowpages.com/adver/113288achievement.html"
        );
        let keys: Vec<&str> = PAGES.iter().map(|p| p.kind.key()).collect();
        assert_eq!(
            keys,
            vec!["home", "poet", "books", "gallery", "press", "achievements", "contact"]
        );
    }

    #[test]
    fn test_summary_total() {
        let mut summary = ImportSummary::default();
        summary.records_written.insert(Collection::Books, 2);
        summary.records_written.insert(Collection::Press, 3);
        assert_eq!(summary.records_total(), 5);
    }
}
