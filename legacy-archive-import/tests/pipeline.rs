use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use legacy_archive_core::{Collection, Document, Video};
use legacy_archive_import::*;
use legacy_archive_scraper::{Fetch, Manifest, ScrapeError};
use serde_yml::Value;
use url::Url;

const SITE: &str = "https://www.calcuttayellowpages.com";
const PREFIX: &str = "/assets/source/legacy-archive";

const HOME: &str = r#"<html><head>
<link rel="stylesheet" href="/css/style.css">
<link rel="shortcut icon" href="/favicon.ico">
</head><body>
<img src="/images/logo.png">
<img src="data:image/gif;base64,R0lGODlh">
</body></html>"#;

const POET: &str = r#"<html><body><img src="/images/logo.png"><p>About the poet</p></body></html>"#;

const BOOKS: &str = r#"<html><body>
<div class="publishBook"><img src="/books/madhushala.jpg"><p class="bookName">Madhushala</p><p class="bookGenre">Genre - Poetry</p></div>
<div class="publishBook"><img src="/books/untitled.jpg"><p class="bookName">   </p></div>
<div class="publishBook"><p class="bookName">मधुशाला</p></div>
</body></html>"#;

const GALLERY: &str = r#"<html><body>
<div class="galleryBox"><img src="/gallery/reading.jpg" alt="ignored"><p>Poetry Reading</p></div>
<div class="galleryBox"><img src="/gallery/copy-of-logo.png" alt="Logo"></div>
<div class="galleryBox"><iframe src="https://www.youtube.com/embed/abc123"></iframe><p>Interview</p></div>
</body></html>"#;

const PRESS: &str = r#"<html><body>
<div class="achievementBox"><a href="/press/review1.pdf"><img src="/press/review-thumb.jpg"></a></div>
<div class="articlesBox"><a href="/press/article.html">Read</a></div>
<div class="articlesBox"><img src="/press/no-link.jpg"></div>
</body></html>"#;

const ACHIEVEMENTS: &str = r#"<html><body>
<div class="achievementBox"><a href="/img/cert1.jpg">Certificate</a></div>
<div class="achievementBox"><a href="/img/cert2.jpg">Award</a></div>
</body></html>"#;

const CONTACT: &str = "<html><body><p>Write to us</p></body></html>";

const CSS: &str = "body { background: url('../images/bg.png'); }\n\
                   .dot { background: url(data:image/png;base64,AAAA); }\n";

/// In-memory site. Unknown URLs are 404s.
struct FakeSite {
    bodies: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
    throttles: Cell<usize>,
}

impl FakeSite {
    fn new() -> Self {
        let mut site = Self {
            bodies: HashMap::new(),
            requests: RefCell::new(Vec::new()),
            throttles: Cell::new(0),
        };
        site.serve("/adver/113288.html", HOME.as_bytes());
        site.serve("/adver/113288gangeshwar_singh_poet.html", POET.as_bytes());
        site.serve("/adver/113288books.html", BOOKS.as_bytes());
        site.serve("/adver/113288gallery.html", GALLERY.as_bytes());
        site.serve("/adver/113288press_review.html", PRESS.as_bytes());
        site.serve("/adver/113288achievement.html", ACHIEVEMENTS.as_bytes());
        site.serve("/adver/113288contact.html", CONTACT.as_bytes());
        site.serve("/css/style.css", CSS.as_bytes());
        site.serve("/favicon.ico", b"ICO");
        site.serve("/images/logo.png", b"LOGO");
        site.serve("/images/bg.png", b"BACKGROUND");
        site.serve("/books/madhushala.jpg", b"COVER");
        site.serve("/books/untitled.jpg", b"UNTITLED");
        site.serve("/gallery/reading.jpg", b"READING");
        site.serve("/gallery/copy-of-logo.png", b"LOGO");
        site.serve("/press/review1.pdf", b"%PDF review");
        site.serve("/press/review-thumb.jpg", b"THUMB");
        site.serve("/press/article.html", b"<html>article</html>");
        site.serve("/img/cert1.jpg", b"CERT ONE");
        site.serve("/img/cert2.jpg", b"CERT TWO");
        site
    }

    fn serve(&mut self, path: &str, body: &[u8]) {
        self.bodies.insert(format!("{SITE}{path}"), body.to_vec());
    }

    fn without(mut self, path: &str) -> Self {
        self.bodies.remove(&format!("{SITE}{path}"));
        self
    }

    fn request_count(&self, path: &str) -> usize {
        let url = format!("{SITE}{path}");
        self.requests.borrow().iter().filter(|u| **u == url).count()
    }
}

impl Fetch for FakeSite {
    fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        self.requests.borrow_mut().push(url.to_string());
        self.bodies
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| ScrapeError::Status {
                status: 404,
                url: url.to_string(),
            })
    }

    fn throttle(&self) {
        self.throttles.set(self.throttles.get() + 1);
    }
}

fn read_record(config: &ImportConfig, collection: Collection, slug: &str) -> Document {
    let path = config
        .content_dir
        .join(collection.dir_name())
        .join(format!("{slug}.md"));
    let text = fs::read_to_string(&path).unwrap_or_else(|e| panic!("{}: {e}", path.display()));
    Document::try_parse(&text).unwrap()
}

fn field<'a>(doc: &'a Document, key: &str) -> Option<&'a str> {
    doc.header.get(key).and_then(Value::as_str)
}

fn record_files(config: &ImportConfig, collection: Collection) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(config.content_dir.join(collection.dir_name()))
        .map(|dir| {
            dir.filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

fn read_videos(path: &Path) -> Vec<Video> {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn full_run_writes_records_assets_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let site = FakeSite::new();

    let summary = run_import(&config, &site, &SilentProgress).unwrap();

    assert_eq!(summary.pages_processed, 7);
    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.records_written.get(&Collection::Books), Some(&2));
    assert_eq!(summary.records_written.get(&Collection::Achievements), Some(&2));
    assert_eq!(summary.records_written.get(&Collection::Press), Some(&2));
    assert_eq!(summary.records_written.get(&Collection::Photos), Some(&2));
    assert_eq!(summary.videos_written, Some(1));

    // Achievements are numbered by position and point at local copies.
    let first = read_record(&config, Collection::Achievements, "achievement-1");
    assert_eq!(field(&first, "title"), Some("Achievement 1"));
    assert_eq!(
        field(&first, "image"),
        Some("/assets/source/legacy-archive/achievements/cert1.jpg")
    );
    assert_eq!(
        fs::read(config.asset_dir.join("achievements/cert1.jpg")).unwrap(),
        b"CERT ONE"
    );
    let second = read_record(&config, Collection::Achievements, "achievement-2");
    assert_eq!(
        field(&second, "image"),
        Some("/assets/source/legacy-archive/achievements/cert2.jpg")
    );

    // Books: defaults applied, Hindi-only title gets a positional slug.
    let book = read_record(&config, Collection::Books, "madhushala");
    assert_eq!(field(&book, "genre"), Some("Poetry"));
    assert_eq!(field(&book, "language"), Some("Hindi"));
    assert_eq!(field(&book, "status"), Some("Published"));
    assert!(field(&book, "cover").unwrap().ends_with("/madhushala.jpg"));
    let hindi = read_record(&config, Collection::Books, "book-2");
    assert_eq!(field(&hindi, "title"), Some("मधुशाला"));
    assert_eq!(field(&hindi, "genre"), Some("Book"));

    // Press: clips first, slug from the link basename.
    let clip = read_record(&config, Collection::Press, "review1pdf");
    assert_eq!(field(&clip, "type"), Some("clip"));
    assert_eq!(field(&clip, "title"), Some("review1pdf"));
    assert_eq!(
        field(&clip, "link"),
        Some("/assets/source/legacy-archive/press/review1.pdf")
    );
    assert!(field(&clip, "image").unwrap().ends_with("/review-thumb.jpg"));
    let article = read_record(&config, Collection::Press, "articlehtml");
    assert_eq!(field(&article, "type"), Some("article"));
    assert_eq!(field(&article, "description"), Some(""));

    // Gallery: byte-identical image reuses the first stored file.
    let logo = read_record(&config, Collection::Photos, "logo");
    assert_eq!(field(&logo, "title"), Some("Logo"));
    assert_eq!(
        field(&logo, "image"),
        Some("/assets/source/legacy-archive/page-assets/logo.png")
    );
    let reading = read_record(&config, Collection::Photos, "poetry-reading");
    assert_eq!(field(&reading, "caption"), Some("Poetry Reading"));

    // Stylesheet and the assets it references are stored under css.
    assert!(config.asset_dir.join("css/style.css").exists());
    assert_eq!(fs::read(config.asset_dir.join("css/bg.png")).unwrap(), b"BACKGROUND");
    assert!(config.asset_dir.join("icons/favicon.ico").exists());

    let videos = read_videos(&config.videos_file);
    assert_eq!(videos.len(), 1);
    assert_eq!(videos[0].slug, "interview");
    assert_eq!(videos[0].youtube_url, "https://www.youtube.com/embed/abc123");
    assert_eq!(videos[0].description, "Interview");

    let report = fs::read_to_string(&config.report_file).unwrap();
    assert!(report.contains("## YouTube URLs\n- https://www.youtube.com/embed/abc123\n"));
    assert!(report.contains(&format!("- {SITE}/press/no-link.jpg (HTTP 404")));
    assert!(report.contains("## Pages failed\n- None\n"));
    assert!(summary.missing_assets >= 1);

    let manifest = Manifest::load(&config.manifest_file);
    assert_eq!(manifest.total_downloads as usize, summary.assets_downloaded);
    assert_eq!(
        manifest.path_for_url(&format!("{SITE}/gallery/copy-of-logo.png")),
        Some(format!("{PREFIX}/page-assets/logo.png").as_str())
    );
}

#[test]
fn empty_book_title_writes_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());

    run_import(&config, &FakeSite::new(), &SilentProgress).unwrap();

    assert_eq!(
        record_files(&config, Collection::Books),
        vec!["book-2.md".to_string(), "madhushala.md".to_string()]
    );
}

#[test]
fn second_run_fetches_no_asset_again() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let site = FakeSite::new();

    let first = run_import(&config, &site, &SilentProgress).unwrap();
    let achievement = read_record(&config, Collection::Achievements, "achievement-1");
    let second = run_import(&config, &site, &SilentProgress).unwrap();

    assert!(first.assets_downloaded > 0);
    assert_eq!(second.assets_downloaded, 0);
    assert_eq!(site.request_count("/img/cert1.jpg"), 1);
    assert_eq!(site.request_count("/images/logo.png"), 1);
    assert_eq!(site.request_count("/favicon.ico"), 1);
    assert_eq!(site.request_count("/css/style.css"), 1);
    assert_eq!(site.request_count("/images/bg.png"), 1);
    assert_eq!(site.request_count("/adver/113288.html"), 2);

    assert_eq!(
        read_record(&config, Collection::Achievements, "achievement-1"),
        achievement
    );
    let manifest = Manifest::load(&config.manifest_file);
    assert_eq!(manifest.total_downloads as usize, first.assets_downloaded);
}

#[test]
fn failed_page_does_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let site = FakeSite::new().without("/adver/113288books.html");

    let summary = run_import(&config, &site, &LogProgress).unwrap();

    assert_eq!(summary.pages_failed, 1);
    assert_eq!(summary.pages_processed, 6);
    assert!(record_files(&config, Collection::Books).is_empty());
    assert_eq!(record_files(&config, Collection::Achievements).len(), 2);
    assert_eq!(record_files(&config, Collection::Press).len(), 2);
    assert!(config.videos_file.exists());
    assert!(config.asset_dir.join("icons/favicon.ico").exists());

    let report = fs::read_to_string(&config.report_file).unwrap();
    assert!(report.contains(&format!(
        "## Pages failed\n- {SITE}/adver/113288books.html (HTTP 404"
    )));
}

#[test]
fn video_list_is_replaced_not_merged() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    fs::create_dir_all(config.videos_file.parent().unwrap()).unwrap();
    fs::write(
        &config.videos_file,
        r#"[{"slug":"a","title":"Old","youtubeUrl":"https://www.youtube.com/embed/old","description":""}]"#,
    )
    .unwrap();

    run_import(&config, &FakeSite::new(), &SilentProgress).unwrap();

    let slugs: Vec<String> = read_videos(&config.videos_file)
        .into_iter()
        .map(|v| v.slug)
        .collect();
    assert_eq!(slugs, vec!["interview".to_string()]);
}

#[test]
fn hand_edited_fields_and_body_survive() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let books = config.content_dir.join("books");
    fs::create_dir_all(&books).unwrap();
    fs::write(
        books.join("madhushala.md"),
        "---\ntitle: Custom\nbuyLink: https://shop.example/madhushala\n---\nEditor's notes.\n",
    )
    .unwrap();

    run_import(&config, &FakeSite::new(), &SilentProgress).unwrap();

    let book = read_record(&config, Collection::Books, "madhushala");
    assert_eq!(field(&book, "title"), Some("Custom"));
    assert_eq!(field(&book, "buyLink"), Some("https://shop.example/madhushala"));
    assert_eq!(field(&book, "genre"), Some("Poetry"));
    assert!(field(&book, "cover").is_some());
    assert_eq!(book.body, "Editor's notes.\n");
}

#[test]
fn corrupt_manifest_starts_fresh() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    fs::create_dir_all(config.manifest_file.parent().unwrap()).unwrap();
    fs::write(&config.manifest_file, "{ not json").unwrap();

    let summary = run_import(&config, &FakeSite::new(), &SilentProgress).unwrap();

    assert!(summary.assets_downloaded > 0);
    let manifest = Manifest::load(&config.manifest_file);
    assert!(!manifest.url_to_path.is_empty());
}

#[test]
fn delay_follows_page_stylesheet_and_uncached_icon_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let site = FakeSite::new();

    run_import(&config, &site, &SilentProgress).unwrap();
    // Seven pages, one stylesheet, one icon.
    assert_eq!(site.throttles.get(), 9);

    site.throttles.set(0);
    run_import(&config, &site, &SilentProgress).unwrap();
    // Stylesheet read back from disk, icon served from the manifest.
    assert_eq!(site.throttles.get(), 7);
}

#[test]
fn unresolvable_icon_does_not_wait() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let mut site = FakeSite::new();
    site.serve(
        "/adver/113288.html",
        br#"<html><head><link rel="icon" href="mailto:x@y"></head><body></body></html>"#,
    );

    let summary = run_import(&config, &site, &SilentProgress).unwrap();

    assert_eq!(summary.pages_failed, 0);
    assert_eq!(site.throttles.get(), 7);
    assert!(!config.asset_dir.join("icons").exists());
}

#[test]
fn missing_stylesheet_is_a_missing_asset() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let site = FakeSite::new().without("/css/style.css");

    let summary = run_import(&config, &site, &SilentProgress).unwrap();

    assert_eq!(summary.pages_failed, 0);
    assert_eq!(summary.pages_processed, 7);
    assert_eq!(site.request_count("/css/style.css"), 1);
    assert_eq!(site.request_count("/images/bg.png"), 0);
    assert!(config.asset_dir.join("icons/favicon.ico").exists());

    let report = fs::read_to_string(&config.report_file).unwrap();
    assert!(report.contains(&format!(
        "## Missing assets\n- {SITE}/css/style.css (HTTP 404"
    )));
    assert!(report.contains("## Pages failed\n- None\n"));
}

#[test]
fn stylesheet_is_stored_as_fetched() {
    let dir = tempfile::tempdir().unwrap();
    let config = ImportConfig::defaults(dir.path());
    let mut site = FakeSite::new();
    let mut css = b"\xEF\xBB\xBF".to_vec();
    css.extend_from_slice(CSS.as_bytes());
    site.serve("/css/style.css", &css);

    run_import(&config, &site, &SilentProgress).unwrap();

    assert_eq!(fs::read(config.asset_dir.join("css/style.css")).unwrap(), css);
    assert_eq!(fs::read(config.asset_dir.join("css/bg.png")).unwrap(), b"BACKGROUND");
    let manifest = Manifest::load(&config.manifest_file);
    assert_eq!(
        manifest.path_for_url(&format!("{SITE}/css/style.css")),
        Some(format!("{PREFIX}/css/style.css").as_str())
    );
}
