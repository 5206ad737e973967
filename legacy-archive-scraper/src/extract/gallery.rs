use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::{first_attr, select_text, selector};
use crate::assets::resolve_url;

static BOX: LazyLock<Selector> = LazyLock::new(|| selector(".galleryBox"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));
static CAPTION: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static FRAME: LazyLock<Selector> = LazyLock::new(|| selector(".galleryBox iframe"));

/// A gallery photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    /// Raw `src` of the image.
    pub image: String,
    /// Caption text, falling back to the image's `alt`. May be empty.
    pub caption: String,
}

/// An embedded video player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoEntry {
    /// Absolute player URL.
    pub url: String,
    /// Text of the first paragraph next to the player. May be empty.
    pub caption: String,
}

/// Extract gallery photos in document order. Boxes without an image are dropped.
pub fn extract_photos(doc: &Html) -> Vec<PhotoEntry> {
    doc.select(&BOX)
        .filter_map(|el| {
            let image = first_attr(el, &IMG, "src")?;
            let mut caption = select_text(el, &CAPTION);
            if caption.is_empty() {
                caption = el
                    .select(&IMG)
                    .next()
                    .and_then(|img| img.value().attr("alt"))
                    .map(|alt| alt.trim().to_string())
                    .unwrap_or_default();
            }
            Some(PhotoEntry { image, caption })
        })
        .collect()
}

/// Extract embedded players in document order, resolved against `page_url`.
pub fn extract_videos(doc: &Html, page_url: &Url) -> Vec<VideoEntry> {
    doc.select(&FRAME)
        .filter_map(|frame| {
            let src = frame.value().attr("src")?;
            let url = resolve_url(src, page_url)?;
            let caption = frame
                .parent()
                .and_then(ElementRef::wrap)
                .and_then(|parent| parent.select(&CAPTION).next())
                .map(|p| p.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            Some(VideoEntry {
                url: url.to_string(),
                caption,
            })
        })
        .collect()
}
