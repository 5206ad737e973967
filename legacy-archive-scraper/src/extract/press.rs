use std::sync::LazyLock;

use legacy_archive_core::PressType;
use scraper::{Html, Selector};

use super::{first_attr, selector};

static CLIP: LazyLock<Selector> = LazyLock::new(|| selector(".achievementBox"));
static ARTICLE: LazyLock<Selector> = LazyLock::new(|| selector(".articlesBox"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

/// A press clipping or article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressEntry {
    pub link: Option<String>,
    pub image: Option<String>,
    pub kind: PressType,
}

/// Extract clips followed by articles, each group in document order.
///
/// A clip needs a link or an image; an article needs a link.
pub fn extract_press(doc: &Html) -> Vec<PressEntry> {
    let clips = doc.select(&CLIP).filter_map(|el| {
        let link = first_attr(el, &LINK, "href");
        let image = first_attr(el, &IMG, "src");
        (link.is_some() || image.is_some()).then_some(PressEntry {
            link,
            image,
            kind: PressType::Clip,
        })
    });

    let articles = doc.select(&ARTICLE).filter_map(|el| {
        let link = first_attr(el, &LINK, "href")?;
        Some(PressEntry {
            link: Some(link),
            image: first_attr(el, &IMG, "src"),
            kind: PressType::Article,
        })
    });

    clips.chain(articles).collect()
}
