use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{first_attr, selector};

static BOX: LazyLock<Selector> = LazyLock::new(|| selector(".achievementBox"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

/// One certificate or award link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementEntry {
    /// Raw `href`, usually pointing straight at a scanned image.
    pub link: String,
}

/// Extract achievement links in document order. Boxes without a link are dropped.
pub fn extract_achievements(doc: &Html) -> Vec<AchievementEntry> {
    doc.select(&BOX)
        .filter_map(|el| first_attr(el, &LINK, "href"))
        .map(|link| AchievementEntry { link })
        .collect()
}
