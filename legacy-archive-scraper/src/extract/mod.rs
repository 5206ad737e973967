//! Best-effort extraction of candidate records from legacy pages.
//!
//! Extractors only read the DOM. They return raw attribute values in document
//! order and leave URL resolution and downloading to the caller. A missing
//! element or attribute yields an empty field, never an error.

pub mod achievements;
pub mod books;
pub mod gallery;
pub mod page;
pub mod press;

pub use achievements::{AchievementEntry, extract_achievements};
pub use books::{BookEntry, extract_books};
pub use gallery::{PhotoEntry, VideoEntry, extract_photos, extract_videos};
pub use page::{css_urls, icon_links, image_sources, stylesheet_links};
pub use press::{PressEntry, extract_press};

use scraper::{ElementRef, Selector};

pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

/// Concatenated, trimmed text of every element under `root` matching `sel`.
pub(crate) fn select_text(root: ElementRef<'_>, sel: &Selector) -> String {
    root.select(sel)
        .flat_map(|el| el.text())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Attribute of the first element under `root` matching `sel`, if non-blank.
pub(crate) fn first_attr(root: ElementRef<'_>, sel: &Selector, attr: &str) -> Option<String> {
    root.select(sel)
        .next()
        .and_then(|el| el.value().attr(attr))
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}
