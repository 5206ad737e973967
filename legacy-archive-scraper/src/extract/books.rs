use std::sync::LazyLock;

use scraper::{Html, Selector};

use super::{first_attr, select_text, selector};

static BOOK: LazyLock<Selector> = LazyLock::new(|| selector(".publishBook"));
static NAME: LazyLock<Selector> = LazyLock::new(|| selector(".bookName"));
static GENRE: LazyLock<Selector> = LazyLock::new(|| selector(".bookGenre"));
static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img"));

const GENRE_PREFIX: &str = "Genre -";

/// A published book as listed on the books page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookEntry {
    pub title: String,
    /// Genre text with the `Genre -` label removed. May be empty.
    pub genre: String,
    /// Raw `src` of the cover image.
    pub image: Option<String>,
}

/// Extract books in document order. Entries without a title are dropped.
pub fn extract_books(doc: &Html) -> Vec<BookEntry> {
    doc.select(&BOOK)
        .filter_map(|el| {
            let title = select_text(el, &NAME);
            if title.is_empty() {
                return None;
            }
            let genre = select_text(el, &GENRE)
                .replacen(GENRE_PREFIX, "", 1)
                .trim()
                .to_string();
            Some(BookEntry {
                title,
                genre,
                image: first_attr(el, &IMG, "src"),
            })
        })
        .collect()
}
