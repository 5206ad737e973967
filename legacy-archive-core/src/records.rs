//! Typed records for the site's content collections.
//!
//! Field names, optionality and the press `type` values are consumed as-is by
//! the site renderer, so serialized names must not drift.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A content collection the importer writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Books,
    Achievements,
    Press,
    Photos,
    Videos,
}

impl Collection {
    pub const ALL: [Collection; 5] = [
        Collection::Books,
        Collection::Achievements,
        Collection::Press,
        Collection::Photos,
        Collection::Videos,
    ];

    /// Directory name under the content root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Collection::Books => "books",
            Collection::Achievements => "achievements",
            Collection::Press => "press",
            Collection::Photos => "photos",
            Collection::Videos => "videos",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A record stored as one front-matter file per slug.
///
/// Serializing a record yields every schema field in declaration order; `None`
/// serializes as null and is treated as "unset" by the merger.
pub trait ContentRecord: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    /// Values used when neither the stored record nor the scraped one sets a field.
    fn defaults() -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub title: String,
    pub genre: String,
    pub language: Option<String>,
    pub description: String,
    #[serde(default = "default_status")]
    pub status: String,
    pub cover: Option<String>,
    pub buy_link: Option<String>,
}

fn default_status() -> String {
    "Published".to_string()
}

impl ContentRecord for Book {
    const COLLECTION: Collection = Collection::Books;

    fn defaults() -> &'static [(&'static str, &'static str)] {
        &[
            ("genre", "Book"),
            ("language", "Hindi"),
            ("description", ""),
            ("status", "Published"),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub title: String,
    pub year: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub link: Option<String>,
}

impl ContentRecord for Achievement {
    const COLLECTION: Collection = Collection::Achievements;

    fn defaults() -> &'static [(&'static str, &'static str)] {
        &[("description", "")]
    }
}

/// Kind of press item. Serialized lowercase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PressType {
    Article,
    #[default]
    Clip,
    Video,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PressItem {
    pub title: String,
    pub date: Option<String>,
    pub description: Option<String>,
    pub link: String,
    #[serde(rename = "type", default)]
    pub kind: PressType,
    pub image: Option<String>,
}

impl ContentRecord for PressItem {
    const COLLECTION: Collection = Collection::Press;

    fn defaults() -> &'static [(&'static str, &'static str)] {
        &[("link", ""), ("type", "clip"), ("description", "")]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub title: String,
    pub caption: Option<String>,
    pub image: String,
    pub credit: Option<String>,
}

impl ContentRecord for Photo {
    const COLLECTION: Collection = Collection::Photos;

    fn defaults() -> &'static [(&'static str, &'static str)] {
        &[("image", "")]
    }
}

/// One entry of the videos file. The whole list is rewritten on every run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub slug: String,
    pub title: String,
    pub youtube_url: String,
    pub description: String,
}

#[cfg(test)]
#[path = "tests/records_tests.rs"]
mod tests;
