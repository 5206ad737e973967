//! Content schema shared by the legacy-archive importer.
//!
//! Defines the records the site's content collections hold, how record
//! identities (slugs) are derived, and the front-matter file format the
//! records are stored in.

pub mod error;
pub mod frontmatter;
pub mod records;
pub mod slug;

pub use error::ContentError;
pub use frontmatter::Document;
pub use records::{
    Achievement, Book, Collection, ContentRecord, Photo, PressItem, PressType, Video,
};
pub use slug::{positional_slug, slugify, url_basename};
