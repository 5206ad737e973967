pub mod assets;
pub mod client;
pub mod error;
pub mod extract;
pub mod manifest;
pub mod report;

pub use assets::{AssetContext, AssetStore, content_hash, resolve_url};
pub use client::{Fetch, HttpClient, REQUEST_DELAY, SITE_ROOT};
pub use error::ScrapeError;
pub use manifest::Manifest;
pub use report::{FailedUrl, RunReport};
