//! Import the legacy site into the local content store.
//!
//! This crate owns the run: it walks the fixed page list, downloads assets
//! through the scraper's asset store, merges extracted records into existing
//! content files without clobbering hand edits, and persists the manifest and
//! run report at the end.

pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod progress;
pub mod store;

pub use config::{ConfigSource, ConfigSources, ImportConfig, config_path, config_sources};
pub use error::ImportError;
pub use merge::{check_schema, is_blank, merge_fields, merge_record};
pub use pipeline::{ImportSummary, PAGES, Page, PageKind, run_import};
pub use progress::{ImportProgress, LogProgress, SilentProgress};
pub use store::ContentStore;
