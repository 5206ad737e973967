//! Existing-wins record merge.
//!
//! A stored record is the source of truth for every field it sets. Scraped
//! values only fill fields that are absent or blank, and per-collection
//! defaults fill whatever is still missing after that. Keys the schema does
//! not know about are carried through untouched.

use legacy_archive_core::ContentRecord;
use serde_yml::{Mapping, Value};

use crate::error::ImportError;

/// Whether a header value counts as unset.
///
/// Null, whitespace-only strings and empty sequences or mappings are blank.
/// Numbers and booleans are always set.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
    }
}

fn is_set(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !is_blank(v))
}

/// Shallow, top-level merge of `extracted` under `existing`.
///
/// For each field: existing value if set, else extracted value if set, else
/// the default for that field (if any). Fields set by neither side and with no
/// default are left as they were in `existing`.
pub fn merge_fields(
    existing: &Mapping,
    extracted: &Mapping,
    defaults: &[(&str, &str)],
) -> Mapping {
    let mut merged = existing.clone();
    let default_for = |key: &Value| {
        let key = key.as_str()?;
        defaults
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| Value::String((*v).to_string()))
    };

    for (key, value) in extracted {
        if is_set(merged.get(key)) {
            continue;
        }
        if !is_blank(value) {
            merged.insert(key.clone(), value.clone());
        } else if let Some(default) = default_for(key) {
            merged.insert(key.clone(), default);
        }
    }

    for (key, value) in defaults {
        let key = Value::String((*key).to_string());
        if !is_set(merged.get(&key)) {
            merged.insert(key, Value::String((*value).to_string()));
        }
    }

    merged
}

/// Merge a freshly extracted record into the stored header for the same slug.
pub fn merge_record<R: ContentRecord>(existing: &Mapping, record: &R) -> Result<Mapping, ImportError> {
    let extracted = match serde_yml::to_value(record)? {
        Value::Mapping(map) => map,
        other => {
            return Err(ImportError::config(format!(
                "{} record did not serialize to a mapping: {other:?}",
                R::COLLECTION
            )));
        }
    };
    Ok(merge_fields(existing, &extracted, R::defaults()))
}

/// Check that a merged header still deserializes as `R`.
pub fn check_schema<R: ContentRecord>(header: &Mapping) -> Result<R, serde_yml::Error> {
    serde_yml::from_value(Value::Mapping(header.clone()))
}
