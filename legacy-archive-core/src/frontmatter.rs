//! Markdown files with a YAML front-matter header.
//!
//! ```text
//! ---
//! title: Example
//! ---
//! Free text body, kept byte for byte.
//! ```

use serde_yml::{Mapping, Value};

use crate::error::ContentError;

const FENCE: &str = "---";

/// A parsed record file: structured header plus opaque body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub header: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(header: Mapping, body: impl Into<String>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// Parse a record file strictly.
    ///
    /// Text without a leading fence is all body. A header that is present but
    /// not a YAML mapping is an error.
    pub fn try_parse(text: &str) -> Result<Self, ContentError> {
        let Some(after_open) = strip_fence_line(text) else {
            return Ok(Self::new(Mapping::new(), text));
        };

        let mut offset = 0;
        for line in after_open.split_inclusive('\n') {
            if line.trim_end_matches(['\r', '\n']) == FENCE {
                let header = parse_header(&after_open[..offset])?;
                let body = &after_open[offset + line.len()..];
                return Ok(Self::new(header, body));
            }
            offset += line.len();
        }

        Err(ContentError::UnterminatedHeader)
    }

    /// Parse a record file, treating anything malformed as an empty record.
    pub fn parse_lenient(text: &str) -> Self {
        Self::try_parse(text).unwrap_or_else(|e| {
            log::debug!("Ignoring malformed record file: {e}");
            Self::default()
        })
    }

    /// Serialize back to file contents. Header keys keep their mapping order.
    pub fn render(&self) -> Result<String, ContentError> {
        let mut out = String::from("---\n");
        if !self.header.is_empty() {
            let yaml = serde_yml::to_string(&self.header)?;
            out.push_str(&yaml);
            if !yaml.ends_with('\n') {
                out.push('\n');
            }
        }
        out.push_str("---\n");
        out.push_str(&self.body);
        Ok(out)
    }
}

fn strip_fence_line(text: &str) -> Option<&str> {
    let rest = text.strip_prefix(FENCE)?;
    rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'))
}

fn parse_header(yaml: &str) -> Result<Mapping, ContentError> {
    if yaml.trim().is_empty() {
        return Ok(Mapping::new());
    }
    match serde_yml::from_str::<Value>(yaml)? {
        Value::Mapping(map) => Ok(map),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ContentError::NotAMapping),
    }
}

#[cfg(test)]
#[path = "tests/frontmatter_tests.rs"]
mod tests;
