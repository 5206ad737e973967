//! Slug derivation for record identities and asset filenames.
//!
//! Slugs are lowercase ASCII words joined by `-`. Anything that is not an
//! ASCII letter or digit is dropped after a small transliteration pass, so a
//! title written entirely in a non-Latin script produces an empty slug and the
//! caller falls back to a positional identifier.

/// Derive a URL- and filesystem-safe identifier from free text.
///
/// Hyphens and whitespace separate words; every other character outside
/// `[A-Za-z0-9]` is removed rather than replaced, so `"cert1.jpg"` becomes
/// `"cert1jpg"`.
pub fn slugify(value: &str) -> String {
    let mut words = String::with_capacity(value.len());
    for ch in value.chars() {
        if let Some(replacement) = transliterate(ch) {
            words.push_str(replacement);
        } else if ch == '-' || ch.is_whitespace() {
            words.push(' ');
        } else if ch.is_ascii_alphanumeric() {
            words.push(ch.to_ascii_lowercase());
        }
    }
    words.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Slugify `value`, falling back to `{prefix}-{index}` when nothing survives.
///
/// `index` is 1-based and positional, so the fallback identity changes if the
/// source page reorders its elements.
pub fn positional_slug(value: &str, prefix: &str, index: usize) -> String {
    let slug = slugify(value);
    if slug.is_empty() {
        format!("{prefix}-{index}")
    } else {
        slug
    }
}

/// Last path segment of a URL or path, without query string or fragment.
pub fn url_basename(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let path = raw[..end].trim_end_matches('/');
    path.rsplit('/').next().unwrap_or(path)
}

fn transliterate(ch: char) -> Option<&'static str> {
    let s = match ch {
        '&' => "and",
        '$' => "dollar",
        '%' => "percent",
        '<' => "less",
        '>' => "greater",
        '|' => "or",
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => "a",
        'æ' | 'Æ' => "ae",
        'ç' | 'Ç' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'È' | 'É' | 'Ê' | 'Ë' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'Ì' | 'Í' | 'Î' | 'Ï' => "i",
        'ñ' | 'Ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' | 'Ø' => "o",
        'œ' | 'Œ' => "oe",
        'ß' => "ss",
        'ù' | 'ú' | 'û' | 'ü' | 'Ù' | 'Ú' | 'Û' | 'Ü' => "u",
        'ý' | 'ÿ' | 'Ý' => "y",
        _ => return None,
    };
    Some(s)
}

#[cfg(test)]
#[path = "tests/slug_tests.rs"]
mod tests;
