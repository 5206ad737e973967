//! Page-level asset references that do not produce records.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use super::selector;

static IMG: LazyLock<Selector> = LazyLock::new(|| selector("img[src]"));
static STYLESHEET: LazyLock<Selector> = LazyLock::new(|| selector("link[rel=stylesheet]"));
static ICON: LazyLock<Selector> =
    LazyLock::new(|| selector("link[rel~='icon'], link[rel='shortcut icon']"));
static CSS_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(([^)]+)\)").expect("static regex"));

fn attr_values(doc: &Html, sel: &Selector, attr: &str) -> Vec<String> {
    doc.select(sel)
        .filter_map(|el| el.value().attr(attr))
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Raw `src` of every image on the page.
pub fn image_sources(doc: &Html) -> Vec<String> {
    attr_values(doc, &IMG, "src")
}

/// Raw `href` of every linked stylesheet.
pub fn stylesheet_links(doc: &Html) -> Vec<String> {
    attr_values(doc, &STYLESHEET, "href")
}

/// Raw `href` of every favicon-style link.
pub fn icon_links(doc: &Html) -> Vec<String> {
    attr_values(doc, &ICON, "href")
}

/// `url(...)` references in a stylesheet, unquoted, with `data:` URIs skipped.
///
/// References are returned raw; resolve them against the stylesheet's own URL.
pub fn css_urls(css: &str) -> Vec<String> {
    CSS_URL
        .captures_iter(css)
        .filter_map(|caps| {
            let raw = caps[1].replace(['\'', '"'], "");
            let raw = raw.trim();
            (!raw.is_empty() && !raw.starts_with("data:")).then(|| raw.to_string())
        })
        .collect()
}
