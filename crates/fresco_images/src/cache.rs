//! Image cache derivation from a prior completion.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Placeholder image host emitted by the model.
pub const PLACEHOLDER_PREFIX: &str = "https://placehold.co";

pub(crate) static IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<img\b[^>]*>").expect("valid img tag regex"));
pub(crate) static SRC_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"src\s*=\s*"([^"]*)""#).expect("valid src attr regex"));
pub(crate) static ALT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"alt\s*=\s*"([^"]*)""#).expect("valid alt attr regex"));

/// Extracts one attribute value from an `<img>` tag.
pub(crate) fn attr(re: &Regex, tag: &str) -> Option<String> {
    re.captures(tag)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Builds a mapping from image alt text to the URL a prior completion used.
///
/// Placeholder sources are skipped: only images already resolved to a real
/// URL are worth reusing. An imageless document yields an empty map.
///
/// # Examples
///
/// ```
/// use fresco_images::alt_url_mapping;
///
/// let html = r#"<img src="https://cdn.example.com/cat.png" alt="a cat">"#;
/// let mapping = alt_url_mapping(html);
///
/// assert_eq!(mapping.get("a cat").map(String::as_str), Some("https://cdn.example.com/cat.png"));
/// ```
pub fn alt_url_mapping(html: &str) -> HashMap<String, String> {
    let mut mapping = HashMap::new();
    for tag in IMG_TAG.find_iter(html) {
        let tag = tag.as_str();
        let (Some(alt), Some(src)) = (attr(&ALT_ATTR, tag), attr(&SRC_ATTR, tag)) else {
            continue;
        };
        if src.starts_with(PLACEHOLDER_PREFIX) {
            continue;
        }
        mapping.insert(alt, src);
    }
    mapping
}
