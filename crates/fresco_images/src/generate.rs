//! Placeholder substitution over generated markup.

use crate::cache::{ALT_ATTR, IMG_TAG, PLACEHOLDER_PREFIX, SRC_ATTR, attr};
use fresco_error::FrescoResult;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Produces a URL for an image described by a text prompt.
#[async_trait::async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image and return its URL.
    async fn generate(&self, prompt: &str, api_key: &str) -> FrescoResult<String>;
}

/// Substitutes placeholder image sources in `html`.
///
/// Alt text is the placeholder identifier: each placeholder `<img>` is
/// resolved through `cache` first, then through `generator`. The cache is
/// consulted, never mutated; an empty cache simply routes every identifier
/// to the generator. Identifiers that cannot be resolved (generation failed,
/// or no generator was supplied) keep their placeholder source rather than
/// failing the pass.
#[instrument(skip_all, fields(cached = cache.len()))]
pub async fn generate_images(
    html: &str,
    api_key: &str,
    cache: &HashMap<String, String>,
    generator: Option<&dyn ImageGenerator>,
) -> String {
    let mut resolved: HashMap<String, String> = HashMap::new();
    let mut uncached = Vec::new();
    for alt in placeholder_alts(html) {
        match cache.get(&alt) {
            Some(url) => {
                resolved.insert(alt, url.clone());
            }
            None => uncached.push(alt),
        }
    }

    match generator {
        Some(generator) if !uncached.is_empty() => {
            let results = futures::future::join_all(
                uncached.iter().map(|alt| generator.generate(alt, api_key)),
            )
            .await;
            for (alt, result) in uncached.into_iter().zip(results) {
                match result {
                    Ok(url) => {
                        resolved.insert(alt, url);
                    }
                    Err(e) => {
                        warn!(alt = %alt, error = %e, "image generation failed, placeholder kept");
                    }
                }
            }
        }
        _ => {
            if !uncached.is_empty() {
                debug!(
                    count = uncached.len(),
                    "no generator configured, placeholders kept"
                );
            }
        }
    }

    substitute_sources(html, &resolved)
}

/// Alt texts of placeholder images, deduplicated, in document order.
fn placeholder_alts(html: &str) -> Vec<String> {
    let mut alts = Vec::new();
    for tag in IMG_TAG.find_iter(html) {
        let tag = tag.as_str();
        let (Some(alt), Some(src)) = (attr(&ALT_ATTR, tag), attr(&SRC_ATTR, tag)) else {
            continue;
        };
        if !src.starts_with(PLACEHOLDER_PREFIX) {
            continue;
        }
        if !alts.contains(&alt) {
            alts.push(alt);
        }
    }
    alts
}

/// Rewrites placeholder `src` attributes whose alt text has a resolved URL.
///
/// Tags without a resolution, and tags whose source is not a placeholder,
/// pass through unchanged.
pub fn substitute_sources(html: &str, resolved: &HashMap<String, String>) -> String {
    IMG_TAG
        .replace_all(html, |caps: &regex::Captures| {
            let tag = &caps[0];
            let (Some(alt), Some(src)) = (attr(&ALT_ATTR, tag), attr(&SRC_ATTR, tag)) else {
                return tag.to_string();
            };
            if !src.starts_with(PLACEHOLDER_PREFIX) {
                return tag.to_string();
            }
            let Some(url) = resolved.get(&alt) else {
                return tag.to_string();
            };
            SRC_ATTR
                .replace(tag, regex::NoExpand(&format!(r#"src="{}""#, url)))
                .into_owned()
        })
        .into_owned()
}
