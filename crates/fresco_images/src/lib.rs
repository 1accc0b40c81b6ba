//! Image cache derivation and placeholder substitution for Fresco.
//!
//! Generated markup references images through a placeholder host, with the
//! alt text acting as the image's identifier. This crate derives a reuse
//! cache from a prior completion and rewrites placeholder sources to real
//! URLs, generating only the images the cache cannot supply.

mod cache;
mod dalle;
mod generate;

pub use cache::{PLACEHOLDER_PREFIX, alt_url_mapping};
pub use dalle::Dalle;
pub use generate::{ImageGenerator, generate_images, substitute_sources};
