//! Inbound session parameters.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// What kind of generation a session performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    /// First generation from a screenshot
    Create,
    /// Regeneration on top of prior history
    Update,
}

/// Parameters for one code generation session.
///
/// Arrives as the session's single inbound message.
#[derive(Debug, Clone, Serialize, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct GenerateParams {
    /// Screenshot reference (a data URL), consumed by prompt assembly
    image: String,
    /// Create or update
    generation_type: GenerationType,
    /// Prior turn texts for `update` requests, oldest first. The first
    /// entry is expected to be an assistant completion, alternating with
    /// user follow-ups from there; at least two entries are required, and
    /// the second-to-last seeds the image cache.
    #[serde(default)]
    history: Vec<String>,
    /// Whether to run the image substitution pass
    #[serde(default = "default_image_generation")]
    is_image_generation_enabled: bool,
    /// Per-request credential; falls back to process configuration
    #[serde(default)]
    open_ai_api_key: Option<String>,
}

fn default_image_generation() -> bool {
    true
}
