//! Image generation via the OpenAI images API.

use crate::ImageGenerator;
use fresco_error::{FrescoResult, ImageError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Images endpoint.
const IMAGES_API_URL: &str = "https://api.openai.com/v1/images/generations";

const IMAGE_MODEL: &str = "dall-e-3";
const IMAGE_SIZE: &str = "1024x1024";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone, Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Clone, Deserialize)]
struct ImageData {
    url: String,
}

/// Image generator backed by the OpenAI images API (DALL·E 3).
#[derive(Debug, Clone)]
pub struct Dalle {
    client: reqwest::Client,
    base_url: String,
}

impl Dalle {
    /// Creates a new generator against the default endpoint.
    pub fn new() -> Self {
        Self::with_url(IMAGES_API_URL)
    }

    /// Creates a new generator against a custom endpoint.
    pub fn with_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for Dalle {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ImageGenerator for Dalle {
    #[instrument(skip_all, fields(prompt_len = prompt.len()))]
    async fn generate(&self, prompt: &str, api_key: &str) -> FrescoResult<String> {
        let request = ImageRequest {
            model: IMAGE_MODEL,
            prompt,
            n: 1,
            size: IMAGE_SIZE,
        };

        debug!("Requesting image generation");

        let response = self
            .client
            .post(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                ImageError::new(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "Images API error");
            return Err(ImageError::new(format!(
                "API error (status {}): {}",
                status.as_u16(),
                error_text
            ))
            .into());
        }

        let parsed: ImageResponse = response
            .json()
            .await
            .map_err(|e| ImageError::new(format!("Failed to parse response: {}", e)))?;

        let url = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.url)
            .ok_or_else(|| ImageError::new("No image in response"))?;

        Ok(url)
    }
}
