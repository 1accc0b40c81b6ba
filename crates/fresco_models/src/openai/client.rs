//! Streaming client for the OpenAI chat completions API.

use crate::openai::{ChatChunk, ChatRequest, OpenAiError, conversions};
use crate::{CompletionStream, FragmentStream};
use async_stream::try_stream;
use fresco_core::GenerateRequest;
use fresco_error::FrescoResult;
use futures_util::StreamExt;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Model used for code generation.
pub const MODEL_GPT_4: &str = "gpt-4-turbo";

/// Chat completions endpoint.
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

// Generation parameters are fixed rather than request-supplied: bounded
// output, deterministic sampling, and a timeout generous enough for
// multi-minute generations.
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.0;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// Streaming client for the OpenAI chat completions API.
///
/// The credential is supplied per call rather than at construction: each
/// session resolves its own key.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    base_url: String,
}

impl OpenAiClient {
    /// Creates a new client with the default model and endpoint.
    pub fn new() -> Self {
        Self::with_model(MODEL_GPT_4)
    }

    /// Creates a new client with a specific model.
    pub fn with_model(model: impl Into<String>) -> Self {
        Self::with_model_and_url(model, OPENAI_API_URL)
    }

    /// Creates a new client with a specific model against a custom endpoint.
    pub fn with_model_and_url(model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            model: model.into(),
            base_url: base_url.into(),
        }
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl CompletionStream for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn stream(
        &self,
        request: &GenerateRequest,
        api_key: &str,
    ) -> FrescoResult<FragmentStream> {
        let model = request.model().clone().unwrap_or_else(|| self.model.clone());
        let messages = conversions::to_chat_messages(request.messages());

        let chat_request = ChatRequest::builder()
            .model(model)
            .messages(messages)
            .max_tokens(Some(request.max_tokens().unwrap_or(MAX_TOKENS)))
            .temperature(Some(request.temperature().unwrap_or(TEMPERATURE)))
            .stream(Some(true))
            .build()
            .map_err(|e| OpenAiError::Builder(format!("Failed to build request: {}", e)))?;

        debug!(
            message_count = chat_request.messages().len(),
            "Opening completion stream"
        );

        let response = self
            .client
            .post(&self.base_url)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "HTTP request failed");
                OpenAiError::Http(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!(status = %status, error = %error_text, "API error");
            return Err(OpenAiError::Api {
                status: status.as_u16(),
                message: error_text,
            }
            .into());
        }

        let mut bytes = response.bytes_stream();
        let stream = try_stream! {
            let mut buffer: Vec<u8> = Vec::new();
            'read: while let Some(chunk) = bytes.next().await {
                let chunk =
                    chunk.map_err(|e| OpenAiError::Http(format!("Stream read failed: {}", e)))?;
                buffer.extend_from_slice(&chunk);
                while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                    let line: Vec<u8> = buffer.drain(..=pos).collect();
                    let line = String::from_utf8_lossy(&line);
                    match decode_stream_line(line.trim_end())? {
                        Some(StreamEvent::Done) => break 'read,
                        Some(StreamEvent::Content(content)) => yield content,
                        None => {}
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// One decoded server-sent event from the completions stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// Incremental completion content
    Content(String),
    /// End-of-stream marker
    Done,
}

/// Decodes one server-sent-event line from the completions stream.
///
/// Returns `Ok(None)` for blank lines, non-data lines, and deltas that carry
/// no content (role-only first chunks, finish markers).
pub fn decode_stream_line(line: &str) -> Result<Option<StreamEvent>, OpenAiError> {
    let Some(data) = line.strip_prefix("data: ") else {
        return Ok(None);
    };
    if data == "[DONE]" {
        return Ok(Some(StreamEvent::Done));
    }
    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|e| OpenAiError::ResponseParsing(format!("Failed to parse chunk: {}", e)))?;
    match chunk.delta_content() {
        Some(content) if !content.is_empty() => {
            Ok(Some(StreamEvent::Content(content.to_string())))
        }
        _ => Ok(None),
    }
}
