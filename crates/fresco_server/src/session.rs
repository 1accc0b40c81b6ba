//! The per-connection session orchestrator.
//!
//! One session consumes a single inbound parameter message, streams the
//! model's completion back fragment by fragment, optionally substitutes
//! placeholder images, and closes the connection exactly once.

use crate::config::ServerConfig;
use crate::prompts;
use crate::request::{GenerateParams, GenerationType};
use crate::response::{CloseCode, Envelope};
use crate::transcript;
use crate::transport::{Transport, TransportError};
use fresco_core::GenerateRequest;
use fresco_error::{FrescoError, ServerError, ServerErrorKind};
use fresco_images::{Dalle, ImageGenerator, alt_url_mapping, generate_images};
use fresco_models::{CompletionStream, MockCompletionStream, OpenAiClient};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

const STATUS_GENERATING_CODE: &str = "Generating code...";
const STATUS_GENERATING_IMAGES: &str = "Generating images...";
const STATUS_COMPLETE: &str = "Code generation complete.";

const MISSING_KEY_MESSAGE: &str = "No OpenAI API key found. Please add your API key in the \
settings dialog or set OPENAI_API_KEY in the server environment.";

/// How a pipeline run ended short of success.
enum PipelineFailure {
    /// The client went away; nothing further may be sent.
    Disconnected,
    /// The pipeline itself failed.
    Fatal(FrescoError),
}

impl From<TransportError> for PipelineFailure {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Closed => PipelineFailure::Disconnected,
            TransportError::Failed(message) => {
                PipelineFailure::Fatal(ServerError::new(ServerErrorKind::Session(message)).into())
            }
        }
    }
}

impl From<FrescoError> for PipelineFailure {
    fn from(err: FrescoError) -> Self {
        PipelineFailure::Fatal(err)
    }
}

/// Orchestrates one client connection's generation pipeline.
pub struct Session {
    config: Arc<ServerConfig>,
    source: Arc<dyn CompletionStream>,
    generator: Option<Arc<dyn ImageGenerator>>,
}

impl Session {
    /// Creates a session with the standard wiring: a live OpenAI client and
    /// DALL·E generator, or the deterministic mock when the configuration
    /// says so.
    pub fn new(config: Arc<ServerConfig>) -> Self {
        if *config.mock() {
            Self::with_source(config, Arc::new(MockCompletionStream::default()), None)
        } else {
            Self::with_source(
                config,
                Arc::new(OpenAiClient::new()),
                Some(Arc::new(Dalle::new())),
            )
        }
    }

    /// Creates a session with explicit collaborators.
    ///
    /// With no generator, the image pass substitutes cached URLs only.
    pub fn with_source(
        config: Arc<ServerConfig>,
        source: Arc<dyn CompletionStream>,
        generator: Option<Arc<dyn ImageGenerator>>,
    ) -> Self {
        Self {
            config,
            source,
            generator,
        }
    }

    /// Runs the session over `transport`.
    ///
    /// Consumes exactly one inbound message, emits zero or more envelopes in
    /// pipeline order, and closes the transport exactly once before
    /// returning.
    #[instrument(skip_all)]
    pub async fn run<T: Transport>(&self, transport: &mut T) {
        let raw = match transport.receive().await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to receive session parameters");
                transport.close(CloseCode::InternalError).await;
                return;
            }
        };

        let params: GenerateParams = match serde_json::from_str(&raw) {
            Ok(params) => params,
            Err(e) => {
                warn!(error = %e, "malformed session parameters");
                transport.close(CloseCode::UnsupportedInput).await;
                return;
            }
        };

        let api_key = params
            .open_ai_api_key()
            .clone()
            .or_else(|| self.config.openai_api_key().clone());
        let Some(api_key) = api_key else {
            info!("no credential available, ending session");
            self.try_send(transport, &Envelope::Error(MISSING_KEY_MESSAGE.to_string()))
                .await;
            transport.close(CloseCode::Normal).await;
            return;
        };

        match self.pipeline(transport, &params, &api_key).await {
            Ok(()) => {
                info!("session complete");
                transport.close(CloseCode::Normal).await;
            }
            Err(PipelineFailure::Disconnected) => {
                info!("client disconnected, pipeline abandoned");
                transport.close(CloseCode::Normal).await;
            }
            Err(PipelineFailure::Fatal(e)) => {
                error!(error = %e, "pipeline failed");
                self.try_send(
                    transport,
                    &Envelope::Error(format!("An error occurred during processing: {}", e)),
                )
                .await;
                transport.close(CloseCode::InternalError).await;
            }
        }
    }

    /// The generation pipeline proper: prompt assembly, token streaming,
    /// optional image substitution, finalization.
    async fn pipeline<T: Transport>(
        &self,
        transport: &mut T,
        params: &GenerateParams,
        api_key: &str,
    ) -> Result<(), PipelineFailure> {
        transport
            .send(&Envelope::Status(STATUS_GENERATING_CODE.to_string()))
            .await?;

        let mut messages = prompts::assemble_prompt(params.image());

        // Image cache for updates so that prior generations are reused
        let mut image_cache = HashMap::new();

        if *params.generation_type() == GenerationType::Update {
            let history = params.history();
            if history.len() < 2 {
                return Err(PipelineFailure::Fatal(
                    ServerError::new(ServerErrorKind::Session(
                        "update requests need at least two history entries".to_string(),
                    ))
                    .into(),
                ));
            }
            prompts::append_history(&mut messages, history);
            image_cache = alt_url_mapping(&history[history.len() - 2]);
        }

        let request = GenerateRequest::builder()
            .messages(messages.clone())
            .build()
            .map_err(|e| {
                PipelineFailure::Fatal(
                    ServerError::new(ServerErrorKind::Session(format!(
                        "Failed to build request: {}",
                        e
                    )))
                    .into(),
                )
            })?;

        let mut fragments = self.source.stream(&request, api_key).await?;

        let mut completion = String::new();
        while let Some(fragment) = fragments.next().await {
            let fragment = fragment?;
            completion.push_str(&fragment);
            transport.send(&Envelope::Chunk(fragment)).await?;
        }

        // Record the exchange for later inspection; never on the hot path
        transcript::record(
            self.config.logs_path().clone(),
            messages,
            completion.clone(),
        );

        let final_code = if *params.is_image_generation_enabled() {
            transport
                .send(&Envelope::Status(STATUS_GENERATING_IMAGES.to_string()))
                .await?;
            generate_images(
                &completion,
                api_key,
                &image_cache,
                self.generator.as_deref(),
            )
            .await
        } else {
            completion
        };

        transport.send(&Envelope::SetCode(final_code)).await?;
        transport
            .send(&Envelope::Status(STATUS_COMPLETE.to_string()))
            .await?;
        Ok(())
    }

    /// Best-effort send: failures while reporting are deliberately dropped,
    /// the channel may already be unusable.
    async fn try_send<T: Transport>(&self, transport: &mut T, envelope: &Envelope) {
        if let Err(e) = transport.send(envelope).await {
            warn!(error = %e, "could not deliver envelope");
        }
    }
}
