//! The completion stream seam between the orchestrator and model providers.

use fresco_core::GenerateRequest;
use fresco_error::FrescoResult;
use futures_util::stream::BoxStream;

/// A stream of completion text fragments in upstream arrival order.
pub type FragmentStream = BoxStream<'static, FrescoResult<String>>;

/// Source of streamed completion text.
///
/// Implementations yield every upstream fragment exactly once, in arrival
/// order. The consumer owns concatenation; a mid-stream error is terminal,
/// and text already yielded before the error is the consumer's to discard.
#[async_trait::async_trait]
pub trait CompletionStream: Send + Sync {
    /// Open a fragment stream for the given request.
    ///
    /// `api_key` authenticates against the upstream provider; deterministic
    /// implementations ignore it. Failure to establish the stream surfaces
    /// here; failures while consuming it surface as stream items.
    async fn stream(
        &self,
        request: &GenerateRequest,
        api_key: &str,
    ) -> FrescoResult<FragmentStream>;
}
