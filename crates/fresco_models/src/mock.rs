//! Deterministic canned completion stream.
//!
//! Streams a fixed response instead of calling the OpenAI API. Useful for
//! integration tests and for debugging sessions where vision-model credits
//! would be wasted.

use crate::{CompletionStream, FragmentStream};
use fresco_core::GenerateRequest;
use fresco_error::FrescoResult;

/// Fragments streamed by [`MockCompletionStream::default`].
const CANNED_FRAGMENTS: &[&str] = &[
    "<!DOCTYPE html>\n<html>\n<head>\n",
    "<script src=\"https://cdn.tailwindcss.com\"></script>\n",
    "</head>\n<body class=\"bg-gray-100\">\n",
    "<h1 class=\"text-2xl font-bold\">Hello from the mock model</h1>\n",
    "<img src=\"https://placehold.co/300x200\" alt=\"a hero image\">\n",
    "</body>\n</html>\n",
];

/// Completion stream that yields a fixed fragment sequence.
#[derive(Debug, Clone)]
pub struct MockCompletionStream {
    fragments: Vec<String>,
}

impl MockCompletionStream {
    /// Creates a mock that streams the given fragments in order.
    pub fn new(fragments: Vec<String>) -> Self {
        Self { fragments }
    }

    /// The full text this mock will stream.
    pub fn completion(&self) -> String {
        self.fragments.concat()
    }
}

impl Default for MockCompletionStream {
    fn default() -> Self {
        Self::new(CANNED_FRAGMENTS.iter().map(|s| s.to_string()).collect())
    }
}

#[async_trait::async_trait]
impl CompletionStream for MockCompletionStream {
    async fn stream(
        &self,
        _request: &GenerateRequest,
        _api_key: &str,
    ) -> FrescoResult<FragmentStream> {
        let fragments = self.fragments.clone();
        Ok(Box::pin(tokio_stream::iter(
            fragments.into_iter().map(Ok),
        )))
    }
}
