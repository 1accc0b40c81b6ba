//! Integration tests for the session orchestrator.
//!
//! A scripted transport records every envelope and close the session
//! performs; the deterministic mock stream stands in for the model.

use async_trait::async_trait;
use fresco_core::{GenerateRequest, Input, Role};
use fresco_error::{FrescoResult, ModelError};
use fresco_models::{CompletionStream, FragmentStream, MockCompletionStream};
use fresco_server::{
    CloseCode, Envelope, ServerConfig, ServerConfigBuilder, Session, Transport, TransportError,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport that replays scripted inbound messages and records everything
/// the session does to it.
#[derive(Default)]
struct MockTransport {
    inbound: VecDeque<Result<String, TransportError>>,
    sent: Vec<Envelope>,
    closes: Vec<CloseCode>,
    /// After this many successful sends, further sends fail.
    fail_sends_after: Option<usize>,
    /// After this many successful sends, further sends report a disconnect.
    disconnect_sends_after: Option<usize>,
}

impl MockTransport {
    fn with_inbound(message: impl Into<String>) -> Self {
        let mut transport = Self::default();
        transport.inbound.push_back(Ok(message.into()));
        transport
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn receive(&mut self) -> Result<String, TransportError> {
        self.inbound
            .pop_front()
            .unwrap_or(Err(TransportError::Closed))
    }

    async fn send(&mut self, envelope: &Envelope) -> Result<(), TransportError> {
        if let Some(limit) = self.fail_sends_after {
            if self.sent.len() >= limit {
                return Err(TransportError::Failed("send buffer torn".to_string()));
            }
        }
        if let Some(limit) = self.disconnect_sends_after {
            if self.sent.len() >= limit {
                return Err(TransportError::Closed);
            }
        }
        self.sent.push(envelope.clone());
        Ok(())
    }

    async fn close(&mut self, code: CloseCode) {
        self.closes.push(code);
    }
}

/// Source that records the request it was driven with.
struct RecordingSource {
    inner: MockCompletionStream,
    seen: Arc<Mutex<Option<GenerateRequest>>>,
}

#[async_trait]
impl CompletionStream for RecordingSource {
    async fn stream(
        &self,
        request: &GenerateRequest,
        api_key: &str,
    ) -> FrescoResult<FragmentStream> {
        *self.seen.lock().unwrap() = Some(request.clone());
        self.inner.stream(request, api_key).await
    }
}

/// Source that fails to establish a stream.
struct FailingSource;

#[async_trait]
impl CompletionStream for FailingSource {
    async fn stream(
        &self,
        _request: &GenerateRequest,
        _api_key: &str,
    ) -> FrescoResult<FragmentStream> {
        Err(ModelError::new("upstream exploded").into())
    }
}

fn test_config(api_key: Option<&str>) -> Arc<ServerConfig> {
    Arc::new(
        ServerConfigBuilder::default()
            .openai_api_key(api_key.map(str::to_string))
            .logs_path(std::env::temp_dir())
            .mock(true)
            .build()
            .expect("valid config"),
    )
}

fn create_params(image_generation: bool) -> String {
    serde_json::json!({
        "image": "data:image/png;base64,AAAA",
        "generationType": "create",
        "isImageGenerationEnabled": image_generation,
        "openAiApiKey": "sk-test",
    })
    .to_string()
}

fn update_params(history: &[&str], image_generation: bool) -> String {
    serde_json::json!({
        "image": "data:image/png;base64,AAAA",
        "generationType": "update",
        "history": history,
        "isImageGenerationEnabled": image_generation,
        "openAiApiKey": "sk-test",
    })
    .to_string()
}

fn mock_source(fragments: &[&str]) -> Arc<MockCompletionStream> {
    Arc::new(MockCompletionStream::new(
        fragments.iter().map(|s| s.to_string()).collect(),
    ))
}

#[tokio::test]
async fn test_create_without_images_emits_exact_sequence() {
    let session = Session::with_source(
        test_config(None),
        mock_source(&["<html>", "...", "</html>"]),
        None,
    );
    let mut transport = MockTransport::with_inbound(create_params(false));

    session.run(&mut transport).await;

    assert_eq!(
        transport.sent,
        vec![
            Envelope::Status("Generating code...".to_string()),
            Envelope::Chunk("<html>".to_string()),
            Envelope::Chunk("...".to_string()),
            Envelope::Chunk("</html>".to_string()),
            Envelope::SetCode("<html>...</html>".to_string()),
            Envelope::Status("Code generation complete.".to_string()),
        ]
    );
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_set_code_equals_chunk_concatenation() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::with_inbound(create_params(false));

    session.run(&mut transport).await;

    let mut concatenated = String::new();
    let mut set_code = None;
    for envelope in &transport.sent {
        match envelope {
            Envelope::Chunk(fragment) => concatenated.push_str(fragment),
            Envelope::SetCode(code) => set_code = Some(code.clone()),
            _ => {}
        }
    }
    assert_eq!(set_code, Some(concatenated));
}

#[tokio::test]
async fn test_update_appends_alternating_history_turns() {
    let seen = Arc::new(Mutex::new(None));
    let source = RecordingSource {
        inner: MockCompletionStream::new(vec!["<html>B</html>".to_string()]),
        seen: seen.clone(),
    };
    let session = Session::with_source(test_config(None), Arc::new(source), None);
    let mut transport =
        MockTransport::with_inbound(update_params(&["<html>A</html>", "tweak it"], false));

    session.run(&mut transport).await;

    let request = seen.lock().unwrap().clone().expect("request was captured");
    let messages = request.messages();
    // Base prompt (system + user screenshot) then the two history turns
    assert_eq!(messages.len(), 4);
    assert_eq!(*messages[0].role(), Role::System);
    assert_eq!(*messages[1].role(), Role::User);
    assert_eq!(*messages[2].role(), Role::Assistant);
    assert_eq!(
        messages[2].content(),
        &vec![Input::Text("<html>A</html>".to_string())]
    );
    assert_eq!(*messages[3].role(), Role::User);
    assert_eq!(
        messages[3].content(),
        &vec![Input::Text("tweak it".to_string())]
    );
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_update_reuses_images_from_second_to_last_history_entry() {
    let prior = r#"<html><img src="https://cdn.example.com/cat.png" alt="a cat"></html>"#;
    let regenerated = r#"<html><img src="https://placehold.co/100x100" alt="a cat"></html>"#;
    let session = Session::with_source(test_config(None), mock_source(&[regenerated]), None);
    let mut transport = MockTransport::with_inbound(update_params(&[prior, "make it blue"], true));

    session.run(&mut transport).await;

    let set_code = transport.sent.iter().find_map(|envelope| match envelope {
        Envelope::SetCode(code) => Some(code.clone()),
        _ => None,
    });
    let set_code = set_code.expect("setCode was emitted");
    assert!(set_code.contains("https://cdn.example.com/cat.png"));
    assert!(!set_code.contains("placehold.co"));
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_cache_comes_from_second_to_last_entry_of_longer_history() {
    let v1 = r#"<html><img src="https://cdn.example.com/old.png" alt="a cat"></html>"#;
    let v2 = r#"<html><img src="https://cdn.example.com/new.png" alt="a dog"></html>"#;
    let regenerated = concat!(
        r#"<img src="https://placehold.co/1" alt="a cat">"#,
        r#"<img src="https://placehold.co/2" alt="a dog">"#,
    );
    let session = Session::with_source(test_config(None), mock_source(&[regenerated]), None);
    let mut transport = MockTransport::with_inbound(update_params(
        &[v1, "swap the cat for a dog", v2, "bigger please"],
        true,
    ));

    session.run(&mut transport).await;

    let set_code = transport
        .sent
        .iter()
        .find_map(|envelope| match envelope {
            Envelope::SetCode(code) => Some(code.clone()),
            _ => None,
        })
        .expect("setCode was emitted");
    // Only the second-to-last entry seeds the cache: "a dog" resolves,
    // "a cat" keeps its placeholder
    assert!(set_code.contains("https://cdn.example.com/new.png"));
    assert!(set_code.contains(r#"<img src="https://placehold.co/1" alt="a cat">"#));
    assert!(!set_code.contains("old.png"));
}

#[tokio::test]
async fn test_update_with_empty_cache_still_completes() {
    let prior = "<html><p>no images here</p></html>";
    let regenerated = r#"<html><img src="https://placehold.co/100x100" alt="a cat"></html>"#;
    let session = Session::with_source(test_config(None), mock_source(&[regenerated]), None);
    let mut transport = MockTransport::with_inbound(update_params(&[prior, "add a cat"], true));

    session.run(&mut transport).await;

    // Nothing to substitute: the completion passes through unchanged
    assert!(transport.sent.contains(&Envelope::SetCode(regenerated.to_string())));
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_image_pass_emits_status_before_set_code() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::with_inbound(create_params(true));

    session.run(&mut transport).await;

    let kinds: Vec<&str> = transport
        .sent
        .iter()
        .map(|envelope| match envelope {
            Envelope::Status(_) => "status",
            Envelope::Chunk(_) => "chunk",
            Envelope::SetCode(_) => "setCode",
            Envelope::Error(_) => "error",
        })
        .collect();
    let set_code_at = kinds.iter().position(|k| *k == "setCode").expect("setCode");
    let last_chunk_at = kinds.iter().rposition(|k| *k == "chunk").expect("chunks");
    assert!(last_chunk_at < set_code_at);
    assert_eq!(kinds[set_code_at - 1], "status");
    assert_eq!(kinds[kinds.len() - 1], "status");
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_missing_credential_sends_one_error_and_closes_normally() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let params = serde_json::json!({
        "image": "data:image/png;base64,AAAA",
        "generationType": "create",
    })
    .to_string();
    let mut transport = MockTransport::with_inbound(params);

    session.run(&mut transport).await;

    assert_eq!(transport.sent.len(), 1);
    assert!(matches!(&transport.sent[0], Envelope::Error(message) if message.contains("API key")));
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_config_credential_fallback_is_used() {
    let session = Session::with_source(
        test_config(Some("sk-config")),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let params = serde_json::json!({
        "image": "data:image/png;base64,AAAA",
        "generationType": "create",
        "isImageGenerationEnabled": false,
    })
    .to_string();
    let mut transport = MockTransport::with_inbound(params);

    session.run(&mut transport).await;

    assert!(transport.sent.iter().any(|e| matches!(e, Envelope::SetCode(_))));
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_malformed_params_close_without_messages() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::with_inbound("this is not json");

    session.run(&mut transport).await;

    assert!(transport.sent.is_empty());
    assert_eq!(transport.closes, vec![CloseCode::UnsupportedInput]);
}

#[tokio::test]
async fn test_receive_failure_closes_with_internal_error() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::default();

    session.run(&mut transport).await;

    assert!(transport.sent.is_empty());
    assert_eq!(transport.closes, vec![CloseCode::InternalError]);
}

#[tokio::test]
async fn test_update_with_short_history_fails_the_pipeline() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::with_inbound(update_params(&["only one entry"], false));

    session.run(&mut transport).await;

    assert!(matches!(
        transport.sent.last(),
        Some(Envelope::Error(message)) if message.contains("history")
    ));
    assert!(!transport.sent.iter().any(|e| matches!(e, Envelope::Chunk(_))));
    assert_eq!(transport.closes, vec![CloseCode::InternalError]);
}

#[tokio::test]
async fn test_stream_failure_reports_error_and_closes_internal() {
    let session = Session::with_source(test_config(None), Arc::new(FailingSource), None);
    let mut transport = MockTransport::with_inbound(create_params(false));

    session.run(&mut transport).await;

    assert!(matches!(
        transport.sent.last(),
        Some(Envelope::Error(message)) if message.contains("upstream exploded")
    ));
    assert!(!transport.sent.iter().any(|e| matches!(e, Envelope::SetCode(_))));
    assert_eq!(transport.closes, vec![CloseCode::InternalError]);
}

#[tokio::test]
async fn test_disconnect_mid_stream_abandons_without_further_sends() {
    let session = Session::with_source(
        test_config(None),
        mock_source(&["<html>", "</html>"]),
        None,
    );
    let mut transport = MockTransport::with_inbound(create_params(false));
    // The initial status goes through; the first chunk hits a dead socket
    transport.disconnect_sends_after = Some(1);

    session.run(&mut transport).await;

    assert_eq!(
        transport.sent,
        vec![Envelope::Status("Generating code...".to_string())]
    );
    assert_eq!(transport.closes, vec![CloseCode::Normal]);
}

#[tokio::test]
async fn test_send_failures_still_close_exactly_once() {
    let session = Session::with_source(
        test_config(None),
        Arc::new(MockCompletionStream::default()),
        None,
    );
    let mut transport = MockTransport::with_inbound(create_params(false));
    // Every send fails: the pipeline errors out and the error report itself
    // cannot be delivered either
    transport.fail_sends_after = Some(0);

    session.run(&mut transport).await;

    assert!(transport.sent.is_empty());
    assert_eq!(transport.closes, vec![CloseCode::InternalError]);
}
