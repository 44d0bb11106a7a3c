//! HTTP tests for the prompt relay.
//!
//! Each test serves the real router on a loopback port with a stub model
//! client behind it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use scripture_assistant::connector::adapter::ASK_QUESTION_PATH;
use scripture_assistant::connector::{GENERIC_ERROR_MESSAGE, HEALTH_PATH};
use scripture_assistant::{ChatClient, ChatPrompt, Container, DomainError, Router, SystemPrompt};

const CHARTER: &str = "You are a Bible study helper.";

/// Answers every prompt with a fixed text and remembers what it was asked.
struct StubChatClient {
    answer: Result<String, String>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<ChatPrompt>>,
}

impl StubChatClient {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            answer: Err(reason.to_string()),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatClient for StubChatClient {
    async fn complete(&self, prompt: &ChatPrompt) -> Result<String, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.clone());
        self.answer.clone().map_err(DomainError::upstream)
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}

struct TestRelay {
    base_url: String,
    shutdown: CancellationToken,
}

impl TestRelay {
    async fn start(client: Arc<StubChatClient>) -> Self {
        let container = Container::with_chat_client(client, SystemPrompt::new(CHARTER));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind loopback port");
        let addr = listener.local_addr().expect("Failed to read local address");

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::spawn(async move {
            Router::new(Arc::new(container))
                .serve(listener, async move { token.cancelled().await })
                .await
        });

        Self {
            base_url: format!("http://{addr}"),
            shutdown,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestRelay {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

async fn post_raw(relay: &TestRelay, body: &str) -> (u16, Value) {
    post_with_content_type(relay, "application/json", body).await
}

async fn post_with_content_type(relay: &TestRelay, content_type: &str, body: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(relay.url(ASK_QUESTION_PATH))
        .header("content-type", content_type)
        .body(body.to_string())
        .send()
        .await
        .expect("Failed to reach relay");
    let status = response.status().as_u16();
    let body = response.json().await.expect("Relay did not answer JSON");
    (status, body)
}

fn assert_generic_error(status: u16, body: &Value) {
    assert_eq!(status, 500);
    assert_eq!(body, &json!({ "error": GENERIC_ERROR_MESSAGE }));
}

#[tokio::test]
async fn test_answers_question_with_model_text() {
    let client = Arc::new(StubChatClient::answering(
        "1. Content: Grace is unmerited favour.",
    ));
    let relay = TestRelay::start(client.clone()).await;

    let (status, body) = post_raw(&relay, r#"{"question":"What is grace?"}"#).await;

    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({ "response": "1. Content: Grace is unmerited favour." })
    );
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_json_body_is_accepted_whatever_the_content_type() {
    let client = Arc::new(StubChatClient::answering("1. Content: Amen."));
    let relay = TestRelay::start(client.clone()).await;

    for content_type in ["text/plain;charset=UTF-8", "application/octet-stream"] {
        let (status, body) =
            post_with_content_type(&relay, content_type, r#"{"question":"What is grace?"}"#).await;

        assert_eq!(status, 200, "content type {content_type}");
        assert_eq!(body, json!({ "response": "1. Content: Amen." }));
    }
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_forwards_charter_and_fixed_parameters() {
    let client = Arc::new(StubChatClient::answering("ok"));
    let relay = TestRelay::start(client.clone()).await;

    let (status, _) = post_raw(&relay, r#"{"question":"Who was Ruth?"}"#).await;
    assert_eq!(status, 200);

    let prompt = client
        .last_prompt
        .lock()
        .unwrap()
        .clone()
        .expect("Model was not called");
    assert_eq!(prompt.system(), CHARTER);
    assert_eq!(prompt.user(), "Who was Ruth?");
    assert!((prompt.temperature() - 0.1).abs() < f32::EPSILON);
    assert_eq!(prompt.max_tokens(), 1000);
}

#[tokio::test]
async fn test_malformed_json_is_a_generic_500() {
    let client = Arc::new(StubChatClient::answering("unused"));
    let relay = TestRelay::start(client.clone()).await;

    let (status, body) = post_raw(&relay, "{not json").await;

    assert_generic_error(status, &body);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_missing_question_is_a_generic_500() {
    let client = Arc::new(StubChatClient::answering("unused"));
    let relay = TestRelay::start(client.clone()).await;

    let (status, body) = post_raw(&relay, r#"{"query":"wrong field"}"#).await;

    assert_generic_error(status, &body);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_blank_question_never_reaches_the_model() {
    let client = Arc::new(StubChatClient::answering("unused"));
    let relay = TestRelay::start(client.clone()).await;

    let (status, body) = post_raw(&relay, r#"{"question":"   "}"#).await;

    assert_generic_error(status, &body);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_provider_failure_does_not_leak_details() {
    let client = Arc::new(StubChatClient::failing("rate limited: key sk-secret"));
    let relay = TestRelay::start(client.clone()).await;

    let (status, body) = post_raw(&relay, r#"{"question":"What is faith?"}"#).await;

    assert_generic_error(status, &body);
    assert!(!body.to_string().contains("sk-secret"));
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_health_endpoint() {
    let relay = TestRelay::start(Arc::new(StubChatClient::answering("unused"))).await;

    let response = reqwest::get(relay.url(HEALTH_PATH))
        .await
        .expect("Failed to reach relay");

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}
