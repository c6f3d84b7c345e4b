//! Outline API Integration Tests
//!
//! Tests full HTTP request/response cycles for `POST /api/outline` against a
//! counting stub provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use storybook_server::api;
use storybook_server::provider::{
    ChatCompletionRequest, ChatCompletionResponse, CompletionChoice, CompletionMessage,
    CompletionProvider, ProviderAuth, ProviderError,
};
use storybook_server::{AppState, Config};

#[derive(Clone)]
enum Outcome {
    Content(&'static str),
    NoChoices,
    AuthFailure,
    Upstream(&'static str),
}

#[derive(Debug, Clone)]
struct RecordedCall {
    api_key: String,
    site_url: String,
    site_name: String,
    request: ChatCompletionRequest,
}

struct StubProvider {
    outcome: Outcome,
    calls: AtomicUsize,
    recorded: Mutex<Vec<RecordedCall>>,
}

impl StubProvider {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(
        &self,
        auth: &ProviderAuth<'_>,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.recorded.lock().unwrap().push(RecordedCall {
            api_key: auth.api_key.to_string(),
            site_url: auth.site_url.to_string(),
            site_name: auth.site_name.to_string(),
            request: request.clone(),
        });

        match &self.outcome {
            Outcome::Content(text) => Ok(ChatCompletionResponse {
                id: Some("gen-test".to_string()),
                choices: vec![CompletionChoice {
                    message: Some(CompletionMessage {
                        role: Some("assistant".to_string()),
                        content: Some(text.to_string()),
                    }),
                    finish_reason: Some("stop".to_string()),
                }],
                error: None,
            }),
            Outcome::NoChoices => Ok(ChatCompletionResponse::default()),
            Outcome::AuthFailure => Err(ProviderError::Authentication(
                "No auth credentials found".to_string(),
            )),
            Outcome::Upstream(message) => Err(ProviderError::Upstream {
                status: Some(429),
                message: message.to_string(),
            }),
        }
    }
}

fn configured() -> Config {
    Config {
        api_key: Some("sk-or-test".to_string()),
        site_url: "https://stories.example".to_string(),
        site_name: "Test Stories".to_string(),
        ..Config::default()
    }
}

fn setup_test_app(config: Config, provider: Arc<StubProvider>) -> axum::Router {
    let state = Arc::new(AppState::new(config, provider));
    api::router().with_state(state)
}

fn outline_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/outline")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn json_response(app: &axum::Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value: Value = serde_json::from_slice(&body).expect("Invalid JSON response");
    (status, value)
}

#[tokio::test]
async fn test_generate_outline_success() {
    let provider = StubProvider::new(Outcome::Content("Outline X"));
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "outline": "Outline X" }));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_provider_receives_fixed_conversation() {
    let provider = StubProvider::new(Outcome::Content("Outline X"));
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    json_response(&app, req).await;

    let recorded = provider.recorded.lock().unwrap();
    let call = &recorded[0];
    assert_eq!(call.api_key, "sk-or-test");
    assert_eq!(call.site_url, "https://stories.example");
    assert_eq!(call.site_name, "Test Stories");
    assert_eq!(call.request.model, "deepseek/deepseek-chat");
    assert_eq!(call.request.temperature, 0.7);
    assert_eq!(call.request.max_tokens, 200);
    assert_eq!(call.request.messages.len(), 2);
    assert!(call.request.messages[1].content.contains("\"a brave cat\""));
}

#[tokio::test]
async fn test_empty_prompt_rejected() {
    let provider = StubProvider::new(Outcome::Content("unused"));
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "缺少提示词。" }));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_missing_prompt_field_rejected() {
    let provider = StubProvider::new(Outcome::Content("unused"));
    let app = setup_test_app(configured(), provider.clone());

    let (status, body) = json_response(&app, outline_request("{}")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "缺少提示词。");
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_null_prompt_rejected_as_missing() {
    let provider = StubProvider::new(Outcome::Content("unused"));
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": null }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "缺少提示词。" }));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_returns_json_error() {
    let provider = StubProvider::new(Outcome::Content("unused"));
    let app = setup_test_app(configured(), provider.clone());

    let (status, body) = json_response(&app, outline_request("{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_missing_api_key_makes_no_provider_call() {
    let provider = StubProvider::new(Outcome::Content("unused"));
    let app = setup_test_app(Config::default(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("API Key 未配置"));
    assert_eq!(provider.calls(), 0);
}

#[tokio::test]
async fn test_authentication_failure_returns_401() {
    let provider = StubProvider::new(Outcome::AuthFailure);
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let message = body["error"].as_str().unwrap();
    assert!(message.starts_with("API 认证失败"));
    assert!(!message.starts_with("生成故事大纲时发生"));
}

#[tokio::test]
async fn test_upstream_error_passes_message_through() {
    let provider = StubProvider::new(Outcome::Upstream("rate limited"));
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("rate limited"));
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_completion_without_choices_is_unknown_error() {
    let provider = StubProvider::new(Outcome::NoChoices);
    let app = setup_test_app(configured(), provider.clone());

    let req = outline_request(json!({ "prompt": "a brave cat" }).to_string());
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "生成故事大纲时发生未知错误，请稍后再试。");
}

#[tokio::test]
async fn test_health_check() {
    let app = setup_test_app(configured(), StubProvider::new(Outcome::Content("unused")));

    let req = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = json_response(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
