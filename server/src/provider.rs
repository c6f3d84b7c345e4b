//! OpenAI-compatible chat completion client (OpenRouter)
//!
//! The outline handler only talks to [`CompletionProvider`], so tests can swap
//! in a stub without touching the network.

use async_trait::async_trait;
use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    /// OpenRouter can report failures inside a 200 body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ProviderErrorBody>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if the provider sent one
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub message: Option<CompletionMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

/// `{"error": {...}}` envelope used by OpenAI-compatible APIs.
/// `code` is a number on OpenRouter and a string on OpenAI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<serde_json::Value>,
}

impl ProviderErrorBody {
    fn is_authentication(&self) -> bool {
        match &self.code {
            Some(serde_json::Value::String(code)) => code == "authentication_error",
            Some(serde_json::Value::Number(code)) => code.as_u64() == Some(401),
            _ => false,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ProviderErrorBody,
}

/// Credential and attribution for one provider call
#[derive(Debug, Clone, Copy)]
pub struct ProviderAuth<'a> {
    pub api_key: &'a str,
    pub site_url: &'a str,
    pub site_name: &'a str,
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider rejected credentials: {0}")]
    Authentication(String),

    #[error("provider error: {message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        auth: &ProviderAuth<'_>,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError>;
}

#[derive(Clone)]
pub struct OpenRouterClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionProvider for OpenRouterClient {
    async fn complete(
        &self,
        auth: &ProviderAuth<'_>,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = self.completions_url();
        debug!(url = %url, model = %request.model, "sending chat completion request");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(auth.api_key)
            .json(request);
        builder = with_attribution(builder, "HTTP-Referer", auth.site_url);
        builder = with_attribution(builder, "X-Title", auth.site_name);

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &text));
        }

        let mut completion: ChatCompletionResponse = response.json().await?;
        if let Some(body) = completion.error.take() {
            return Err(error_from_body(None, body));
        }
        Ok(completion)
    }
}

/// Attribution headers are best effort; a value that is not a legal header is dropped.
fn with_attribution(
    builder: reqwest::RequestBuilder,
    name: &'static str,
    value: &str,
) -> reqwest::RequestBuilder {
    if value.is_empty() {
        return builder;
    }
    match HeaderValue::from_bytes(value.as_bytes()) {
        Ok(header_value) => builder.header(name, header_value),
        Err(e) => {
            warn!(header = name, error = %e, "skipping invalid attribution header");
            builder
        }
    }
}

fn error_from_status(status: u16, text: &str) -> ProviderError {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(text) {
        if status == 401 {
            let message = envelope.error.message.unwrap_or_default();
            return ProviderError::Authentication(message);
        }
        return error_from_body(Some(status), envelope.error);
    }

    let message = if text.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        text.trim().to_string()
    };
    if status == 401 {
        ProviderError::Authentication(message)
    } else {
        ProviderError::Upstream {
            status: Some(status),
            message,
        }
    }
}

fn error_from_body(status: Option<u16>, body: ProviderErrorBody) -> ProviderError {
    let auth = body.is_authentication();
    let message = body.message.unwrap_or_default();
    if auth {
        ProviderError::Authentication(message)
    } else {
        ProviderError::Upstream { status, message }
    }
}
