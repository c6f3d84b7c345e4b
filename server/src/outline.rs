//! Story outline generation
//!
//! Validates the prompt, checks the credential, makes exactly one completion
//! call and maps every failure onto [`OutlineError`].

use shared_types::OutlineResponse;
use tracing::{debug, info};

use crate::config::Config;
use crate::provider::{
    ChatCompletionRequest, ChatMessage, CompletionProvider, ProviderAuth, ProviderError,
};

pub const OUTLINE_SYSTEM_PROMPT: &str = "你是一位专业的儿童故事作家，请根据用户的提示词，为孩子生成一个简单、积极、富有想象力的故事大纲。大纲应包含：角色、背景、开端、冲突、解决、结局。请使用中文生成，并且以清晰的分点或段落形式呈现大纲。";

pub const OUTLINE_TEMPERATURE: f32 = 0.7;

pub const OUTLINE_MAX_TOKENS: u32 = 200;

/// Display strings are the messages returned to the browser.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    #[error("缺少提示词。")]
    MissingPrompt,

    #[error("请求格式无效。")]
    InvalidBody(String),

    #[error("OpenRouter API Key 未配置，请联系管理员或检查环境变量。")]
    MissingApiKey,

    #[error("API 认证失败，请检查 OpenRouter API Key 配置是否正确。")]
    Authentication(String),

    #[error("生成故事大纲时发生错误: {}", display_upstream(.0))]
    Upstream(String),

    #[error("生成故事大纲时发生未知错误，请稍后再试。")]
    Unknown(String),
}

fn display_upstream(message: &str) -> &str {
    if message.trim().is_empty() {
        "未知错误"
    } else {
        message
    }
}

impl OutlineError {
    /// Operator-facing detail for logs; never sent to the client verbatim
    pub fn detail(&self) -> &str {
        match self {
            OutlineError::MissingPrompt => "missing prompt",
            OutlineError::MissingApiKey => "OPENROUTER_API_KEY not configured",
            OutlineError::InvalidBody(detail)
            | OutlineError::Authentication(detail)
            | OutlineError::Upstream(detail)
            | OutlineError::Unknown(detail) => detail.as_str(),
        }
    }
}

impl From<ProviderError> for OutlineError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Authentication(message) => OutlineError::Authentication(message),
            ProviderError::Upstream { message, .. } => OutlineError::Upstream(message),
            ProviderError::Transport(e) => OutlineError::Upstream(e.to_string()),
        }
    }
}

/// Fixed system instruction plus the user's theme, verbatim
pub fn build_outline_request(model: &str, prompt: &str) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(OUTLINE_SYSTEM_PROMPT),
            ChatMessage::user(format!("请生成一个故事大纲，主题是：\"{prompt}\"")),
        ],
        temperature: OUTLINE_TEMPERATURE,
        max_tokens: OUTLINE_MAX_TOKENS,
    }
}

pub async fn generate_outline(
    config: &Config,
    provider: &dyn CompletionProvider,
    prompt: &str,
) -> Result<OutlineResponse, OutlineError> {
    if prompt.trim().is_empty() {
        return Err(OutlineError::MissingPrompt);
    }

    let Some(api_key) = config.api_key.as_deref() else {
        return Err(OutlineError::MissingApiKey);
    };

    let auth = ProviderAuth {
        api_key,
        site_url: &config.site_url,
        site_name: &config.site_name,
    };
    let request = build_outline_request(&config.model, prompt);

    info!(model = %config.model, prompt_chars = prompt.chars().count(), "requesting story outline");
    let completion = provider.complete(&auth, &request).await?;

    let outline = completion.first_content().ok_or_else(|| {
        OutlineError::Unknown(format!(
            "completion {} had no message content ({} choices)",
            completion.id.as_deref().unwrap_or("<no id>"),
            completion.choices.len()
        ))
    })?;

    debug!(outline_chars = outline.chars().count(), "story outline received");
    Ok(OutlineResponse {
        outline: outline.to_string(),
    })
}
