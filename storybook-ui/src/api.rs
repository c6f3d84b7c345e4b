use async_trait::async_trait;
use gloo_net::http::Request;
use shared_types::{
    ApiError, OutlineFetchError, OutlineRequest, OutlineResponse, OutlineSource, OUTLINE_ENDPOINT,
};
use std::sync::OnceLock;

/// Port the outline server listens on during local development
const DEV_API_PORT: &str = "3000";

/// Get the API base URL based on current environment
/// - In development (localhost): use the outline server on its own port
/// - In production: use same origin (the server also serves this UI)
fn get_api_base() -> String {
    let hostname = web_sys::window()
        .and_then(|w| w.location().hostname().ok())
        .unwrap_or_default();

    if hostname == "localhost" || hostname == "127.0.0.1" {
        format!("http://{hostname}:{DEV_API_PORT}")
    } else {
        String::new()
    }
}

/// Lazy-static equivalent for WASM - computed at first use
static API_BASE_CACHE: OnceLock<String> = OnceLock::new();

/// Get the cached API base URL
pub fn api_base() -> &'static str {
    API_BASE_CACHE.get_or_init(get_api_base).as_str()
}

/// `POST /api/outline` over the browser's fetch
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpOutlineSource;

#[async_trait(?Send)]
impl OutlineSource for HttpOutlineSource {
    async fn fetch_outline(&self, prompt: &str) -> Result<String, OutlineFetchError> {
        let url = format!("{}{}", api_base(), OUTLINE_ENDPOINT);

        let response = Request::post(&url)
            .json(&OutlineRequest::new(prompt))
            .map_err(|e| OutlineFetchError::Network(format!("Failed to serialize request: {e}")))?
            .send()
            .await
            .map_err(|e| OutlineFetchError::Network(e.to_string()))?;

        if !response.ok() {
            let message = response.json::<ApiError>().await.ok().map(|body| body.error);
            return Err(OutlineFetchError::Server {
                status: response.status(),
                message,
            });
        }

        let data: OutlineResponse = response
            .json()
            .await
            .map_err(|e| OutlineFetchError::Network(format!("Failed to parse JSON: {e}")))?;

        Ok(data.outline)
    }
}
