use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PROVIDER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";
pub const DEFAULT_SITE_URL: &str = "https://your-storybook-app.vercel.app";
pub const DEFAULT_SITE_NAME: &str = "我的AI故事绘本";

/// Process-wide settings, read once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct Config {
    /// Port the server listens on
    pub port: u16,
    /// OpenRouter credential. Requests fail with a configuration error while unset.
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible completion API
    pub provider_base_url: String,
    /// Model identifier sent with every outline request
    pub model: String,
    /// Sent as `HTTP-Referer` for provider attribution
    pub site_url: String,
    /// Sent as `X-Title` for provider attribution
    pub site_name: String,
    /// Directory holding the built Dioxus frontend
    pub frontend_dist: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_key: None,
            provider_base_url: DEFAULT_PROVIDER_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            frontend_dist: default_frontend_dist(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("provider_base_url", &self.provider_base_url)
            .field("model", &self.model)
            .field("site_url", &self.site_url)
            .field("site_name", &self.site_name)
            .field("frontend_dist", &self.frontend_dist)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            port: env_parse("STORYBOOK_PORT", DEFAULT_PORT)?,
            api_key: env_opt("OPENROUTER_API_KEY"),
            provider_base_url: env_str("OPENROUTER_BASE_URL", DEFAULT_PROVIDER_BASE_URL),
            model: env_str("OUTLINE_MODEL", DEFAULT_MODEL),
            site_url: env_str("SITE_URL", DEFAULT_SITE_URL),
            site_name: env_str("SITE_NAME", DEFAULT_SITE_NAME),
            frontend_dist: env_opt("FRONTEND_DIST").unwrap_or_else(default_frontend_dist),
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_str(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("Failed to parse env var {key}={val}: {e}")),
        Err(_) => Ok(default),
    }
}

/// `dx build` debug output, resolved from the workspace root so the server can
/// be launched from the repository root or from `server/`.
fn default_frontend_dist() -> String {
    let workspace_root = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    workspace_root
        .join("target/dx/storybook-ui/debug/web/public")
        .to_string_lossy()
        .to_string()
}
