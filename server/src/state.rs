use std::sync::Arc;

use crate::config::Config;
use crate::provider::CompletionProvider;

pub struct AppState {
    pub config: Config,
    pub provider: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self { config, provider }
    }
}
