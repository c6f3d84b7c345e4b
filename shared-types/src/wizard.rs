//! UI-agnostic state for the two-step outline wizard
//!
//! The Dioxus frontend keeps one [`OutlineWizard`] in a signal and renders
//! from its queries. Every transition lives here so it can be exercised
//! without a browser.
//!
//! A request is split in two halves: [`OutlineWizard::submit_prompt`] (or
//! [`OutlineWizard::regenerate`]) issues a [`RequestTicket`], and
//! [`OutlineWizard::complete_request`] applies the result for that ticket.
//! Only the most recently issued ticket is ever applied.

use std::fmt;

use async_trait::async_trait;

/// Shown when the server fails without saying why
pub const GENERIC_FAILURE_MESSAGE: &str = "生成大纲失败。";

/// Shown when the server could not be reached or answered garbage
pub const NETWORK_FAILURE_MESSAGE: &str = "网络或服务器错误，请稍后再试。";

/// Acknowledgement for a confirmed outline
pub const CONFIRMED_MESSAGE: &str = "大纲已确认！此功能将在后续步骤中连接到故事生成API。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    PromptEntry,
    OutlineReview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Loading,
}

/// Identifies one outline request issued by the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Why fetching an outline failed, as seen by the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineFetchError {
    /// Non-2xx response; `message` is the server's `error` field if it sent one
    Server { status: u16, message: Option<String> },
    /// Transport failure or an undecodable response
    Network(String),
}

impl OutlineFetchError {
    /// The single line shown to the user in place of the outline
    pub fn user_message(&self) -> String {
        match self {
            OutlineFetchError::Server {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.clone(),
            OutlineFetchError::Server { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
            OutlineFetchError::Network(_) => NETWORK_FAILURE_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for OutlineFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineFetchError::Server { status, message } => write!(
                f,
                "HTTP error {status}: {}",
                message.as_deref().unwrap_or("<no message>")
            ),
            OutlineFetchError::Network(detail) => write!(f, "Request failed: {detail}"),
        }
    }
}

impl std::error::Error for OutlineFetchError {}

/// Anything that can turn a prompt into an outline
///
/// Not `Send`: the browser implementation holds JS futures.
#[async_trait(?Send)]
pub trait OutlineSource {
    async fn fetch_outline(&self, prompt: &str) -> Result<String, OutlineFetchError>;
}

/// What the outline surface should display right now
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineView<'a> {
    Busy,
    Error(&'a str),
    Editor(&'a str),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutlineWizard {
    prompt: String,
    outline: String,
    request_state: RequestState,
    error: Option<String>,
    step: WizardStep,
    latest_ticket: u64,
}

impl OutlineWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn outline(&self) -> &str {
        &self.outline
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn request_state(&self) -> RequestState {
        self.request_state
    }

    pub fn is_loading(&self) -> bool {
        self.request_state == RequestState::Loading
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    /// Submit and regenerate controls are enabled
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && !self.prompt.trim().is_empty()
    }

    pub fn can_edit(&self) -> bool {
        !self.is_loading()
    }

    pub fn can_confirm(&self) -> bool {
        !self.is_loading() && !self.outline.trim().is_empty()
    }

    /// Start a request for the current prompt.
    ///
    /// Returns `None` and leaves the state untouched when the prompt is blank
    /// or a request is already in flight.
    pub fn submit_prompt(&mut self) -> Option<RequestTicket> {
        if !self.can_submit() {
            return None;
        }

        self.error = None;
        self.outline.clear();
        self.request_state = RequestState::Loading;
        self.latest_ticket += 1;
        Some(RequestTicket(self.latest_ticket))
    }

    /// Same contract as [`submit_prompt`](Self::submit_prompt); the step is kept.
    pub fn regenerate(&mut self) -> Option<RequestTicket> {
        self.submit_prompt()
    }

    /// Apply the result of the request identified by `ticket`.
    ///
    /// Returns `false` when the ticket is stale and the result was dropped.
    pub fn complete_request(
        &mut self,
        ticket: RequestTicket,
        result: Result<String, OutlineFetchError>,
    ) -> bool {
        if ticket.0 != self.latest_ticket || !self.is_loading() {
            return false;
        }

        match result {
            Ok(outline) => {
                self.outline = outline;
                self.step = WizardStep::OutlineReview;
            }
            Err(e) => {
                self.error = Some(e.user_message());
            }
        }
        self.request_state = RequestState::Idle;
        true
    }

    /// Replace the outline with user-edited text. Ignored while loading.
    pub fn edit_outline(&mut self, text: impl Into<String>) -> bool {
        if !self.can_edit() {
            return false;
        }
        self.outline = text.into();
        true
    }

    /// Acknowledge the current outline. Nothing downstream consumes it yet.
    pub fn confirm_outline(&self) -> Option<&str> {
        self.can_confirm().then_some(self.outline.as_str())
    }

    pub fn outline_view(&self) -> OutlineView<'_> {
        if self.is_loading() {
            OutlineView::Busy
        } else if let Some(error) = self.error.as_deref() {
            OutlineView::Error(error)
        } else {
            OutlineView::Editor(&self.outline)
        }
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_loading() {
            "正在构思..."
        } else {
            "开始创作"
        }
    }

    pub fn regenerate_label(&self) -> &'static str {
        if self.is_loading() {
            "重新构思..."
        } else {
            "重新生成大纲"
        }
    }

    /// Run a full submit against `source`. Returns whether a request was issued.
    pub async fn submit_with<S>(&mut self, source: &S) -> bool
    where
        S: OutlineSource + ?Sized,
    {
        let Some(ticket) = self.submit_prompt() else {
            return false;
        };
        let prompt = self.prompt.clone();
        let result = source.fetch_outline(&prompt).await;
        self.complete_request(ticket, result)
    }
}
