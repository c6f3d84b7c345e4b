//! Shared types between frontend and backend
//!
//! These types are used by both:
//! - the axum outline server (native Rust)
//! - the Dioxus storybook frontend (WASM)
//!
//! Serializable with serde for JSON over HTTP

use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

pub mod wizard;

pub use wizard::{
    OutlineFetchError, OutlineSource, OutlineView, OutlineWizard, RequestState, RequestTicket,
    WizardStep,
};

// ============================================================================
// Outline API
// ============================================================================

/// Path of the outline generation endpoint
pub const OUTLINE_ENDPOINT: &str = "/api/outline";

/// Body of `POST /api/outline`
///
/// A missing or `null` `prompt` deserializes to an empty string so the
/// server answers it with the same client-input error as `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../storybook-ui/src/types/generated.ts")]
pub struct OutlineRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub prompt: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl OutlineRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Successful outline generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../storybook-ui/src/types/generated.ts")]
pub struct OutlineResponse {
    pub outline: String,
}

/// Error body returned by every failing API route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../../storybook-ui/src/types/generated.ts")]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
