//! HTTP API routes

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared_types::{ApiError, OutlineRequest, OUTLINE_ENDPOINT};
use tracing::error;

use crate::outline::{generate_outline, OutlineError};
use crate::AppState;

/// Configure all API routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route(OUTLINE_ENDPOINT, post(create_outline))
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// POST /api/outline
pub async fn create_outline(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OutlineRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            let err = OutlineError::InvalidBody(rejection.body_text());
            error!(
                status = err.status_code().as_u16(),
                error = %err.detail(),
                "rejected outline request body"
            );
            return err.into_response();
        }
    };

    match generate_outline(&state.config, state.provider.as_ref(), &request.prompt).await {
        Ok(outline) => (StatusCode::OK, Json(outline)).into_response(),
        Err(err) => {
            error!(
                status = err.status_code().as_u16(),
                error = %err.detail(),
                "outline generation failed: {err}"
            );
            err.into_response()
        }
    }
}

impl OutlineError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            OutlineError::MissingPrompt | OutlineError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            OutlineError::Authentication(_) => StatusCode::UNAUTHORIZED,
            OutlineError::MissingApiKey | OutlineError::Upstream(_) | OutlineError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for OutlineError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ApiError::new(self.to_string()))).into_response()
    }
}
