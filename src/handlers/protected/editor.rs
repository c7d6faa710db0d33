use axum::extract::Extension;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use crate::config;
use crate::error::ApiError;
use crate::integrations::editor::{self, EditorTokenError};
use crate::middleware::{ApiResponse, AuthUser};

/// GET /api/editor/token - issue a signed token for the hosted editor.
/// Unconfigured integration: 503 with an empty body (disabled, not broken).
pub async fn token(Extension(auth_user): Extension<AuthUser>) -> axum::response::Response {
    match editor::issue_token(&config::config().editor, &auth_user.username) {
        Ok(token) => ApiResponse::success(json!({ "token": token })).into_response(),
        Err(EditorTokenError::Disabled) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Err(EditorTokenError::Signing(msg)) => {
            tracing::error!("Editor token signing failed: {}", msg);
            ApiError::internal_server_error("Failed to issue editor token").into_response()
        }
    }
}
