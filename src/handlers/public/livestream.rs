use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};

use crate::config;
use crate::error::ApiError;
use crate::integrations::livestream::{self, LivestreamError};

/// GET /livestream - proxy the provider's event feed.
/// Unconfigured: 503 with an empty body. Upstream trouble: 502.
pub async fn events() -> axum::response::Response {
    match livestream::fetch_events(&config::config().livestream).await {
        Ok(body) => Json(body).into_response(),
        Err(LivestreamError::Disabled) => StatusCode::SERVICE_UNAVAILABLE.into_response(),
        Err(LivestreamError::Upstream(msg)) => {
            tracing::warn!("Livestream upstream failure: {}", msg);
            ApiError::bad_gateway("Livestream provider unavailable").into_response()
        }
    }
}
