use axum::{http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::pipeline::{LoginPipeline, PipelineContext};
use crate::database::manager::DatabaseManager;
use crate::database::models::user::UserStore;
use crate::middleware::{auth::optional_session, ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /auth/login - run the login pipeline and return a session token.
///
/// Any bearer token already on the request is decoded and handed to the
/// pipeline as session state; the hijack guard runs against it first.
pub async fn login(headers: HeaderMap, Json(payload): Json<LoginRequest>) -> ApiResult<Value> {
    let session = optional_session(&headers);

    let pool = DatabaseManager::pool().await?;
    let pipeline = LoginPipeline::standard(UserStore::new(pool));

    let mut ctx = PipelineContext::new(payload.username, payload.password, session);
    pipeline.run(&mut ctx).await?;

    // Both are guaranteed by a successful pipeline run
    let user = ctx.user.as_ref().ok_or_else(|| {
        crate::error::ApiError::internal_server_error("Login pipeline produced no user")
    })?;
    let token = ctx.token.as_ref().ok_or_else(|| {
        crate::error::ApiError::internal_server_error("Login pipeline produced no token")
    })?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": user.id,
            "username": user.username,
            "is_staff": user.is_staff,
        }
    })))
}
