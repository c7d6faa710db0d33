use axum::{extract::Extension, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims};
use crate::database::manager::DatabaseManager;
use crate::database::models::user::UserStore;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/auth/whoami - describe the current session, including whether it
/// is an impersonation session and who the acting operator is.
pub async fn whoami(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "id": auth_user.user_id,
        "username": auth_user.username,
        "is_staff": auth_user.is_staff,
        "is_hijacked": auth_user.is_hijacked,
        "actor": auth_user.actor,
    })))
}

#[derive(Debug, Deserialize)]
pub struct HijackRequest {
    pub user_id: Uuid,
}

/// POST /api/auth/hijack - staff-only impersonation. Issues a token that acts
/// as the target user but carries the hijacked flag, so the login pipeline
/// will refuse to authenticate on top of it.
pub async fn hijack(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<HijackRequest>,
) -> ApiResult<Value> {
    auth_user.require_staff()?;

    if auth_user.is_hijacked {
        return Err(ApiError::bad_request("Already hijacking a user"));
    }

    let pool = DatabaseManager::pool().await?;
    let target = UserStore::new(pool)
        .find_by_id(payload.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let claims = Claims::hijacked(
        target.id,
        target.username.clone(),
        target.is_staff,
        auth_user.username.clone(),
    );
    let token = generate_jwt(&claims)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!("{} started hijacking {}", auth_user.username, target.username);

    Ok(ApiResponse::success(json!({
        "token": token,
        "hijacked_user": target.username,
    })))
}

/// DELETE /api/auth/hijack - release an impersonation session, returning a
/// normal token for the acting operator.
pub async fn release(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    let actor_name = match (&auth_user.actor, auth_user.is_hijacked) {
        (Some(actor), true) => actor,
        _ => return Err(ApiError::bad_request("Not currently hijacking a user")),
    };

    let pool = DatabaseManager::pool().await?;
    let actor = UserStore::new(pool)
        .find_by_username(actor_name)
        .await?
        .ok_or_else(|| ApiError::not_found("Acting user not found"))?;

    let claims = Claims::new(actor.id, actor.username.clone(), actor.is_staff);
    let token = generate_jwt(&claims)
        .map_err(|e| ApiError::internal_server_error(e.to_string()))?;

    tracing::info!("{} released hijack of {}", actor.username, auth_user.username);

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": actor.username,
    })))
}
