use axum::{
    extract::{Extension, Path},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::post::PostStore;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::sanitize;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub html: String,
}

/// GET /api/posts - list posts. Staff only.
pub async fn list(Extension(auth_user): Extension<AuthUser>) -> ApiResult<Value> {
    auth_user.require_staff()?;

    let pool = DatabaseManager::pool().await?;
    let posts = PostStore::new(pool).list().await?;

    Ok(ApiResponse::success(json!(posts)))
}

/// POST /api/posts - create a post from a title and raw HTML. Staff only.
/// The HTML is sanitized here, before persistence; the stored record and the
/// response both carry only the sanitized markup.
pub async fn create(
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreatePostRequest>,
) -> ApiResult<Value> {
    auth_user.require_staff()?;

    let html = sanitize::clean(&payload.html);

    let pool = DatabaseManager::pool().await?;
    let post = PostStore::new(pool)
        .insert(&payload.title, &html, auth_user.user_id)
        .await?;

    Ok(ApiResponse::created(json!(post)))
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub html: String,
}

/// PUT /api/posts/:id - replace a post's markup. Staff only; goes through
/// the same sanitization path as creation.
pub async fn update(
    Extension(auth_user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePostRequest>,
) -> ApiResult<Value> {
    auth_user.require_staff()?;

    let html = sanitize::clean(&payload.html);

    let pool = DatabaseManager::pool().await?;
    let post = PostStore::new(pool).update_html(id, &html).await?;

    Ok(ApiResponse::success(json!(post)))
}
