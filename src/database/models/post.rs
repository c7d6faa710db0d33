use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Staff-authored catalog post. The `html` column only ever holds sanitized
/// markup; callers must run content through `sanitize::clean` before insert
/// or update.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub html: String,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct PostStore {
    pool: PgPool,
}

impl PostStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        title: &str,
        html: &str,
        author_id: Uuid,
    ) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (id, title, html, author_id)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(html)
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(post)
    }

    pub async fn update_html(&self, id: Uuid, html: &str) -> Result<Post, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            "UPDATE posts SET html = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(html)
        .fetch_optional(&self.pool)
        .await?;
        post.ok_or_else(|| DatabaseError::NotFound(format!("Post {} not found", id)))
    }

    pub async fn list(&self) -> Result<Vec<Post>, DatabaseError> {
        let posts = sqlx::query_as::<_, Post>("SELECT * FROM posts ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }
}
