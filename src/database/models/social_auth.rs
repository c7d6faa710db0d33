use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Link between a local account and an external identity provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SocialAuth {
    pub id: Uuid,
    pub user_id: Uuid,
    pub provider: String,
    pub uid: String,
}

#[derive(Clone)]
pub struct SocialAuthStore {
    pool: PgPool,
}

impl SocialAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SocialAuth>, DatabaseError> {
        let rows = sqlx::query_as::<_, SocialAuth>("SELECT * FROM social_auth WHERE user_id = $1")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Delete every provider link for a user, returning the number removed.
    pub async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM social_auth WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
