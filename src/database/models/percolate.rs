use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::database::manager::DatabaseError;

/// Stored search definition matched against incoming documents to notify
/// subscribers. `original_query` is what the user asked for; `query` is the
/// form actually registered with the search index.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PercolateQuery {
    pub id: Uuid,
    pub original_query: Value,
    pub query: Value,
    pub source_type: String,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

/// Known `source_type` values, enforced by a CHECK constraint in the schema.
pub mod source_type {
    pub const SEARCH: &str = "search";
    pub const CHANNEL_SUBSCRIPTION: &str = "channel_subscription";
}

#[derive(Clone)]
pub struct PercolateStore {
    pool: PgPool,
}

impl PercolateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        original_query: &Value,
        query: &Value,
        source_type: &str,
    ) -> Result<PercolateQuery, DatabaseError> {
        let row = sqlx::query_as::<_, PercolateQuery>(
            "INSERT INTO percolate_queries (id, original_query, query, source_type)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(original_query)
        .bind(query)
        .bind(source_type)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Replace the registered query document, touching `updated_on`.
    pub async fn update_query(&self, id: Uuid, query: &Value) -> Result<PercolateQuery, DatabaseError> {
        let row = sqlx::query_as::<_, PercolateQuery>(
            "UPDATE percolate_queries SET query = $2, updated_on = NOW()
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(query)
        .fetch_optional(&self.pool)
        .await?;
        row.ok_or_else(|| DatabaseError::NotFound(format!("Percolate query {} not found", id)))
    }

    pub async fn subscribe(&self, query_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO percolate_query_users (query_id, user_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(query_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn unsubscribe(&self, query_id: Uuid, user_id: Uuid) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM percolate_query_users WHERE query_id = $1 AND user_id = $2")
            .bind(query_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Drop every subscription held by a user (retirement cleanup), returning
    /// the number removed.
    pub async fn unsubscribe_all(&self, user_id: Uuid) -> Result<u64, DatabaseError> {
        let result = sqlx::query("DELETE FROM percolate_query_users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn for_user(&self, user_id: Uuid) -> Result<Vec<PercolateQuery>, DatabaseError> {
        let rows = sqlx::query_as::<_, PercolateQuery>(
            "SELECT q.* FROM percolate_queries q
             JOIN percolate_query_users s ON s.query_id = q.id
             WHERE s.user_id = $1
             ORDER BY q.created_on",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
