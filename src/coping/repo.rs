use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::coping::dto::NewCopingLog;

/// Coping-log record in the database. Immutable once written.
#[derive(Debug, Clone, FromRow)]
pub struct CopingLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub strategy: String,
    pub description: Option<String>,
    pub effectiveness: Option<i32>,
    pub created_at: OffsetDateTime,
}

impl CopingLog {
    pub async fn create(db: &PgPool, user_id: Uuid, new: &NewCopingLog) -> sqlx::Result<CopingLog> {
        sqlx::query_as::<_, CopingLog>(
            r#"
            INSERT INTO coping_logs (user_id, strategy, description, effectiveness)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, strategy, description, effectiveness, created_at
            "#,
        )
        .bind(user_id)
        .bind(&new.strategy)
        .bind(&new.description)
        .bind(new.effectiveness)
        .fetch_one(db)
        .await
    }

    pub async fn list_by_user(
        db: &PgPool,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<CopingLog>> {
        sqlx::query_as::<_, CopingLog>(
            r#"
            SELECT id, user_id, strategy, description, effectiveness, created_at
            FROM coping_logs
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }
}
