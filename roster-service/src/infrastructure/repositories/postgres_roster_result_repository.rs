use async_trait::async_trait;
use shared::{DomainError, DomainResult};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::RosterResult;
use crate::domain::repositories::RosterResultRepository;
use crate::domain::services::RosterOutcome;

pub struct PostgresRosterResultRepository {
    pool: PgPool,
}

impl PostgresRosterResultRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterResultRepository for PostgresRosterResultRepository {
    async fn create(&self, roster_job_id: Uuid, outcome: RosterOutcome) -> DomainResult<RosterResult> {
        let result = sqlx::query_as::<_, RosterResult>(
            r#"
            INSERT INTO roster_results (id, roster_job_id, outcome)
            VALUES ($1, $2, $3)
            ON CONFLICT (roster_job_id) DO UPDATE SET outcome = EXCLUDED.outcome
            RETURNING id, roster_job_id, outcome, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(roster_job_id)
        .bind(Json(outcome))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(result)
    }

    async fn find_by_job_id(&self, roster_job_id: Uuid) -> DomainResult<Option<RosterResult>> {
        let result = sqlx::query_as::<_, RosterResult>(
            r#"
            SELECT id, roster_job_id, outcome, created_at
            FROM roster_results
            WHERE roster_job_id = $1
            "#,
        )
        .bind(roster_job_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(result)
    }
}
