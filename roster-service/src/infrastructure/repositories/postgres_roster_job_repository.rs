use async_trait::async_trait;
use shared::{DomainError, DomainResult, JobStatus, PaginationParams};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::RosterJob;
use crate::domain::model::SubmitRosterRequest;
use crate::domain::repositories::RosterJobRepository;

pub struct PostgresRosterJobRepository {
    pool: PgPool,
}

impl PostgresRosterJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RosterJobRepository for PostgresRosterJobRepository {
    async fn create(&self, id: Uuid, input: SubmitRosterRequest) -> DomainResult<RosterJob> {
        let job = sqlx::query_as::<_, RosterJob>(
            r#"
            INSERT INTO roster_jobs (id, input, status)
            VALUES ($1, $2, $3)
            RETURNING id, input, status, error_message, created_at, updated_at, completed_at
            "#,
        )
        .bind(id)
        .bind(Json(input))
        .bind(JobStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<RosterJob>> {
        let job = sqlx::query_as::<_, RosterJob>(
            r#"
            SELECT id, input, status, error_message, created_at, updated_at, completed_at
            FROM roster_jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(job)
    }

    async fn list(&self, params: PaginationParams) -> DomainResult<(Vec<RosterJob>, u64)> {
        let offset = (params.page.saturating_sub(1) as i64) * params.page_size as i64;

        let jobs = sqlx::query_as::<_, RosterJob>(
            r#"
            SELECT id, input, status, error_message, created_at, updated_at, completed_at
            FROM roster_jobs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.page_size as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM roster_jobs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok((jobs, total as u64))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE roster_jobs
            SET status = $1, error_message = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(status)
        .bind(error_message)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE roster_jobs
            SET status = $1, completed_at = NOW(), updated_at = NOW()
            WHERE id = $2
            "#,
        )
        .bind(JobStatus::Completed)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()> {
        sqlx::query(
            r#"
            UPDATE roster_jobs
            SET status = $1, error_message = $2, updated_at = NOW()
            WHERE id = $3
            "#,
        )
        .bind(JobStatus::Failed)
        .bind(error_message)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
