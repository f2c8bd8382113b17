use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{Identifiable, JobStatus, Timestamped};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::model::SubmitRosterRequest;

/// A submitted roster job, as persisted. `input` is the exact document the caller
/// submitted; it is replayed unchanged when the job processor picks the job up.
#[derive(Debug, Clone, FromRow)]
pub struct RosterJob {
    pub id: Uuid,
    pub input: Json<SubmitRosterRequest>,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Identifiable for RosterJob {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Timestamped for RosterJob {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// Returned immediately on submission, before the roster has been generated.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterJobResponse {
    pub roster_job_id: Uuid,
    pub status: JobStatus,
}

/// Status snapshot for a roster job, polled until it reaches a terminal status.
#[derive(Debug, Serialize, ToSchema)]
pub struct RosterJobStatusResponse {
    pub roster_job_id: Uuid,
    pub status: JobStatus,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<RosterJob> for RosterJobStatusResponse {
    fn from(job: RosterJob) -> Self {
        Self {
            roster_job_id: job.id,
            status: job.status,
            error_message: job.error_message,
            created_at: job.created_at,
            updated_at: job.updated_at,
            completed_at: job.completed_at,
        }
    }
}
