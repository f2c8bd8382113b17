use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::services::RosterOutcome;

/// The assembled result of a completed roster job (success or failure shape),
/// persisted once and served by the result endpoint from then on.
#[derive(Debug, Clone, FromRow)]
pub struct RosterResult {
    pub id: Uuid,
    pub roster_job_id: Uuid,
    pub outcome: Json<RosterOutcome>,
    pub created_at: DateTime<Utc>,
}

/// What `GET /roster-jobs/{id}/result` actually returns: the outcome, tagged with
/// the job it belongs to. Also the shape cached in Redis for repeat reads, hence
/// the `Deserialize` derive alongside `Serialize`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RosterResultResponse {
    pub roster_job_id: Uuid,
    #[serde(flatten)]
    pub outcome: RosterOutcome,
}

impl From<RosterResult> for RosterResultResponse {
    fn from(result: RosterResult) -> Self {
        Self {
            roster_job_id: result.roster_job_id,
            outcome: result.outcome.0,
        }
    }
}
