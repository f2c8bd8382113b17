use async_trait::async_trait;
use shared::DomainResult;
use uuid::Uuid;

use crate::domain::entities::RosterResult;
use crate::domain::services::RosterOutcome;

/// Persistence for the assembled result of a completed roster job (`C5`'s output).
///
/// Written exactly once, when the job processor finishes a run; the success
/// roster and the team-mode failure object share this table, distinguished only
/// by the tagged shape of [`RosterOutcome`] stored in the `outcome` column.
#[async_trait]
pub trait RosterResultRepository: Send + Sync {
    async fn create(&self, roster_job_id: Uuid, outcome: RosterOutcome) -> DomainResult<RosterResult>;

    async fn find_by_job_id(&self, roster_job_id: Uuid) -> DomainResult<Option<RosterResult>>;
}
