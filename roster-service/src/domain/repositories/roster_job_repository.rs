use async_trait::async_trait;
use shared::{DomainResult, JobStatus, PaginationParams};
use uuid::Uuid;

use crate::domain::entities::RosterJob;
use crate::domain::model::SubmitRosterRequest;

/// Persistence for submitted roster jobs (`C1`'s output through to completion).
///
/// A job is created `Pending` at submission time with its already-validated input
/// document attached, then driven through `Processing` to a terminal status by
/// [`crate::infrastructure::job_processor::JobProcessor`].
#[async_trait]
pub trait RosterJobRepository: Send + Sync {
    async fn create(&self, id: Uuid, input: SubmitRosterRequest) -> DomainResult<RosterJob>;

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<RosterJob>>;

    async fn list(&self, params: PaginationParams) -> DomainResult<(Vec<RosterJob>, u64)>;

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()>;

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()>;

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()>;
}
