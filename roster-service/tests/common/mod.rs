use async_trait::async_trait;
use chrono::Utc;
use mockall::mock;
use roster_service::api::state::AppState;
use roster_service::domain::entities::{RosterJob, RosterResult};
use roster_service::domain::model::SubmitRosterRequest;
use roster_service::domain::repositories::{RosterJobRepository, RosterResultRepository};
use roster_service::domain::services::{CpSatModel, RosterOutcome, SolverSolution};
use roster_service::infrastructure::solver_client::{SolverClient, SolverKnobs};
use shared::{DomainError, DomainResult, JobStatus, PaginationParams};
use sqlx::types::Json;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tokio::sync::mpsc;
use uuid::Uuid;

// Mirrors the teacher's `MockDataServiceClient`: mockall over the object-safe
// solver boundary so job-processor tests can script OPTIMAL/FEASIBLE/error
// responses without standing up a wiremock server.
mock! {
    pub SolverClient {}

    #[async_trait]
    impl SolverClient for SolverClient {
        async fn solve(&self, model: &CpSatModel, knobs: SolverKnobs) -> DomainResult<SolverSolution>;
    }
}

/// Manual mock implementation of [`RosterJobRepository`].
#[derive(Default)]
pub struct MockRosterJobRepository {
    jobs: RwLock<HashMap<Uuid, RosterJob>>,
}

impl MockRosterJobRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_jobs(job_list: Vec<RosterJob>) -> Self {
        let repo = Self::new();
        {
            let mut jobs = repo.jobs.write().unwrap();
            for job in job_list {
                jobs.insert(job.id, job);
            }
        }
        repo
    }
}

#[async_trait]
impl RosterJobRepository for MockRosterJobRepository {
    async fn create(&self, id: Uuid, input: SubmitRosterRequest) -> DomainResult<RosterJob> {
        let now = Utc::now();
        let job = RosterJob {
            id,
            input: Json(input),
            status: JobStatus::Pending,
            error_message: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        self.jobs.write().unwrap().insert(id, job.clone());
        Ok(job)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<RosterJob>> {
        Ok(self.jobs.read().unwrap().get(&id).cloned())
    }

    async fn list(&self, params: PaginationParams) -> DomainResult<(Vec<RosterJob>, u64)> {
        let mut jobs: Vec<RosterJob> = self.jobs.read().unwrap().values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = jobs.len() as u64;
        let offset = (params.page.saturating_sub(1) as usize) * params.page_size as usize;
        let page = jobs
            .into_iter()
            .skip(offset)
            .take(params.page_size as usize)
            .collect();
        Ok((page, total))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: JobStatus,
        error_message: Option<String>,
    ) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = status;
            job.error_message = error_message;
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("roster job {} not found", id)))
        }
    }

    async fn mark_completed(&self, id: Uuid) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Completed;
            job.completed_at = Some(Utc::now());
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("roster job {} not found", id)))
        }
    }

    async fn mark_failed(&self, id: Uuid, error_message: String) -> DomainResult<()> {
        let mut jobs = self.jobs.write().unwrap();
        if let Some(job) = jobs.get_mut(&id) {
            job.status = JobStatus::Failed;
            job.error_message = Some(error_message);
            job.updated_at = Utc::now();
            Ok(())
        } else {
            Err(DomainError::NotFound(format!("roster job {} not found", id)))
        }
    }
}

/// Manual mock implementation of [`RosterResultRepository`].
#[derive(Default)]
pub struct MockRosterResultRepository {
    results: RwLock<HashMap<Uuid, RosterResult>>,
}

impl MockRosterResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_result(roster_job_id: Uuid, outcome: RosterOutcome) -> Self {
        let repo = Self::new();
        {
            let mut results = repo.results.write().unwrap();
            results.insert(
                roster_job_id,
                RosterResult {
                    id: Uuid::new_v4(),
                    roster_job_id,
                    outcome: Json(outcome),
                    created_at: Utc::now(),
                },
            );
        }
        repo
    }
}

#[async_trait]
impl RosterResultRepository for MockRosterResultRepository {
    async fn create(&self, roster_job_id: Uuid, outcome: RosterOutcome) -> DomainResult<RosterResult> {
        let result = RosterResult {
            id: Uuid::new_v4(),
            roster_job_id,
            outcome: Json(outcome),
            created_at: Utc::now(),
        };
        self.results
            .write()
            .unwrap()
            .insert(roster_job_id, result.clone());
        Ok(result)
    }

    async fn find_by_job_id(&self, roster_job_id: Uuid) -> DomainResult<Option<RosterResult>> {
        Ok(self.results.read().unwrap().get(&roster_job_id).cloned())
    }
}

/// Mock Redis pool for testing: a real connection manager against a local
/// Redis, the same shape as the teacher's `create_mock_redis_pool`. Handlers
/// treat a cache miss/write as non-fatal, so tests that never populate the
/// cache don't depend on anything actually being stored there.
pub async fn create_mock_redis_pool() -> shared::RedisPool {
    let client = redis::Client::open("redis://127.0.0.1:6379").expect("valid redis url");
    redis::aio::ConnectionManager::new(client)
        .await
        .expect("redis connection manager for tests")
}

/// Create test app state with mock repositories and a dummy channel.
pub async fn create_test_app_state(
    job_repo: Arc<dyn RosterJobRepository>,
    result_repo: Arc<dyn RosterResultRepository>,
) -> (AppState, mpsc::Receiver<Uuid>) {
    let (sender, receiver) = mpsc::channel::<Uuid>(100);
    let redis_pool = create_mock_redis_pool().await;
    let state = AppState::new(job_repo, result_repo, sender, redis_pool);
    (state, receiver)
}

/// Struct to hold test server and keep the job-dispatch receiver alive.
pub struct TestServerWithReceiver {
    pub server: axum_test::TestServer,
    #[allow(dead_code)]
    pub receiver: mpsc::Receiver<Uuid>,
}

/// Create a sample roster job for testing.
pub fn create_sample_job(id: Uuid, input: SubmitRosterRequest, status: JobStatus) -> RosterJob {
    let now = Utc::now();
    RosterJob {
        id,
        input: Json(input),
        status,
        error_message: None,
        created_at: now,
        updated_at: now,
        completed_at: None,
    }
}

/// Create a sample completed roster job for testing.
pub fn create_completed_job(id: Uuid, input: SubmitRosterRequest) -> RosterJob {
    let now = Utc::now();
    RosterJob {
        id,
        input: Json(input),
        status: JobStatus::Completed,
        error_message: None,
        created_at: now,
        updated_at: now,
        completed_at: Some(now),
    }
}

/// A minimal individual-mode submission: one employee, one morning request at
/// location east, grade 1, no leave.
pub fn sample_individual_request() -> SubmitRosterRequest {
    use roster_service::domain::model::{EmployeeInput, RequestInput};

    SubmitRosterRequest {
        scheduling_mode: Some("individual".to_string()),
        employees: vec![EmployeeInput {
            id: "E1".to_string(),
            proficiency_grade: 1,
            offset: Some(0),
            team: None,
        }],
        requests: vec![RequestInput {
            date: "2026-02-09".to_string(),
            shift_type: "Morning".to_string(),
            location: "East".to_string(),
            required_proficiencies: HashMap::from([("1".to_string(), 1)]),
        }],
        leave_data: HashMap::new(),
    }
}

/// A minimal team-mode submission, with the employee's team derived from the
/// pattern oracle so the request is actually satisfiable.
pub fn sample_team_request() -> SubmitRosterRequest {
    use roster_service::domain::model::{EmployeeInput, RequestInput};
    use roster_service::domain::pattern;
    use shared::{Location, Shift};

    let date = chrono::NaiveDate::from_ymd_opt(2026, 2, 9).unwrap();
    let team = pattern::responsible_team(date, Shift::Morning, Location::East).unwrap();

    SubmitRosterRequest {
        scheduling_mode: Some("team".to_string()),
        employees: vec![EmployeeInput {
            id: "E1".to_string(),
            proficiency_grade: 1,
            offset: None,
            team: Some(team as i64),
        }],
        requests: vec![RequestInput {
            date: date.format("%Y-%m-%d").to_string(),
            shift_type: "Morning".to_string(),
            location: "East".to_string(),
            required_proficiencies: HashMap::from([("1".to_string(), 1)]),
        }],
        leave_data: HashMap::new(),
    }
}
