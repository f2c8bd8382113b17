#[path = "common/mod.rs"]
mod common;

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use common::{
    create_completed_job, create_sample_job, create_test_app_state, sample_individual_request,
    sample_team_request, MockRosterJobRepository, MockRosterResultRepository, MockSolverClient,
    TestServerWithReceiver,
};
use roster_service::api::create_router;
use roster_service::domain::entities::RosterJob;
use roster_service::domain::repositories::RosterJobRepository;
use roster_service::domain::services::cp_sat_model::ObjectiveWeights;
use roster_service::domain::services::{RosterOutcome, SolverSolution, SolverStatus};
use roster_service::infrastructure::job_processor::JobProcessor;
use roster_service::infrastructure::solver_client::SolverKnobs;
use serde_json::json;
use shared::JobStatus;
use std::sync::Arc;
use uuid::Uuid;

async fn setup_test_server() -> TestServerWithReceiver {
    let job_repo = Arc::new(MockRosterJobRepository::new());
    let result_repo = Arc::new(MockRosterResultRepository::new());

    let (state, receiver) = create_test_app_state(job_repo, result_repo).await;
    let app = create_router(state);

    TestServerWithReceiver {
        server: TestServer::new(app).unwrap(),
        receiver,
    }
}

async fn setup_test_server_with_jobs(job_list: Vec<RosterJob>) -> TestServerWithReceiver {
    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(job_list));
    let result_repo = Arc::new(MockRosterResultRepository::new());

    let (state, receiver) = create_test_app_state(job_repo, result_repo).await;
    let app = create_router(state);

    TestServerWithReceiver {
        server: TestServer::new(app).unwrap(),
        receiver,
    }
}

async fn setup_test_server_with_result(
    job: RosterJob,
    outcome: RosterOutcome,
) -> TestServerWithReceiver {
    let job_id = job.id;
    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(vec![job]));
    let result_repo = Arc::new(MockRosterResultRepository::with_result(job_id, outcome));

    let (state, receiver) = create_test_app_state(job_repo, result_repo).await;
    let app = create_router(state);

    TestServerWithReceiver {
        server: TestServer::new(app).unwrap(),
        receiver,
    }
}

#[tokio::test]
async fn test_submit_individual_roster_success() {
    let test_server = setup_test_server().await;
    let request = sample_individual_request();

    let response: TestResponse = test_server.server.post("/api/v1/rosters").json(&request).await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert!(body["roster_job_id"].is_string());
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn test_submit_team_roster_success() {
    let test_server = setup_test_server().await;
    let request = sample_team_request();

    let response: TestResponse = test_server.server.post("/api/v1/rosters").json(&request).await;

    response.assert_status(StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_submit_roster_rejects_unknown_shift_type() {
    let test_server = setup_test_server().await;

    let response: TestResponse = test_server
        .server
        .post("/api/v1/rosters")
        .json(&json!({
            "employees": [{"id": "E1", "proficiency_grade": 1}],
            "requests": [{
                "date": "2026-02-09",
                "shiftType": "Swing",
                "location": "East",
                "required_proficiencies": {"1": 1}
            }],
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_roster_rejects_unparseable_date() {
    let test_server = setup_test_server().await;

    let response: TestResponse = test_server
        .server
        .post("/api/v1/rosters")
        .json(&json!({
            "employees": [{"id": "E1", "proficiency_grade": 1}],
            "requests": [{
                "date": "not-a-date",
                "shiftType": "Morning",
                "location": "East",
                "required_proficiencies": {"1": 1}
            }],
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_team_roster_without_team_is_rejected() {
    let test_server = setup_test_server().await;

    let response: TestResponse = test_server
        .server
        .post("/api/v1/rosters")
        .json(&json!({
            "schedulingMode": "team",
            "employees": [{"id": "E1", "proficiency_grade": 1}],
            "requests": [],
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_roster_status_pending() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Pending);
    let test_server = setup_test_server_with_jobs(vec![job]).await;

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}/status", job_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "PENDING");
}

#[tokio::test]
async fn test_get_roster_status_processing() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Processing);
    let test_server = setup_test_server_with_jobs(vec![job]).await;

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}/status", job_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "PROCESSING");
}

#[tokio::test]
async fn test_get_roster_status_not_found() {
    let test_server = setup_test_server().await;
    let non_existent_id = Uuid::new_v4();

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}/status", non_existent_id))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_roster_result_success() {
    let job_id = Uuid::new_v4();
    let job = create_completed_job(job_id, sample_individual_request());
    let outcome = RosterOutcome::Success {
        roster: std::collections::HashMap::new(),
    };

    let test_server = setup_test_server_with_result(job, outcome).await;

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}", job_id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["roster_job_id"], job_id.to_string());
    assert!(body["roster"].is_object());
}

#[tokio::test]
async fn test_get_roster_result_not_completed_is_bad_request() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Processing);
    let test_server = setup_test_server_with_jobs(vec![job]).await;

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}", job_id))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_roster_result_not_found() {
    let test_server = setup_test_server().await;
    let non_existent_id = Uuid::new_v4();

    let response: TestResponse = test_server
        .server
        .get(&format!("/api/v1/rosters/{}", non_existent_id))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_rosters_is_paginated() {
    let jobs: Vec<RosterJob> = (0..3)
        .map(|_| create_sample_job(Uuid::new_v4(), sample_individual_request(), JobStatus::Pending))
        .collect();
    let test_server = setup_test_server_with_jobs(jobs).await;

    let response: TestResponse = test_server.server.get("/api/v1/rosters?page=1&page_size=2").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["total"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_health_check() {
    let test_server = setup_test_server().await;
    let response: TestResponse = test_server.server.get("/health").await;
    response.assert_status_ok();
}

// ============================================================================
// Job processing tests with a mocked solver client
// ============================================================================

#[tokio::test]
async fn test_job_processor_individual_mode_completes_on_feasible_solution() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Pending);

    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(vec![job]));
    let result_repo = Arc::new(MockRosterResultRepository::new());

    let mut mock_solver = MockSolverClient::new();
    mock_solver.expect_solve().times(1).returning(|model, _knobs| {
        let assigned = (0..model.assignment_vars.len()).collect();
        Ok(SolverSolution {
            status: SolverStatus::Optimal,
            assigned_var_indices: assigned,
        })
    });

    let processor = Arc::new(JobProcessor::new(
        job_repo.clone(),
        result_repo.clone(),
        Arc::new(mock_solver),
        SolverKnobs::default(),
        ObjectiveWeights::default(),
    ));

    let (sender, _handle) = processor.start();
    sender.send(job_id).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let updated_job = job_repo.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(updated_job.status, JobStatus::Completed);

    let result = result_repo.find_by_job_id(job_id).await.unwrap().unwrap();
    match result.outcome.0 {
        RosterOutcome::Success { roster } => {
            let staffed = roster
                .values()
                .flat_map(|by_location| by_location.values())
                .flat_map(|by_shift| by_shift.values())
                .any(|ids| !ids.is_empty());
            assert!(staffed);
        }
        RosterOutcome::Failure { .. } => panic!("expected a populated roster"),
    }
}

#[tokio::test]
async fn test_job_processor_individual_mode_yields_empty_roster_on_infeasible() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Pending);

    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(vec![job]));
    let result_repo = Arc::new(MockRosterResultRepository::new());

    let mut mock_solver = MockSolverClient::new();
    mock_solver.expect_solve().times(1).returning(|_model, _knobs| {
        Ok(SolverSolution {
            status: SolverStatus::Infeasible,
            assigned_var_indices: vec![],
        })
    });

    let processor = Arc::new(JobProcessor::new(
        job_repo.clone(),
        result_repo.clone(),
        Arc::new(mock_solver),
        SolverKnobs::default(),
        ObjectiveWeights::default(),
    ));

    let (sender, _handle) = processor.start();
    sender.send(job_id).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    // Infeasible is non-fatal per spec.md §7: job still completes successfully,
    // with a well-formed but entirely empty roster.
    let updated_job = job_repo.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(updated_job.status, JobStatus::Completed);

    let result = result_repo.find_by_job_id(job_id).await.unwrap().unwrap();
    match result.outcome.0 {
        RosterOutcome::Success { roster } => {
            let all_empty = roster
                .values()
                .flat_map(|by_location| by_location.values())
                .flat_map(|by_shift| by_shift.values())
                .all(|ids| ids.is_empty());
            assert!(all_empty);
        }
        RosterOutcome::Failure { .. } => panic!("infeasible must not become a hard failure"),
    }
}

#[tokio::test]
async fn test_job_processor_team_mode_understaffed_produces_failure_result_but_completed_job() {
    let job_id = Uuid::new_v4();
    // One employee, but two required at grade 1: guaranteed understaffing.
    let mut request = sample_team_request();
    request.requests[0].required_proficiencies = std::collections::HashMap::from([("1".to_string(), 2)]);
    let job = create_sample_job(job_id, request, JobStatus::Pending);

    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(vec![job]));
    let result_repo = Arc::new(MockRosterResultRepository::new());
    let mock_solver = MockSolverClient::new();

    let processor = Arc::new(JobProcessor::new(
        job_repo.clone(),
        result_repo.clone(),
        Arc::new(mock_solver),
        SolverKnobs::default(),
        ObjectiveWeights::default(),
    ));

    let (sender, _handle) = processor.start();
    sender.send(job_id).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    // Team mode never calls the solver, so the mock's unset expectation is fine
    // (the `times(1)` default of zero on an unconfigured mock would panic only
    // if `solve` were actually invoked).
    let updated_job = job_repo.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(updated_job.status, JobStatus::Completed);

    let result = result_repo.find_by_job_id(job_id).await.unwrap().unwrap();
    match result.outcome.0 {
        RosterOutcome::Failure { error, details } => {
            assert_eq!(error, "Failed to generate roster due to understaffing");
            assert_eq!(details.len(), 1);
        }
        RosterOutcome::Success { .. } => panic!("expected an understaffing failure"),
    }
}

#[tokio::test]
async fn test_job_processor_marks_job_failed_when_solver_errors() {
    let job_id = Uuid::new_v4();
    let job = create_sample_job(job_id, sample_individual_request(), JobStatus::Pending);

    let job_repo = Arc::new(MockRosterJobRepository::with_jobs(vec![job]));
    let result_repo = Arc::new(MockRosterResultRepository::new());

    let mut mock_solver = MockSolverClient::new();
    mock_solver.expect_solve().times(1).returning(|_model, _knobs| {
        Err(shared::DomainError::ExternalServiceError(
            "solver unavailable".to_string(),
        ))
    });

    let processor = Arc::new(JobProcessor::new(
        job_repo.clone(),
        result_repo.clone(),
        Arc::new(mock_solver),
        SolverKnobs::default(),
        ObjectiveWeights::default(),
    ));

    let (sender, _handle) = processor.start();
    sender.send(job_id).await.unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let updated_job = job_repo.find_by_id(job_id).await.unwrap().unwrap();
    assert_eq!(updated_job.status, JobStatus::Failed);
    assert!(updated_job.error_message.is_some());
}
