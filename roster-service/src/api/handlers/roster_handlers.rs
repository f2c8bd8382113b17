use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use shared::{
    cache_keys, cache_ttl, get_cached, set_cached, ApiResponse, DomainError, JobStatus,
    PaginationParams,
};

use crate::api::requests::SubmitRosterRequest;
use crate::api::state::AppState;
use crate::domain::model::RosterInput;
use crate::domain::entities::{RosterJobResponse, RosterJobStatusResponse, RosterResultResponse};

/// Submit a new roster job.
///
/// Validation runs synchronously against the submitted document so bad input is
/// rejected before a job row (and a background worker slot) is ever allocated; the
/// actual scheduling work — CP-SAT dispatch or team allocation — happens on the
/// background job processor.
#[utoipa::path(
    post,
    path = "/api/v1/rosters",
    request_body = SubmitRosterRequest,
    responses(
        (status = 202, description = "Roster job accepted for processing", body = RosterJobResponse),
        (status = 400, description = "Invalid request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "rosters"
)]
pub async fn submit_roster(
    State(state): State<AppState>,
    Json(request): Json<SubmitRosterRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    RosterInput::build(request.clone()).map_err(|e| match e {
        DomainError::InvalidInput(_) | DomainError::MissingTeam(_) => {
            (StatusCode::BAD_REQUEST, e.to_string())
        }
        other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    })?;

    let job_id = Uuid::new_v4();
    let job = state
        .job_repo
        .create(job_id, request)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    state
        .roster_sender
        .send(job.id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to submit job: {}", e),
            )
        })?;

    Ok((
        StatusCode::ACCEPTED,
        Json(RosterJobResponse {
            roster_job_id: job.id,
            status: job.status,
        }),
    ))
}

/// Get a roster job's current status.
#[utoipa::path(
    get,
    path = "/api/v1/rosters/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Roster job ID")
    ),
    responses(
        (status = 200, description = "Roster job status retrieved", body = RosterJobStatusResponse),
        (status = 404, description = "Roster job not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "rosters"
)]
pub async fn get_roster_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state
        .job_repo
        .find_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "roster job not found".to_string()))?;

    Ok((StatusCode::OK, Json(RosterJobStatusResponse::from(job))))
}

/// Get the assembled result of a completed roster job.
#[utoipa::path(
    get,
    path = "/api/v1/rosters/{id}",
    params(
        ("id" = Uuid, Path, description = "Roster job ID")
    ),
    responses(
        (status = 200, description = "Roster result retrieved", body = RosterResultResponse),
        (status = 404, description = "Roster job not found"),
        (status = 400, description = "Roster job not completed yet"),
        (status = 500, description = "Internal server error")
    ),
    tag = "rosters"
)]
pub async fn get_roster_result(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let job = state
        .job_repo
        .find_by_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((StatusCode::NOT_FOUND, "roster job not found".to_string()))?;

    if job.status != JobStatus::Completed {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "roster job is not completed yet. current status: {:?}",
                job.status
            ),
        ));
    }

    let cache_key = cache_keys::roster_result(id);
    let mut redis_conn = state.redis_pool.clone();
    if let Some(cached) = get_cached::<RosterResultResponse>(&mut redis_conn, &cache_key).await {
        return Ok((StatusCode::OK, Json(cached)));
    }

    let result = state
        .result_repo
        .find_by_job_id(id)
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .ok_or((
            StatusCode::INTERNAL_SERVER_ERROR,
            "roster job is completed but its result is missing".to_string(),
        ))?;

    let response = RosterResultResponse::from(result);
    set_cached(&mut redis_conn, &cache_key, &response, cache_ttl::ROSTER_RESULT).await;

    Ok((StatusCode::OK, Json(response)))
}

/// List roster jobs, paginated, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/rosters",
    params(PaginationParams),
    responses(
        (status = 200, description = "Roster job list", body = ApiResponse<Vec<RosterJobStatusResponse>>),
        (status = 500, description = "Internal server error")
    ),
    tag = "rosters"
)]
pub async fn list_rosters(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (jobs, total) = state
        .job_repo
        .list(params.clone())
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let data: Vec<RosterJobStatusResponse> =
        jobs.into_iter().map(RosterJobStatusResponse::from).collect();

    Ok((
        StatusCode::OK,
        Json(ApiResponse::with_total(
            "roster jobs retrieved successfully",
            data,
            total,
        )),
    ))
}
