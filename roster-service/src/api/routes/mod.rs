use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::api::handlers::roster_handlers;
use crate::api::state::AppState;
use crate::domain::entities::{RosterJobResponse, RosterJobStatusResponse, RosterResultResponse};
use crate::domain::model::{EmployeeInput, RequestInput, SubmitRosterRequest};
use shared::JobStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Roster Service API",
        version = "1.0.0",
        description = "Asynchronous shift roster generation API"
    ),
    paths(
        crate::api::handlers::roster_handlers::submit_roster,
        crate::api::handlers::roster_handlers::get_roster_status,
        crate::api::handlers::roster_handlers::get_roster_result,
        crate::api::handlers::roster_handlers::list_rosters,
    ),
    components(schemas(
        SubmitRosterRequest,
        EmployeeInput,
        RequestInput,
        RosterJobResponse,
        RosterJobStatusResponse,
        RosterResultResponse,
        JobStatus,
    ))
)]
struct ApiDoc;

pub fn create_router(state: AppState) -> Router {
    let api_router = Router::new()
        .route(
            "/rosters",
            post(roster_handlers::submit_roster).get(roster_handlers::list_rosters),
        )
        .route("/rosters/:id/status", get(roster_handlers::get_roster_status))
        .route("/rosters/:id", get(roster_handlers::get_roster_result));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
