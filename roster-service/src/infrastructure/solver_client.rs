//! Client boundary to the external CP-SAT solver.
//!
//! Per spec.md §1/§5, the solver itself is out of scope: this module only pins
//! the wire shape of the model it receives and the solution it returns. The
//! trait mirrors the teacher's `DataServiceClientTrait`/`DataServiceClient`
//! split — an object-safe, mockable interface plus a `reqwest`-backed HTTP
//! implementation that does the actual network call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shared::{DomainError, DomainResult};

use crate::domain::services::cp_sat_model::CpSatModel;
use crate::domain::services::result_assembler::{SolverSolution, SolverStatus};

/// The knobs pinned in spec.md §6, sent alongside the model on every request so
/// the solver doesn't need its own copy of them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverKnobs {
    pub max_time_in_seconds: u32,
    pub num_workers: u32,
}

impl Default for SolverKnobs {
    fn default() -> Self {
        SolverKnobs {
            max_time_in_seconds: 30,
            num_workers: 8,
        }
    }
}

#[derive(Debug, Serialize)]
struct SolveRequest<'a> {
    model: &'a CpSatModel,
    knobs: SolverKnobs,
}

#[derive(Debug, Deserialize)]
struct SolveResponse {
    status: WireSolverStatus,
    assigned_var_indices: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum WireSolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

impl From<WireSolverStatus> for SolverStatus {
    fn from(status: WireSolverStatus) -> Self {
        match status {
            WireSolverStatus::Optimal => SolverStatus::Optimal,
            WireSolverStatus::Feasible => SolverStatus::Feasible,
            WireSolverStatus::Infeasible => SolverStatus::Infeasible,
            WireSolverStatus::ModelInvalid => SolverStatus::ModelInvalid,
            WireSolverStatus::Unknown => SolverStatus::Unknown,
        }
    }
}

/// Submits an individual-mode model and blocks until the solver returns a
/// solution or the configured wall-clock limit elapses solver-side.
#[async_trait]
pub trait SolverClient: Send + Sync {
    async fn solve(&self, model: &CpSatModel, knobs: SolverKnobs) -> DomainResult<SolverSolution>;
}

pub struct HttpSolverClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSolverClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl SolverClient for HttpSolverClient {
    async fn solve(&self, model: &CpSatModel, knobs: SolverKnobs) -> DomainResult<SolverSolution> {
        let url = format!("{}/solve", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SolveRequest { model, knobs })
            .send()
            .await
            .map_err(|e| DomainError::ExternalServiceError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalServiceError(format!(
                "solver returned {}: {}",
                status, body
            )));
        }

        let parsed: SolveResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalServiceError(e.to_string()))?;

        Ok(SolverSolution {
            status: parsed.status.into(),
            assigned_var_indices: parsed.assigned_var_indices,
        })
    }
}
