//! Background worker that turns a submitted roster job into an assembled result.
//!
//! Mirrors the teacher's schedule job processor: a bounded `mpsc` channel feeds
//! job ids to a single worker task, which loads the persisted job, replays its
//! validated input through the domain layer, and writes back a terminal status.

use std::sync::Arc;

use shared::{DomainResult, JobStatus};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::model::{RosterInput, SchedulingMode};
use crate::domain::repositories::{RosterJobRepository, RosterResultRepository};
use crate::domain::services::{
    assemble_individual, assemble_team, build_individual_model, diagnostics, team_allocator,
    ObjectiveWeights,
};
use crate::infrastructure::solver_client::{SolverClient, SolverKnobs};

pub struct JobProcessor {
    job_repo: Arc<dyn RosterJobRepository>,
    result_repo: Arc<dyn RosterResultRepository>,
    solver_client: Arc<dyn SolverClient>,
    solver_knobs: SolverKnobs,
    objective_weights: ObjectiveWeights,
}

impl JobProcessor {
    pub fn new(
        job_repo: Arc<dyn RosterJobRepository>,
        result_repo: Arc<dyn RosterResultRepository>,
        solver_client: Arc<dyn SolverClient>,
        solver_knobs: SolverKnobs,
        objective_weights: ObjectiveWeights,
    ) -> Self {
        Self {
            job_repo,
            result_repo,
            solver_client,
            solver_knobs,
            objective_weights,
        }
    }

    /// Spawns the worker loop and returns a sender for dispatching job ids plus
    /// the task's join handle.
    pub fn start(self: Arc<Self>) -> (mpsc::Sender<Uuid>, tokio::task::JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Uuid>(100);

        let handle = tokio::spawn(async move {
            while let Some(job_id) = rx.recv().await {
                if let Err(e) = self.process_job(job_id).await {
                    tracing::error!("failed to process roster job {}: {:?}", job_id, e);
                }
            }
        });

        (tx, handle)
    }

    async fn process_job(&self, job_id: Uuid) -> DomainResult<()> {
        tracing::info!("processing roster job {}", job_id);

        let job = match self.job_repo.find_by_id(job_id).await? {
            Some(job) => job,
            None => {
                tracing::warn!("roster job {} vanished before processing", job_id);
                return Ok(());
            }
        };

        self.job_repo
            .update_status(job_id, JobStatus::Processing, None)
            .await?;

        match self.build_outcome(job.input.0).await {
            Ok(outcome) => {
                self.result_repo.create(job_id, outcome).await?;
                self.job_repo.mark_completed(job_id).await?;
                tracing::info!("roster job {} completed", job_id);
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                self.job_repo.mark_failed(job_id, message.clone()).await?;
                tracing::error!("roster job {} failed: {}", job_id, message);
                Err(e)
            }
        }
    }

    async fn build_outcome(
        &self,
        raw: crate::domain::model::SubmitRosterRequest,
    ) -> DomainResult<crate::domain::services::RosterOutcome> {
        let input = RosterInput::build(raw)?;
        let request_dates = input.request_dates();

        match input.mode {
            SchedulingMode::Individual => {
                let model = build_individual_model(&input, self.objective_weights);
                diagnostics::log_slot_eligibility(&model);
                let solution = self.solver_client.solve(&model, self.solver_knobs).await?;
                diagnostics::log_solution_summary(&model, &solution);
                Ok(assemble_individual(&model, &solution, &request_dates))
            }
            SchedulingMode::Team => {
                let result = team_allocator::allocate(&input);
                Ok(assemble_team(&result, &request_dates))
            }
        }
    }
}
