//! Result assembly (C5): turns either an individual-mode solver solution or a
//! team-mode allocation into the roster's external success/failure shape.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Location, Shift};
use utoipa::ToSchema;

use super::cp_sat_model::CpSatModel;
use super::team_allocator::TeamAllocationResult;

/// Status the external solver reported for an individual-mode model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Optimal,
    Feasible,
    Infeasible,
    ModelInvalid,
    Unknown,
}

/// What the external solver sent back for a dispatched [`CpSatModel`].
#[derive(Debug, Clone)]
pub struct SolverSolution {
    pub status: SolverStatus,
    /// Indices into the originating model's `assignment_vars`, for every variable the
    /// solver set to 1.
    pub assigned_var_indices: Vec<usize>,
}

/// Employee ids assigned to one shift, keyed by shift name (`"Morning"`, `"Afternoon"`, `"Night"`).
pub type ShiftRoster = HashMap<String, Vec<String>>;

/// A date's roster, keyed by location name (`"East"`, `"West"`).
pub type LocationRoster = HashMap<String, ShiftRoster>;

/// The full roster: date (`"YYYY-MM-DD"`) -> location -> shift -> employee ids, exactly
/// the nested shape spec.md §3/§6 pin for the success response.
pub type Roster = HashMap<String, LocationRoster>;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum RosterOutcome {
    Success { roster: Roster },
    Failure { error: String, details: Vec<String> },
}

/// Builds the nested roster, seeded with an empty list for every `(date, shift, location)`
/// combination implied by `request_dates` before overlaying actual assignments, so every
/// requested date carries both locations and all three shifts in the output even where
/// nothing was required or nothing could be assigned.
fn into_roster(
    request_dates: &[NaiveDate],
    by_slot: HashMap<(NaiveDate, Shift, Location), Vec<String>>,
) -> Roster {
    let mut by_slot = by_slot;
    for &date in request_dates {
        for &shift in &Shift::ALL {
            for &location in &Location::ALL {
                by_slot.entry((date, shift, location)).or_default();
            }
        }
    }

    let mut roster: Roster = HashMap::new();
    for ((date, shift, location), mut employee_ids) in by_slot {
        employee_ids.sort();
        roster
            .entry(date.format("%Y-%m-%d").to_string())
            .or_default()
            .entry(location.as_str().to_string())
            .or_default()
            .insert(shift.as_str().to_string(), employee_ids);
    }
    roster
}

/// Assembles the individual-mode result. Only `Optimal`/`Feasible` solutions produce
/// a populated roster; any other status yields an empty roster rather than a failure,
/// since the external solver, not this assembler, owns the notion of "unsolvable".
pub fn assemble_individual(
    model: &CpSatModel,
    solution: &SolverSolution,
    request_dates: &[NaiveDate],
) -> RosterOutcome {
    match solution.status {
        SolverStatus::Optimal | SolverStatus::Feasible => {
            let mut by_slot: HashMap<(NaiveDate, Shift, Location), Vec<String>> = HashMap::new();
            for &idx in &solution.assigned_var_indices {
                let var = &model.assignment_vars[idx];
                by_slot
                    .entry((var.date, var.shift, var.location))
                    .or_default()
                    .push(var.employee_id.clone());
            }
            RosterOutcome::Success {
                roster: into_roster(request_dates, by_slot),
            }
        }
        SolverStatus::Infeasible | SolverStatus::ModelInvalid | SolverStatus::Unknown => {
            RosterOutcome::Success {
                roster: into_roster(request_dates, HashMap::new()),
            }
        }
    }
}

/// Assembles the team-mode result. Any understaffing or missing-team-coverage error
/// collected during allocation rejects the whole roster.
pub fn assemble_team(result: &TeamAllocationResult, request_dates: &[NaiveDate]) -> RosterOutcome {
    if !result.errors.is_empty() {
        return RosterOutcome::Failure {
            error: "Failed to generate roster due to understaffing".to_string(),
            details: result.errors.clone(),
        };
    }
    let mut by_slot: HashMap<(NaiveDate, Shift, Location), Vec<String>> = HashMap::new();
    for assignment in &result.assignments {
        by_slot
            .entry((assignment.date, assignment.shift, assignment.location))
            .or_default()
            .push(assignment.employee_id.clone());
    }
    RosterOutcome::Success {
        roster: into_roster(request_dates, by_slot),
    }
}
