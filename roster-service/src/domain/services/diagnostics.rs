//! Diagnostic logging for the individual-mode pipeline (C3/C5).
//!
//! None of this feeds the roster response itself — per the error-handling design,
//! the result channel carries only the roster JSON, and everything here goes to
//! the `tracing` channel instead. Recovered from the Python original's per-slot
//! eligibility dump and post-solve summary, which the distilled spec treated as
//! out of scope but didn't forbid.

use std::collections::HashMap;

use chrono::NaiveDate;
use shared::{Location, Shift};

use super::cp_sat_model::CpSatModel;
use super::result_assembler::{SolverSolution, SolverStatus};

/// Logs, for every slot with a request, how many eligible assignment variables
/// were created against how much headcount is required. A slot with far fewer
/// eligible variables than required is the first thing to check on an
/// understaffed day.
pub fn log_slot_eligibility(model: &CpSatModel) {
    let mut eligible_by_slot: HashMap<(NaiveDate, Shift, Location), u32> = HashMap::new();
    for var in &model.assignment_vars {
        *eligible_by_slot
            .entry((var.date, var.shift, var.location))
            .or_insert(0) += 1;
    }
    let mut required_by_slot: HashMap<(NaiveDate, Shift, Location), u32> = HashMap::new();
    for c in &model.no_overstaffing {
        // no_overstaffing constraints are built one per request slot, keyed by the
        // same vars grouping; recover the slot from any of its vars.
        if let Some(&first) = c.vars.first() {
            let var = &model.assignment_vars[first];
            required_by_slot.insert((var.date, var.shift, var.location), c.capacity);
        }
    }
    for (slot, required) in &required_by_slot {
        let eligible = eligible_by_slot.get(slot).copied().unwrap_or(0);
        tracing::debug!(
            date = %slot.0,
            shift = slot.1.as_str(),
            location = slot.2.as_str(),
            eligible,
            required,
            "slot eligibility"
        );
    }
}

/// Sums understaffing and pattern-deviation counts implied by a solved model and
/// logs them alongside the solver status, matching the Python original's
/// post-solve summary. Only meaningful for `OPTIMAL`/`FEASIBLE` solutions.
pub fn log_solution_summary(model: &CpSatModel, solution: &SolverSolution) {
    let assigned: std::collections::HashSet<usize> =
        solution.assigned_var_indices.iter().copied().collect();

    if !matches!(solution.status, SolverStatus::Optimal | SolverStatus::Feasible) {
        tracing::warn!(status = ?solution.status, "solver did not return an accepted solution; returning empty roster");
        return;
    }

    let total_understaffing: u32 = model
        .cumulative_staffing
        .iter()
        .map(|c| {
            let have = c.vars.iter().filter(|v| assigned.contains(v)).count() as u32;
            c.required.saturating_sub(have)
        })
        .sum();

    let total_deviations = model
        .deviation_indicators
        .iter()
        .filter(|indicator| is_deviation(indicator, &assigned))
        .count();

    let objective = (total_understaffing as u64) * u64::from(model.objective.understaffing_weight)
        + (total_deviations as u64) * u64::from(model.objective.deviation_weight);

    tracing::info!(
        status = ?solution.status,
        total_understaffing,
        total_deviations,
        objective,
        "individual-mode solve summary"
    );
}

fn is_deviation(
    indicator: &super::cp_sat_model::DeviationIndicator,
    assigned: &std::collections::HashSet<usize>,
) -> bool {
    let any_assigned = |vars: &[usize]| vars.iter().any(|v| assigned.contains(v));
    match indicator.expected {
        shared::PatternSlot::Off => any_assigned(&indicator.all_vars_that_day),
        _ => !any_assigned(&indicator.matching_vars),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{EmployeeInput, RequestInput, RosterInput, SubmitRosterRequest};
    use std::collections::HashMap as Map;

    fn sample_input() -> RosterInput {
        RosterInput::build(SubmitRosterRequest {
            scheduling_mode: Some("individual".into()),
            employees: vec![EmployeeInput {
                id: "E1".into(),
                proficiency_grade: 1,
                offset: Some(0),
                team: None,
            }],
            requests: vec![RequestInput {
                date: "2026-02-09".into(),
                shift_type: "Morning".into(),
                location: "East".into(),
                required_proficiencies: Map::from([("1".to_string(), 2)]),
            }],
            leave_data: Map::new(),
        })
        .unwrap()
    }

    #[test]
    fn summary_counts_one_unit_of_understaffing_when_demand_exceeds_eligible_pool() {
        let input = sample_input();
        let model = super::super::build_individual_model(&input, super::super::ObjectiveWeights::default());
        let solution = SolverSolution {
            status: SolverStatus::Optimal,
            assigned_var_indices: vec![0],
        };
        // Does not panic and exercises both branches; assert via the public
        // accounting logic rather than captured log output.
        let assigned: std::collections::HashSet<usize> =
            solution.assigned_var_indices.iter().copied().collect();
        let total_understaffing: u32 = model
            .cumulative_staffing
            .iter()
            .map(|c| {
                let have = c.vars.iter().filter(|v| assigned.contains(v)).count() as u32;
                c.required.saturating_sub(have)
            })
            .sum();
        assert_eq!(total_understaffing, 1);
        log_solution_summary(&model, &solution);
        log_slot_eligibility(&model);
    }

    #[test]
    fn unaccepted_status_logs_a_warning_and_does_not_panic() {
        let input = sample_input();
        let model = super::super::build_individual_model(&input, super::super::ObjectiveWeights::default());
        let solution = SolverSolution {
            status: SolverStatus::Infeasible,
            assigned_var_indices: vec![],
        };
        log_solution_summary(&model, &solution);
    }
}
