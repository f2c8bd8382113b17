//! Individual-mode model builder (C3).
//!
//! Builds a serializable constraint-satisfaction problem description from a
//! [`RosterInput`]. The model is never solved in-process: it is handed to the
//! external solver through [`crate::infrastructure::solver_client::SolverClient`],
//! which is the only component that knows how to turn this into an actual
//! CP-SAT invocation and send back a solution.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{Grade, Location, PatternSlot, Shift};
use utoipa::ToSchema;

use crate::domain::model::RosterInput;
use crate::domain::pattern;

/// One boolean "employee `employee_id` works `shift` at `location` on `date`" variable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssignmentVar {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub location: Location,
}

/// `sum(vars) <= capacity`, used both for at-most-one-shift-per-day groupings
/// (`capacity == 1`) and no-overstaffing groupings (`capacity == total_required`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CapacityConstraint {
    pub vars: Vec<usize>,
    pub capacity: u32,
}

/// A cumulative per-grade staffing requirement with an understaffing slack variable:
/// `sum(vars) + slack >= required`, `0 <= slack <= required`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CumulativeStaffingConstraint {
    pub date: NaiveDate,
    pub shift: Shift,
    pub location: Location,
    pub grade: Grade,
    pub vars: Vec<usize>,
    pub required: u32,
}

/// A pattern-deviation indicator for one employee on one date.
///
/// The indicator is 1 when the employee's actual assignment that day (derived
/// from `matching_vars`/`all_vars_that_day`, since at most one can be 1 thanks
/// to the at-most-one-shift-per-day constraint) differs from `expected`:
///
/// - `expected == Off`: indicator == OR(all_vars_that_day) (assigned anything is a deviation).
/// - `expected == <a shift>`: indicator == NOT OR(matching_vars) (not assigned the expected shift is a deviation).
///
/// Both lists may be empty (an employee with zero eligible slots that day);
/// an empty OR is defined as false, matching the usual CP-SAT convention.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeviationIndicator {
    pub employee_id: String,
    pub date: NaiveDate,
    pub expected: PatternSlot,
    pub matching_vars: Vec<usize>,
    pub all_vars_that_day: Vec<usize>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ObjectiveWeights {
    pub understaffing_weight: u32,
    pub deviation_weight: u32,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        ObjectiveWeights {
            understaffing_weight: 1000,
            deviation_weight: 100,
        }
    }
}

/// The full individual-mode problem description, serialized and sent to the
/// external solver as-is.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CpSatModel {
    pub assignment_vars: Vec<AssignmentVar>,
    pub at_most_one_shift_per_day: Vec<CapacityConstraint>,
    pub no_overstaffing: Vec<CapacityConstraint>,
    pub cumulative_staffing: Vec<CumulativeStaffingConstraint>,
    pub deviation_indicators: Vec<DeviationIndicator>,
    pub objective: ObjectiveWeights,
}

pub fn build_individual_model(input: &RosterInput, objective: ObjectiveWeights) -> CpSatModel {
    let mut assignment_vars = Vec::new();
    // (employee_idx, slot) -> var index, built incrementally while we walk demands.
    let mut var_index: HashMap<(usize, NaiveDate, Shift, Location), usize> = HashMap::new();

    for demand in &input.demands {
        if demand.total_required() == 0 {
            // Zero demand forces zero assignments: no variables are created for this slot.
            continue;
        }
        // Eligibility-pruning is mandatory, not an optimization: a variable only
        // exists for employees whose grade covers this slot's lowest requirement.
        let min_grade = match demand.min_required_grade() {
            Some(g) => g,
            None => continue,
        };
        for (idx, employee) in input.employees.iter().enumerate() {
            if employee.grade < min_grade {
                continue;
            }
            if input.is_on_leave(&employee.id, demand.date) {
                continue;
            }
            let var_idx = assignment_vars.len();
            assignment_vars.push(AssignmentVar {
                employee_id: employee.id.clone(),
                date: demand.date,
                shift: demand.shift,
                location: demand.location,
            });
            var_index.insert((idx, demand.date, demand.shift, demand.location), var_idx);
        }
    }

    let at_most_one_shift_per_day = build_daily_cap_constraints(input, &assignment_vars);
    let no_overstaffing = build_no_overstaffing_constraints(input, &var_index);
    let cumulative_staffing = build_cumulative_staffing_constraints(input, &var_index);
    let deviation_indicators = build_deviation_indicators(input, &assignment_vars);

    CpSatModel {
        assignment_vars,
        at_most_one_shift_per_day,
        no_overstaffing,
        cumulative_staffing,
        deviation_indicators,
        objective,
    }
}

fn build_daily_cap_constraints(
    input: &RosterInput,
    assignment_vars: &[AssignmentVar],
) -> Vec<CapacityConstraint> {
    let mut by_employee_day: HashMap<(&str, NaiveDate), Vec<usize>> = HashMap::new();
    for (idx, var) in assignment_vars.iter().enumerate() {
        by_employee_day
            .entry((var.employee_id.as_str(), var.date))
            .or_default()
            .push(idx);
    }
    let _ = input;
    by_employee_day
        .into_values()
        .filter(|vars| vars.len() > 1)
        .map(|vars| CapacityConstraint { vars, capacity: 1 })
        .collect()
}

fn build_no_overstaffing_constraints(
    input: &RosterInput,
    var_index: &HashMap<(usize, NaiveDate, Shift, Location), usize>,
) -> Vec<CapacityConstraint> {
    input
        .demands
        .iter()
        .filter(|d| d.total_required() > 0)
        .map(|demand| {
            let vars: Vec<usize> = (0..input.employees.len())
                .filter_map(|idx| {
                    var_index
                        .get(&(idx, demand.date, demand.shift, demand.location))
                        .copied()
                })
                .collect();
            CapacityConstraint {
                vars,
                capacity: demand.total_required(),
            }
        })
        .collect()
}

fn build_cumulative_staffing_constraints(
    input: &RosterInput,
    var_index: &HashMap<(usize, NaiveDate, Shift, Location), usize>,
) -> Vec<CumulativeStaffingConstraint> {
    let mut constraints = Vec::new();
    for demand in &input.demands {
        for grade in demand.grades_descending() {
            let vars: Vec<usize> = (0..input.employees.len())
                .filter(|&idx| input.employees[idx].grade >= grade)
                .filter_map(|idx| {
                    var_index
                        .get(&(idx, demand.date, demand.shift, demand.location))
                        .copied()
                })
                .collect();
            constraints.push(CumulativeStaffingConstraint {
                date: demand.date,
                shift: demand.shift,
                location: demand.location,
                grade,
                vars,
                required: demand.cumulative_required(grade),
            });
        }
    }
    constraints
}

fn build_deviation_indicators(
    input: &RosterInput,
    assignment_vars: &[AssignmentVar],
) -> Vec<DeviationIndicator> {
    let mut by_employee_day: HashMap<(&str, NaiveDate), Vec<usize>> = HashMap::new();
    for (idx, var) in assignment_vars.iter().enumerate() {
        by_employee_day
            .entry((var.employee_id.as_str(), var.date))
            .or_default()
            .push(idx);
    }

    let mut request_dates: Vec<NaiveDate> = input.demands.iter().map(|d| d.date).collect();
    request_dates.sort_unstable();
    request_dates.dedup();

    let first_date = match input.first_date() {
        Some(d) => d,
        // No dates at all means no demands, so `request_dates` is empty too.
        None => return Vec::new(),
    };

    let mut indicators = Vec::new();
    for (idx, employee) in input.employees.iter().enumerate() {
        let offset = input.employee_offset(idx);
        for &date in &request_dates {
            let expected = pattern::expected_slot(date, first_date, offset);
            let all_vars_that_day = by_employee_day
                .get(&(employee.id.as_str(), date))
                .cloned()
                .unwrap_or_default();
            let matching_vars = match expected {
                PatternSlot::Off => Vec::new(),
                _ => all_vars_that_day
                    .iter()
                    .copied()
                    .filter(|&v| PatternSlot::from(assignment_vars[v].shift) == expected)
                    .collect(),
            };
            indicators.push(DeviationIndicator {
                employee_id: employee.id.clone(),
                date,
                expected,
                matching_vars,
                all_vars_that_day,
            });
        }
    }
    indicators
}
