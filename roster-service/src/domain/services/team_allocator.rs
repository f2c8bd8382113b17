//! Team-mode deterministic allocator (C4).
//!
//! Unlike individual mode, team mode never touches the external solver: the
//! nine-day rotation pattern already fixes who is *available* for a slot (the
//! team responsible for it), and allocation only has to pick *which* members
//! of that team cover the grade requirements, greedily from the top down.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use shared::{Grade, Location, Shift};

use crate::domain::model::RosterInput;
use crate::domain::pattern;

#[derive(Debug, Clone)]
pub struct ShiftAssignmentRecord {
    pub employee_id: String,
    pub date: NaiveDate,
    pub shift: Shift,
    pub location: Location,
}

#[derive(Debug, Default)]
pub struct TeamAllocationResult {
    pub assignments: Vec<ShiftAssignmentRecord>,
    /// Human-readable understaffing/assignment errors, one per unsatisfied slot or threshold.
    /// Non-empty means the roster as a whole is rejected.
    pub errors: Vec<String>,
}

/// Runs the deterministic team-mode allocation over every non-zero demand.
pub fn allocate(input: &RosterInput) -> TeamAllocationResult {
    let mut result = TeamAllocationResult::default();
    let rosters = team_rosters(input);
    let first_date = input.first_date();

    for demand in &input.demands {
        if demand.total_required() == 0 {
            continue;
        }
        let team = match first_date.and_then(|first_date| {
            pattern::responsible_team(demand.date, first_date, demand.shift, demand.location)
        }) {
            Some(team) => team,
            None => {
                let day = first_date.map(|first_date| pattern::day_in_pattern(demand.date, first_date, 0));
                result.errors.push(format!(
                    "no team is responsible for {} {} at {} (pattern day {:?})",
                    demand.date,
                    demand.shift.as_str(),
                    demand.location.as_str(),
                    day
                ));
                continue;
            }
        };

        let full_team: Vec<usize> = rosters.get(&team).cloned().unwrap_or_default();

        let mut pool: Vec<usize> = full_team
            .iter()
            .copied()
            .filter(|&idx| !input.is_on_leave(&input.employees[idx].id, demand.date))
            .collect();

        let mut thresholds: Vec<(Grade, u32)> = demand
            .required
            .keys()
            .copied()
            .map(|g| (g, demand.cumulative_required(g)))
            .collect();
        thresholds.sort_unstable_by(|a, b| b.0.cmp(&a.0));

        let mut selected: Vec<usize> = Vec::new();
        for (grade, required) in thresholds {
            let have = selected
                .iter()
                .filter(|&&idx| input.employees[idx].grade >= grade)
                .count() as u32;
            if have >= required {
                continue;
            }
            let mut short = required - have;
            while short > 0 {
                if pool.is_empty() {
                    result.errors.push(format!(
                        "team {} is short {} employee(s) at grade {} or above for {} {} at {}. \
                         Team composition: {}",
                        team,
                        short,
                        grade,
                        demand.date,
                        demand.shift.as_str(),
                        demand.location.as_str(),
                        grade_histogram(input, &full_team),
                    ));
                    break;
                }
                selected.push(pool.remove(0));
                short -= 1;
            }
        }

        for idx in selected {
            result.assignments.push(ShiftAssignmentRecord {
                employee_id: input.employees[idx].id.clone(),
                date: demand.date,
                shift: demand.shift,
                location: demand.location,
            });
        }
    }

    result
}

/// Renders a team's grade composition as `{grade: count, ...}`, ascending by
/// grade — the same diagnostic the Python original prints as
/// `Team composition: {proficiency_counts}`, computed over the team's full
/// membership (not just who happens to be available that day), so an
/// understaffing error also tells the reader whether the team structurally
/// lacks a grade or just has everyone on leave.
fn grade_histogram(input: &RosterInput, members: &[usize]) -> String {
    let mut counts: BTreeMap<Grade, u32> = BTreeMap::new();
    for &idx in members {
        *counts.entry(input.employees[idx].grade).or_insert(0) += 1;
    }
    let parts: Vec<String> = counts
        .iter()
        .map(|(grade, count)| format!("{}: {}", grade, count))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

/// Team rosters, sorted highest grade first (ties broken by employee id, ascending,
/// for a deterministic pick order).
fn team_rosters(input: &RosterInput) -> HashMap<u8, Vec<usize>> {
    let mut by_team: HashMap<u8, Vec<usize>> = HashMap::new();
    for (idx, employee) in input.employees.iter().enumerate() {
        if let Some(team) = employee.team {
            by_team.entry(team).or_default().push(idx);
        }
    }
    for members in by_team.values_mut() {
        members.sort_by(|&a, &b| {
            input.employees[b]
                .grade
                .cmp(&input.employees[a].grade)
                .then_with(|| input.employees[a].id.cmp(&input.employees[b].id))
        });
    }
    by_team
}
