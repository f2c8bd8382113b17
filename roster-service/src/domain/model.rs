use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::{DomainError, DomainResult, Grade, Location, Shift};
use utoipa::ToSchema;

/// Length of the repeating rotation pattern, in days.
pub const PATTERN_LENGTH: u32 = 9;

/// Scheduling mode requested for a roster job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulingMode {
    /// Per-employee CP-SAT assignment, dispatched to the external solver.
    Individual,
    /// Deterministic rotation-pattern allocation, computed in-process.
    Team,
}

impl Default for SchedulingMode {
    fn default() -> Self {
        SchedulingMode::Individual
    }
}

/// Wire shape of a single employee entry in a roster submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeInput {
    pub id: String,
    pub proficiency_grade: i64,
    #[serde(default)]
    pub offset: Option<i64>,
    #[serde(default)]
    pub team: Option<i64>,
}

/// Wire shape of a single staffing request in a roster submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequestInput {
    pub date: String,
    #[serde(rename = "shiftType")]
    pub shift_type: String,
    pub location: String,
    #[serde(default)]
    pub required_proficiencies: HashMap<String, u32>,
}

/// Wire shape of the whole roster submission document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmitRosterRequest {
    #[serde(default, rename = "schedulingMode")]
    pub scheduling_mode: Option<String>,
    #[serde(default)]
    pub employees: Vec<EmployeeInput>,
    #[serde(default)]
    pub requests: Vec<RequestInput>,
    #[serde(default, rename = "leaveData")]
    pub leave_data: HashMap<String, Vec<String>>,
}

/// A normalized employee, ready for the pattern oracle and allocators.
#[derive(Debug, Clone)]
pub struct Employee {
    pub id: String,
    pub grade: Grade,
    /// Reduced modulo [`PATTERN_LENGTH`] at ingest; `None` means "derive from position".
    pub offset: Option<u32>,
    pub team: Option<u8>,
}

/// A single staffing requirement, keyed implicitly by its `(date, shift, location)` slot.
#[derive(Debug, Clone)]
pub struct Demand {
    pub date: NaiveDate,
    pub shift: Shift,
    pub location: Location,
    /// Per-grade headcount required on this slot, as submitted (not cumulative).
    pub required: HashMap<Grade, u32>,
}

impl Demand {
    pub fn total_required(&self) -> u32 {
        self.required.values().sum()
    }

    /// Headcount required at grade `grade` or above, per the cumulative staffing rule.
    pub fn cumulative_required(&self, grade: Grade) -> u32 {
        self.required
            .iter()
            .filter(|(g, _)| **g >= grade)
            .map(|(_, c)| *c)
            .sum()
    }

    /// Grades with a nonzero requirement on this slot, descending (most senior first).
    pub fn grades_descending(&self) -> Vec<Grade> {
        let mut grades: Vec<Grade> = self.required.keys().copied().collect();
        grades.sort_unstable_by(|a, b| b.cmp(a));
        grades
    }

    /// The lowest grade named in this slot's requirements; an employee is eligible
    /// for the slot iff their grade is at least this (the union of all per-grade
    /// eligible sets, since higher grades cumulatively cover lower ones). `None`
    /// when the slot has no requirements at all.
    pub fn min_required_grade(&self) -> Option<Grade> {
        self.required.keys().copied().min()
    }
}

/// A `(date, shift, location)` triple identifying one staffing slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Slot {
    pub date: NaiveDate,
    pub shift: Shift,
    pub location: Location,
}

/// The normalized, validated input to both scheduling modes.
///
/// Built once per roster job by [`RosterInput::build`]; every downstream component
/// (pattern oracle, model builder, allocator, assembler) reads from this, never from
/// the raw wire shape.
#[derive(Debug, Clone)]
pub struct RosterInput {
    pub mode: SchedulingMode,
    pub employees: Vec<Employee>,
    pub demands: Vec<Demand>,
    pub leave: HashMap<String, HashSet<NaiveDate>>,
    pub all_dates: Vec<NaiveDate>,
    pub date_index: HashMap<NaiveDate, usize>,
    pub employee_index: HashMap<String, usize>,
}

impl RosterInput {
    pub fn build(raw: SubmitRosterRequest) -> DomainResult<RosterInput> {
        let mode = match raw.scheduling_mode.as_deref() {
            Some("team") => SchedulingMode::Team,
            _ => SchedulingMode::Individual,
        };

        let mut employees = Vec::with_capacity(raw.employees.len());
        let mut employee_index = HashMap::with_capacity(raw.employees.len());
        for (idx, e) in raw.employees.into_iter().enumerate() {
            if e.proficiency_grade < 0 {
                return Err(DomainError::InvalidInput(format!(
                    "employee {} has a negative proficiency_grade",
                    e.id
                )));
            }
            let offset = match e.offset {
                Some(o) => Some(o.rem_euclid(PATTERN_LENGTH as i64) as u32),
                None => None,
            };
            let team = match (mode, e.team) {
                (SchedulingMode::Team, None) => {
                    return Err(DomainError::MissingTeam(e.id));
                }
                (_, Some(t)) if !(1..=9).contains(&t) => {
                    return Err(DomainError::InvalidInput(format!(
                        "employee {} has team {} outside the valid range 1..=9",
                        e.id, t
                    )));
                }
                (_, Some(t)) => Some(t as u8),
                (SchedulingMode::Individual, None) => None,
            };
            if employee_index.insert(e.id.clone(), idx).is_some() {
                return Err(DomainError::InvalidInput(format!(
                    "duplicate employee id {}",
                    e.id
                )));
            }
            employees.push(Employee {
                id: e.id,
                grade: e.proficiency_grade as Grade,
                offset,
                team,
            });
        }

        let mut merged: HashMap<Slot, Demand> = HashMap::new();
        for r in raw.requests {
            let date = parse_date(&r.date)?;
            let shift = parse_shift(&r.shift_type)?;
            let location = parse_location(&r.location)?;
            let mut required = HashMap::with_capacity(r.required_proficiencies.len());
            for (grade_str, count) in r.required_proficiencies {
                let grade: Grade = grade_str.parse().map_err(|_| {
                    DomainError::InvalidInput(format!(
                        "required_proficiencies key '{}' is not a valid grade",
                        grade_str
                    ))
                })?;
                *required.entry(grade).or_insert(0) += count;
            }
            let slot = Slot {
                date,
                shift,
                location,
            };
            let entry = merged.entry(slot).or_insert_with(|| Demand {
                date,
                shift,
                location,
                required: HashMap::new(),
            });
            for (grade, count) in required {
                *entry.required.entry(grade).or_insert(0) += count;
            }
        }
        let demands: Vec<Demand> = merged.into_values().collect();

        let mut leave: HashMap<String, HashSet<NaiveDate>> = HashMap::with_capacity(raw.leave_data.len());
        for (employee_id, dates) in raw.leave_data {
            let mut parsed = HashSet::with_capacity(dates.len());
            for d in dates {
                parsed.insert(parse_date(&d)?);
            }
            leave.insert(employee_id, parsed);
        }

        let mut all_dates: Vec<NaiveDate> = demands.iter().map(|d| d.date).collect();
        all_dates.extend(leave.values().flat_map(|dates| dates.iter().copied()));
        all_dates.sort_unstable();
        all_dates.dedup();
        let date_index: HashMap<NaiveDate, usize> = all_dates
            .iter()
            .enumerate()
            .map(|(i, d)| (*d, i))
            .collect();

        Ok(RosterInput {
            mode,
            employees,
            demands,
            leave,
            all_dates,
            date_index,
            employee_index,
        })
    }

    pub fn is_on_leave(&self, employee_id: &str, date: NaiveDate) -> bool {
        self.leave
            .get(employee_id)
            .map(|dates| dates.contains(&date))
            .unwrap_or(false)
    }

    /// An employee's offset into the pattern, falling back to its position in the
    /// original submission order when not explicitly supplied.
    pub fn employee_offset(&self, idx: usize) -> u32 {
        self.employees[idx]
            .offset
            .unwrap_or_else(|| (idx as u32) % PATTERN_LENGTH)
    }

    /// The run's reference date for pattern arithmetic (spec.md §4.2's
    /// `first_date`): the earliest date named by any request or leave entry.
    /// `all_dates` is already sorted ascending, so this is just its first
    /// element. `None` only when the run has no dates at all (no requests,
    /// no leave), in which case no slot exists to need a reference date.
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.all_dates.first().copied()
    }

    /// Distinct dates named by a staffing request, sorted ascending. Drives the
    /// result assembler's shape guarantee: every one of these dates must appear in
    /// the output for both locations and all three shifts, even where nothing was
    /// assigned.
    pub fn request_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.demands.iter().map(|d| d.date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

fn parse_date(raw: &str) -> DomainResult<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| DomainError::InvalidInput(format!("'{}' is not a valid date (expected YYYY-MM-DD)", raw)))
}

fn parse_shift(raw: &str) -> DomainResult<Shift> {
    match raw {
        "Morning" => Ok(Shift::Morning),
        "Afternoon" => Ok(Shift::Afternoon),
        "Night" => Ok(Shift::Night),
        other => Err(DomainError::InvalidInput(format!(
            "'{}' is not a recognized shiftType",
            other
        ))),
    }
}

fn parse_location(raw: &str) -> DomainResult<Location> {
    match raw {
        "East" => Ok(Location::East),
        "West" => Ok(Location::West),
        other => Err(DomainError::InvalidInput(format!(
            "'{}' is not a recognized location",
            other
        ))),
    }
}
