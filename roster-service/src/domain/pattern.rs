//! The nine-day rotation pattern shared by both scheduling modes: it tells the
//! individual-mode model builder what an employee's "expected" shift looks like
//! for the deviation penalty, and tells the team-mode allocator which team owns
//! which slot.

use chrono::NaiveDate;
use shared::{Location, PatternSlot, Shift};

use super::model::PATTERN_LENGTH;

/// The canonical nine-day rotation: two mornings, two afternoons, a day off,
/// two nights, then two days off.
pub const PATTERN: [PatternSlot; 9] = [
    PatternSlot::Morning,
    PatternSlot::Morning,
    PatternSlot::Afternoon,
    PatternSlot::Afternoon,
    PatternSlot::Off,
    PatternSlot::Night,
    PatternSlot::Night,
    PatternSlot::Off,
    PatternSlot::Off,
];

/// The position (0..9) that `date` occupies in an offset-`offset` rotation,
/// counting from `first_date` (the earliest date in the run — spec.md §4.2's
/// `day_index = date − first_date`). `offset` is reduced modulo
/// [`PATTERN_LENGTH`]; callers never need to pre-normalize, and the result is
/// always in range regardless of whether `date` precedes `first_date`.
pub fn day_in_pattern(date: NaiveDate, first_date: NaiveDate, offset: u32) -> usize {
    let day_index = date.signed_duration_since(first_date).num_days();
    let position = (day_index + offset as i64).rem_euclid(PATTERN_LENGTH as i64);
    position as usize
}

/// The slot (shift or off) an employee with the given pattern offset occupies on `date`.
pub fn expected_slot(date: NaiveDate, first_date: NaiveDate, offset: u32) -> PatternSlot {
    PATTERN[day_in_pattern(date, first_date, offset)]
}

/// The 1-indexed team ids (1..=9) whose rotation places them on `shift` on `date`,
/// sorted ascending. A team's offset is `team - 1` days.
pub fn responsible_teams(date: NaiveDate, first_date: NaiveDate, shift: Shift) -> Vec<u8> {
    let target = PatternSlot::from(shift);
    let mut teams: Vec<u8> = (1..=PATTERN_LENGTH as u8)
        .filter(|&team| expected_slot(date, first_date, (team - 1) as u32) == target)
        .collect();
    teams.sort_unstable();
    teams
}

/// The single team responsible for a `(date, shift, location)` slot, if one exists.
///
/// Among the teams rostered onto `shift` that day, the lowest-numbered covers
/// [`Location::East`] and the next covers [`Location::West`].
pub fn responsible_team(
    date: NaiveDate,
    first_date: NaiveDate,
    shift: Shift,
    location: Location,
) -> Option<u8> {
    let teams = responsible_teams(date, first_date, shift);
    match location {
        Location::East => teams.first().copied(),
        Location::West => teams.get(1).copied(),
    }
}
