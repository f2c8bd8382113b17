use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub type Grade = u32;

/// A workable shift, as it appears on the wire (requests, roster output).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "shift_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "PascalCase")]
pub enum Shift {
    Morning,
    Afternoon,
    Night,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::Morning, Shift::Afternoon, Shift::Night];

    pub fn as_str(self) -> &'static str {
        match self {
            Shift::Morning => "Morning",
            Shift::Afternoon => "Afternoon",
            Shift::Night => "Night",
        }
    }
}

/// A slot in the 9-day pattern sequence: a `Shift` plus the `Off` sentinel.
/// `Off` only ever appears inside the pattern itself, but the deviation model
/// that names it (`DeviationIndicator::expected`) is itself a wire DTO, so this
/// derives the same traits `Shift` does.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum PatternSlot {
    Morning,
    Afternoon,
    Night,
    Off,
}

impl From<Shift> for PatternSlot {
    fn from(shift: Shift) -> Self {
        match shift {
            Shift::Morning => PatternSlot::Morning,
            Shift::Afternoon => PatternSlot::Afternoon,
            Shift::Night => PatternSlot::Night,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "location", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "PascalCase")]
pub enum Location {
    East,
    West,
}

impl Location {
    pub const ALL: [Location; 2] = [Location::East, Location::West];

    pub fn as_str(self) -> &'static str {
        match self {
            Location::East => "East",
            Location::West => "West",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

pub trait Timestamped {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
}

pub trait Identifiable {
    fn id(&self) -> Uuid;
}
