pub mod entities;
pub mod model;
pub mod pattern;
pub mod repositories;
pub mod services;

pub use model::{
    Demand, Employee, RosterInput, SchedulingMode, Slot, SubmitRosterRequest, PATTERN_LENGTH,
};
