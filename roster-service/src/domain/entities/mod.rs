pub mod roster_job;
pub mod roster_result;

pub use roster_job::{RosterJob, RosterJobResponse, RosterJobStatusResponse};
pub use roster_result::{RosterResult, RosterResultResponse};
