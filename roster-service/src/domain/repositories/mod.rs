pub mod roster_job_repository;
pub mod roster_result_repository;

pub use roster_job_repository::RosterJobRepository;
pub use roster_result_repository::RosterResultRepository;
