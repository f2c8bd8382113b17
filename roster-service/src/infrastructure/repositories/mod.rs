pub mod postgres_roster_job_repository;
pub mod postgres_roster_result_repository;

pub use postgres_roster_job_repository::PostgresRosterJobRepository;
pub use postgres_roster_result_repository::PostgresRosterResultRepository;
