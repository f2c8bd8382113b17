pub mod cp_sat_model;
pub mod diagnostics;
pub mod result_assembler;
pub mod team_allocator;

pub use cp_sat_model::{build_individual_model, CpSatModel, ObjectiveWeights};
pub use result_assembler::{
    assemble_individual, assemble_team, LocationRoster, Roster, RosterOutcome, ShiftRoster,
    SolverSolution, SolverStatus,
};
pub use team_allocator::{allocate, TeamAllocationResult};
