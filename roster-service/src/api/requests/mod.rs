//! Request DTOs for the roster API.
//!
//! The submission body is exactly the domain's wire shape — there is no separate
//! transport-layer DTO to keep in sync, since `SubmitRosterRequest` already derives
//! `Deserialize`/`ToSchema` for this purpose.

pub use crate::domain::model::SubmitRosterRequest;
