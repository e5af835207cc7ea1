//! Domain model for phase-gated task lifecycle management.
//!
//! The task domain models task seeding, proof submission, and reviewer
//! approval or rejection while keeping all infrastructure concerns outside
//! of the domain boundary.

mod error;
mod fields;
mod ids;
mod phase;
mod progress;
mod proof;
mod task;

pub use error::{
    ParsePhaseError, ParsePriorityError, ParseSubStateError, ParseTaskStatusError, TaskDomainError,
};
pub use fields::{AllocatedHours, Priority, TaskStatus, TaskTitle};
pub use ids::{OrgId, ProjectId, TaskId, UserId};
pub use phase::{Phase, PhaseValidations, SubState};
pub use progress::{PhaseSlot, phase_strip};
pub use proof::ProofUrl;
pub use task::{
    DEFAULT_ALLOCATED_HOURS, DEFAULT_DUE_IN_DAYS, PersistedTaskData, PhaseAdvance,
    ProofSubmission, Task, TaskSeed,
};
