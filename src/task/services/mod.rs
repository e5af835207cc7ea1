//! Orchestration services for the task lifecycle.

mod board;
mod creation;
mod lifecycle;

pub use board::TaskBoardService;
pub use creation::{CreateTaskRequest, TaskCreationError, TaskCreationResult, TaskCreationService};
pub use lifecycle::{
    SubmitProofRequest, TaskLifecycleError, TaskLifecycleResult, TaskLifecycleService,
};
