//! Error types for task domain validation and parsing.

use super::{SubState, TaskId, UserId};
use thiserror::Error;

/// Errors returned while constructing domain task values or applying
/// lifecycle transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The allocated hours value is out of range.
    #[error("invalid allocated hours {0}, expected a positive value")]
    InvalidAllocatedHours(u32),

    /// The proof URL is empty after trimming.
    #[error("proof url must not be empty")]
    EmptyProofUrl,

    /// The actor submitting proof is not the task assignee.
    #[error("user {actor} is not the assignee of task {task_id}")]
    NotAssignee {
        /// Task the proof was submitted against.
        task_id: TaskId,
        /// User who attempted the submission.
        actor: UserId,
    },

    /// The task is in its terminal phase and accepts no further operations.
    #[error("task {0} is closed")]
    TaskClosed(TaskId),

    /// Proof was submitted while the sub-state accepts no submissions.
    #[error("task {task_id} does not accept proof in sub-state {sub_state}")]
    NotAcceptingProof {
        /// Task the proof was submitted against.
        task_id: TaskId,
        /// Sub-state that rejected the submission.
        sub_state: SubState,
    },

    /// Approval or rejection was attempted outside `pending_validation`.
    #[error("task {task_id} is not pending validation (sub-state {sub_state})")]
    NotPendingValidation {
        /// Task the decision was applied to.
        task_id: TaskId,
        /// Sub-state that rejected the decision.
        sub_state: SubState,
    },
}

/// Error returned while parsing lifecycle phases from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown lifecycle phase: {0}")]
pub struct ParsePhaseError(pub String);

/// Error returned while parsing sub-states from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sub-state: {0}")]
pub struct ParseSubStateError(pub String);

/// Error returned while parsing priorities from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);

/// Error returned while parsing coarse task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
