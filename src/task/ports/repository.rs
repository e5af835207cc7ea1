//! Repository port for task persistence, lookup, and conditional updates.

use crate::task::domain::{
    Phase, ProjectId, ProofUrl, SubState, Task, TaskId, TaskStatus, UserId,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Lifecycle fields written by a conditional update.
///
/// Carries the full post-transition lifecycle pair plus the derived status
/// and proof pointer, so a single guarded write applies the whole
/// transition atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPatch {
    /// Lifecycle phase after the transition.
    pub phase: Phase,
    /// Sub-state after the transition.
    pub sub_state: SubState,
    /// Derived summary status after the transition.
    pub status: TaskStatus,
    /// Proof pointer after the transition.
    pub proof_url: Option<ProofUrl>,
    /// Transition timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TaskPatch {
    /// Captures the lifecycle fields of an already-transitioned task.
    #[must_use]
    pub fn from_task(task: &Task) -> Self {
        Self {
            phase: task.phase(),
            sub_state: task.sub_state(),
            status: task.status(),
            proof_url: task.proof_url().cloned(),
            updated_at: task.updated_at(),
        }
    }
}

/// Outcome of a conditional update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The guard held and the patch was written.
    Applied,
    /// The row exists but its sub-state no longer matches the guard; a
    /// concurrent actor won the race and nothing was written.
    StaleSubState,
}

/// Filter for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// Restrict to one project.
    pub project_id: Option<ProjectId>,
    /// Restrict to one assignee.
    pub assigned_to: Option<UserId>,
    /// Restrict to one sub-state.
    pub sub_state: Option<SubState>,
}

impl TaskFilter {
    /// Creates an unrestricted filter matching every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            project_id: None,
            assigned_to: None,
            sub_state: None,
        }
    }

    /// Restricts the filter to one project.
    #[must_use]
    pub const fn in_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Restricts the filter to one assignee.
    #[must_use]
    pub const fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_to = Some(user_id);
        self
    }

    /// Restricts the filter to one sub-state.
    #[must_use]
    pub const fn with_sub_state(mut self, sub_state: SubState) -> Self {
        self.sub_state = Some(sub_state);
        self
    }

    /// Returns whether the given task matches the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.project_id.is_none_or(|id| task.project_id() == id)
            && self.assigned_to.is_none_or(|id| task.assigned_to() == id)
            && self.sub_state.is_none_or(|sub| task.sub_state() == sub)
    }
}

/// Task persistence contract.
///
/// The store provides no cross-client locking; the conditional update keyed
/// on sub-state is the sole concurrency-safety mechanism.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Stores a batch of new tasks, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::BatchRejected`] naming every offending
    /// task when any row duplicates an existing identifier; no row is
    /// inserted in that case.
    async fn insert_batch(&self, tasks: &[Task]) -> TaskRepositoryResult<()>;

    /// Applies `patch` to the task only if its sub-state still equals
    /// `expected` at write time.
    ///
    /// At most one of two racing callers observes
    /// [`UpdateOutcome::Applied`]; the loser observes
    /// [`UpdateOutcome::StaleSubState`] and must not blindly retry.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn update_if_sub_state(
        &self,
        id: TaskId,
        expected: SubState,
        patch: &TaskPatch,
    ) -> TaskRepositoryResult<UpdateOutcome>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns all tasks matching the filter.
    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// One or more batch rows duplicate existing task identifiers; the whole
    /// batch was rejected.
    #[error("batch rejected, duplicate task identifiers: {0:?}")]
    BatchRejected(Vec<TaskId>),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure. The task is guaranteed unchanged and the
    /// caller may retry the same operation.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
