//! Service layer for proof submission and reviewer decisions.
//!
//! Each operation follows the same shape: read the task, run the pure
//! domain transition, persist it through a conditional write guarded on the
//! sub-state the transition started from, and report the outcome through
//! the notifier. A guard miss means a concurrent actor won the race; the
//! caller is told to refresh rather than retry.

use crate::task::{
    domain::{PhaseAdvance, ProofUrl, SubState, Task, TaskDomainError, TaskId, UserId},
    ports::{
        Notice, Notifier, ProofFile, ProofStorage, ProofStorageError, TaskPatch, TaskRepository,
        TaskRepositoryError, UpdateOutcome,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for submitting proof against a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitProofRequest {
    task_id: TaskId,
    actor: UserId,
    proof_url: ProofUrl,
}

impl SubmitProofRequest {
    /// Creates a submission request.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: UserId, proof_url: ProofUrl) -> Self {
        Self {
            task_id,
            actor,
            proof_url,
        }
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed; the actor corrects input and retries.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed; the task is guaranteed unchanged.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Proof upload failed before any task mutation was attempted.
    #[error(transparent)]
    Storage(#[from] ProofStorageError),

    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// A concurrent actor changed the task between read and write; the
    /// stale decision was not applied and must not be blindly retried.
    #[error("task {0} state changed, please refresh")]
    StateChanged(TaskId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, S, N, C>
where
    R: TaskRepository,
    S: ProofStorage,
    N: Notifier,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    storage: Arc<S>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<R, S, N, C> TaskLifecycleService<R, S, N, C>
where
    R: TaskRepository,
    S: ProofStorage,
    N: Notifier,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, storage: Arc<S>, notifier: Arc<N>, clock: Arc<C>) -> Self {
        Self {
            repository,
            storage,
            notifier,
            clock,
        }
    }

    /// Submits proof for the task's current phase.
    ///
    /// A first submission moves the task to pending validation; a
    /// submission while already pending replaces the proof pointer only.
    /// Returns the task as persisted.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the submission is not
    /// permitted, [`TaskLifecycleError::StateChanged`] when a reviewer
    /// decision landed between read and write, and
    /// [`TaskLifecycleError::Repository`] on persistence failure. Exactly
    /// one notice is delivered either way.
    pub async fn submit_proof(&self, request: SubmitProofRequest) -> TaskLifecycleResult<Task> {
        let result = self.submit_proof_inner(request).await;
        self.report(result, "Proof submitted for validation")
    }

    /// Uploads a proof file and submits the returned URL in one step.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Storage`] when the upload is rejected;
    /// the task is untouched in that case. Otherwise behaves like
    /// [`Self::submit_proof`].
    pub async fn upload_and_submit_proof(
        &self,
        task_id: TaskId,
        actor: UserId,
        file: ProofFile,
    ) -> TaskLifecycleResult<Task> {
        let result = self.upload_and_submit_inner(task_id, actor, file).await;
        self.report(result, "Proof uploaded and submitted for validation")
    }

    /// Approves the pending proof, advancing the task one phase.
    ///
    /// Approving the final working phase closes the task. Returns the task
    /// as persisted together with where it advanced to.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the task is not pending
    /// validation and [`TaskLifecycleError::StateChanged`] when another
    /// reviewer decided first. Exactly one notice is delivered either way.
    pub async fn approve(&self, task_id: TaskId) -> TaskLifecycleResult<(Task, PhaseAdvance)> {
        let result = self.approve_inner(task_id).await;
        self.report(result, "Task approved")
    }

    /// Rejects the pending proof, returning the task to execution within
    /// the same phase. The prior proof stays in place until overwritten.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Self::approve`].
    pub async fn reject(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let result = self.reject_inner(task_id).await;
        self.report(result, "Task sent back for rework")
    }

    async fn submit_proof_inner(&self, request: SubmitProofRequest) -> TaskLifecycleResult<Task> {
        let mut task = self.load(request.task_id).await?;
        let submission = task.submit_proof(request.actor, request.proof_url, &*self.clock)?;
        self.persist(task, submission.guard()).await
    }

    async fn upload_and_submit_inner(
        &self,
        task_id: TaskId,
        actor: UserId,
        file: ProofFile,
    ) -> TaskLifecycleResult<Task> {
        let proof_url = self.storage.store(task_id, &file).await?;
        self.submit_proof_inner(SubmitProofRequest::new(task_id, actor, proof_url))
            .await
    }

    async fn approve_inner(&self, task_id: TaskId) -> TaskLifecycleResult<(Task, PhaseAdvance)> {
        let mut task = self.load(task_id).await?;
        let advance = task.approve(&*self.clock)?;
        let persisted = self.persist(task, SubState::PendingValidation).await?;
        Ok((persisted, advance))
    }

    async fn reject_inner(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        task.reject(&*self.clock)?;
        self.persist(task, SubState::PendingValidation).await
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    /// Writes a transitioned task back, guarded on the sub-state the
    /// transition started from.
    async fn persist(&self, task: Task, guard: SubState) -> TaskLifecycleResult<Task> {
        let patch = TaskPatch::from_task(&task);
        let outcome = self
            .repository
            .update_if_sub_state(task.id(), guard, &patch)
            .await?;
        match outcome {
            UpdateOutcome::Applied => Ok(task),
            UpdateOutcome::StaleSubState => Err(TaskLifecycleError::StateChanged(task.id())),
        }
    }

    /// Delivers exactly one notice per attempted transition: a success
    /// toast when the mutation took effect, an error toast otherwise.
    fn report<T>(
        &self,
        result: TaskLifecycleResult<T>,
        success_message: &str,
    ) -> TaskLifecycleResult<T> {
        match &result {
            Ok(_) => self.notifier.notify(&Notice::success(success_message)),
            Err(err) => self.notifier.notify(&Notice::error(err.to_string())),
        }
        result
    }
}
