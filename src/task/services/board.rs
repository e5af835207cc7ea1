//! View queries backing the employee and lead/manager task boards.
//!
//! Views never treat in-memory task state as authoritative; every query
//! re-reads from the store.

use crate::task::{
    domain::{ProjectId, SubState, Task, UserId},
    ports::{TaskFilter, TaskRepository, TaskRepositoryResult},
};
use std::sync::Arc;

/// Read-side service for task listings.
#[derive(Clone)]
pub struct TaskBoardService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskBoardService<R>
where
    R: TaskRepository,
{
    /// Creates a new board service.
    #[must_use]
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Tasks assigned to one user within the active project (the employee
    /// view).
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::ports::TaskRepositoryError`] when the store
    /// lookup fails.
    pub async fn assigned_tasks(
        &self,
        project_id: ProjectId,
        user_id: UserId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let filter = TaskFilter::all()
            .in_project(project_id)
            .assigned_to(user_id);
        self.repository.list(&filter).await
    }

    /// All tasks of one project (the lead view).
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::ports::TaskRepositoryError`] when the store
    /// lookup fails.
    pub async fn project_tasks(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let filter = TaskFilter::all().in_project(project_id);
        self.repository.list(&filter).await
    }

    /// Project tasks with proof awaiting a reviewer decision.
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::ports::TaskRepositoryError`] when the store
    /// lookup fails.
    pub async fn validation_queue(
        &self,
        project_id: ProjectId,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let filter = TaskFilter::all()
            .in_project(project_id)
            .with_sub_state(SubState::PendingValidation);
        self.repository.list(&filter).await
    }

    /// Every task across all projects (the executive view).
    ///
    /// # Errors
    ///
    /// Returns [`crate::task::ports::TaskRepositoryError`] when the store
    /// lookup fails.
    pub async fn all_tasks(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.repository.list(&TaskFilter::all()).await
    }
}
