//! Service layer for seeding new tasks.
//!
//! Both creation paths share this service, so every task enters the store
//! with the same lifecycle seed: first working phase, executing sub-state,
//! full active-phase list, and defaulted scheduling fields.

use crate::task::{
    domain::{
        AllocatedHours, OrgId, Priority, ProjectId, Task, TaskDomainError, TaskSeed, TaskTitle,
        UserId,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    org_id: OrgId,
    title: String,
    description: Option<String>,
    assigned_to: UserId,
    assigned_by: UserId,
    priority: Priority,
    allocated_hours: Option<u32>,
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        org_id: OrgId,
        title: impl Into<String>,
        assigned_to: UserId,
        assigned_by: UserId,
    ) -> Self {
        Self {
            project_id,
            org_id,
            title: title.into(),
            description: None,
            assigned_to,
            assigned_by,
            priority: Priority::Medium,
            allocated_hours: None,
            start_date: None,
            due_date: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Overrides the defaulted medium priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Overrides the defaulted hour budget.
    #[must_use]
    pub const fn with_allocated_hours(mut self, hours: u32) -> Self {
        self.allocated_hours = Some(hours);
        self
    }

    /// Overrides the start date (defaults to creation time).
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Overrides the due date (defaults to seven days after creation).
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    fn into_seed(self) -> Result<TaskSeed, TaskDomainError> {
        let title = TaskTitle::new(self.title)?;
        let mut seed = TaskSeed::new(
            self.project_id,
            self.org_id,
            title,
            self.assigned_to,
            self.assigned_by,
        )
        .with_priority(self.priority);
        if let Some(description) = self.description {
            seed = seed.with_description(description);
        }
        if let Some(hours) = self.allocated_hours {
            seed = seed.with_allocated_hours(AllocatedHours::new(hours)?);
        }
        if let Some(start_date) = self.start_date {
            seed = seed.with_start_date(start_date);
        }
        if let Some(due_date) = self.due_date {
            seed = seed.with_due_date(due_date);
        }
        Ok(seed)
    }
}

/// Service-level errors for task creation.
#[derive(Debug, Error)]
pub enum TaskCreationError {
    /// A single-task request failed validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// One or more batch requests failed validation; nothing was inserted.
    /// Each entry names the zero-based request position and its error.
    #[error("batch rejected, {} invalid request(s)", .0.len())]
    InvalidRequests(Vec<(usize, TaskDomainError)>),

    /// Repository rejected the insert; nothing was inserted.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Result type for task creation service operations.
pub type TaskCreationResult<T> = Result<T, TaskCreationError>;

/// Task seeding service shared by the wizard and ad-hoc creation paths.
#[derive(Clone)]
pub struct TaskCreationService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskCreationService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task creation service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates one task (the ad-hoc lead/manager path).
    ///
    /// # Errors
    ///
    /// Returns [`TaskCreationError`] when validation fails or the
    /// repository rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskCreationResult<Task> {
        let seed = request.into_seed()?;
        let task = Task::seeded(seed, &*self.clock);
        self.repository
            .insert_batch(std::slice::from_ref(&task))
            .await?;
        Ok(task)
    }

    /// Creates a batch of tasks (the project wizard path), all or nothing.
    ///
    /// Every request is validated before anything is inserted; when any
    /// fail, the error reports each offending request position.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCreationError::InvalidRequests`] when validation fails
    /// and [`TaskCreationError::Repository`] when the store rejects the
    /// batch.
    pub async fn create_batch(
        &self,
        requests: Vec<CreateTaskRequest>,
    ) -> TaskCreationResult<Vec<Task>> {
        let mut seeds = Vec::with_capacity(requests.len());
        let mut invalid = Vec::new();
        for (position, request) in requests.into_iter().enumerate() {
            match request.into_seed() {
                Ok(seed) => seeds.push(seed),
                Err(err) => invalid.push((position, err)),
            }
        }
        if !invalid.is_empty() {
            return Err(TaskCreationError::InvalidRequests(invalid));
        }

        let tasks: Vec<Task> = seeds
            .into_iter()
            .map(|seed| Task::seeded(seed, &*self.clock))
            .collect();
        self.repository.insert_batch(&tasks).await?;
        Ok(tasks)
    }
}
