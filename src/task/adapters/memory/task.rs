//! In-memory repository for task lifecycle tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{SubState, Task, TaskId},
    ports::{
        TaskFilter, TaskPatch, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        UpdateOutcome,
    },
};

/// Thread-safe in-memory task repository.
///
/// Implements the same conditional-write contract as the `PostgreSQL`
/// adapter: the patch lands only while the stored sub-state matches the
/// guard, so racing reviewers observe exactly one applied decision.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Rebuilds a stored task with the patch's lifecycle fields applied.
fn apply_patch(stored: &Task, patch: &TaskPatch) -> Task {
    let data = crate::task::domain::PersistedTaskData {
        id: stored.id(),
        project_id: stored.project_id(),
        org_id: stored.org_id(),
        title: stored.title().clone(),
        description: stored.description().map(str::to_owned),
        assigned_to: stored.assigned_to(),
        assigned_by: stored.assigned_by(),
        priority: stored.priority(),
        status: patch.status,
        phase: patch.phase,
        sub_state: patch.sub_state,
        proof_url: patch.proof_url.clone(),
        allocated_hours: stored.allocated_hours(),
        start_date: stored.start_date(),
        due_date: stored.due_date(),
        phase_validations: stored.phase_validations().clone(),
        created_at: stored.created_at(),
        updated_at: patch.updated_at,
    };
    Task::from_persisted(data)
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert_batch(&self, tasks: &[Task]) -> TaskRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let duplicates: Vec<TaskId> = tasks
            .iter()
            .map(Task::id)
            .filter(|id| state.tasks.contains_key(id))
            .collect();
        if !duplicates.is_empty() {
            return Err(TaskRepositoryError::BatchRejected(duplicates));
        }

        for task in tasks {
            state.tasks.insert(task.id(), task.clone());
        }
        Ok(())
    }

    async fn update_if_sub_state(
        &self,
        id: TaskId,
        expected: SubState,
        patch: &TaskPatch,
    ) -> TaskRepositoryResult<UpdateOutcome> {
        let mut state = self.state.write().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;

        let stored = state
            .tasks
            .get(&id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        if stored.sub_state() != expected {
            return Ok(UpdateOutcome::StaleSubState);
        }

        let updated = apply_patch(stored, patch);
        state.tasks.insert(id, updated);
        Ok(UpdateOutcome::Applied)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect();
        tasks.sort_by_key(Task::created_at);
        Ok(tasks)
    }
}
