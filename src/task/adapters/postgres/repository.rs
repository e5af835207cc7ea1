//! `PostgreSQL` repository implementation for task lifecycle storage.

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        AllocatedHours, OrgId, PersistedTaskData, Phase, PhaseValidations, Priority, ProjectId,
        ProofUrl, SubState, Task, TaskId, TaskStatus, TaskTitle, UserId,
    },
    ports::{
        TaskFilter, TaskPatch, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
        UpdateOutcome,
    },
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task repository.
///
/// The conditional update is expressed as `UPDATE … WHERE id = $1 AND
/// sub_state = $2`; rows-affected decides whether the caller won or lost a
/// reviewer race.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert_batch(&self, batch: &[Task]) -> TaskRepositoryResult<()> {
        let ids: Vec<uuid::Uuid> = batch.iter().map(|task| task.id().into_inner()).collect();
        let rows = batch
            .iter()
            .map(to_new_row)
            .collect::<TaskRepositoryResult<Vec<NewTaskRow>>>()?;

        self.run_blocking(move |connection| {
            connection.transaction(|conn| {
                // This pre-check improves semantic error reporting but is not
                // relied on for correctness: the primary key still enforces
                // integrity in the TOCTOU window between check and insert.
                let existing: Vec<uuid::Uuid> = tasks::table
                    .filter(tasks::id.eq_any(&ids))
                    .select(tasks::id)
                    .load(conn)?;
                if !existing.is_empty() {
                    return Err(TaskRepositoryError::BatchRejected(
                        existing.into_iter().map(TaskId::from_uuid).collect(),
                    ));
                }

                diesel::insert_into(tasks::table)
                    .values(&rows)
                    .execute(conn)?;
                Ok(())
            })
        })
        .await
    }

    async fn update_if_sub_state(
        &self,
        id: TaskId,
        expected: SubState,
        patch: &TaskPatch,
    ) -> TaskRepositoryResult<UpdateOutcome> {
        let task_uuid = id.into_inner();
        let guard = expected.as_str().to_owned();
        let changes = (
            tasks::phase.eq(patch.phase.as_str().to_owned()),
            tasks::sub_state.eq(patch.sub_state.as_str().to_owned()),
            tasks::status.eq(patch.status.as_str().to_owned()),
            tasks::proof_url.eq(patch.proof_url.as_ref().map(|url| url.as_str().to_owned())),
            tasks::updated_at.eq(patch.updated_at),
        );

        self.run_blocking(move |connection| {
            // Legacy rows carry NULL lifecycle columns and read as
            // in_progress, so an in_progress guard must match them too.
            let affected = if expected == SubState::InProgress {
                diesel::update(
                    tasks::table.filter(tasks::id.eq(task_uuid)).filter(
                        tasks::sub_state.eq(guard).or(tasks::sub_state.is_null()),
                    ),
                )
                .set(changes)
                .execute(connection)
            } else {
                diesel::update(
                    tasks::table
                        .filter(tasks::id.eq(task_uuid))
                        .filter(tasks::sub_state.eq(guard)),
                )
                .set(changes)
                .execute(connection)
            }
            .map_err(TaskRepositoryError::persistence)?;

            if affected > 0 {
                return Ok(UpdateOutcome::Applied);
            }

            let exists = tasks::table
                .filter(tasks::id.eq(task_uuid))
                .select(tasks::id)
                .first::<uuid::Uuid>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            if exists.is_some() {
                Ok(UpdateOutcome::StaleSubState)
            } else {
                Err(TaskRepositoryError::NotFound(id))
            }
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list(&self, filter: &TaskFilter) -> TaskRepositoryResult<Vec<Task>> {
        let scope = *filter;
        self.run_blocking(move |connection| {
            let mut query = tasks::table.into_boxed();
            if let Some(project_id) = scope.project_id {
                query = query.filter(tasks::project_id.eq(project_id.into_inner()));
            }
            if let Some(assigned_to) = scope.assigned_to {
                query = query.filter(tasks::assigned_to.eq(assigned_to.into_inner()));
            }
            if let Some(sub_state) = scope.sub_state {
                let wanted = sub_state.as_str().to_owned();
                if sub_state == SubState::InProgress {
                    query =
                        query.filter(tasks::sub_state.eq(wanted).or(tasks::sub_state.is_null()));
                } else {
                    query = query.filter(tasks::sub_state.eq(wanted));
                }
            }

            let rows = query
                .order(tasks::created_at.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }
}

fn to_new_row(task: &Task) -> TaskRepositoryResult<NewTaskRow> {
    let phase_validations = serde_json::to_value(task.phase_validations())
        .map_err(TaskRepositoryError::persistence)?;
    let allocated_hours = i32::try_from(task.allocated_hours().value())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        org_id: task.org_id().into_inner(),
        title: task.title().as_str().to_owned(),
        description: task.description().map(str::to_owned),
        assigned_to: task.assigned_to().into_inner(),
        assigned_by: task.assigned_by().into_inner(),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        phase: Some(task.phase().as_str().to_owned()),
        sub_state: Some(task.sub_state().as_str().to_owned()),
        proof_url: task.proof_url().map(|url| url.as_str().to_owned()),
        allocated_hours,
        start_date: task.start_date(),
        due_date: task.due_date(),
        phase_validations,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        project_id,
        org_id,
        title,
        description,
        assigned_to,
        assigned_by,
        priority: persisted_priority,
        status: persisted_status,
        phase: persisted_phase,
        sub_state: persisted_sub_state,
        proof_url,
        allocated_hours,
        start_date,
        due_date,
        phase_validations,
        created_at,
        updated_at,
    } = row;

    // Rows written by the pre-unification ad-hoc creation path carry NULL
    // lifecycle columns; normalize them to the creation seed on read.
    let (phase, sub_state, status) = match (persisted_phase, persisted_sub_state) {
        (Some(phase_raw), Some(sub_state_raw)) => {
            let phase = Phase::try_from(phase_raw.as_str())
                .map_err(TaskRepositoryError::persistence)?;
            let sub_state = SubState::try_from(sub_state_raw.as_str())
                .map_err(TaskRepositoryError::persistence)?;
            let status = TaskStatus::try_from(persisted_status.as_str())
                .map_err(TaskRepositoryError::persistence)?;
            (phase, sub_state, status)
        }
        _ => {
            let phase = Phase::RequirementRefiner;
            (phase, SubState::InProgress, TaskStatus::derived(phase))
        }
    };

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        project_id: ProjectId::from_uuid(project_id),
        org_id: OrgId::from_uuid(org_id),
        title: TaskTitle::new(title).map_err(TaskRepositoryError::persistence)?,
        description,
        assigned_to: UserId::from_uuid(assigned_to),
        assigned_by: UserId::from_uuid(assigned_by),
        priority: Priority::try_from(persisted_priority.as_str())
            .map_err(TaskRepositoryError::persistence)?,
        status,
        phase,
        sub_state,
        proof_url: proof_url
            .map(ProofUrl::new)
            .transpose()
            .map_err(TaskRepositoryError::persistence)?,
        allocated_hours: AllocatedHours::new(
            u32::try_from(allocated_hours).map_err(TaskRepositoryError::persistence)?,
        )
        .map_err(TaskRepositoryError::persistence)?,
        start_date,
        due_date,
        phase_validations: serde_json::from_value::<PhaseValidations>(phase_validations)
            .map_err(TaskRepositoryError::persistence)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}
