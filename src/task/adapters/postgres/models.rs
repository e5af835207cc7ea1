//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, QueryableByName, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Owning organisation.
    pub org_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Assigner.
    pub assigned_by: uuid::Uuid,
    /// Priority.
    pub priority: String,
    /// Summary status.
    pub status: String,
    /// Lifecycle phase; NULL on legacy rows.
    pub phase: Option<String>,
    /// Sub-state; NULL on legacy rows.
    pub sub_state: Option<String>,
    /// Latest proof pointer.
    pub proof_url: Option<String>,
    /// Hour budget.
    pub allocated_hours: i32,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled due date.
    pub due_date: DateTime<Utc>,
    /// Active-phase JSON payload.
    pub phase_validations: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Owning project.
    pub project_id: uuid::Uuid,
    /// Owning organisation.
    pub org_id: uuid::Uuid,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Assignee.
    pub assigned_to: uuid::Uuid,
    /// Assigner.
    pub assigned_by: uuid::Uuid,
    /// Priority.
    pub priority: String,
    /// Summary status.
    pub status: String,
    /// Lifecycle phase.
    pub phase: Option<String>,
    /// Sub-state.
    pub sub_state: Option<String>,
    /// Latest proof pointer.
    pub proof_url: Option<String>,
    /// Hour budget.
    pub allocated_hours: i32,
    /// Scheduled start.
    pub start_date: DateTime<Utc>,
    /// Scheduled due date.
    pub due_date: DateTime<Utc>,
    /// Active-phase JSON payload.
    pub phase_validations: Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}
