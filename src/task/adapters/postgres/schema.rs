//! Diesel schema for task lifecycle persistence.

diesel::table! {
    /// Task records with phase-gated lifecycle fields.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning project.
        project_id -> Uuid,
        /// Owning organisation.
        org_id -> Uuid,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-text description.
        description -> Nullable<Text>,
        /// Assignee.
        assigned_to -> Uuid,
        /// Assigner.
        assigned_by -> Uuid,
        /// Priority.
        #[max_length = 16]
        priority -> Varchar,
        /// Derived summary status.
        #[max_length = 16]
        status -> Varchar,
        /// Lifecycle phase. NULL on rows written by the legacy ad-hoc
        /// creation path; normalized on read.
        #[max_length = 32]
        phase -> Nullable<Varchar>,
        /// Sub-state within the phase. NULL on legacy rows.
        #[max_length = 32]
        sub_state -> Nullable<Varchar>,
        /// Latest proof pointer.
        proof_url -> Nullable<Text>,
        /// Hour budget.
        allocated_hours -> Int4,
        /// Scheduled start.
        start_date -> Timestamptz,
        /// Scheduled due date.
        due_date -> Timestamptz,
        /// Active-phase record seeded at creation.
        phase_validations -> Jsonb,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}
