//! Task aggregate root and the lifecycle transition engine.

use super::{
    AllocatedHours, OrgId, Phase, PhaseValidations, Priority, ProjectId, ProofUrl, SubState,
    TaskDomainError, TaskId, TaskStatus, TaskTitle, UserId,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Hour budget seeded when task creation does not specify one.
pub const DEFAULT_ALLOCATED_HOURS: u32 = 8;

/// Days between creation and the defaulted due date.
pub const DEFAULT_DUE_IN_DAYS: i64 = 7;

/// Outcome of a proof submission, telling the caller which sub-state must
/// still hold at write time for the submission to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProofSubmission {
    /// First submission for the current phase: the proof pointer was set and
    /// the sub-state moved to [`SubState::PendingValidation`].
    First,
    /// Resubmission while already pending validation: only the proof pointer
    /// was replaced.
    Resubmission,
}

impl ProofSubmission {
    /// Returns the sub-state the conditional write must be guarded on.
    #[must_use]
    pub const fn guard(self) -> SubState {
        match self {
            Self::First => SubState::InProgress,
            Self::Resubmission => SubState::PendingValidation,
        }
    }
}

/// Outcome of an approval decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAdvance {
    /// The task re-entered execution at the given phase.
    Advanced(Phase),
    /// The final working phase was approved; the task is closed and
    /// completed.
    Closed,
}

/// Required fields and optional overrides for seeding a new task.
///
/// Both creation paths (project wizard batches and ad-hoc lead/manager
/// creation) build one of these, so every task enters the store with the
/// same lifecycle seed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSeed {
    project_id: ProjectId,
    org_id: OrgId,
    title: TaskTitle,
    description: Option<String>,
    assigned_to: UserId,
    assigned_by: UserId,
    priority: Priority,
    allocated_hours: AllocatedHours,
    start_date: Option<DateTime<Utc>>,
    due_date: Option<DateTime<Utc>>,
}

impl TaskSeed {
    /// Creates a seed with required fields and defaulted scheduling data.
    #[must_use]
    pub const fn new(
        project_id: ProjectId,
        org_id: OrgId,
        title: TaskTitle,
        assigned_to: UserId,
        assigned_by: UserId,
    ) -> Self {
        Self {
            project_id,
            org_id,
            title,
            description: None,
            assigned_to,
            assigned_by,
            priority: Priority::Medium,
            allocated_hours: AllocatedHours::DEFAULT,
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

    /// Overrides the defaulted priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Overrides the defaulted hour budget.
    #[must_use]
    pub const fn with_allocated_hours(mut self, allocated_hours: AllocatedHours) -> Self {
        self.allocated_hours = allocated_hours;
        self
    }

    /// Overrides the start date (defaults to creation time).
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Overrides the due date (defaults to creation time plus
    /// [`DEFAULT_DUE_IN_DAYS`]).
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Task aggregate root.
///
/// All lifecycle fields are private; the only mutations are the three engine
/// operations [`Task::submit_proof`], [`Task::approve`], and
/// [`Task::reject`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    org_id: OrgId,
    title: TaskTitle,
    description: Option<String>,
    assigned_to: UserId,
    assigned_by: UserId,
    priority: Priority,
    status: TaskStatus,
    phase: Phase,
    sub_state: SubState,
    proof_url: Option<ProofUrl>,
    allocated_hours: AllocatedHours,
    start_date: DateTime<Utc>,
    due_date: DateTime<Utc>,
    phase_validations: PhaseValidations,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted project scope.
    pub project_id: ProjectId,
    /// Persisted organisation scope.
    pub org_id: OrgId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted assignee.
    pub assigned_to: UserId,
    /// Persisted assigner.
    pub assigned_by: UserId,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted summary status.
    pub status: TaskStatus,
    /// Persisted lifecycle phase.
    pub phase: Phase,
    /// Persisted sub-state.
    pub sub_state: SubState,
    /// Persisted proof pointer, if any.
    pub proof_url: Option<ProofUrl>,
    /// Persisted hour budget.
    pub allocated_hours: AllocatedHours,
    /// Persisted start date.
    pub start_date: DateTime<Utc>,
    /// Persisted due date.
    pub due_date: DateTime<Utc>,
    /// Persisted active-phase record.
    pub phase_validations: PhaseValidations,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Seeds a new task in the first working phase.
    ///
    /// The lifecycle seed is identical for every creation path: phase
    /// [`Phase::RequirementRefiner`], sub-state [`SubState::InProgress`],
    /// derived summary status, and every working phase active.
    #[must_use]
    pub fn seeded(seed: TaskSeed, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let phase = Phase::RequirementRefiner;
        Self {
            id: TaskId::new(),
            project_id: seed.project_id,
            org_id: seed.org_id,
            title: seed.title,
            description: seed.description,
            assigned_to: seed.assigned_to,
            assigned_by: seed.assigned_by,
            priority: seed.priority,
            status: TaskStatus::derived(phase),
            phase,
            sub_state: SubState::InProgress,
            proof_url: None,
            allocated_hours: seed.allocated_hours,
            start_date: seed.start_date.unwrap_or(timestamp),
            due_date: seed
                .due_date
                .unwrap_or_else(|| timestamp + Duration::days(DEFAULT_DUE_IN_DAYS)),
            phase_validations: PhaseValidations::all_active(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            org_id: data.org_id,
            title: data.title,
            description: data.description,
            assigned_to: data.assigned_to,
            assigned_by: data.assigned_by,
            priority: data.priority,
            status: data.status,
            phase: data.phase,
            sub_state: data.sub_state,
            proof_url: data.proof_url,
            allocated_hours: data.allocated_hours,
            start_date: data.start_date,
            due_date: data.due_date,
            phase_validations: data.phase_validations,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the project scope.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the organisation scope.
    #[must_use]
    pub const fn org_id(&self) -> OrgId {
        self.org_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assigned_to(&self) -> UserId {
        self.assigned_to
    }

    /// Returns the user who assigned the task.
    #[must_use]
    pub const fn assigned_by(&self) -> UserId {
        self.assigned_by
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the derived summary status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the sub-state within the current phase.
    #[must_use]
    pub const fn sub_state(&self) -> SubState {
        self.sub_state
    }

    /// Returns the latest proof pointer, if any.
    #[must_use]
    pub const fn proof_url(&self) -> Option<&ProofUrl> {
        self.proof_url.as_ref()
    }

    /// Returns the hour budget.
    #[must_use]
    pub const fn allocated_hours(&self) -> AllocatedHours {
        self.allocated_hours
    }

    /// Returns the start date.
    #[must_use]
    pub const fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    /// Returns the due date.
    #[must_use]
    pub const fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    /// Returns the active-phase record seeded at creation.
    #[must_use]
    pub const fn phase_validations(&self) -> &PhaseValidations {
        &self.phase_validations
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the task is in its terminal phase.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Returns whether a reviewer decision is valid right now.
    #[must_use]
    pub const fn awaiting_validation(&self) -> bool {
        self.sub_state.awaits_validation()
    }

    /// Records proof submitted by the assignee for the current phase.
    ///
    /// A first submission sets the proof pointer and moves the sub-state to
    /// [`SubState::PendingValidation`]. A submission while already pending
    /// validation is a resubmission: only the proof pointer is replaced and
    /// the lifecycle pair stays put.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] for closed tasks,
    /// [`TaskDomainError::NotAssignee`] when `actor` is not the assignee, and
    /// [`TaskDomainError::NotAcceptingProof`] when the sub-state permits no
    /// submission. The aggregate is unchanged on error.
    pub fn submit_proof(
        &mut self,
        actor: UserId,
        proof_url: ProofUrl,
        clock: &impl Clock,
    ) -> Result<ProofSubmission, TaskDomainError> {
        if self.is_closed() {
            return Err(TaskDomainError::TaskClosed(self.id));
        }
        if actor != self.assigned_to {
            return Err(TaskDomainError::NotAssignee {
                task_id: self.id,
                actor,
            });
        }

        let submission = match self.sub_state {
            SubState::PendingValidation => ProofSubmission::Resubmission,
            SubState::InProgress => {
                self.sub_state = SubState::PendingValidation;
                ProofSubmission::First
            }
            SubState::Approved | SubState::Rejected => {
                return Err(TaskDomainError::NotAcceptingProof {
                    task_id: self.id,
                    sub_state: self.sub_state,
                });
            }
        };
        self.proof_url = Some(proof_url);
        self.touch(clock);
        Ok(submission)
    }

    /// Approves the pending proof, advancing the task one phase.
    ///
    /// Approving the final working phase closes the task and marks the
    /// summary status completed; any earlier phase re-enters execution at
    /// the next phase.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] for closed tasks and
    /// [`TaskDomainError::NotPendingValidation`] when no proof awaits a
    /// decision. The aggregate is unchanged on error.
    pub fn approve(&mut self, clock: &impl Clock) -> Result<PhaseAdvance, TaskDomainError> {
        self.ensure_decidable()?;

        let advance = match self.phase.next() {
            Some(next) if next.is_terminal() => {
                self.phase = Phase::Closed;
                self.sub_state = SubState::Approved;
                PhaseAdvance::Closed
            }
            Some(next) => {
                self.phase = next;
                self.sub_state = SubState::InProgress;
                PhaseAdvance::Advanced(next)
            }
            None => return Err(TaskDomainError::TaskClosed(self.id)),
        };
        self.status = TaskStatus::derived(self.phase);
        self.touch(clock);
        Ok(advance)
    }

    /// Rejects the pending proof, returning the task to execution.
    ///
    /// The phase is unchanged and the proof pointer is left in place; the
    /// prior proof stays visible until a new submission overwrites it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::TaskClosed`] for closed tasks and
    /// [`TaskDomainError::NotPendingValidation`] when no proof awaits a
    /// decision. The aggregate is unchanged on error.
    pub fn reject(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_decidable()?;
        self.sub_state = SubState::InProgress;
        self.touch(clock);
        Ok(())
    }

    /// Validates that a reviewer decision is permitted right now.
    const fn ensure_decidable(&self) -> Result<(), TaskDomainError> {
        if self.is_closed() {
            return Err(TaskDomainError::TaskClosed(self.id));
        }
        if !self.sub_state.awaits_validation() {
            return Err(TaskDomainError::NotPendingValidation {
                task_id: self.id,
                sub_state: self.sub_state,
            });
        }
        Ok(())
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
