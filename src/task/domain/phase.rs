//! Lifecycle phase sequence and per-phase sub-states.

use super::{ParsePhaseError, ParseSubStateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of a task.
///
/// Phases form a fixed ordered sequence; approval is the only operation that
/// advances a task, always to the immediately following phase. [`Phase::Closed`]
/// is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Requirements are being refined with the assignee.
    RequirementRefiner,
    /// Design direction is being worked out.
    DesignGuidance,
    /// Implementation is underway.
    BuildGuidance,
    /// Acceptance criteria are being verified.
    AcceptanceCriteria,
    /// The deliverable is being deployed.
    Deployment,
    /// Final approval granted; the task is read-only.
    Closed,
}

impl Phase {
    /// The working phases a task passes through, in gate order.
    ///
    /// Excludes [`Phase::Closed`], which is only ever entered by approving
    /// the final working phase.
    pub const WORKING_SEQUENCE: [Self; 5] = [
        Self::RequirementRefiner,
        Self::DesignGuidance,
        Self::BuildGuidance,
        Self::AcceptanceCriteria,
        Self::Deployment,
    ];

    /// Returns the phase entered when this phase is approved.
    ///
    /// Returns `None` for [`Phase::Closed`], which has no successor.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::RequirementRefiner => Some(Self::DesignGuidance),
            Self::DesignGuidance => Some(Self::BuildGuidance),
            Self::BuildGuidance => Some(Self::AcceptanceCriteria),
            Self::AcceptanceCriteria => Some(Self::Deployment),
            Self::Deployment => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    /// Returns whether this is the terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Returns the zero-based position of this phase in the full sequence.
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::RequirementRefiner => 0,
            Self::DesignGuidance => 1,
            Self::BuildGuidance => 2,
            Self::AcceptanceCriteria => 3,
            Self::Deployment => 4,
            Self::Closed => 5,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequirementRefiner => "requirement_refiner",
            Self::DesignGuidance => "design_guidance",
            Self::BuildGuidance => "build_guidance",
            Self::AcceptanceCriteria => "acceptance_criteria",
            Self::Deployment => "deployment",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Phase {
    type Error = ParsePhaseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "requirement_refiner" => Ok(Self::RequirementRefiner),
            "design_guidance" => Ok(Self::DesignGuidance),
            "build_guidance" => Ok(Self::BuildGuidance),
            "acceptance_criteria" => Ok(Self::AcceptanceCriteria),
            "deployment" => Ok(Self::Deployment),
            "closed" => Ok(Self::Closed),
            _ => Err(ParsePhaseError(value.to_owned())),
        }
    }
}

/// Fine-grained status within the current lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubState {
    /// The assignee is executing the phase.
    InProgress,
    /// Proof has been submitted and awaits a reviewer decision.
    PendingValidation,
    /// The final working phase was approved alongside closing the task.
    Approved,
    /// Retained for legacy rows; the engine records rejection by returning
    /// the task to [`SubState::InProgress`] instead.
    Rejected,
}

impl SubState {
    /// Returns whether a reviewer decision (approve/reject) is valid now.
    #[must_use]
    pub const fn awaits_validation(self) -> bool {
        matches!(self, Self::PendingValidation)
    }

    /// Returns whether the assignee may submit proof in this sub-state.
    ///
    /// Submission is allowed while executing (first submission) and while
    /// pending validation (resubmission replacing the proof pointer).
    #[must_use]
    pub const fn accepts_proof(self) -> bool {
        matches!(self, Self::InProgress | Self::PendingValidation)
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::PendingValidation => "pending_validation",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SubState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SubState {
    type Error = ParseSubStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "in_progress" => Ok(Self::InProgress),
            "pending_validation" => Ok(Self::PendingValidation),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(ParseSubStateError(value.to_owned())),
        }
    }
}

/// Record of which working phases are active for a task.
///
/// Seeded at creation and never mutated by the lifecycle engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseValidations {
    active_phases: Vec<Phase>,
}

impl PhaseValidations {
    /// Creates a record with every working phase active, the seeding
    /// contract for both creation paths.
    #[must_use]
    pub fn all_active() -> Self {
        Self {
            active_phases: Phase::WORKING_SEQUENCE.to_vec(),
        }
    }

    /// Returns the active working phases in gate order.
    #[must_use]
    pub fn active_phases(&self) -> &[Phase] {
        &self.active_phases
    }

    /// Returns whether the given phase is active for the task.
    #[must_use]
    pub fn is_active(&self, phase: Phase) -> bool {
        self.active_phases.contains(&phase)
    }
}

impl Default for PhaseValidations {
    fn default() -> Self {
        Self::all_active()
    }
}
