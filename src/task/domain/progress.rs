//! Phase progress rendering for task views.

use super::{Phase, SubState, Task};

/// Rendering state of one slot in the phase progress strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseSlot {
    /// The phase was approved earlier; rendered filled.
    Complete,
    /// The current phase, being executed by the assignee.
    Active,
    /// The current phase, with proof awaiting a reviewer decision;
    /// rendered with the distinct pending highlight.
    AwaitingValidation,
    /// A later phase not yet reached; rendered empty.
    Upcoming,
}

/// Maps each working phase of a task to its progress-strip slot.
///
/// Phases before the current one render complete, the current phase renders
/// active (or awaiting validation when proof is pending), and later phases
/// render upcoming. Every slot of a closed task renders complete.
#[must_use]
pub fn phase_strip(task: &Task) -> Vec<(Phase, PhaseSlot)> {
    let current = task.phase().ordinal();
    let pending = task.sub_state() == SubState::PendingValidation;
    Phase::WORKING_SEQUENCE
        .into_iter()
        .map(|phase| {
            let slot = match phase.ordinal() {
                position if position < current => PhaseSlot::Complete,
                position if position == current && pending => PhaseSlot::AwaitingValidation,
                position if position == current => PhaseSlot::Active,
                _ => PhaseSlot::Upcoming,
            };
            (phase, slot)
        })
        .collect()
}
