//! End-to-end lifecycle tests: proof submission, approval, and rejection.

use super::helpers::{
    TestApp, app, assignee, create_task, project_id, runtime, stored_task, submit_proof,
    verify_sub_state,
};
use rstest::rstest;
use stagegate::task::{
    domain::{Phase, PhaseAdvance, ProjectId, ProofUrl, SubState, TaskStatus, UserId},
    ports::{NoticeKind, ProofFile},
    services::{SubmitProofRequest, TaskLifecycleError},
};
use stagegate::task::domain::Task;
use std::io;
use tokio::runtime::Runtime;

/// Asserts the task has reached its closed, completed terminal state.
///
/// # Errors
///
/// Returns an error if any terminal-state field is off.
fn assert_closed_and_complete(task: &Task) -> Result<(), eyre::Report> {
    eyre::ensure!(task.is_closed(), "task should be closed, is {}", task.phase());
    eyre::ensure!(
        task.sub_state() == SubState::Approved,
        "closed task should carry the approved sub-state, has {}",
        task.sub_state()
    );
    eyre::ensure!(
        task.status() == TaskStatus::Completed,
        "closed task should read completed, reads {}",
        task.status()
    );
    task.proof_url()
        .ok_or_else(|| eyre::eyre!("closed task should retain its final proof"))?;
    Ok(())
}

#[rstest]
fn proof_submission_parks_the_task_pending_validation(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Document the data flows");

    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");

    let stored = stored_task(&rt, &app, task.id());
    assert_eq!(stored.phase(), Phase::RequirementRefiner);
    assert_eq!(stored.sub_state(), SubState::PendingValidation);
    assert_eq!(
        stored.proof_url().map(ProofUrl::as_str),
        Some("https://proofs.example/v1")
    );
}

#[rstest]
fn resubmission_replaces_only_the_proof_pointer(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Document the data flows");
    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");

    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v2");

    let stored = stored_task(&rt, &app, task.id());
    assert_eq!(stored.sub_state(), SubState::PendingValidation);
    assert_eq!(
        stored.proof_url().map(ProofUrl::as_str),
        Some("https://proofs.example/v2")
    );
}

#[rstest]
fn uploaded_proof_lands_in_storage_and_on_the_task(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Capture the demo recording");
    let file = ProofFile::new("demo.mp4", "video/mp4", vec![0xAA; 64]);

    let updated = rt
        .block_on(app.lifecycle.upload_and_submit_proof(task.id(), assignee, file))
        .expect("upload and submission accepted");

    let url = updated.proof_url().expect("proof pointer set");
    let bytes = app
        .storage
        .fetch(url)
        .expect("storage readable")
        .expect("object stored");
    assert_eq!(bytes.len(), 64);
    verify_sub_state(&rt, &app, task.id(), SubState::PendingValidation);
}

#[rstest]
fn rejection_sends_the_task_back_within_the_same_phase(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Design the billing screen");
    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");

    rt.block_on(app.lifecycle.reject(task.id()))
        .expect("rejection accepted");

    let stored = stored_task(&rt, &app, task.id());
    assert_eq!(stored.phase(), Phase::RequirementRefiner);
    assert_eq!(stored.sub_state(), SubState::InProgress);
    assert_eq!(
        stored.proof_url().map(ProofUrl::as_str),
        Some("https://proofs.example/v1")
    );
}

#[rstest]
fn rework_after_rejection_reaches_validation_again(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Design the billing screen");
    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");
    rt.block_on(app.lifecycle.reject(task.id()))
        .expect("rejection accepted");

    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v2");
    let (updated, advance) = rt
        .block_on(app.lifecycle.approve(task.id()))
        .expect("approval accepted");

    assert_eq!(advance, PhaseAdvance::Advanced(Phase::DesignGuidance));
    assert_eq!(updated.phase(), Phase::DesignGuidance);
    assert_eq!(updated.sub_state(), SubState::InProgress);
}

#[rstest]
fn five_approvals_walk_the_task_to_closed(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) -> Result<(), eyre::Report> {
    let rt = runtime?;
    let task = create_task(&rt, &app, project_id, assignee, "Deliver the onboarding flow");

    for (round, phase) in Phase::WORKING_SEQUENCE.into_iter().enumerate() {
        let stored = stored_task(&rt, &app, task.id());
        eyre::ensure!(
            stored.phase() == phase,
            "round {round} should start at {phase}, found {}",
            stored.phase()
        );
        let url = format!("https://proofs.example/round-{round}");
        submit_proof(&rt, &app, task.id(), assignee, &url);
        rt.block_on(app.lifecycle.approve(task.id()))?;
    }

    let closed = stored_task(&rt, &app, task.id());
    assert_closed_and_complete(&closed)
}

#[rstest]
fn closed_task_refuses_further_lifecycle_operations(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Deliver the onboarding flow");
    for round in 0..5 {
        let url = format!("https://proofs.example/round-{round}");
        submit_proof(&rt, &app, task.id(), assignee, &url);
        rt.block_on(app.lifecycle.approve(task.id()))
            .expect("approval accepted");
    }

    let request = SubmitProofRequest::new(
        task.id(),
        assignee,
        ProofUrl::new("https://proofs.example/late").expect("valid proof url"),
    );
    let submit = rt.block_on(app.lifecycle.submit_proof(request));
    let approve = rt.block_on(app.lifecycle.approve(task.id()));
    let reject = rt.block_on(app.lifecycle.reject(task.id()));

    assert!(matches!(submit, Err(TaskLifecycleError::Domain(_))));
    assert!(matches!(approve, Err(TaskLifecycleError::Domain(_))));
    assert!(matches!(reject, Err(TaskLifecycleError::Domain(_))));
    let stored = stored_task(&rt, &app, task.id());
    assert!(stored.is_closed());
}

#[rstest]
fn every_attempt_delivers_exactly_one_notice(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Verify the audit trail");

    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");
    rt.block_on(app.lifecycle.approve(task.id()))
        .expect("approval accepted");
    let premature = rt.block_on(app.lifecycle.approve(task.id()));
    assert!(matches!(premature, Err(TaskLifecycleError::Domain(_))));

    let kinds: Vec<NoticeKind> = app
        .notifier
        .delivered()
        .into_iter()
        .map(|notice| notice.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![NoticeKind::Success, NoticeKind::Success, NoticeKind::Error]
    );
}
