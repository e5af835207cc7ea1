//! Conditional-write behaviour under concurrent actors.

use super::helpers::{
    TestApp, app, assignee, create_task, project_id, runtime, stored_task, submit_proof,
};
use mockable::DefaultClock;
use rstest::rstest;
use stagegate::task::{
    domain::{
        OrgId, Phase, ProjectId, ProofUrl, SubState, Task, TaskDomainError, UserId,
    },
    ports::{TaskPatch, TaskRepository, UpdateOutcome},
    services::{CreateTaskRequest, SubmitProofRequest, TaskLifecycleError},
};
use std::io;
use tokio::runtime::Runtime;

/// Seeds a task and submits proof, leaving it pending validation.
async fn pending_task(app: &TestApp, assignee: UserId) -> Task {
    let request = CreateTaskRequest::new(
        ProjectId::new(),
        OrgId::new(),
        "Sign off the rollout plan",
        assignee,
        UserId::new(),
    );
    let task = app.creation.create(request).await.expect("task created");
    let submission = SubmitProofRequest::new(
        task.id(),
        assignee,
        ProofUrl::new("https://proofs.example/plan").expect("valid proof url"),
    );
    app.lifecycle
        .submit_proof(submission)
        .await
        .expect("submission accepted")
}

#[rstest]
fn second_guarded_write_with_the_same_guard_is_stale(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
    assignee: UserId,
) {
    let rt = runtime.expect("runtime built");
    let task = create_task(&rt, &app, project_id, assignee, "Review the schema change");
    submit_proof(&rt, &app, task.id(), assignee, "https://proofs.example/v1");

    let pending = stored_task(&rt, &app, task.id());
    let mut approved = pending.clone();
    approved.approve(&DefaultClock).expect("approval accepted");
    let patch = TaskPatch::from_task(&approved);

    let first = rt
        .block_on(app.repository.update_if_sub_state(
            task.id(),
            SubState::PendingValidation,
            &patch,
        ))
        .expect("write succeeds");
    let second = rt
        .block_on(app.repository.update_if_sub_state(
            task.id(),
            SubState::PendingValidation,
            &patch,
        ))
        .expect("write succeeds");

    assert_eq!(first, UpdateOutcome::Applied);
    assert_eq!(second, UpdateOutcome::StaleSubState);
    let stored = stored_task(&rt, &app, task.id());
    assert_eq!(stored.phase(), Phase::DesignGuidance);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_reviewers_land_exactly_one_decision(app: TestApp, assignee: UserId) {
    let task = pending_task(&app, assignee).await;

    let approval = app.lifecycle.approve(task.id());
    let rejection = app.lifecycle.reject(task.id());
    let (approve_result, reject_result) = tokio::join!(approval, rejection);

    let approve_won = approve_result.is_ok();
    let reject_won = reject_result.is_ok();
    assert_ne!(approve_won, reject_won, "exactly one decision must land");
    let loser = if approve_won {
        reject_result.map(|_| ())
    } else {
        approve_result.map(|_| ())
    };
    assert!(matches!(
        loser,
        Err(TaskLifecycleError::StateChanged(id)
            | TaskLifecycleError::Domain(TaskDomainError::NotPendingValidation {
                task_id: id,
                ..
            })) if id == task.id()
    ));

    let stored = app
        .repository
        .find_by_id(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    if approve_won {
        assert_eq!(stored.phase(), Phase::DesignGuidance);
    } else {
        assert_eq!(stored.phase(), Phase::RequirementRefiner);
    }
    assert_eq!(stored.sub_state(), SubState::InProgress);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_decision_does_not_overwrite_the_winner(app: TestApp, assignee: UserId) {
    let task = pending_task(&app, assignee).await;

    app.lifecycle
        .approve(task.id())
        .await
        .expect("first decision lands");
    let stale = app.lifecycle.reject(task.id()).await;

    assert!(matches!(stale, Err(TaskLifecycleError::Domain(_))));
    let stored = app
        .repository
        .find_by_id(task.id())
        .await
        .expect("lookup succeeds")
        .expect("task exists");
    assert_eq!(stored.phase(), Phase::DesignGuidance);
    assert_eq!(stored.sub_state(), SubState::InProgress);
}
