//! Integration tests for single and batch task seeding.

use super::helpers::{TestApp, app, create_task, project_id, runtime};
use rstest::rstest;
use stagegate::task::{
    domain::{OrgId, Phase, Priority, ProjectId, SubState, TaskDomainError, TaskStatus, UserId},
    ports::{TaskFilter, TaskRepository},
    services::{CreateTaskRequest, TaskCreationError},
};
use std::io;
use tokio::runtime::Runtime;

#[rstest]
fn created_task_is_seeded_at_the_first_gate(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
) {
    let rt = runtime.expect("runtime built");
    let assignee = UserId::new();

    let task = create_task(&rt, &app, project_id, assignee, "Refine the intake brief");

    assert_eq!(task.phase(), Phase::RequirementRefiner);
    assert_eq!(task.sub_state(), SubState::InProgress);
    assert_eq!(task.status(), TaskStatus::InProgress);
    assert_eq!(task.assigned_to(), assignee);
    assert!(task.proof_url().is_none());
}

#[rstest]
fn batch_creation_stores_every_task_in_the_project(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
) {
    let rt = runtime.expect("runtime built");
    let org_id = OrgId::new();
    let assignee = UserId::new();
    let lead = UserId::new();
    let requests = vec![
        CreateTaskRequest::new(project_id, org_id, "Refine scope", assignee, lead),
        CreateTaskRequest::new(project_id, org_id, "Draft design brief", assignee, lead)
            .with_priority(Priority::High),
        CreateTaskRequest::new(project_id, org_id, "Plan deployment", assignee, lead)
            .with_allocated_hours(24),
    ];

    let created = rt
        .block_on(app.creation.create_batch(requests))
        .expect("batch created");

    assert_eq!(created.len(), 3);
    let stored = rt
        .block_on(
            app.repository
                .list(&TaskFilter::all().in_project(project_id)),
        )
        .expect("list succeeds");
    assert_eq!(stored.len(), 3);
    for task in &stored {
        assert_eq!(task.phase(), Phase::RequirementRefiner);
        assert_eq!(task.sub_state(), SubState::InProgress);
    }
}

#[rstest]
fn invalid_batch_request_rejects_the_whole_batch(
    runtime: io::Result<Runtime>,
    app: TestApp,
    project_id: ProjectId,
) {
    let rt = runtime.expect("runtime built");
    let org_id = OrgId::new();
    let assignee = UserId::new();
    let lead = UserId::new();
    let requests = vec![
        CreateTaskRequest::new(project_id, org_id, "Refine scope", assignee, lead),
        CreateTaskRequest::new(project_id, org_id, "  ", assignee, lead),
    ];

    let result = rt.block_on(app.creation.create_batch(requests));

    let Err(TaskCreationError::InvalidRequests(invalid)) = result else {
        panic!("expected InvalidRequests");
    };
    assert_eq!(invalid, vec![(1, TaskDomainError::EmptyTitle)]);
    let stored = rt
        .block_on(
            app.repository
                .list(&TaskFilter::all().in_project(project_id)),
        )
        .expect("list succeeds");
    assert!(stored.is_empty());
}
