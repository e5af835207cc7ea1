//! Shared test helpers for in-memory adapter integration tests.

use mockable::DefaultClock;
use rstest::fixture;
use stagegate::task::{
    adapters::memory::{InMemoryProofStorage, InMemoryTaskRepository, RecordingNotifier},
    domain::{ProjectId, ProofUrl, SubState, Task, TaskId, UserId},
    ports::TaskRepository,
    services::{
        CreateTaskRequest, SubmitProofRequest, TaskCreationService, TaskLifecycleService,
    },
};
use std::io;
use std::sync::Arc;
use tokio::runtime::Runtime;

/// Lifecycle service wired to in-memory adapters.
pub type MemoryLifecycleService =
    TaskLifecycleService<InMemoryTaskRepository, InMemoryProofStorage, RecordingNotifier, DefaultClock>;

/// Creation service wired to the in-memory repository.
pub type MemoryCreationService = TaskCreationService<InMemoryTaskRepository, DefaultClock>;

/// Fully wired in-memory application slice for one test.
pub struct TestApp {
    /// Lifecycle orchestration service under test.
    pub lifecycle: MemoryLifecycleService,
    /// Creation service under test.
    pub creation: MemoryCreationService,
    /// Shared repository for direct store inspection.
    pub repository: Arc<InMemoryTaskRepository>,
    /// Shared proof store for direct object inspection.
    pub storage: Arc<InMemoryProofStorage>,
    /// Notifier capturing every delivered toast.
    pub notifier: Arc<RecordingNotifier>,
}

/// Provides a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Provides a fresh in-memory application slice for each test.
#[fixture]
pub fn app() -> TestApp {
    let repository = Arc::new(InMemoryTaskRepository::new());
    let storage = Arc::new(InMemoryProofStorage::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(DefaultClock);
    let lifecycle = TaskLifecycleService::new(
        Arc::clone(&repository),
        Arc::clone(&storage),
        Arc::clone(&notifier),
        Arc::clone(&clock),
    );
    let creation = TaskCreationService::new(Arc::clone(&repository), clock);
    TestApp {
        lifecycle,
        creation,
        repository,
        storage,
        notifier,
    }
}

/// Provides a project scope for tests.
#[fixture]
pub fn project_id() -> ProjectId {
    ProjectId::new()
}

/// Provides an assignee for tests.
#[fixture]
pub fn assignee() -> UserId {
    UserId::new()
}

/// Creates one task through the creation service and returns it.
pub fn create_task(
    rt: &Runtime,
    app: &TestApp,
    project_id: ProjectId,
    assignee: UserId,
    title: &str,
) -> Task {
    let request = CreateTaskRequest::new(
        project_id,
        stagegate::task::domain::OrgId::new(),
        title,
        assignee,
        UserId::new(),
    );
    rt.block_on(app.creation.create(request))
        .expect("task created")
}

/// Submits proof for the task, moving it to pending validation.
pub fn submit_proof(rt: &Runtime, app: &TestApp, task_id: TaskId, assignee: UserId, url: &str) {
    let request = SubmitProofRequest::new(
        task_id,
        assignee,
        ProofUrl::new(url).expect("valid proof url"),
    );
    rt.block_on(app.lifecycle.submit_proof(request))
        .expect("submission accepted");
}

/// Reads the task back from the store.
pub fn stored_task(rt: &Runtime, app: &TestApp, task_id: TaskId) -> Task {
    rt.block_on(app.repository.find_by_id(task_id))
        .expect("lookup succeeds")
        .expect("task exists")
}

/// Verifies the task sits at the given sub-state in the store.
pub fn verify_sub_state(rt: &Runtime, app: &TestApp, task_id: TaskId, expected: SubState) {
    let task = stored_task(rt, app, task_id);
    assert_eq!(task.sub_state(), expected);
}
