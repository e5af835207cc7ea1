//! In-memory adapters for tests and embedding hosts.

mod notifier;
mod storage;
mod task;

pub use notifier::RecordingNotifier;
pub use storage::InMemoryProofStorage;
pub use task::InMemoryTaskRepository;
