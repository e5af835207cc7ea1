//! Port contracts for task lifecycle management.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod notifier;
pub mod repository;
pub mod storage;

pub use notifier::{Notice, NoticeKind, Notifier};
pub use repository::{
    TaskFilter, TaskPatch, TaskRepository, TaskRepositoryError, TaskRepositoryResult,
    UpdateOutcome,
};
pub use storage::{MAX_PROOF_BYTES, ProofFile, ProofStorage, ProofStorageError, ProofStorageResult};
