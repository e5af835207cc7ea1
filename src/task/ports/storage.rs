//! Proof storage port for uploaded artifact files.

use crate::task::domain::{ProofUrl, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for proof storage operations.
pub type ProofStorageResult<T> = Result<T, ProofStorageError>;

/// Largest accepted proof file, in bytes.
pub const MAX_PROOF_BYTES: usize = 25 * 1024 * 1024;

/// An artifact file submitted as proof of work for the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofFile {
    /// Original file name, used to build the stored object key.
    pub file_name: String,
    /// Declared media type.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl ProofFile {
    /// Creates a proof file.
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Binary object store returning a public URL for an uploaded proof.
#[async_trait]
pub trait ProofStorage: Send + Sync {
    /// Stores the file under the task's proof prefix and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProofStorageError::EmptyFile`] or
    /// [`ProofStorageError::FileTooLarge`] on size rejection, and
    /// [`ProofStorageError::Unavailable`] on transport failure.
    async fn store(&self, task_id: TaskId, file: &ProofFile) -> ProofStorageResult<ProofUrl>;
}

/// Errors returned by proof storage implementations.
#[derive(Debug, Clone, Error)]
pub enum ProofStorageError {
    /// The uploaded file has no content.
    #[error("proof file '{0}' is empty")]
    EmptyFile(String),

    /// The uploaded file exceeds [`MAX_PROOF_BYTES`].
    #[error("proof file '{file_name}' is {size} bytes, limit is {limit}")]
    FileTooLarge {
        /// Rejected file name.
        file_name: String,
        /// Rejected file size in bytes.
        size: usize,
        /// Accepted maximum in bytes.
        limit: usize,
    },

    /// The object store could not be reached or rejected the write.
    #[error("proof storage unavailable: {0}")]
    Unavailable(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProofStorageError {
    /// Wraps a transport error.
    pub fn unavailable(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable(Arc::new(err))
    }
}
