//! In-memory proof storage for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{ProofUrl, TaskDomainError, TaskId},
    ports::{MAX_PROOF_BYTES, ProofFile, ProofStorage, ProofStorageError, ProofStorageResult},
};

/// In-memory proof store returning deterministic `memory://` URLs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProofStorage {
    objects: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryProofStorage {
    /// Creates an empty proof store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the stored bytes for a previously returned URL.
    ///
    /// # Errors
    ///
    /// Returns [`ProofStorageError::Unavailable`] when the lock is poisoned.
    pub fn fetch(&self, url: &ProofUrl) -> ProofStorageResult<Option<Vec<u8>>> {
        let objects = self.objects.read().map_err(|err| {
            ProofStorageError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(objects.get(url.as_str()).cloned())
    }
}

#[async_trait]
impl ProofStorage for InMemoryProofStorage {
    async fn store(&self, task_id: TaskId, file: &ProofFile) -> ProofStorageResult<ProofUrl> {
        if file.bytes.is_empty() {
            return Err(ProofStorageError::EmptyFile(file.file_name.clone()));
        }
        if file.bytes.len() > MAX_PROOF_BYTES {
            return Err(ProofStorageError::FileTooLarge {
                file_name: file.file_name.clone(),
                size: file.bytes.len(),
                limit: MAX_PROOF_BYTES,
            });
        }

        let key = format!("memory://proofs/{task_id}/{}", file.file_name);
        let mut objects = self.objects.write().map_err(|err| {
            ProofStorageError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        objects.insert(key.clone(), file.bytes.clone());

        ProofUrl::new(key).map_err(|err: TaskDomainError| {
            ProofStorageError::unavailable(std::io::Error::other(err.to_string()))
        })
    }
}
