//! Validated proof artifact reference.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-empty URL pointing at the most recently submitted proof artifact.
///
/// The lifecycle engine treats this as a replaceable pointer: a resubmission
/// overwrites it, and prior proofs are not retained by this subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProofUrl(String);

impl ProofUrl {
    /// Creates a validated proof URL.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyProofUrl`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyProofUrl);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the URL as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ProofUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ProofUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
