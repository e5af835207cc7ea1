//! Phase-gated task lifecycle management.
//!
//! Tasks are seeded in the first working phase and advance through the fixed
//! phase sequence only via reviewer approval of submitted proof. Rejection
//! returns the task to execution within the same phase. All lifecycle
//! mutations flow through conditional writes guarded on the task's
//! sub-state, so two reviewers racing on the same pending task cannot both
//! apply a decision. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
