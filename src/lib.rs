//! Stagegate: phase-gated task lifecycle engine.
//!
//! This crate implements the task lifecycle core of a multi-role talent
//! operations platform: tasks move through a fixed sequence of working
//! phases, each gated by an explicit reviewer approval of submitted proof.
//!
//! # Architecture
//!
//! Stagegate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, storage, etc.)
//!
//! # Modules
//!
//! - [`task`]: Task seeding, proof submission, and phase-gated approval

pub mod task;
