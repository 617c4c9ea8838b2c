//! Domain model for goals and their tasks.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - A task belongs to exactly one goal and is deleted with it.

pub mod goal;
pub mod task;
pub mod template;
