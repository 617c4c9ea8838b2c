//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for goals, tasks and
//!   the template catalog.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes validate models before touching SQL.
//! - Reads reject invalid persisted state instead of masking it.
//! - Multi-statement writes run in one transaction.

mod columns;
mod error;
pub mod goal_repo;
pub mod task_repo;
pub mod template_repo;

pub use error::{RepoError, RepoResult};
