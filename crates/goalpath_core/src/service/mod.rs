//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod goal_service;
pub mod task_service;
pub mod template_service;
