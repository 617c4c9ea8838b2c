//! Core domain logic for GoalPath.
//! This crate is the single source of truth for goal/task invariants,
//! recurring-task date expansion and the community template catalog.

pub mod db;
pub mod gesture;
pub mod logging;
pub mod model;
pub mod recurrence;
pub mod repo;
pub mod service;

pub use chrono::NaiveDate;
pub use gesture::{SwipeConfig, SwipeOutcome, SwipeState, SwipeTracker};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::goal::{Goal, GoalId, GoalValidationError};
pub use model::task::{Task, TaskId, TaskStatus, TaskValidationError};
pub use model::template::{
    GoalDraft, Template, TemplateCategory, TemplateFilter, TemplateId, TemplateTask,
    TemplateValidationError,
};
pub use recurrence::{
    expand, format_iso_date, format_iso_dates, is_supported_date, monthly_mode_options,
    parse_iso_date, week_containing, MonthlyMode, MonthlyModeOption, RecurrenceError,
    RecurrenceResult, RecurrenceRule, TaskType, WeekdaySet,
};
pub use repo::goal_repo::{GoalRepository, SqliteGoalRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::template_repo::{SqliteTemplateRepository, TemplateRepository};
pub use repo::{RepoError, RepoResult};
pub use service::goal_service::{DateChange, GoalService, GoalServiceError, GoalServiceResult};
pub use service::task_service::{
    AgendaDay, AgendaEntry, TaskDraft, TaskService, TaskServiceError, TaskServiceResult,
};
pub use service::template_service::{
    InstantiatedGoal, TemplateService, TemplateServiceError, TemplateServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
