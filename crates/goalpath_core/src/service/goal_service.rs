//! Goal use-case service.
//!
//! # Responsibility
//! - Provide goal create/read/rename/delete entry points.
//! - Gate destructive date changes behind explicit confirmation.
//! - Report monthly-mode availability for a goal's window.
//!
//! # Invariants
//! - A date change on a goal with tasks never mutates anything unless the
//!   caller confirmed it; once confirmed, every task of the goal is cleared.
//! - Tasks are not re-expanded after a date change.

use crate::model::goal::{Goal, GoalId, GoalValidationError};
use crate::recurrence::{monthly_mode_options, MonthlyModeOption, RecurrenceError};
use crate::repo::goal_repo::GoalRepository;
use crate::repo::RepoError;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for goal use-cases.
#[derive(Debug)]
pub enum GoalServiceError {
    Validation(GoalValidationError),
    GoalNotFound(GoalId),
    Recurrence(RecurrenceError),
    Repo(RepoError),
}

impl Display for GoalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::GoalNotFound(id) => write!(f, "goal not found: {id}"),
            Self::Recurrence(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GoalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Recurrence(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::GoalNotFound(_) => None,
        }
    }
}

impl From<GoalValidationError> for GoalServiceError {
    fn from(value: GoalValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RecurrenceError> for GoalServiceError {
    fn from(value: RecurrenceError) -> Self {
        Self::Recurrence(value)
    }
}

impl From<RepoError> for GoalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::GoalNotFound(id) => Self::GoalNotFound(id),
            RepoError::Goal(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type GoalServiceResult<T> = Result<T, GoalServiceError>;

/// Result of a goal date change request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateChange {
    /// Nothing changed; the caller must confirm clearing `task_count` tasks.
    ConfirmationRequired { task_count: u32 },
    /// Window moved; `cleared_tasks` tasks were deleted.
    Applied { goal: Goal, cleared_tasks: usize },
}

/// Goal service facade over repository implementations.
pub struct GoalService<R: GoalRepository> {
    repo: R,
}

impl<R: GoalRepository> GoalService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a goal after validating its window.
    pub fn create_goal(
        &self,
        title: impl Into<String>,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> GoalServiceResult<Goal> {
        let title: String = title.into();
        let goal = Goal::new(title.trim(), start_date, due_date)?;
        self.repo.create_goal(&goal)?;
        info!(
            "event=goal_create module=service status=ok goal_id={} span_days={}",
            goal.uuid,
            goal.duration_days()
        );
        Ok(goal)
    }

    pub fn get_goal(&self, id: GoalId) -> GoalServiceResult<Option<Goal>> {
        Ok(self.repo.get_goal(id)?)
    }

    /// Gets a goal or fails with `GoalNotFound`.
    pub fn require_goal(&self, id: GoalId) -> GoalServiceResult<Goal> {
        self.repo
            .get_goal(id)?
            .ok_or(GoalServiceError::GoalNotFound(id))
    }

    pub fn list_goals(&self) -> GoalServiceResult<Vec<Goal>> {
        Ok(self.repo.list_goals()?)
    }

    /// Renames a goal. Title edits never touch tasks.
    pub fn rename_goal(&self, id: GoalId, title: impl Into<String>) -> GoalServiceResult<Goal> {
        let title: String = title.into();
        let current = self.require_goal(id)?;
        let renamed = Goal::with_id(id, title.trim(), current.start_date, current.due_date)?;
        self.repo.rename_goal(id, renamed.title.as_str())?;
        Ok(renamed)
    }

    /// Moves a goal's window.
    ///
    /// # Contract
    /// - No tasks: applied directly, `cleared_tasks = 0`.
    /// - Tasks exist and `confirmed == false`: returns
    ///   `ConfirmationRequired` without touching storage.
    /// - Tasks exist and `confirmed == true`: window moved and all tasks
    ///   deleted in one transaction.
    pub fn change_goal_dates(
        &self,
        id: GoalId,
        start_date: NaiveDate,
        due_date: NaiveDate,
        confirmed: bool,
    ) -> GoalServiceResult<DateChange> {
        let current = self.require_goal(id)?;
        // Validates the new window before asking for confirmation.
        Goal::with_id(id, current.title.clone(), start_date, due_date)?;

        let task_count = self.repo.count_tasks(id)?;
        if task_count > 0 && !confirmed {
            info!(
                "event=goal_reschedule module=service status=needs_confirmation goal_id={id} task_count={task_count}"
            );
            return Ok(DateChange::ConfirmationRequired { task_count });
        }

        let cleared_tasks = self.repo.reschedule_goal(id, start_date, due_date)?;
        if cleared_tasks > 0 {
            warn!(
                "event=goal_reschedule module=service status=ok goal_id={id} cleared_tasks={cleared_tasks}"
            );
        } else {
            info!("event=goal_reschedule module=service status=ok goal_id={id} cleared_tasks=0");
        }

        Ok(DateChange::Applied {
            goal: self.require_goal(id)?,
            cleared_tasks,
        })
    }

    /// Deletes a goal and, through storage cascade, all of its tasks.
    pub fn delete_goal(&self, id: GoalId) -> GoalServiceResult<()> {
        self.repo.delete_goal(id)?;
        info!("event=goal_delete module=service status=ok goal_id={id}");
        Ok(())
    }

    /// Monthly picker availability for the goal's current window.
    pub fn monthly_mode_options(&self, id: GoalId) -> GoalServiceResult<Vec<MonthlyModeOption>> {
        let goal = self.require_goal(id)?;
        Ok(monthly_mode_options(goal.start_date, goal.due_date)?)
    }
}
