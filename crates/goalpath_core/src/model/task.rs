//! Task domain model.
//!
//! # Responsibility
//! - Define the unit of work owned by a goal, with its repeat settings and
//!   materialized occurrence dates.
//! - Track the swipe outcome status shown in the schedule view.
//!
//! # Invariants
//! - `selected_days_of_week` is set iff `kind == Weekly`.
//! - `monthly_mode` is set iff `kind == Monthly`.
//! - `selected_dates` is strictly ascending (sorted, no duplicates).
//! - `title` is not blank.

use crate::model::goal::GoalId;
use crate::recurrence::{MonthlyMode, RecurrenceRule, TaskType, WeekdaySet};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a task.
pub type TaskId = Uuid;

/// Progress state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    InProgress,
    /// Swiped right.
    Completed,
    /// Swiped left.
    Failed,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Validation failures for `Task` invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    NilUuid,
    NilGoalId,
    EmptyTitle,
    /// Weekday set present on a non-weekly task, or missing on a weekly one.
    DaysOfWeekMismatch(TaskType),
    /// Monthly mode present on a non-monthly task, or missing on a monthly one.
    MonthlyModeMismatch(TaskType),
    /// `selected_dates` is not strictly ascending at this date.
    UnorderedDates(NaiveDate),
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "task uuid must not be nil"),
            Self::NilGoalId => write!(f, "task goal_id must not be nil"),
            Self::EmptyTitle => write!(f, "task title must not be blank"),
            Self::DaysOfWeekMismatch(kind) => write!(
                f,
                "selected_days_of_week must be set only for weekly tasks (type={kind})"
            ),
            Self::MonthlyModeMismatch(kind) => write!(
                f,
                "monthly_mode must be set only for monthly tasks (type={kind})"
            ),
            Self::UnorderedDates(date) => write!(
                f,
                "selected_dates must be ascending without duplicates (at {date})"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// Unit of work under a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskWire")]
pub struct Task {
    pub uuid: TaskId,
    pub goal_id: GoalId,
    pub title: String,
    pub description: Option<String>,
    /// Serialized as `type` to match the client schema.
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub selected_dates: Vec<NaiveDate>,
    pub selected_days_of_week: Option<WeekdaySet>,
    pub monthly_mode: Option<MonthlyMode>,
    pub status: TaskStatus,
}

#[derive(Deserialize)]
struct TaskWire {
    uuid: TaskId,
    goal_id: GoalId,
    title: String,
    description: Option<String>,
    #[serde(rename = "type")]
    kind: TaskType,
    #[serde(default)]
    selected_dates: Vec<NaiveDate>,
    selected_days_of_week: Option<WeekdaySet>,
    monthly_mode: Option<MonthlyMode>,
    #[serde(default)]
    status: TaskStatus,
}

impl TryFrom<TaskWire> for Task {
    type Error = TaskValidationError;

    fn try_from(value: TaskWire) -> Result<Self, Self::Error> {
        let task = Task {
            uuid: value.uuid,
            goal_id: value.goal_id,
            title: value.title,
            description: value.description,
            kind: value.kind,
            selected_dates: value.selected_dates,
            selected_days_of_week: value.selected_days_of_week,
            monthly_mode: value.monthly_mode,
            status: value.status,
        };
        task.validate()?;
        Ok(task)
    }
}

impl Task {
    /// Builds a task from a rule and its already-expanded dates.
    ///
    /// The caller is responsible for `selected_dates` being the expansion of
    /// `rule` over the owning goal's window.
    pub fn from_rule(
        uuid: TaskId,
        goal_id: GoalId,
        title: impl Into<String>,
        description: Option<String>,
        rule: &RecurrenceRule,
        selected_dates: Vec<NaiveDate>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            uuid,
            goal_id,
            title: title.into(),
            description,
            kind: rule.task_type(),
            selected_dates,
            selected_days_of_week: rule.days_of_week(),
            monthly_mode: rule.monthly_mode(),
            status: TaskStatus::InProgress,
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.uuid.is_nil() {
            return Err(TaskValidationError::NilUuid);
        }
        if self.goal_id.is_nil() {
            return Err(TaskValidationError::NilGoalId);
        }
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.selected_days_of_week.is_some() != (self.kind == TaskType::Weekly) {
            return Err(TaskValidationError::DaysOfWeekMismatch(self.kind));
        }
        if self.monthly_mode.is_some() != (self.kind == TaskType::Monthly) {
            return Err(TaskValidationError::MonthlyModeMismatch(self.kind));
        }
        if let Some(pair) = self
            .selected_dates
            .windows(2)
            .find(|pair| pair[0] >= pair[1])
        {
            return Err(TaskValidationError::UnorderedDates(pair[1]));
        }
        Ok(())
    }

    /// Rebuilds the repeat rule this task was expanded from.
    pub fn rule(&self) -> RecurrenceRule {
        match self.kind {
            TaskType::Normal => RecurrenceRule::Normal {
                dates: self.selected_dates.clone(),
            },
            TaskType::Daily => RecurrenceRule::Daily,
            TaskType::Weekly => RecurrenceRule::Weekly {
                days: self.selected_days_of_week.unwrap_or_default(),
            },
            TaskType::Monthly => RecurrenceRule::Monthly {
                mode: self.monthly_mode.unwrap_or(MonthlyMode::Start),
            },
        }
    }

    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        self.selected_dates.binary_search(&date).is_ok()
    }
}
