//! Community goal templates.
//!
//! # Responsibility
//! - Describe a reusable goal outline: a title, a category and repeating
//!   tasks without dates.
//! - Hold the in-progress customization of a template before it becomes a
//!   real goal.
//!
//! # Invariants
//! - Template tasks always repeat (`daily|weekly|monthly`); picked dates
//!   only make sense once a goal window exists.
//! - Rule fields follow the same presence rules as `Task`.

use crate::recurrence::{MonthlyMode, RecurrenceRule, TaskType, WeekdaySet};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

pub type TemplateId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateCategory {
    Workout,
    Finance,
}

impl TemplateCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Finance => "finance",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "workout" => Some(Self::Workout),
            "finance" => Some(Self::Finance),
            _ => None,
        }
    }
}

impl Display for TemplateCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tab selection on the community screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateFilter {
    #[default]
    All,
    Favorites,
    Workout,
    Finance,
}

impl TemplateFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Favorites => "favorites",
            Self::Workout => "workout",
            Self::Finance => "finance",
        }
    }

    pub fn matches(self, template: &Template) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => template.is_favorite,
            Self::Workout => template.category == TemplateCategory::Workout,
            Self::Finance => template.category == TemplateCategory::Finance,
        }
    }
}

impl FromStr for TemplateFilter {
    type Err = TemplateValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "favorites" => Ok(Self::Favorites),
            "workout" => Ok(Self::Workout),
            "finance" => Ok(Self::Finance),
            other => Err(TemplateValidationError::UnknownFilter(other.to_string())),
        }
    }
}

impl Display for TemplateFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateValidationError {
    EmptyTitle,
    /// Template tasks cannot carry picked dates.
    NonRepeatingTask,
    /// Rule fields do not match the task type.
    RuleMismatch(TaskType),
    UnknownFilter(String),
}

impl Display for TemplateValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "template task title must not be blank"),
            Self::NonRepeatingTask => {
                write!(f, "template tasks must be daily, weekly or monthly")
            }
            Self::RuleMismatch(kind) => {
                write!(f, "template task rule fields do not match type={kind}")
            }
            Self::UnknownFilter(value) => write!(
                f,
                "unknown template filter `{value}`; expected all|favorites|workout|finance"
            ),
        }
    }
}

impl Error for TemplateValidationError {}

/// One repeating task of a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateTask {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub selected_days_of_week: Option<WeekdaySet>,
    pub monthly_mode: Option<MonthlyMode>,
}

impl TemplateTask {
    pub fn new(
        title: impl Into<String>,
        rule: &RecurrenceRule,
    ) -> Result<Self, TemplateValidationError> {
        let task = Self {
            title: title.into(),
            kind: rule.task_type(),
            selected_days_of_week: rule.days_of_week(),
            monthly_mode: rule.monthly_mode(),
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), TemplateValidationError> {
        if self.title.trim().is_empty() {
            return Err(TemplateValidationError::EmptyTitle);
        }
        if !self.kind.is_repeating() {
            return Err(TemplateValidationError::NonRepeatingTask);
        }
        if self.selected_days_of_week.is_some() != (self.kind == TaskType::Weekly)
            || self.monthly_mode.is_some() != (self.kind == TaskType::Monthly)
        {
            return Err(TemplateValidationError::RuleMismatch(self.kind));
        }
        Ok(())
    }

    pub fn rule(&self) -> RecurrenceRule {
        match self.kind {
            TaskType::Normal => RecurrenceRule::Normal { dates: Vec::new() },
            TaskType::Daily => RecurrenceRule::Daily,
            TaskType::Weekly => RecurrenceRule::Weekly {
                days: self.selected_days_of_week.unwrap_or_default(),
            },
            TaskType::Monthly => RecurrenceRule::Monthly {
                mode: self.monthly_mode.unwrap_or(MonthlyMode::Start),
            },
        }
    }

    /// Steps the repeat type `daily -> weekly -> monthly -> daily`.
    ///
    /// A task entering `weekly` repeats on Mondays and one entering
    /// `monthly` lands on the first of the month.
    pub fn cycle_type(&mut self) -> TaskType {
        let rule = match self.kind {
            TaskType::Daily => RecurrenceRule::Weekly {
                days: WeekdaySet::EMPTY.with(Weekday::Mon),
            },
            TaskType::Weekly => RecurrenceRule::Monthly {
                mode: MonthlyMode::Start,
            },
            TaskType::Monthly | TaskType::Normal => RecurrenceRule::Daily,
        };
        self.kind = rule.task_type();
        self.selected_days_of_week = rule.days_of_week();
        self.monthly_mode = rule.monthly_mode();
        self.kind
    }
}

/// A shareable goal outline from the community catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,
    pub title: String,
    pub description: String,
    pub category: TemplateCategory,
    pub is_favorite: bool,
    pub tasks: Vec<TemplateTask>,
}

impl Template {
    /// Case-insensitive match of `query` against title or description.
    ///
    /// A blank query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Starts a customization of this template.
    pub fn customize(&self) -> GoalDraft {
        GoalDraft {
            template_id: self.id,
            title: self.title.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

/// A template being customized into a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDraft {
    pub template_id: TemplateId,
    pub title: String,
    pub tasks: Vec<TemplateTask>,
}

impl GoalDraft {
    /// Drops the task at `index`; `None` when out of range.
    pub fn remove_task(&mut self, index: usize) -> Option<TemplateTask> {
        (index < self.tasks.len()).then(|| self.tasks.remove(index))
    }

    /// Cycles the repeat type of the task at `index`.
    pub fn cycle_task_type(&mut self, index: usize) -> Option<TaskType> {
        self.tasks.get_mut(index).map(TemplateTask::cycle_type)
    }
}
