//! Goal domain model.
//!
//! # Responsibility
//! - Define the bounded objective that owns tasks.
//! - Validate the goal date window.
//!
//! # Invariants
//! - `uuid` is non-nil and stable for the goal lifetime.
//! - `start_date <= due_date`, enforced on construction and deserialization.
//! - Both dates fall in years `0000..=9999` so their `yyyy-MM-dd` text
//!   orders like the dates themselves.
//! - `title` is not blank.

use crate::recurrence::is_supported_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a goal.
pub type GoalId = Uuid;

/// Validation failures for `Goal` invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalValidationError {
    NilUuid,
    EmptyTitle,
    InvalidDateRange { start: NaiveDate, due: NaiveDate },
    /// Year outside `0000..=9999`.
    UnsupportedDate(NaiveDate),
}

impl Display for GoalValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilUuid => write!(f, "goal uuid must not be nil"),
            Self::EmptyTitle => write!(f, "goal title must not be blank"),
            Self::InvalidDateRange { start, due } => {
                write!(f, "due_date ({due}) must be >= start_date ({start})")
            }
            Self::UnsupportedDate(date) => {
                write!(f, "goal date {date} is outside supported years 0000..=9999")
            }
        }
    }
}

impl Error for GoalValidationError {}

/// User-defined objective with an inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GoalWire")]
pub struct Goal {
    pub uuid: GoalId,
    pub title: String,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

#[derive(Deserialize)]
struct GoalWire {
    uuid: GoalId,
    title: String,
    start_date: NaiveDate,
    due_date: NaiveDate,
}

impl TryFrom<GoalWire> for Goal {
    type Error = GoalValidationError;

    fn try_from(value: GoalWire) -> Result<Self, Self::Error> {
        Goal::with_id(value.uuid, value.title, value.start_date, value.due_date)
    }
}

impl Goal {
    /// Creates a goal with a generated ID.
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self, GoalValidationError> {
        Self::with_id(Uuid::new_v4(), title, start_date, due_date)
    }

    /// Creates a goal with a caller-provided ID (import/read-back paths).
    pub fn with_id(
        uuid: GoalId,
        title: impl Into<String>,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<Self, GoalValidationError> {
        let goal = Self {
            uuid,
            title: title.into(),
            start_date,
            due_date,
        };
        goal.validate()?;
        Ok(goal)
    }

    pub fn validate(&self) -> Result<(), GoalValidationError> {
        if self.uuid.is_nil() {
            return Err(GoalValidationError::NilUuid);
        }
        if self.title.trim().is_empty() {
            return Err(GoalValidationError::EmptyTitle);
        }
        for date in [self.start_date, self.due_date] {
            if !is_supported_date(date) {
                return Err(GoalValidationError::UnsupportedDate(date));
            }
        }
        if self.due_date < self.start_date {
            return Err(GoalValidationError::InvalidDateRange {
                start: self.start_date,
                due: self.due_date,
            });
        }
        Ok(())
    }

    /// Returns whether `date` lies inside the inclusive window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.due_date
    }

    /// Inclusive window length in days (a single-day goal is 1).
    pub fn duration_days(&self) -> i64 {
        (self.due_date - self.start_date).num_days() + 1
    }
}
