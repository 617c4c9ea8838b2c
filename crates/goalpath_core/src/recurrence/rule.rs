//! Recurrence rule vocabulary.
//!
//! # Responsibility
//! - Define task repeat kinds, monthly day-selection modes and weekday sets.
//! - Provide string labels shared by storage, CLI and FFI layers.
//!
//! # Invariants
//! - Weekday indices are `0..=6` with `0 = Sunday`.
//! - `RecurrenceRule` carries exactly the parameters its kind needs.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub type RecurrenceResult<T> = Result<T, RecurrenceError>;

/// Errors raised by recurrence parsing and expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// `due` is earlier than `start`. Always a caller bug.
    InvalidRange { start: NaiveDate, due: NaiveDate },
    /// Weekday index outside `0..=6`.
    InvalidWeekday(u8),
    /// Explicitly picked date falls outside the goal window.
    DateOutsideRange {
        date: NaiveDate,
        start: NaiveDate,
        due: NaiveDate,
    },
    UnknownTaskType(String),
    UnknownMonthlyMode(String),
    /// Text is not a `yyyy-MM-dd` calendar date.
    InvalidDate(String),
}

impl Display for RecurrenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRange { start, due } => {
                write!(f, "due date ({due}) must be >= start date ({start})")
            }
            Self::InvalidWeekday(index) => {
                write!(f, "invalid weekday index {index}; expected 0..=6 (0 = Sunday)")
            }
            Self::DateOutsideRange { date, start, due } => {
                write!(f, "date {date} is outside goal range {start}..={due}")
            }
            Self::UnknownTaskType(value) => write!(
                f,
                "unknown task type `{value}`; expected normal|daily|weekly|monthly"
            ),
            Self::UnknownMonthlyMode(value) => {
                write!(f, "unknown monthly mode `{value}`; expected start|mid|end")
            }
            Self::InvalidDate(value) => {
                write!(f, "invalid date `{value}`; expected yyyy-MM-dd")
            }
        }
    }
}

impl Error for RecurrenceError {}

/// Repeat kind of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    /// One-off task on user-picked dates.
    Normal,
    Daily,
    Weekly,
    Monthly,
}

impl TaskType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Returns whether dates are derived from a rule rather than picked.
    pub fn is_repeating(self) -> bool {
        self != Self::Normal
    }
}

impl FromStr for TaskType {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(RecurrenceError::UnknownTaskType(other.to_string())),
        }
    }
}

impl Display for TaskType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which single day of each month a monthly task lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyMode {
    /// Day 1.
    Start,
    /// `ceil(days_in_month / 2)`.
    Mid,
    /// Last day of the month.
    End,
}

impl MonthlyMode {
    /// All modes in picker order.
    pub const ALL: [MonthlyMode; 3] = [Self::Start, Self::Mid, Self::End];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Mid => "mid",
            Self::End => "end",
        }
    }

    /// Selected day number for a month with `days_in_month` days.
    pub fn day_for(self, days_in_month: u32) -> u32 {
        match self {
            Self::Start => 1,
            Self::Mid => days_in_month.div_ceil(2),
            Self::End => days_in_month,
        }
    }
}

impl FromStr for MonthlyMode {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "mid" => Ok(Self::Mid),
            "end" => Ok(Self::End),
            other => Err(RecurrenceError::UnknownMonthlyMode(other.to_string())),
        }
    }
}

impl Display for MonthlyMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Set of weekdays keyed by Sunday-based index.
///
/// Serialized as an ascending integer array, e.g. `[1, 3, 5]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub const EMPTY: WeekdaySet = WeekdaySet(0);

    /// Builds a set from Sunday-based indices. Duplicates are ignored.
    pub fn from_indices(indices: &[u8]) -> RecurrenceResult<Self> {
        let mut set = Self::EMPTY;
        for &index in indices {
            set.insert(index)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, index: u8) -> RecurrenceResult<()> {
        self.0 |= bit(index)?;
        Ok(())
    }

    /// Flips membership of one weekday, mirroring the picker's day toggle.
    pub fn toggle(&mut self, index: u8) -> RecurrenceResult<()> {
        self.0 ^= bit(index)?;
        Ok(())
    }

    /// Returns this set plus `weekday`.
    pub fn with(self, weekday: Weekday) -> Self {
        Self(self.0 | 1 << weekday.num_days_from_sunday())
    }

    pub fn contains_index(self, index: u8) -> bool {
        bit(index).is_ok_and(|mask| self.0 & mask != 0)
    }

    pub fn contains(self, weekday: Weekday) -> bool {
        // num_days_from_sunday is always 0..=6.
        self.contains_index(weekday.num_days_from_sunday() as u8)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Member indices in ascending order.
    pub fn indices(self) -> Vec<u8> {
        (0..7).filter(|index| self.contains_index(*index)).collect()
    }

    /// Short English labels (`Sun`..`Sat`) in ascending order.
    pub fn labels(self) -> Vec<&'static str> {
        self.indices()
            .into_iter()
            .map(|index| WEEKDAY_LABELS[usize::from(index)])
            .collect()
    }
}

fn bit(index: u8) -> RecurrenceResult<u8> {
    if index > 6 {
        return Err(RecurrenceError::InvalidWeekday(index));
    }
    Ok(1 << index)
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = RecurrenceError;

    fn try_from(value: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(&value)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(value: WeekdaySet) -> Self {
        value.indices()
    }
}

/// Complete repeat configuration of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceRule {
    /// User-picked dates, passed through after normalization.
    Normal { dates: Vec<NaiveDate> },
    Daily,
    Weekly { days: WeekdaySet },
    Monthly { mode: MonthlyMode },
}

impl RecurrenceRule {
    pub fn task_type(&self) -> TaskType {
        match self {
            Self::Normal { .. } => TaskType::Normal,
            Self::Daily => TaskType::Daily,
            Self::Weekly { .. } => TaskType::Weekly,
            Self::Monthly { .. } => TaskType::Monthly,
        }
    }

    pub fn days_of_week(&self) -> Option<WeekdaySet> {
        match self {
            Self::Weekly { days } => Some(*days),
            _ => None,
        }
    }

    pub fn monthly_mode(&self) -> Option<MonthlyMode> {
        match self {
            Self::Monthly { mode } => Some(*mode),
            _ => None,
        }
    }
}
